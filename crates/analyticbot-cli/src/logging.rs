// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Builds the filter: an explicit level wins, then `RUST_LOG`, then `warn`.
pub fn env_filter(level: Option<&str>) -> Result<EnvFilter> {
    let default_level = match level {
        Some(raw) => raw
            .parse::<Level>()
            .map_err(|_| anyhow::anyhow!("invalid log level {raw:?}"))?,
        None => Level::WARN,
    };
    let builder = EnvFilter::builder().with_default_directive(default_level.into());
    Ok(if level.is_some() {
        builder.parse_lossy("")
    } else {
        builder.from_env_lossy()
    })
}

/// Routes `tracing` output to `path`; the terminal belongs to the TUI.
pub fn init(path: &Path, level: Option<&str>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter(level)?);

    tracing_subscriber::registry()
        .with(file_layer)
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}
