// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use analyticbot_app::{AppState, Language, Localizer, SessionRole};
use analyticbot_client::Client;
use analyticbot_session::{AdminWorkspace, Backend, SessionManager};
use analyticbot_testkit::DemoBackend;
use anyhow::{Context, Result, anyhow};
use config::Config;
use runtime::HttpBackend;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `analyticbot --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let level = options.log_level.as_deref().or(config.log_level());
    logging::init(&config.log_path()?, level)?;

    let backend: Arc<dyn Backend> = if options.demo {
        info!("starting with the in-process demo backend");
        Arc::new(DemoBackend::default())
    } else {
        let client = Client::new(config.base_url(), config.timeout()?).with_context(|| {
            format!(
                "invalid [backend] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
        let backend = HttpBackend::new(client);
        if options.check_only {
            backend.check()?;
            return Ok(());
        }
        Arc::new(backend)
    };
    if options.check_only {
        return Ok(());
    }

    let role = options.role.unwrap_or_else(|| config.role());
    let i18n = Localizer::new(options.language.unwrap_or_else(|| config.language()));
    let mut state = AppState {
        role,
        ..AppState::default()
    };
    let mut session = SessionManager::new(Arc::clone(&backend), role, i18n);
    let mut admin = AdminWorkspace::new(backend, i18n);
    analyticbot_tui::run_app(&mut state, &mut session, &mut admin)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    check_only: bool,
    role: Option<SessionRole>,
    language: Option<Language>,
    log_level: Option<String>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        demo: false,
        check_only: false,
        role: None,
        language: None,
        log_level: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--role" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--role requires user or admin"))?;
                let value = value.as_ref();
                options.role = Some(
                    SessionRole::parse(value)
                        .ok_or_else(|| anyhow!("--role must be user or admin, got {value:?}"))?,
                );
            }
            "--lang" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--lang requires en or ar"))?;
                let value = value.as_ref();
                options.language = Some(
                    Language::parse(value)
                        .ok_or_else(|| anyhow!("--lang must be en or ar, got {value:?}"))?,
                );
            }
            "--log-level" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--log-level requires a level"))?;
                config::validate_log_level(value.as_ref())?;
                options.log_level = Some(value.as_ref().to_owned());
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("analyticbot");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Run against the in-process demo backend");
    println!("  --check                  Validate config and reach the backend, then exit");
    println!("  --role <user|admin>      Start in this role");
    println!("  --lang <en|ar>           Start in this language");
    println!("  --log-level <level>      error, warn, info, debug or trace");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use analyticbot_app::{Language, SessionRole};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/analyticbot-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_example: false,
                demo: false,
                check_only: false,
                role: None,
                language: None,
                log_level: None,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        for (flag, expected) in [
            ("--config", "--config requires a file path"),
            ("--role", "--role requires user or admin"),
            ("--lang", "--lang requires en or ar"),
            ("--log-level", "--log-level requires a level"),
        ] {
            let error = parse_cli_args(vec![flag], default_options_path())
                .expect_err("missing value should fail");
            assert!(error.to_string().contains(expected), "{flag}: {error}");
        }
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_reads_role_language_and_level() -> Result<()> {
        let options = parse_cli_args(
            vec!["--demo", "--role", "admin", "--lang", "ar", "--log-level", "debug"],
            default_options_path(),
        )?;
        assert!(options.demo);
        assert_eq!(options.role, Some(SessionRole::Admin));
        assert_eq!(options.language, Some(Language::Ar));
        assert_eq!(options.log_level.as_deref(), Some("debug"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_bad_role_language_and_level() {
        let error = parse_cli_args(vec!["--role", "root"], default_options_path())
            .expect_err("bad role should fail");
        assert!(error.to_string().contains("--role must be user or admin"));

        let error = parse_cli_args(vec!["--lang", "fr"], default_options_path())
            .expect_err("bad language should fail");
        assert!(error.to_string().contains("--lang must be en or ar"));

        let error = parse_cli_args(vec!["--log-level", "loud"], default_options_path())
            .expect_err("bad level should fail");
        assert!(error.to_string().contains("invalid log level"));
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
