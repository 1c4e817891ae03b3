// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod bundle;
pub mod chart;
pub mod kpi;
pub mod table;

pub use bundle::*;
pub use chart::*;
pub use kpi::*;
pub use table::*;

use serde_json::Value;

/// Shown wherever a cell or value is missing.
pub const MISSING_PLACEHOLDER: &str = "-";

/// Renders a JSON scalar the way it reads in a browser: strings bare,
/// integral numbers without a fractional part.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(match (number.as_i64(), number.as_f64()) {
            (Some(int), _) => int.to_string(),
            (None, Some(float)) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{float:.0}")
            }
            (None, Some(float)) => float.to_string(),
            (None, None) => number.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// Numeric reading of a cell, accepting numeric strings.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
