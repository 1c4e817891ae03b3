// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{Kpi, Trend};

use crate::{MISSING_PLACEHOLDER, display_value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
    pub unit: Option<String>,
    pub change: Option<String>,
    /// Indicator only when the wire carried a trend.
    pub trend: Option<Trend>,
    /// Badge style; follows the trend and reads flat without one.
    pub badge: Trend,
    pub description: Option<String>,
}

pub fn render_kpi(kpi: &Kpi) -> KpiCard {
    let trend = kpi.trend();
    KpiCard {
        label: kpi.label.clone(),
        value: display_value(&kpi.value).unwrap_or_else(|| MISSING_PLACEHOLDER.to_owned()),
        unit: kpi.unit.clone().filter(|unit| !unit.is_empty()),
        change: kpi.change.map(format_change),
        trend,
        badge: trend.unwrap_or(Trend::Flat),
        description: kpi.description.clone().filter(|text| !text.is_empty()),
    }
}

/// One decimal place, explicit `+` only for positive values.
pub fn format_change(change: f64) -> String {
    // -0.0 prints as plain zero.
    let change = change + 0.0;
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{sign}{change:.1}%")
}
