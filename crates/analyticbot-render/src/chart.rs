// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{ChartConfig, ChartKind, Localizer, Row};

use crate::{MISSING_PLACEHOLDER, display_value, numeric_value};

/// Slice colors, cycled by row position.
pub const PALETTE: [&str; 8] = [
    "#3b82f6", "#8b5cf6", "#06b6d4", "#10b981", "#f59e0b", "#ef4444", "#ec4899", "#6366f1",
];
pub const PRIMARY_ACCENT: &str = "#3b82f6";
pub const CHART_HEIGHT: u16 = 400;
pub const AXIS_COLOR: &str = "#9ca3af";
pub const GRID_COLOR: &str = "#ffffff20";
pub const GRID_DASH: &str = "3 3";
pub const AREA_FILL_OPACITY: f64 = 0.6;
pub const PIE_VALUE_KEY: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub radius_px: u16,
    pub color: &'static str,
}

pub const TOOLTIP_STYLE: TooltipStyle = TooltipStyle {
    background: "#1f2937",
    border: "#374151",
    radius_px: 8,
    color: "#ffffff",
};

/// Shared chrome of every drawn chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFrame {
    pub title: Option<String>,
    pub height: u16,
    pub tooltip: TooltipStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartesianMark {
    Bar,
    Line,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Step,
    Monotone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartesianChart {
    pub frame: ChartFrame,
    pub mark: CartesianMark,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub points: Vec<SeriesPoint>,
    pub color: &'static str,
    pub interpolation: Interpolation,
    pub fill_opacity: Option<f64>,
    pub grid: bool,
    pub legend: bool,
}

impl CartesianChart {
    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .filter_map(|point| point.value)
            .fold(None, |max, value| Some(max.map_or(value, |m: f64| m.max(value))))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: Option<f64>,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub frame: ChartFrame,
    pub slices: Vec<PieSlice>,
    pub legend: bool,
}

impl PieChart {
    /// Share of the numeric total per slice; non-numeric slices get zero.
    pub fn shares(&self) -> Vec<f64> {
        let total: f64 = self
            .slices
            .iter()
            .filter_map(|slice| slice.value)
            .filter(|value| *value > 0.0)
            .sum();
        self.slices
            .iter()
            .map(|slice| match slice.value {
                Some(value) if total > 0.0 && value > 0.0 => value / total,
                _ => 0.0,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub frame: ChartFrame,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub points: Vec<(f64, f64)>,
    pub color: &'static str,
    pub grid: bool,
    pub legend: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    NoData,
    Unsupported { chart_type: String },
    Cartesian(CartesianChart),
    Pie(PieChart),
    Scatter(ScatterChart),
}

impl ChartView {
    /// Localized text for the placeholder variants.
    pub fn placeholder_text(&self, i18n: &Localizer) -> Option<String> {
        match self {
            Self::NoData => Some(i18n.translate("no_chart_data").to_owned()),
            Self::Unsupported { chart_type } => {
                Some(i18n.translate_with("unsupported_chart", &[("type", chart_type)]))
            }
            _ => None,
        }
    }

    pub fn frame(&self) -> Option<&ChartFrame> {
        match self {
            Self::Cartesian(chart) => Some(&chart.frame),
            Self::Pie(chart) => Some(&chart.frame),
            Self::Scatter(chart) => Some(&chart.frame),
            Self::NoData | Self::Unsupported { .. } => None,
        }
    }
}

/// Projects a chart descriptor onto a drawable view. Empty data wins over an
/// unknown type.
pub fn render_chart(config: &ChartConfig) -> ChartView {
    if config.data.is_empty() {
        return ChartView::NoData;
    }
    let Some(kind) = config.kind() else {
        return ChartView::Unsupported {
            chart_type: config.chart_type.clone(),
        };
    };

    let frame = ChartFrame {
        title: config.title.clone(),
        height: CHART_HEIGHT,
        tooltip: TOOLTIP_STYLE,
    };

    match kind {
        ChartKind::Bar => ChartView::Cartesian(cartesian(config, frame, CartesianMark::Bar)),
        ChartKind::Line => ChartView::Cartesian(cartesian(config, frame, CartesianMark::Line)),
        ChartKind::Area => ChartView::Cartesian(cartesian(config, frame, CartesianMark::Area)),
        ChartKind::Pie => ChartView::Pie(pie(config, frame)),
        ChartKind::Scatter => ChartView::Scatter(scatter(config, frame)),
    }
}

fn axes(config: &ChartConfig) -> (Axis, Axis) {
    let y_key = config.y_key.clone().unwrap_or_default();
    (
        Axis {
            label: config.x_label.clone().unwrap_or_else(|| config.x_key.clone()),
            key: config.x_key.clone(),
        },
        Axis {
            label: config.y_label.clone().unwrap_or_else(|| y_key.clone()),
            key: y_key,
        },
    )
}

fn cartesian(config: &ChartConfig, frame: ChartFrame, mark: CartesianMark) -> CartesianChart {
    let (x_axis, y_axis) = axes(config);
    let points = config
        .data
        .iter()
        .map(|row| SeriesPoint {
            label: row
                .get(&x_axis.key)
                .and_then(display_value)
                .unwrap_or_default(),
            value: numeric_cell(row, &y_axis.key),
        })
        .collect();

    CartesianChart {
        frame,
        mark,
        x_axis,
        y_axis,
        points,
        color: PRIMARY_ACCENT,
        interpolation: match mark {
            CartesianMark::Bar => Interpolation::Step,
            CartesianMark::Line | CartesianMark::Area => Interpolation::Monotone,
        },
        fill_opacity: (mark == CartesianMark::Area).then_some(AREA_FILL_OPACITY),
        grid: true,
        legend: true,
    }
}

fn pie(config: &ChartConfig, frame: ChartFrame) -> PieChart {
    let value_key = config.y_key.as_deref().unwrap_or(PIE_VALUE_KEY);
    let slices = config
        .data
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let name = row
                .get(&config.x_key)
                .and_then(display_value)
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_owned());
            let raw = row
                .get(value_key)
                .and_then(display_value)
                .unwrap_or_else(|| MISSING_PLACEHOLDER.to_owned());
            PieSlice {
                label: format!("{name}: {raw}"),
                value: numeric_cell(row, value_key),
                color: PALETTE[index % PALETTE.len()],
            }
        })
        .collect();

    PieChart {
        frame,
        slices,
        legend: true,
    }
}

fn scatter(config: &ChartConfig, frame: ChartFrame) -> ScatterChart {
    let (x_axis, y_axis) = axes(config);
    let points = config
        .data
        .iter()
        .filter_map(|row| Some((numeric_cell(row, &x_axis.key)?, numeric_cell(row, &y_axis.key)?)))
        .collect();

    ScatterChart {
        frame,
        x_axis,
        y_axis,
        points,
        color: PRIMARY_ACCENT,
        grid: true,
        legend: false,
    }
}

fn numeric_cell(row: &Row, key: &str) -> Option<f64> {
    row.get(key).and_then(numeric_value)
}

/// Parses `#rrggbb` (an optional trailing alpha pair is ignored).
pub fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(hex.get(at..at + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
