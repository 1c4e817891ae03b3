// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::ids::UserId;

/// One record of a chart or table dataset, keyed by column name.
pub type Row = Map<String, Value>;

/// Conversation partition key, also the gate for the admin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    User,
    Admin,
}

impl SessionRole {
    pub const ALL: [Self; 2] = [Self::User, Self::Admin];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::User => Self::Admin,
            Self::Admin => Self::User,
        }
    }

    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: ChatRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        default,
        deserialize_with = "lossy_bundle",
        skip_serializing_if = "Option::is_none"
    )]
    pub bundle: Option<AnalyticsBundle>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            image: None,
            bundle: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            image: None,
            bundle: None,
        }
    }

    /// Builds the assistant turn for a chat reply.
    pub fn from_reply(reply: ChatReply) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: reply.response,
            image: reply.image_url,
            bundle: reply.analytics.filter(|bundle| !bundle.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsBundle {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kpis: Vec<Kpi>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub charts: Vec<ChartConfig>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tables: Vec<TableConfig>,
}

impl AnalyticsBundle {
    pub fn is_empty(&self) -> bool {
        self.kpis.is_empty() && self.charts.is_empty() && self.tables.is_empty()
    }

    /// Decodes a bundle entry by entry. A KPI that does not decode is
    /// dropped; a chart or table that does not decode is kept empty so it
    /// still draws its placeholder. Anything but an object yields `None`.
    pub fn from_value_lossy(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let text = match fields.remove("text") {
            Some(Value::String(text)) => text,
            _ => String::new(),
        };
        let kpis: Vec<Kpi> = entries(fields.remove("kpis"))
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        let charts: Vec<ChartConfig> = entries(fields.remove("charts"))
            .map(ChartConfig::from_value_lossy)
            .collect();
        let tables: Vec<TableConfig> = entries(fields.remove("tables"))
            .map(|entry| {
                let title = entry.get("title").and_then(Value::as_str).map(str::to_owned);
                serde_json::from_value(entry).unwrap_or_else(|_| TableConfig {
                    title,
                    ..TableConfig::default()
                })
            })
            .collect();
        Some(Self {
            text,
            kpis,
            charts,
            tables,
        })
    }
}

fn entries(value: Option<Value>) -> std::vec::IntoIter<Value> {
    match value {
        Some(Value::Array(items)) => items.into_iter(),
        _ => Vec::new().into_iter(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lossy_bundle<'de, D>(deserializer: D) -> Result<Option<AnalyticsBundle>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(AnalyticsBundle::from_value_lossy))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        }
    }

    /// Anything other than `up` or `down` reads as flat.
    pub fn parse(value: &str) -> Self {
        match value {
            "up" => Self::Up,
            "down" => Self::Down,
            _ => Self::Flat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Kpi {
    pub fn trend(&self) -> Option<Trend> {
        self.trend.as_deref().map(Trend::parse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Scatter,
    Area,
}

impl ChartKind {
    pub const ALL: [Self; 5] = [Self::Bar, Self::Line, Self::Pie, Self::Scatter, Self::Area];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
            Self::Area => "area",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "pie" => Some(Self::Pie),
            "scatter" => Some(Self::Scatter),
            "area" => Some(Self::Area),
            _ => None,
        }
    }
}

/// Chart descriptor as sent by the backend. `chart_type` stays raw so an
/// unsupported value can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub chart_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Row>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub x_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl ChartConfig {
    pub fn kind(&self) -> Option<ChartKind> {
        ChartKind::parse(&self.chart_type)
    }

    /// A chart that does not decode keeps its type and title and loses its
    /// data, so it renders as the no-data placeholder.
    pub fn from_value_lossy(value: Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);
        let fallback = Self {
            chart_type: field("chart_type").unwrap_or_default(),
            title: field("title"),
            ..Self::default()
        };
        serde_json::from_value(value).unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default, deserialize_with = "null_as_default")]
    pub columns: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPreview {
    pub filename: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Row>,
    #[serde(default)]
    pub total_rows: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub role: SessionRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub role: SessionRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lossy_bundle")]
    pub analytics: Option<AnalyticsBundle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub info: String,
    #[serde(default)]
    pub status: Option<String>,
}
