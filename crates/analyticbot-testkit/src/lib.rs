// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{
    AnalyticsBundle, ChartConfig, ChatReply, ChatRequest, DataPreview, Kpi, Message, Row,
    SessionRole, TableConfig, UploadReceipt, UserAccount, UserId,
};
use analyticbot_session::Backend;
use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use time::macros::format_description;
use time::{Date, Month};

const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];
const PRODUCTS: [&str; 8] = [
    "Espresso Beans",
    "Cold Brew Kit",
    "Paper Filters",
    "Ceramic Mug",
    "Milk Frother",
    "Grinder",
    "Travel Tumbler",
    "Pour-over Stand",
];
const PREVIEW_ROWS: usize = 10;
const REPORT_MONTHS: usize = 6;
const FIRST_REPORT_YEAR: i32 = 2025;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1).max(1) as u64;
        min + (self.next_u64() % span) as i64
    }
}

#[derive(Debug, Clone)]
struct Dataset {
    filename: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    fn preview(&self) -> DataPreview {
        DataPreview {
            filename: self.filename.clone(),
            columns: self.columns.clone(),
            data: self.rows.iter().take(PREVIEW_ROWS).cloned().collect(),
            total_rows: self.rows.len() as u64,
        }
    }
}

#[derive(Debug)]
struct DemoState {
    rng: DeterministicRng,
    histories: BTreeMap<SessionRole, Vec<Message>>,
    datasets: Vec<Dataset>,
}

/// In-memory analytics backend with seeded datasets and canned analytics
/// replies. Same seed, same answers.
#[derive(Debug)]
pub struct DemoBackend {
    state: Mutex<DemoState>,
}

impl DemoBackend {
    pub fn new(seed: u64) -> Self {
        let mut rng = DeterministicRng::new(if seed == 0 { 1 } else { seed });
        let datasets = vec![sales_dataset(&mut rng), inventory_dataset(&mut rng)];
        Self {
            state: Mutex::new(DemoState {
                rng,
                histories: BTreeMap::new(),
                datasets,
            }),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, DemoState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("demo backend state poisoned"))
    }
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new(42)
    }
}

impl Backend for DemoBackend {
    fn fetch_history(&self, role: SessionRole) -> Result<Vec<Message>> {
        Ok(self.state()?.histories.get(&role).cloned().unwrap_or_default())
    }

    fn clear_history(&self, role: SessionRole) -> Result<()> {
        self.state()?.histories.remove(&role);
        Ok(())
    }

    fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        if request.message.to_lowercase().contains("fail") {
            bail!("demo backend refused the request");
        }

        let mut state = self.state()?;
        let bundle = revenue_bundle(&mut state.rng)?;
        let reply = ChatReply {
            response: format!(
                "### Revenue overview\n\nYou asked: *{}*\n\nRevenue is trending up across the last {REPORT_MONTHS} months. \
                 The breakdown below shows monthly totals and each region's share.",
                request.message.trim()
            ),
            image_url: None,
            analytics: Some(bundle),
        };

        let history = state.histories.entry(request.role).or_default();
        history.push(Message::user(request.message.clone()));
        history.push(Message::from_reply(reply.clone()));
        Ok(reply)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        Ok(self
            .state()?
            .datasets
            .iter()
            .map(|dataset| dataset.filename.clone())
            .collect())
    }

    fn preview_file(&self, filename: &str) -> Result<Option<DataPreview>> {
        Ok(self
            .state()?
            .datasets
            .iter()
            .find(|dataset| dataset.filename == filename)
            .map(Dataset::preview))
    }

    fn upload_file(&self, path: &Path) -> Result<UploadReceipt> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("upload path {} has no file name", path.display()))?;

        let dataset = if filename.to_lowercase().ends_with(".csv") {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            parse_csv(&filename, &text)
        } else {
            Dataset {
                filename: filename.clone(),
                columns: Vec::new(),
                rows: Vec::new(),
            }
        };
        let loaded = dataset.rows.len();

        let mut state = self.state()?;
        state.datasets.retain(|existing| existing.filename != filename);
        state.datasets.push(dataset);

        Ok(UploadReceipt {
            info: format!("file '{filename}' saved successfully"),
            status: Some(format!("Loaded {loaded} rows")),
        })
    }

    fn list_users(&self) -> Result<Vec<UserAccount>> {
        Ok(vec![
            UserAccount {
                id: UserId::new(1),
                username: "admin".to_owned(),
                role: SessionRole::Admin,
            },
            UserAccount {
                id: UserId::new(2),
                username: "analyst".to_owned(),
                role: SessionRole::User,
            },
        ])
    }

    fn asset_origin(&self) -> &str {
        "http://localhost:8000"
    }
}

/// Month labels such as `Jan 2025`, consecutive from January of the first
/// report year.
pub fn month_labels(count: usize) -> Result<Vec<String>> {
    let format = format_description!("[month repr:short] [year]");
    let mut date = Date::from_calendar_date(FIRST_REPORT_YEAR, Month::January, 1)
        .context("build first report month")?;
    let mut labels = Vec::with_capacity(count);
    for _ in 0..count {
        labels.push(date.format(&format).context("format month label")?);
        let next_month = date.month().next();
        let year = if next_month == Month::January {
            date.year() + 1
        } else {
            date.year()
        };
        date = Date::from_calendar_date(year, next_month, 1).context("advance report month")?;
    }
    Ok(labels)
}

fn revenue_bundle(rng: &mut DeterministicRng) -> Result<AnalyticsBundle> {
    let months = month_labels(REPORT_MONTHS)?;
    let monthly = months
        .iter()
        .enumerate()
        .map(|(index, month)| {
            let revenue = 40_000 + index as i64 * 2_500 + rng.int_range(0, 5_000);
            (month.clone(), revenue)
        })
        .collect::<Vec<_>>();
    let total: i64 = monthly.iter().map(|(_, revenue)| revenue).sum();

    let regional = REGIONS
        .iter()
        .map(|region| (*region, rng.int_range(20_000, 80_000), rng.int_range(100, 900)))
        .collect::<Vec<_>>();

    let kpis = vec![
        Kpi {
            label: "Total Revenue".to_owned(),
            value: json!(total),
            change: Some(rng.int_range(20, 180) as f64 / 10.0),
            trend: Some("up".to_owned()),
            unit: Some("USD".to_owned()),
            description: Some(format!("{} to {}", months[0], months[REPORT_MONTHS - 1])),
        },
        Kpi {
            label: "Average Monthly Revenue".to_owned(),
            value: json!(total / REPORT_MONTHS as i64),
            change: None,
            trend: None,
            unit: Some("USD".to_owned()),
            description: None,
        },
        Kpi {
            label: "Active Regions".to_owned(),
            value: json!(REGIONS.len()),
            change: Some(0.0),
            trend: Some("flat".to_owned()),
            unit: None,
            description: None,
        },
    ];

    let charts = vec![
        ChartConfig {
            chart_type: "line".to_owned(),
            data: monthly
                .iter()
                .map(|(month, revenue)| row(json!({"month": month, "revenue": revenue})))
                .collect(),
            x_key: "month".to_owned(),
            y_key: Some("revenue".to_owned()),
            title: Some("Monthly Revenue".to_owned()),
            x_label: Some("Month".to_owned()),
            y_label: Some("Revenue (USD)".to_owned()),
            colors: None,
        },
        ChartConfig {
            chart_type: "pie".to_owned(),
            data: regional
                .iter()
                .map(|(region, revenue, _)| row(json!({"region": region, "value": revenue})))
                .collect(),
            x_key: "region".to_owned(),
            y_key: None,
            title: Some("Revenue Share by Region".to_owned()),
            x_label: None,
            y_label: None,
            colors: None,
        },
    ];

    let tables = vec![TableConfig {
        columns: vec!["region".to_owned(), "revenue".to_owned(), "orders".to_owned()],
        rows: regional
            .iter()
            .enumerate()
            .map(|(index, (region, revenue, orders))| {
                // One region has not reported orders yet.
                let orders = if index == REGIONS.len() - 1 {
                    Value::Null
                } else {
                    json!(orders)
                };
                row(json!({"region": region, "revenue": revenue, "orders": orders}))
            })
            .collect(),
        title: Some("Regional Breakdown".to_owned()),
    }];

    Ok(AnalyticsBundle {
        text: "Revenue is trending up.".to_owned(),
        kpis,
        charts,
        tables,
    })
}

fn sales_dataset(rng: &mut DeterministicRng) -> Dataset {
    let rows = (0..48)
        .map(|index| {
            let region = REGIONS[index % REGIONS.len()];
            let product = PRODUCTS[index % PRODUCTS.len()];
            row(json!({
                "order_id": 1000 + index,
                "region": region,
                "product": product,
                "units": rng.int_range(1, 40),
                "revenue": rng.int_range(500, 12_000) as f64 / 10.0,
            }))
        })
        .collect();
    Dataset {
        filename: "sales_2025.csv".to_owned(),
        columns: ["order_id", "region", "product", "units", "revenue"]
            .iter()
            .map(|column| (*column).to_owned())
            .collect(),
        rows,
    }
}

fn inventory_dataset(rng: &mut DeterministicRng) -> Dataset {
    let rows = PRODUCTS
        .iter()
        .enumerate()
        .map(|(index, product)| {
            row(json!({
                "sku": format!("SKU-{:04}", 100 + index),
                "product": product,
                "stock": rng.int_range(0, 250),
                "reorder_level": 25,
            }))
        })
        .collect();
    Dataset {
        filename: "inventory.xlsx".to_owned(),
        columns: ["sku", "product", "stock", "reorder_level"]
            .iter()
            .map(|column| (*column).to_owned())
            .collect(),
        rows,
    }
}

/// Comma-split CSV reader for demo uploads; no quoting support.
fn parse_csv(filename: &str, text: &str) -> Dataset {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let columns = lines
        .next()
        .map(|header| {
            header
                .split(',')
                .map(|column| column.trim().to_owned())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let rows = lines
        .map(|line| {
            columns
                .iter()
                .zip(line.split(','))
                .map(|(column, cell)| (column.clone(), csv_cell(cell.trim())))
                .collect()
        })
        .collect();
    Dataset {
        filename: filename.to_owned(),
        columns,
        rows,
    }
}

fn csv_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = cell.parse::<i64>() {
        return json!(int);
    }
    if let Ok(float) = cell.parse::<f64>()
        && float.is_finite()
    {
        return json!(float);
    }
    Value::String(cell.to_owned())
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

/// A bundle exercising every section, for rendering tests.
pub fn sample_bundle() -> Result<AnalyticsBundle> {
    revenue_bundle(&mut DeterministicRng::new(7))
}

#[cfg(test)]
mod tests {
    use super::{DemoBackend, PREVIEW_ROWS, month_labels, sample_bundle};
    use analyticbot_app::{ChatRequest, ChatRole, SessionRole};
    use analyticbot_session::Backend;
    use anyhow::Result;
    use serde_json::Value;

    #[test]
    fn month_labels_roll_over_year() -> Result<()> {
        let labels = month_labels(14)?;
        assert_eq!(labels[0], "Jan 2025");
        assert_eq!(labels[11], "Dec 2025");
        assert_eq!(labels[13], "Feb 2026");
        Ok(())
    }

    #[test]
    fn same_seed_same_reply() -> Result<()> {
        let request = ChatRequest {
            message: "revenue".to_owned(),
            role: SessionRole::User,
        };
        let left = DemoBackend::new(9).send_chat(&request)?;
        let right = DemoBackend::new(9).send_chat(&request)?;
        assert_eq!(left, right);
        Ok(())
    }

    #[test]
    fn chat_records_history_per_role() -> Result<()> {
        let backend = DemoBackend::default();
        backend.send_chat(&ChatRequest {
            message: "hello".to_owned(),
            role: SessionRole::Admin,
        })?;

        let admin = backend.fetch_history(SessionRole::Admin)?;
        assert_eq!(admin.len(), 2);
        assert_eq!(admin[0].role, ChatRole::User);
        assert!(admin[1].bundle.is_some());
        assert!(backend.fetch_history(SessionRole::User)?.is_empty());

        backend.clear_history(SessionRole::Admin)?;
        assert!(backend.fetch_history(SessionRole::Admin)?.is_empty());
        Ok(())
    }

    #[test]
    fn failing_prompt_errors() {
        let backend = DemoBackend::default();
        let result = backend.send_chat(&ChatRequest {
            message: "please FAIL".to_owned(),
            role: SessionRole::User,
        });
        assert!(result.is_err());
    }

    #[test]
    fn preview_is_capped_and_reports_total() -> Result<()> {
        let backend = DemoBackend::default();
        let files = backend.list_files()?;
        assert_eq!(files, vec!["sales_2025.csv".to_owned(), "inventory.xlsx".to_owned()]);

        let preview = backend
            .preview_file("sales_2025.csv")?
            .expect("preview expected");
        assert_eq!(preview.data.len(), PREVIEW_ROWS);
        assert_eq!(preview.total_rows, 48);
        assert!(backend.preview_file("missing.csv")?.is_none());
        Ok(())
    }

    #[test]
    fn csv_upload_registers_dataset() -> Result<()> {
        let backend = DemoBackend::default();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("q3.csv");
        std::fs::write(&path, "city,sales\nCairo,12\nAmman,\n")?;

        let receipt = backend.upload_file(&path)?;
        assert_eq!(receipt.info, "file 'q3.csv' saved successfully");
        assert_eq!(receipt.status.as_deref(), Some("Loaded 2 rows"));

        let preview = backend.preview_file("q3.csv")?.expect("preview expected");
        assert_eq!(preview.columns, vec!["city".to_owned(), "sales".to_owned()]);
        assert_eq!(preview.data[0]["sales"], Value::from(12));
        assert_eq!(preview.data[1]["sales"], Value::Null);
        Ok(())
    }

    #[test]
    fn sample_bundle_fills_every_section() -> Result<()> {
        let bundle = sample_bundle()?;
        assert_eq!(bundle.kpis.len(), 3);
        assert_eq!(bundle.charts.len(), 2);
        assert_eq!(bundle.tables.len(), 1);
        assert_eq!(bundle.charts[0].data.len(), 6);
        assert!(bundle.tables[0].rows.iter().any(|row| row["orders"].is_null()));
        Ok(())
    }
}
