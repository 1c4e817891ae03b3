// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{Row, TableConfig};
use serde_json::Value;
use std::cmp::Ordering;

use crate::{MISSING_PLACEHOLDER, display_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn marker(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    /// Header click: same column flips direction, a new column starts ascending.
    /// There is no way back to the unsorted state.
    pub fn toggle(&mut self, column: &str) -> SortDirection {
        let direction = match &self.key {
            Some(current) if current == column => self.direction.reversed(),
            _ => SortDirection::Asc,
        };
        self.key = Some(column.to_owned());
        self.direction = direction;
        direction
    }
}

/// Orders `rows` by `state`. Ties keep their original relative order; missing
/// cells trail populated ones in both directions. A key outside `columns`
/// leaves the original order.
pub fn sort_rows<'a>(rows: &'a [Row], columns: &[String], state: &SortState) -> Vec<&'a Row> {
    let mut ordered = rows.iter().collect::<Vec<_>>();
    let Some(key) = state.key.as_deref() else {
        return ordered;
    };
    if !columns.iter().any(|column| column == key) {
        return ordered;
    }

    ordered.sort_by(|left, right| {
        let left_value = cell(left, key);
        let right_value = cell(right, key);
        match (left_value, right_value) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => match state.direction {
                SortDirection::Asc => compare_values(left, right),
                SortDirection::Desc => compare_values(left, right).reverse(),
            },
        }
    });
    ordered
}

fn cell<'a>(row: &'a Row, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|value| !value.is_null())
}

/// Three-way compare on raw cell values. Numbers compare numerically, strings
/// lexicographically; mixed kinds fall back to a fixed kind rank.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            match (left.as_i64(), right.as_i64()) {
                (Some(left), Some(right)) => left.cmp(&right),
                _ => {
                    let left = left.as_f64().unwrap_or(f64::NAN);
                    let right = right.as_f64().unwrap_or(f64::NAN);
                    left.total_cmp(&right)
                }
            }
        }
        (Value::String(left), Value::String(right)) => left.cmp(right),
        (Value::Bool(left), Value::Bool(right)) => left.cmp(right),
        _ => match kind_rank(left).cmp(&kind_rank(right)) {
            Ordering::Equal => left.to_string().cmp(&right.to_string()),
            order => order,
        },
    }
}

const fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub sort: Option<SortDirection>,
}

impl HeaderCell {
    pub fn display(&self) -> String {
        match self.sort {
            Some(direction) => format!("{} {}", self.label, direction.marker()),
            None => self.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrid {
    pub title: Option<String>,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableView {
    NoData { title: Option<String> },
    Grid(TableGrid),
}

/// One rendered table instance and its transient sort state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortableTable {
    config: TableConfig,
    sort: SortState,
}

impl SortableTable {
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            sort: SortState::default(),
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Returns `None` when `column` is not one of the declared columns.
    pub fn toggle_sort(&mut self, column: &str) -> Option<SortDirection> {
        if !self.config.columns.iter().any(|declared| declared == column) {
            return None;
        }
        Some(self.sort.toggle(column))
    }

    /// Swaps in a new config; the sort state resets when the config differs.
    pub fn replace(&mut self, config: TableConfig) -> bool {
        if config == self.config {
            return false;
        }
        self.config = config;
        self.sort = SortState::default();
        true
    }

    pub fn sorted_rows(&self) -> Vec<&Row> {
        sort_rows(&self.config.rows, &self.config.columns, &self.sort)
    }

    pub fn view(&self) -> TableView {
        if self.config.rows.is_empty() {
            return TableView::NoData {
                title: self.config.title.clone(),
            };
        }

        let headers = self
            .config
            .columns
            .iter()
            .map(|column| HeaderCell {
                label: column.clone(),
                sort: (self.sort.key.as_deref() == Some(column.as_str()))
                    .then_some(self.sort.direction),
            })
            .collect();

        let rows = self
            .sorted_rows()
            .into_iter()
            .map(|row| {
                self.config
                    .columns
                    .iter()
                    .map(|column| {
                        row.get(column)
                            .and_then(display_value)
                            .unwrap_or_else(|| MISSING_PLACEHOLDER.to_owned())
                    })
                    .collect()
            })
            .collect();

        TableView::Grid(TableGrid {
            title: self.config.title.clone(),
            headers,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{SortDirection, SortState, SortableTable, TableView, compare_values, sort_rows};
    use analyticbot_app::{Row, TableConfig};
    use serde_json::{Value, json};
    use std::cmp::Ordering;

    fn rows(values: Value) -> Vec<Row> {
        match values {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    fn ids(sorted: &[&Row]) -> Vec<String> {
        sorted
            .iter()
            .map(|row| row.get("id").and_then(Value::as_str).unwrap_or("?").to_owned())
            .collect()
    }

    #[test]
    fn unsorted_state_keeps_original_order() {
        let data = rows(json!([{"k": 3, "id": "a"}, {"k": 1, "id": "b"}, {"k": 2, "id": "c"}]));
        let sorted = sort_rows(&data, &columns(&["k", "id"]), &SortState::default());
        assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn ties_preserve_original_relative_order() {
        let data = rows(json!([
            {"k": 1, "id": "a"},
            {"k": 0, "id": "x"},
            {"k": 1, "id": "b"},
        ]));
        let cols = columns(&["k", "id"]);

        let asc = sort_rows(&data, &cols, &SortState::by("k", SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["x", "a", "b"]);

        let desc = sort_rows(&data, &cols, &SortState::by("k", SortDirection::Desc));
        assert_eq!(ids(&desc), vec!["a", "b", "x"]);
    }

    #[test]
    fn numbers_sort_numerically_not_lexically() {
        let data = rows(json!([{"n": 10, "id": "ten"}, {"n": 9, "id": "nine"}, {"n": 100.5, "id": "big"}]));
        let sorted = sort_rows(&data, &columns(&["n"]), &SortState::by("n", SortDirection::Asc));
        assert_eq!(ids(&sorted), vec!["nine", "ten", "big"]);
    }

    #[test]
    fn sorting_is_idempotent_and_toggle_reverses_total_order() {
        let data = rows(json!([
            {"city": "Cairo", "id": "1"},
            {"city": "Amman", "id": "2"},
            {"city": "Doha", "id": "3"},
            {"city": "Beirut", "id": "4"},
        ]));
        let cols = columns(&["city", "id"]);
        let asc_state = SortState::by("city", SortDirection::Asc);

        let once = sort_rows(&data, &cols, &asc_state)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        let twice = sort_rows(&once, &cols, &asc_state)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(once, twice);

        let desc = sort_rows(&once, &cols, &SortState::by("city", SortDirection::Desc));
        let mut reversed = ids(&sort_rows(&data, &cols, &asc_state));
        reversed.reverse();
        assert_eq!(ids(&desc), reversed);
    }

    #[test]
    fn missing_cells_sort_without_error_and_trail() {
        let data = rows(json!([
            {"v": null, "id": "null"},
            {"v": 2, "id": "two"},
            {"id": "absent"},
            {"v": 1, "id": "one"},
        ]));
        let cols = columns(&["v", "id"]);

        let asc = sort_rows(&data, &cols, &SortState::by("v", SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["one", "two", "null", "absent"]);

        let desc = sort_rows(&data, &cols, &SortState::by("v", SortDirection::Desc));
        assert_eq!(ids(&desc), vec!["two", "one", "null", "absent"]);
    }

    #[test]
    fn mixed_kinds_use_a_total_order() {
        assert_eq!(compare_values(&json!(5), &json!("5")), Ordering::Less);
        assert_eq!(compare_values(&json!(false), &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!(1.5), &json!(1)), Ordering::Greater);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
    }

    #[test]
    fn undeclared_sort_key_keeps_original_order() {
        let data = rows(json!([{"k": 2, "id": "a"}, {"k": 1, "id": "b"}]));
        let sorted = sort_rows(&data, &columns(&["id"]), &SortState::by("k", SortDirection::Asc));
        assert_eq!(ids(&sorted), vec!["a", "b"]);
    }

    #[test]
    fn toggle_is_two_state_per_column() {
        let mut state = SortState::default();
        assert_eq!(state.toggle("a"), SortDirection::Asc);
        assert_eq!(state.toggle("a"), SortDirection::Desc);
        assert_eq!(state.toggle("a"), SortDirection::Asc);
        assert_eq!(state.toggle("b"), SortDirection::Asc);
        assert_eq!(state.key.as_deref(), Some("b"));
    }

    #[test]
    fn view_marks_sorted_header_and_fills_missing_cells() {
        let mut table = SortableTable::new(TableConfig {
            columns: columns(&["region", "sales"]),
            rows: rows(json!([
                {"region": "north", "sales": 20},
                {"region": "south"},
                {"region": "east", "sales": 5},
            ])),
            title: Some("Sales".to_owned()),
        });
        assert_eq!(table.toggle_sort("sales"), Some(SortDirection::Asc));
        assert_eq!(table.toggle_sort("nope"), None);

        let TableView::Grid(grid) = table.view() else {
            panic!("expected populated grid");
        };
        assert_eq!(grid.title.as_deref(), Some("Sales"));
        assert_eq!(grid.headers[0].display(), "region");
        assert_eq!(grid.headers[1].display(), "sales ↑");
        assert_eq!(
            grid.rows,
            vec![
                vec!["east".to_owned(), "5".to_owned()],
                vec!["north".to_owned(), "20".to_owned()],
                vec!["south".to_owned(), "-".to_owned()],
            ],
        );
    }

    #[test]
    fn empty_rows_render_no_data() {
        let table = SortableTable::new(TableConfig {
            columns: columns(&["a"]),
            rows: Vec::new(),
            title: None,
        });
        assert_eq!(table.view(), TableView::NoData { title: None });
    }

    #[test]
    fn replacing_config_resets_sort_state() {
        let config = TableConfig {
            columns: columns(&["a"]),
            rows: rows(json!([{"a": 1}])),
            title: None,
        };
        let mut table = SortableTable::new(config.clone());
        table.toggle_sort("a");

        assert!(!table.replace(config.clone()));
        assert_eq!(table.sort_state().key.as_deref(), Some("a"));

        let mut changed = config;
        changed.title = Some("other".to_owned());
        assert!(table.replace(changed));
        assert_eq!(table.sort_state(), &SortState::default());
    }
}
