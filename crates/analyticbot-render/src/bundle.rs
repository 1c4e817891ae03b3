// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::AnalyticsBundle;

use crate::{ChartView, KpiCard, SortableTable, render_chart, render_kpi};

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Kpis(Vec<KpiCard>),
    Charts(Vec<ChartView>),
    Tables(Vec<SortableTable>),
}

impl Section {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Kpis(_) => "kpis",
            Self::Charts(_) => "charts",
            Self::Tables(_) => "tables",
        }
    }
}

/// Rendered document for one assistant turn. Tables keep their own sort
/// state, so a view lives as long as the turn it belongs to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleView {
    pub sections: Vec<Section>,
}

impl BundleView {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn tables(&self) -> &[SortableTable] {
        self.sections
            .iter()
            .find_map(|section| match section {
                Section::Tables(tables) => Some(tables.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn table_mut(&mut self, index: usize) -> Option<&mut SortableTable> {
        self.sections.iter_mut().find_map(|section| match section {
            Section::Tables(tables) => tables.get_mut(index),
            _ => None,
        })
    }
}

/// KPI grid, then charts, then tables; empty groups are left out.
pub fn render_bundle(bundle: &AnalyticsBundle) -> BundleView {
    let mut sections = Vec::with_capacity(3);
    if !bundle.kpis.is_empty() {
        sections.push(Section::Kpis(bundle.kpis.iter().map(render_kpi).collect()));
    }
    if !bundle.charts.is_empty() {
        sections.push(Section::Charts(
            bundle.charts.iter().map(render_chart).collect(),
        ));
    }
    if !bundle.tables.is_empty() {
        sections.push(Section::Tables(
            bundle.tables.iter().cloned().map(SortableTable::new).collect(),
        ));
    }
    BundleView { sections }
}

#[cfg(test)]
mod tests {
    use super::{Section, render_bundle};
    use crate::SortDirection;
    use analyticbot_app::{AnalyticsBundle, ChartConfig, Kpi, TableConfig};
    use serde_json::json;

    fn kpi() -> Kpi {
        Kpi {
            label: "Rows".to_owned(),
            value: json!(3),
            change: None,
            trend: None,
            unit: None,
            description: None,
        }
    }

    fn table() -> TableConfig {
        TableConfig {
            columns: vec!["a".to_owned()],
            rows: vec![serde_json::from_value(json!({"a": 1})).expect("row")],
            title: None,
        }
    }

    #[test]
    fn empty_bundle_renders_nothing() {
        let view = render_bundle(&AnalyticsBundle {
            text: "only words".to_owned(),
            ..AnalyticsBundle::default()
        });
        assert!(view.is_empty());
    }

    #[test]
    fn sections_follow_fixed_order_and_skip_empty_groups() {
        let bundle = AnalyticsBundle {
            text: String::new(),
            kpis: vec![kpi()],
            charts: Vec::new(),
            tables: vec![table()],
        };
        let names = render_bundle(&bundle)
            .sections
            .iter()
            .map(Section::name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["kpis", "tables"]);

        let full = AnalyticsBundle {
            charts: vec![ChartConfig {
                chart_type: "bar".to_owned(),
                ..ChartConfig::default()
            }],
            ..bundle
        };
        let names = render_bundle(&full)
            .sections
            .iter()
            .map(Section::name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["kpis", "charts", "tables"]);
    }

    #[test]
    fn tables_keep_sort_state_per_instance() {
        let mut view = render_bundle(&AnalyticsBundle {
            tables: vec![table(), table()],
            ..AnalyticsBundle::default()
        });
        let first = view.table_mut(0).expect("first table");
        assert_eq!(first.toggle_sort("a"), Some(SortDirection::Asc));

        assert_eq!(view.tables().len(), 2);
        assert!(view.tables()[0].sort_state().key.is_some());
        assert!(view.tables()[1].sort_state().key.is_none());
    }
}
