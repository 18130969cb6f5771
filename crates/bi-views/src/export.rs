//! Dashboard configuration export and import
//!
//! A dashboard exports to a JSON document listing its charts in display
//! order together with their drill paths and the current settings. Importing
//! rebuilds the charts against whichever dataset is loaded at the time.

use std::sync::Arc;
use bi_core::{AppSettings, DashboardLayout, DrillPath, Row};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::chart_widget::{ChartWidget, WidgetConfig};

/// Format version written by [`export_dashboard`]
pub const CONFIG_VERSION: &str = "1.0";

/// Errors raised while reading or writing a dashboard configuration
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Malformed dashboard configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported configuration version '{0}'")]
    UnsupportedVersion(String),
}

/// One exported chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedChart {
    #[serde(flatten)]
    pub config: WidgetConfig,

    #[serde(default)]
    pub drill_path: DrillPath,

    /// Position on the dashboard
    pub order: usize,

    /// Chart in web charting option form, for consumers outside this app
    #[serde(default, skip_deserializing)]
    pub chart_config: serde_json::Value,
}

/// Exported dashboard document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub version: String,

    pub exported: DateTime<Utc>,

    pub items: Vec<ExportedChart>,

    #[serde(default)]
    pub settings: Option<AppSettings>,
}

impl DashboardConfig {
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ExportError> {
        let config: DashboardConfig = serde_json::from_str(text)?;
        if config.version != CONFIG_VERSION {
            return Err(ExportError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }
}

/// Snapshot the dashboard in display order
pub fn export_dashboard(layout: &DashboardLayout<ChartWidget>, settings: &AppSettings) -> DashboardConfig {
    let items = layout
        .iter()
        .enumerate()
        .map(|(order, widget)| ExportedChart {
            config: widget.config.clone(),
            drill_path: widget.drill_path().clone(),
            order,
            chart_config: widget.build_option(widget.rows()).to_echarts(),
        })
        .collect();

    DashboardConfig {
        version: CONFIG_VERSION.to_string(),
        exported: Utc::now(),
        items,
        settings: Some(settings.clone()),
    }
}

/// Rebuild exported charts over `rows`, in exported order
pub fn import_widgets(config: &DashboardConfig, rows: Arc<Vec<Row>>) -> Vec<ChartWidget> {
    let mut items: Vec<&ExportedChart> = config.items.iter().collect();
    items.sort_by_key(|item| item.order);

    tracing::info!("Importing {} charts", items.len());
    items
        .into_iter()
        .map(|item| {
            let mut widget = ChartWidget::new(item.config.clone(), rows.clone());
            widget.set_drill_path(item.drill_path.clone());
            widget
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bi_core::{row, ChartKind, DrillLevel};

    fn rows() -> Arc<Vec<Row>> {
        Arc::new(vec![
            row! { "region" => "East", "sales" => 10 },
            row! { "region" => "West", "sales" => 20 },
        ])
    }

    fn layout() -> DashboardLayout<ChartWidget> {
        let mut layout = DashboardLayout::new();
        let mut first = ChartWidget::new(
            WidgetConfig::new("Sales", ChartKind::Bar, "region").with_value("sales"),
            rows(),
        );
        first.set_drill_path(DrillPath::from_levels(vec![DrillLevel::new("region", ChartKind::Pie)]));
        layout.pin(first);
        layout.pin(ChartWidget::new(WidgetConfig::new("Count", ChartKind::Line, "region"), rows()));
        layout
    }

    #[test]
    fn test_export_keeps_display_order() {
        let mut layout = layout();
        layout.reorder(1, 0);

        let config = export_dashboard(&layout, &AppSettings::default());
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.items[0].config.title, "Count");
        assert_eq!(config.items[1].order, 1);
        assert_eq!(config.items[1].chart_config["series"][0]["type"], "bar");
    }

    #[test]
    fn test_export_json_then_import() {
        let config = export_dashboard(&layout(), &AppSettings::default());
        let text = config.to_json_pretty().unwrap();
        assert!(text.contains("\"chart_type\": \"bar\""));

        let parsed = DashboardConfig::from_json(&text).unwrap();
        let widgets = import_widgets(&parsed, rows());

        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].config.title, "Sales");
        assert_eq!(widgets[0].config.value_field.as_deref(), Some("sales"));
        assert_eq!(widgets[0].drill_path().len(), 1);
        assert!(!widgets[1].has_drill_path());
        assert_eq!(parsed.settings, Some(AppSettings::default()));
    }

    #[test]
    fn test_import_rejects_unknown_version() {
        let text = r#"{ "version": "9", "exported": "2024-01-01T00:00:00Z", "items": [] }"#;
        assert!(matches!(
            DashboardConfig::from_json(text),
            Err(ExportError::UnsupportedVersion(v)) if v == "9"
        ));
    }

    #[test]
    fn test_import_sorts_by_order() {
        let text = r#"{
            "version": "1.0",
            "exported": "2024-01-01T00:00:00Z",
            "items": [
                { "title": "B", "chart_type": "pie", "category_field": "region", "order": 1 },
                { "title": "A", "category_field": "region", "order": 0 }
            ]
        }"#;
        let config = DashboardConfig::from_json(text).unwrap();
        let widgets = import_widgets(&config, rows());

        assert_eq!(widgets[0].config.title, "A");
        assert_eq!(widgets[0].config.kind, ChartKind::Bar);
        assert_eq!(widgets[1].config.kind, ChartKind::Pie);
        assert!(config.settings.is_none());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(DashboardConfig::from_json("{"), Err(ExportError::Parse(_))));
    }
}
