//! Default dashboard for a freshly loaded dataset

use std::sync::Arc;
use bi_core::{ChartKind, Row};
use bi_views::{ChartWidget, WidgetConfig};

/// Stable chart id, so drill paths survive reloading the same file
pub fn chart_id(source_name: &str, column: &str) -> String {
    format!("{}:{}", source_name, column)
}

/// One chart per numeric column.
///
/// Points are labelled by the first categorical column, or by the value
/// itself when the dataset has none. Kinds cycle through bar, line and area.
pub fn default_widgets(
    source_name: &str,
    rows: Arc<Vec<Row>>,
    numeric: &[String],
    categorical: &[String],
) -> Vec<ChartWidget> {
    const KINDS: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Area];

    numeric
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let category = categorical.first().unwrap_or(column);
            let mut config = WidgetConfig::new(column.clone(), KINDS[i % KINDS.len()], category.clone())
                .with_value(column.clone());
            config.description = format!("{} by {}", column, category);
            ChartWidget::with_id(chart_id(source_name, column), config, rows.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bi_core::row;

    fn rows() -> Arc<Vec<Row>> {
        Arc::new(vec![row! { "region" => "East", "sales" => 10, "units" => 2 }])
    }

    #[test]
    fn test_one_widget_per_numeric_column() {
        let numeric = vec!["sales".to_string(), "units".to_string()];
        let categorical = vec!["region".to_string()];
        let widgets = default_widgets("orders.csv", rows(), &numeric, &categorical);

        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[0].id(), "orders.csv:sales");
        assert_eq!(widgets[0].config.category_field, "region");
        assert_eq!(widgets[0].config.kind, ChartKind::Bar);
        assert_eq!(widgets[1].config.kind, ChartKind::Line);
        assert_eq!(widgets[1].config.value_field.as_deref(), Some("units"));
    }

    #[test]
    fn test_without_categories_value_labels_itself() {
        let numeric = vec!["sales".to_string()];
        let widgets = default_widgets("orders.csv", rows(), &numeric, &[]);
        assert_eq!(widgets[0].config.category_field, "sales");
    }
}
