//! Widget utilities for managing IDs and preventing conflicts
//!
//! Every chart on the dashboard draws a plot, and the drill-down window draws
//! one more. These helpers derive stable, distinct egui ids from chart ids.

use egui::{Grid, Id, ScrollArea};
use std::fmt::Display;

/// Widget ID builder that ensures unique IDs by combining multiple components
pub struct WidgetId {
    components: Vec<String>,
}

impl WidgetId {
    /// Create a new widget ID builder
    pub fn new(base: impl Display) -> Self {
        Self {
            components: vec![base.to_string()],
        }
    }

    /// Add a component to the ID
    pub fn with(mut self, component: impl Display) -> Self {
        self.components.push(component.to_string());
        self
    }

    /// Add an index to the ID (useful in loops)
    pub fn index(self, idx: usize) -> Self {
        self.with(format!("idx_{}", idx))
    }

    /// Build the final ID string
    pub fn build(&self) -> String {
        self.components.join("_")
    }

    /// Create an egui ID from this widget ID
    pub fn id(&self) -> Id {
        Id::new(self.build())
    }
}

/// Extension trait for ScrollArea to easily add unique IDs
pub trait ScrollAreaExt {
    fn id_builder(self, builder: WidgetId) -> Self;
}

impl ScrollAreaExt for ScrollArea {
    fn id_builder(self, builder: WidgetId) -> Self {
        self.id_source(builder.build())
    }
}

/// Extension trait for Grid to easily add unique IDs
pub trait GridExt {
    fn new_with_id(builder: WidgetId) -> Self;
}

impl GridExt for Grid {
    fn new_with_id(builder: WidgetId) -> Self {
        Grid::new(builder.build())
    }
}

/// Plot id of the chart `chart_id`
pub fn chart_plot_id(chart_id: &str) -> String {
    WidgetId::new("chart_plot").with(chart_id).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_id_builder() {
        let id = WidgetId::new("editor")
            .with("levels")
            .index(2)
            .build();
        assert_eq!(id, "editor_levels_idx_2");
    }

    #[test]
    fn test_chart_plot_ids_are_distinct() {
        assert_eq!(chart_plot_id("a1"), "chart_plot_a1");
        assert_ne!(chart_plot_id("a1"), chart_plot_id("a2"));
    }
}
