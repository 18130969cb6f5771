//! User interface components for the insight dashboard
//!
//! This crate provides the egui-based panels: the chart grid with brushing,
//! the drill-down window and the drill path editor.

pub mod chart_panel;
pub mod dashboard_grid;
pub mod drill_path_editor;
pub mod drill_window;
pub mod repaint;
pub mod theme;
pub mod widget_utils;

/// Re-export commonly used types
pub use chart_panel::{chart_canvas, ChartPanel};
pub use dashboard_grid::{DashboardGrid, GridAction, GridResponse};
pub use drill_path_editor::{DrillPathEditor, EditorOutcome};
pub use drill_window::{DrillAction, DrillWindow};
pub use repaint::RepaintOnSelection;
pub use theme::{apply_theme, Theme};
pub use widget_utils::{GridExt, ScrollAreaExt, WidgetId};

// Common icon definitions
pub mod icons {
    pub const FOLDER: &str = "📁";
    pub const EXPORT: &str = "💾";
    pub const IMPORT: &str = "📂";
    pub const CLEAR: &str = "⟲";
    pub const SETTINGS: &str = "⚙";
}
