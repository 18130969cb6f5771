//! Dashboard views
//!
//! Chart widgets linked through the selection hub, and the export format for
//! a whole dashboard.

pub mod chart_widget;
pub mod export;

pub use chart_widget::{ChartEvent, ChartWidget, CoordRange, RenderedChart, WidgetConfig};
pub use export::{export_dashboard, import_widgets, DashboardConfig, ExportError, ExportedChart};
