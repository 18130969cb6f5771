//! Core functionality for the insight dashboard
//!
//! This crate provides the row model, the cross-chart selection hub, the
//! drill-down navigator and the chart options shared by every view.

pub mod chart;
pub mod dashboard;
pub mod drill;
pub mod row;
pub mod state;
pub mod sync;

// Re-export commonly used types
pub use chart::{ChartKind, ChartOption, SeriesFill};
pub use dashboard::{DashboardItem, DashboardLayout};
pub use drill::{
    Breadcrumb, Bucket, ChartPoint, DrillFilter, DrillFrame, DrillLevel, DrillNavigator,
    DrillPath, DrillPathError, DrillRequest, LevelEdit,
};
pub use row::{Row, Value};
pub use state::{AppSettings, DashboardState, SettingsError};
pub use sync::{ChartId, Selection, SelectionHub, SelectionSubscriber, ViewSyncSettings};
