//! Hierarchical drill-down
//!
//! A chart configured with a [`DrillPath`] can be explored level by level:
//! clicking a category filters the current rows to that category and
//! re-aggregates the remainder by the next level's field.

mod aggregate;
mod navigator;
mod path;

pub use aggregate::{count_by, Bucket};
pub use navigator::{Breadcrumb, DrillFrame, DrillFilter, DrillNavigator, DrillRequest, ChartPoint};
pub use path::{DrillLevel, DrillPath, DrillPathError, LevelEdit};
