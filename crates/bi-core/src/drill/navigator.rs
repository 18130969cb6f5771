//! Drill-down navigator
//!
//! State machine with two states: closed, or open with a stack of frames.
//! Frame `n` holds the rows that survived the filters of levels `0..n` and
//! the chart aggregating them by level `n`'s field. Going back truncates the
//! stack, so a different click afterwards builds a fresh frame and the
//! abandoned branch is gone for good.

use super::aggregate::count_by;
use super::path::{DrillLevel, DrillPath};
use crate::chart::ChartOption;
use crate::row::{Row, Value};
use crate::sync::ChartId;

/// A clicked data point on a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Position of the point in the chart's series
    pub index: usize,

    /// Category of the point (slice name for pie charts)
    pub name: Value,

    pub value: Option<f64>,
}

/// Everything the navigator needs to open a session
#[derive(Debug, Clone)]
pub struct DrillRequest {
    /// Chart that received the click
    pub chart_id: ChartId,

    pub point: ChartPoint,

    pub path: DrillPath,

    /// Full backing dataset of the chart
    pub source_rows: Vec<Row>,
}

/// Filter that produced a frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrillFilter {
    pub field: String,
    pub value: Value,
}

/// One level of an open drill session
#[derive(Debug, Clone, PartialEq)]
pub struct DrillFrame {
    pub level: usize,

    /// Rows this frame aggregates
    pub source_rows: Vec<Row>,

    /// `None` for the root frame
    pub applied_filter: Option<DrillFilter>,

    pub option: ChartOption,
}

/// Breadcrumb entry for one configured level
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    pub level: usize,
    pub label: String,
    pub is_current: bool,
    /// Ancestor of the current level; clicking it jumps back
    pub is_reachable: bool,
}

#[derive(Debug)]
struct Session {
    chart_id: ChartId,
    origin: ChartPoint,
    levels: Vec<DrillLevel>,
    stack: Vec<DrillFrame>,
}

impl Session {
    fn current_level(&self) -> usize {
        self.stack.len() - 1
    }

    fn current_frame(&self) -> &DrillFrame {
        &self.stack[self.current_level()]
    }
}

/// Drives a drill-down session for one chart at a time
#[derive(Debug, Default)]
pub struct DrillNavigator {
    session: Option<Session>,
}

impl DrillNavigator {
    /// Create a closed navigator
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session from a chart click.
    ///
    /// Requires a non-empty drill path. Replaces any open session.
    pub fn open(&mut self, request: DrillRequest) -> bool {
        let DrillRequest { chart_id, point, path, source_rows } = request;

        let Some(root) = path.level(0) else {
            tracing::debug!("Chart '{}' has no drill path, not opening", chart_id);
            return false;
        };

        let option = render_level(root, &source_rows);
        tracing::info!(
            "Opening drill-down on chart '{}' at '{}' ({} levels, {} rows)",
            chart_id,
            point.name,
            path.len(),
            source_rows.len()
        );

        let frame = DrillFrame {
            level: 0,
            source_rows,
            applied_filter: None,
            option,
        };

        self.session = Some(Session {
            chart_id,
            origin: point,
            levels: path.levels().to_vec(),
            stack: vec![frame],
        });
        true
    }

    /// Filter the current frame by `clicked` and push the next level.
    ///
    /// No-op at the leaf level or while closed.
    pub fn descend(&mut self, clicked: &Value) -> bool {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("Ignoring descend on a closed navigator");
            return false;
        };

        let current = session.current_level();
        if current + 1 >= session.levels.len() {
            tracing::debug!("Ignoring descend at leaf level {}", current);
            return false;
        }

        let field = session.levels[current].field.clone();
        let next_level = &session.levels[current + 1];

        let next_rows: Vec<Row> = session
            .current_frame()
            .source_rows
            .iter()
            .filter(|row| row.get(&field) == Some(clicked))
            .cloned()
            .collect();

        if next_rows.is_empty() {
            tracing::warn!("No rows where {} = '{}' at level {}", field, clicked, current);
        }

        let option = render_level(next_level, &next_rows);
        session.stack.push(DrillFrame {
            level: current + 1,
            source_rows: next_rows,
            applied_filter: Some(DrillFilter {
                field,
                value: clicked.clone(),
            }),
            option,
        });

        tracing::debug!("Descended to level {}", current + 1);
        true
    }

    /// Descend on the point at `index` of the current frame's chart
    pub fn descend_at(&mut self, index: usize) -> bool {
        let clicked = self
            .current_frame()
            .and_then(|frame| frame.option.categories.get(index))
            .cloned();

        match clicked {
            Some(value) => self.descend(&value),
            None => false,
        }
    }

    /// Go back one level, discarding the current frame
    pub fn ascend(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) if session.current_level() > 0 => {
                session.stack.pop();
                true
            }
            _ => {
                tracing::debug!("Ignoring ascend at root level");
                false
            }
        }
    }

    /// Jump back to an ancestor level in one truncation
    pub fn jump_to_breadcrumb(&mut self, target: usize) -> bool {
        match self.session.as_mut() {
            Some(session) if target < session.current_level() => {
                session.stack.truncate(target + 1);
                true
            }
            _ => {
                tracing::debug!("Ignoring breadcrumb jump to level {}", target);
                false
            }
        }
    }

    /// Close the session, dropping the whole stack
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!("Closed drill-down on chart '{}'", session.chart_id);
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Current level; `None` while closed
    pub fn current_level(&self) -> Option<usize> {
        self.session.as_ref().map(Session::current_level)
    }

    pub fn stack(&self) -> &[DrillFrame] {
        self.session.as_ref().map(|s| s.stack.as_slice()).unwrap_or_default()
    }

    pub fn current_frame(&self) -> Option<&DrillFrame> {
        self.session.as_ref().map(Session::current_frame)
    }

    pub fn levels(&self) -> &[DrillLevel] {
        self.session.as_ref().map(|s| s.levels.as_slice()).unwrap_or_default()
    }

    /// Chart the open session started from
    pub fn chart_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.chart_id.as_str())
    }

    /// Point that opened the session
    pub fn origin(&self) -> Option<&ChartPoint> {
        self.session.as_ref().map(|s| &s.origin)
    }

    /// Whether a click on the current chart can go one level deeper
    pub fn can_descend(&self) -> bool {
        self.session
            .as_ref()
            .map_or(false, |s| s.current_level() + 1 < s.levels.len())
    }

    pub fn can_ascend(&self) -> bool {
        self.current_level().map_or(false, |level| level > 0)
    }

    /// One entry per configured level
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let Some(session) = self.session.as_ref() else {
            return Vec::new();
        };
        let current = session.current_level();

        session
            .levels
            .iter()
            .enumerate()
            .map(|(level, l)| Breadcrumb {
                level,
                label: l.display_name().to_string(),
                is_current: level == current,
                is_reachable: level < current,
            })
            .collect()
    }

    /// Badge text such as `Level 2 / 3`
    pub fn level_badge(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        Some(format!("Level {} / {}", session.current_level() + 1, session.levels.len()))
    }
}

/// Aggregate `rows` for display at `level`
fn render_level(level: &DrillLevel, rows: &[Row]) -> ChartOption {
    let buckets = count_by(rows, &level.field);
    ChartOption::from_buckets(level.chart_kind, &buckets).with_title(level.display_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::row;

    fn sales_rows() -> Vec<Row> {
        vec![
            row! { "region" => "East", "category" => "Books", "sales" => 10 },
            row! { "region" => "West", "category" => "Games", "sales" => 20 },
            row! { "region" => "East", "category" => "Games", "sales" => 5 },
            row! { "region" => "East", "category" => "Books", "sales" => 7 },
        ]
    }

    fn three_level_path() -> DrillPath {
        DrillPath::from_levels(vec![
            DrillLevel::new("region", ChartKind::Bar).with_label("Region"),
            DrillLevel::new("category", ChartKind::Pie),
            DrillLevel::new("sales", ChartKind::Line),
        ])
    }

    fn request(path: DrillPath, rows: Vec<Row>) -> DrillRequest {
        DrillRequest {
            chart_id: "chart-a".into(),
            point: ChartPoint {
                index: 0,
                name: Value::from("East"),
                value: Some(10.0),
            },
            path,
            source_rows: rows,
        }
    }

    fn open_navigator() -> DrillNavigator {
        let mut nav = DrillNavigator::new();
        assert!(nav.open(request(three_level_path(), sales_rows())));
        nav
    }

    #[test]
    fn test_open_builds_root_frame() {
        let nav = open_navigator();

        assert_eq!(nav.current_level(), Some(0));
        assert_eq!(nav.stack().len(), 1);
        let root = nav.current_frame().unwrap();
        assert_eq!(root.source_rows.len(), 4);
        assert!(root.applied_filter.is_none());
        assert_eq!(root.option.kind, ChartKind::Bar);
        assert_eq!(root.option.categories, vec![Value::from("East"), Value::from("West")]);
        assert_eq!(root.option.values, vec![Some(3.0), Some(1.0)]);
        assert_eq!(nav.origin().unwrap().name, Value::from("East"));
    }

    #[test]
    fn test_open_requires_levels() {
        let mut nav = DrillNavigator::new();
        assert!(!nav.open(request(DrillPath::default(), sales_rows())));
        assert!(!nav.is_open());
    }

    #[test]
    fn test_descend_filters_by_current_field_and_groups_by_next() {
        let mut nav = open_navigator();
        assert!(nav.descend(&Value::from("East")));

        assert_eq!(nav.current_level(), Some(1));
        assert_eq!(nav.stack().len(), 2);
        let frame = nav.current_frame().unwrap();
        assert_eq!(frame.source_rows.len(), 3);
        assert_eq!(
            frame.applied_filter,
            Some(DrillFilter { field: "region".into(), value: Value::from("East") })
        );
        assert_eq!(frame.option.kind, ChartKind::Pie);
        assert_eq!(frame.option.categories, vec![Value::from("Books"), Value::from("Games")]);
        assert_eq!(frame.option.values, vec![Some(2.0), Some(1.0)]);
    }

    #[test]
    fn test_descend_narrows_progressively() {
        let mut nav = open_navigator();
        nav.descend(&Value::from("East"));
        assert!(nav.descend(&Value::from("Books")));

        let frame = nav.current_frame().unwrap();
        assert_eq!(frame.source_rows.len(), 2);
        assert!(frame
            .source_rows
            .iter()
            .all(|r| r.get("region") == Some(&Value::from("East"))));
    }

    #[test]
    fn test_descend_disabled_at_leaf() {
        let mut nav = open_navigator();
        nav.descend(&Value::from("East"));
        nav.descend(&Value::from("Books"));

        assert!(!nav.can_descend());
        assert!(!nav.descend(&Value::from(10)));
        assert_eq!(nav.current_level(), Some(2));
    }

    #[test]
    fn test_single_level_path_is_a_leaf() {
        let rows = vec![
            row! { "region" => "East", "sales" => 10 },
            row! { "region" => "West", "sales" => 20 },
            row! { "region" => "East", "sales" => 5 },
        ];
        let path = DrillPath::from_levels(vec![DrillLevel::new("region", ChartKind::Bar)]);
        let mut nav = DrillNavigator::new();
        nav.open(request(path, rows));

        assert!(!nav.can_descend());
        assert!(!nav.descend(&Value::from("East")));
        assert_eq!(nav.current_level(), Some(0));
        assert_eq!(nav.stack().len(), 1);
    }

    #[test]
    fn test_descend_without_matches_pushes_empty_frame() {
        let mut nav = open_navigator();
        assert!(nav.descend(&Value::from("North")));

        let frame = nav.current_frame().unwrap();
        assert!(frame.source_rows.is_empty());
        assert!(frame.option.is_empty());
        assert_eq!(nav.current_level(), Some(1));
    }

    #[test]
    fn test_descend_then_ascend_restores_state() {
        let mut nav = open_navigator();
        nav.descend(&Value::from("East"));
        let before = nav.stack().to_vec();

        nav.descend(&Value::from("Books"));
        assert!(nav.ascend());

        assert_eq!(nav.stack(), before.as_slice());
        assert_eq!(nav.current_level(), Some(1));
    }

    #[test]
    fn test_rebranch_never_reuses_discarded_frame() {
        let mut nav = open_navigator();
        nav.descend(&Value::from("East"));
        nav.ascend();
        nav.descend(&Value::from("West"));

        let frame = nav.current_frame().unwrap();
        assert_eq!(frame.applied_filter.as_ref().unwrap().value, Value::from("West"));
        assert_eq!(frame.source_rows.len(), 1);
        assert_eq!(nav.stack().len(), 2);
    }

    #[test]
    fn test_ascend_at_root_is_noop() {
        let mut nav = open_navigator();
        assert!(!nav.can_ascend());
        assert!(!nav.ascend());
        assert_eq!(nav.stack().len(), 1);
    }

    #[test]
    fn test_jump_to_root_equals_repeated_ascend() {
        let mut jumped = open_navigator();
        jumped.descend(&Value::from("East"));
        jumped.descend(&Value::from("Games"));

        let mut ascended = open_navigator();
        ascended.descend(&Value::from("East"));
        ascended.descend(&Value::from("Games"));
        let depth = ascended.current_level().unwrap();
        for _ in 0..depth {
            ascended.ascend();
        }

        assert!(jumped.jump_to_breadcrumb(0));
        assert_eq!(jumped.stack(), ascended.stack());
        assert_eq!(jumped.current_level(), ascended.current_level());
    }

    #[test]
    fn test_jump_rejects_current_and_deeper_levels() {
        let mut nav = open_navigator();
        nav.descend(&Value::from("East"));

        assert!(!nav.jump_to_breadcrumb(1));
        assert!(!nav.jump_to_breadcrumb(2));
        assert_eq!(nav.current_level(), Some(1));
    }

    #[test]
    fn test_transitions_while_closed_are_noops() {
        let mut nav = DrillNavigator::new();
        assert!(!nav.descend(&Value::from("East")));
        assert!(!nav.ascend());
        assert!(!nav.jump_to_breadcrumb(0));
        assert!(nav.stack().is_empty());
        assert!(nav.breadcrumbs().is_empty());
    }

    #[test]
    fn test_close_discards_stack() {
        let mut nav = open_navigator();
        nav.descend(&Value::from("East"));
        nav.close();

        assert!(!nav.is_open());
        assert_eq!(nav.current_level(), None);
        assert!(nav.stack().is_empty());
    }

    #[test]
    fn test_breadcrumbs_and_badge() {
        let mut nav = open_navigator();
        nav.descend(&Value::from("East"));

        let crumbs = nav.breadcrumbs();
        assert_eq!(crumbs.len(), 3);
        assert_eq!(crumbs[0].label, "Region");
        assert!(crumbs[0].is_reachable);
        assert!(crumbs[1].is_current);
        assert!(!crumbs[2].is_reachable);
        assert_eq!(nav.level_badge().as_deref(), Some("Level 2 / 3"));
    }

    #[test]
    fn test_descend_at_uses_current_chart_categories() {
        let mut nav = open_navigator();
        assert!(nav.descend_at(1));
        assert_eq!(
            nav.current_frame().unwrap().applied_filter.as_ref().unwrap().value,
            Value::from("West")
        );
        assert!(!nav.descend_at(99));
    }
}
