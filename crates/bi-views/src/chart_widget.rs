//! Chart widget
//!
//! Binds a chart configuration to its backing rows and to the dashboard's
//! selection hub. Brushing publishes the covered rows; a selection published
//! by any other widget narrows what this widget renders.

use std::sync::Arc;
use bi_core::{
    ChartId, ChartKind, ChartOption, ChartPoint, DashboardItem, DrillPath, DrillRequest, Row,
    SelectionHub, Value,
};
use serde::{Deserialize, Serialize};

/// What a chart widget draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "chart_type", default)]
    pub kind: ChartKind,

    /// Column providing the category of each point
    pub category_field: String,

    /// Column providing the value of each point; every point counts 1 when unset
    #[serde(default)]
    pub value_field: Option<String>,
}

impl WidgetConfig {
    pub fn new(title: impl Into<String>, kind: ChartKind, category_field: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            kind,
            category_field: category_field.into(),
            value_field: None,
        }
    }

    pub fn with_value(mut self, value_field: impl Into<String>) -> Self {
        self.value_field = Some(value_field.into());
        self
    }
}

/// Inclusive range of row positions covered by a brush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordRange {
    pub start: usize,
    pub end: usize,
}

impl CoordRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Rows whose x position lies inside a brushed plot interval.
    ///
    /// Returns `None` when no integer position falls inside `[a, b]`.
    pub fn from_plot_x(a: f64, b: f64) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let start = lo.ceil().max(0.0);
        let end = hi.floor();
        if end < start {
            return None;
        }
        Some(Self::new(start as usize, end as usize))
    }

    /// Normalized bounds clamped to a dataset of `len` rows
    fn clamp(self, len: usize) -> Option<(usize, usize)> {
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        if lo >= len {
            return None;
        }
        Some((lo, hi.min(len - 1)))
    }
}

/// Interaction emitted by the rendering layer
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// A brush gesture ended over a range of points
    BrushComplete(CoordRange),

    /// A brush gesture ended over no points, or the brush was removed
    BrushCleared,

    PointClicked(ChartPoint),
}

/// Everything needed to draw a widget for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    /// Rows behind the drawn points
    pub rows: Vec<Row>,

    pub option: ChartOption,

    /// Narrowed by another widget's selection
    pub is_filtered: bool,

    /// This widget owns the active selection
    pub owns_selection: bool,
}

/// A chart bound to its rows and drill path
#[derive(Debug, Clone)]
pub struct ChartWidget {
    id: ChartId,

    pub config: WidgetConfig,

    rows: Arc<Vec<Row>>,

    drill_path: DrillPath,

    /// Last render with the hub generation it was computed for
    cached: Option<(u64, RenderedChart)>,
}

impl ChartWidget {
    /// Create a widget with a fresh id
    pub fn new(config: WidgetConfig, rows: Arc<Vec<Row>>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), config, rows)
    }

    pub fn with_id(id: impl Into<ChartId>, config: WidgetConfig, rows: Arc<Vec<Row>>) -> Self {
        Self {
            id: id.into(),
            config,
            rows,
            drill_path: DrillPath::default(),
            cached: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full backing dataset
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn set_rows(&mut self, rows: Arc<Vec<Row>>) {
        self.rows = rows;
        self.invalidate();
    }

    pub fn set_config(&mut self, config: WidgetConfig) {
        self.config = config;
        self.invalidate();
    }

    pub fn drill_path(&self) -> &DrillPath {
        &self.drill_path
    }

    pub fn set_drill_path(&mut self, path: DrillPath) {
        self.drill_path = path;
    }

    pub fn has_drill_path(&self) -> bool {
        !self.drill_path.is_empty()
    }

    /// Drop the cached render
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Publish the rows covered by a finished brush gesture.
    ///
    /// `range` counts positions along the series as drawn, so a widget
    /// narrowed by a foreign selection brushes its visible rows. An empty
    /// brush clears the selection if this widget owns it.
    pub fn on_brush_complete(&self, hub: &SelectionHub, range: CoordRange) -> bool {
        let (drawn, _) = self.visible_rows(hub);
        let covered: Vec<Row> = match range.clamp(drawn.len()) {
            Some((lo, hi)) => drawn[lo..=hi].to_vec(),
            None => Vec::new(),
        };

        if covered.is_empty() {
            return self.on_brush_cleared(hub);
        }
        tracing::debug!("Chart '{}' brushed rows {}..={}", self.id, range.start, range.end);
        hub.publish(self.id.clone(), covered)
    }

    /// Brush removed or covering nothing
    pub fn on_brush_cleared(&self, hub: &SelectionHub) -> bool {
        if hub.is_owner(&self.id) {
            return hub.clear();
        }
        false
    }

    /// Route a click to the drill-down entry point.
    ///
    /// Returns `None` when no drill path is configured.
    pub fn on_click(&self, point: ChartPoint) -> Option<DrillRequest> {
        if !self.has_drill_path() {
            return None;
        }
        Some(DrillRequest {
            chart_id: self.id.clone(),
            point,
            path: self.drill_path.clone(),
            source_rows: self.rows.as_ref().clone(),
        })
    }

    /// Dispatch a rendering-layer event
    pub fn handle_event(&self, hub: &SelectionHub, event: ChartEvent) -> Option<DrillRequest> {
        match event {
            ChartEvent::BrushComplete(range) => {
                self.on_brush_complete(hub, range);
                None
            }
            ChartEvent::BrushCleared => {
                self.on_brush_cleared(hub);
                None
            }
            ChartEvent::PointClicked(point) => self.on_click(point),
        }
    }

    /// Rows to render given the hub's current selection, and whether they
    /// are a strict subset of the dataset.
    ///
    /// A foreign selection matching none of this widget's rows leaves the
    /// widget unfiltered rather than empty.
    pub fn visible_rows(&self, hub: &SelectionHub) -> (Vec<Row>, bool) {
        let full = || (self.rows.as_ref().clone(), false);

        let Some(selection) = hub.current() else {
            return full();
        };
        if selection.owner_id == self.id || !hub.should_sync_selection(&self.id) {
            return full();
        }

        let filtered: Vec<Row> = self
            .rows
            .iter()
            .filter(|row| row.matches_any(&selection.rows))
            .cloned()
            .collect();

        if filtered.is_empty() {
            return full();
        }
        let is_filtered = filtered.len() < self.rows.len();
        (filtered, is_filtered)
    }

    /// Render for the current hub state
    pub fn view(&self, hub: &SelectionHub) -> RenderedChart {
        let (rows, is_filtered) = self.visible_rows(hub);
        let mut option = self.build_option(&rows);
        option.emphasis_focus = is_filtered;

        RenderedChart {
            rows,
            option,
            is_filtered,
            owns_selection: hub.is_owner(&self.id),
        }
    }

    /// Render, reusing the previous result while the hub is unchanged
    pub fn view_cached(&mut self, hub: &SelectionHub) -> &RenderedChart {
        let generation = hub.generation();
        match self.cached.take() {
            Some((g, rendered)) if g == generation => &self.cached.insert((g, rendered)).1,
            _ => {
                let rendered = self.view(hub);
                &self.cached.insert((generation, rendered)).1
            }
        }
    }

    /// One point per row: category from `category_field`, value from
    /// `value_field` (a gap when missing or not numeric)
    pub fn build_option(&self, rows: &[Row]) -> ChartOption {
        let categories = rows
            .iter()
            .map(|row| row.get(&self.config.category_field).cloned().unwrap_or(Value::Null))
            .collect();

        let values = rows
            .iter()
            .map(|row| match &self.config.value_field {
                Some(field) => row.get(field).and_then(Value::as_f64),
                None => Some(1.0),
            })
            .collect();

        ChartOption {
            kind: self.config.kind,
            title: Some(self.config.title.clone()),
            categories,
            values,
            brush: true,
            ..Default::default()
        }
    }
}

impl DashboardItem for ChartWidget {
    fn item_id(&self) -> &str {
        &self.id
    }
}
