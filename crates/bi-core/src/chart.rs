//! Chart options
//!
//! A [`ChartOption`] is the render-ready description of one chart: the chart
//! kind, the category labels and the values aligned with them. Widgets and
//! drill frames both produce options; the UI layer draws them and
//! [`ChartOption::to_echarts`] exports them in the option shape understood by
//! web charting libraries.

use crate::drill::Bucket;
use crate::row::Value;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as Json};
use std::fmt;

/// Supported chart kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Area,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [ChartKind::Bar, ChartKind::Line, ChartKind::Pie, ChartKind::Area];

    pub fn is_pie(self) -> bool {
        self == ChartKind::Pie
    }

    /// Series type in exported options; area charts are filled line series
    pub fn series_type(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line | ChartKind::Area => "line",
            ChartKind::Pie => "pie",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
            ChartKind::Area => "Area",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Pie => "pie",
            ChartKind::Area => "area",
        };
        f.write_str(name)
    }
}

/// An RGB color in `#rrggbb` form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Gradient start used for drill-down series
pub const GRADIENT_TOP: Rgb = Rgb(0x66, 0x7e, 0xea);
/// Gradient end used for drill-down series
pub const GRADIENT_BOTTOM: Rgb = Rgb(0x76, 0x4b, 0xa2);

/// Fill applied to bar, line and area series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesFill {
    /// Renderer's palette
    #[default]
    Palette,
    /// Vertical two-stop gradient, top to bottom
    Gradient(Rgb, Rgb),
}

impl SeriesFill {
    /// The fixed drill-down gradient
    pub fn drill_gradient() -> Self {
        SeriesFill::Gradient(GRADIENT_TOP, GRADIENT_BOTTOM)
    }
}

/// Render-ready chart description
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartOption {
    pub kind: ChartKind,

    pub title: Option<String>,

    /// Category axis labels, or slice names for pie charts
    pub categories: Vec<Value>,

    /// Values aligned with `categories`; `None` is a gap
    pub values: Vec<Option<f64>>,

    pub fill: SeriesFill,

    /// Whether brush selection tools are enabled
    pub brush: bool,

    /// Emphasize the series as a whole (set while cross-filtered)
    pub emphasis_focus: bool,
}

impl ChartOption {
    /// An empty option of the given kind
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Chart of count buckets, as rendered at each drill level
    pub fn from_buckets(kind: ChartKind, buckets: &[Bucket]) -> Self {
        let fill = if kind.is_pie() {
            SeriesFill::Palette
        } else {
            SeriesFill::drill_gradient()
        };

        Self {
            kind,
            categories: buckets.iter().map(|b| b.name.clone()).collect(),
            values: buckets.iter().map(|b| Some(b.count as f64)).collect(),
            fill,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Number of data points
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// No data points to draw
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category and value of the point at `index`
    pub fn point(&self, index: usize) -> Option<(&Value, Option<f64>)> {
        let category = self.categories.get(index)?;
        let value = self.values.get(index).copied().flatten();
        Some((category, value))
    }

    /// Largest finite value, used to scale axes
    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    /// Export in the web charting option format
    pub fn to_echarts(&self) -> Json {
        let mut option = json!({
            "tooltip": { "trigger": "item" },
            "legend": { "bottom": 0 },
            "grid": { "left": 50, "right": 50, "bottom": 60, "top": 40 },
        });

        if let Some(title) = &self.title {
            option["title"] = json!({ "text": title });
        }

        let mut series = if self.kind.is_pie() {
            let data: Vec<Json> = self
                .categories
                .iter()
                .zip(&self.values)
                .map(|(name, value)| json!({ "name": name.display(), "value": value }))
                .collect();
            json!({
                "type": "pie",
                "radius": "60%",
                "data": data,
                "emphasis": {
                    "itemStyle": {
                        "shadowBlur": 10,
                        "shadowOffsetX": 0,
                        "shadowColor": "rgba(0, 0, 0, 0.5)"
                    }
                }
            })
        } else {
            let names: Vec<String> = self.categories.iter().map(Value::display).collect();
            option["xAxis"] = json!({ "type": "category", "data": names });
            option["yAxis"] = json!({ "type": "value" });

            let mut s = json!({ "type": self.kind.series_type(), "data": self.values });
            if self.kind == ChartKind::Area {
                s["areaStyle"] = json!({});
            }
            if let SeriesFill::Gradient(top, bottom) = self.fill {
                s["itemStyle"] = json!({
                    "color": {
                        "type": "linear",
                        "x": 0, "y": 0, "x2": 0, "y2": 1,
                        "colorStops": [
                            { "offset": 0, "color": top.hex() },
                            { "offset": 1, "color": bottom.hex() }
                        ]
                    }
                });
            }
            s
        };

        if self.emphasis_focus {
            series["emphasis"] = json!({ "focus": "series", "blurScope": "coordinateSystem" });
        }
        option["series"] = json!([series]);

        if self.brush {
            option["brush"] = json!({
                "toolbox": ["rect", "clear"],
                "xAxisIndex": 0,
                "brushStyle": {
                    "borderWidth": 2,
                    "color": "rgba(99, 102, 241, 0.2)",
                    "borderColor": "rgba(99, 102, 241, 0.8)"
                }
            });
            option["toolbox"] = json!({
                "feature": { "brush": { "type": ["rect", "clear"] } },
                "right": 60
            });
        }

        option
    }
}
