//! Chart rendering
//!
//! Bar, line and area charts are drawn with `egui_plot`, one x position per
//! point. Pie charts are painted directly. Plot drag is disabled so that a
//! horizontal drag acts as the brush.

use std::f32::consts::TAU;
use bi_core::{AppSettings, ChartKind, ChartOption, ChartPoint, SelectionHub, SeriesFill};
use bi_views::{ChartEvent, ChartWidget, CoordRange};
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, VLine};
use crate::theme::{self, gradient_at, palette_color, to_color32};
use crate::widget_utils::chart_plot_id;

/// Width of a bar in plot units
const BAR_WIDTH: f64 = 0.7;

/// Draws dashboard chart widgets and turns pointer input into chart events
#[derive(Default)]
pub struct ChartPanel {
    /// Chart id and plot x where the ongoing brush started
    brush_anchor: Option<(String, f64)>,
}

impl ChartPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `widget` for the current hub state. Returns the interaction of
    /// this frame, if any.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        widget: &mut ChartWidget,
        hub: &SelectionHub,
        settings: &AppSettings,
    ) -> Option<ChartEvent> {
        let chart_id = widget.id().to_string();
        let drill_levels = widget.drill_path().len();
        let title = widget.config.title.clone();
        let description = widget.config.description.clone();

        let rendered = widget.view_cached(hub);

        ui.horizontal(|ui| {
            ui.label(RichText::new(&title).strong());
            if rendered.is_filtered && settings.show_filter_badge {
                badge(ui, "Filtered", theme::filter_badge_color());
            }
            if drill_levels > 0 {
                badge(ui, &format!("{} level drill-down", drill_levels), theme::drill_badge_color());
            }
        });
        if !description.is_empty() {
            ui.label(RichText::new(&description).weak().small());
        }

        // Keep the anchor only while it belongs to this chart
        let mut anchor = match &self.brush_anchor {
            Some((id, x)) if *id == chart_id => Some(*x),
            _ => None,
        };

        let event = chart_canvas(
            ui,
            &chart_plot_id(&chart_id),
            &rendered.option,
            settings.chart_height,
            Some(&mut anchor),
        );

        match anchor {
            Some(x) => self.brush_anchor = Some((chart_id, x)),
            None => {
                if matches!(&self.brush_anchor, Some((id, _)) if *id == chart_id) {
                    self.brush_anchor = None;
                }
            }
        }
        event
    }
}

fn badge(ui: &mut Ui, text: &str, color: Color32) {
    egui::Frame::none()
        .fill(color)
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::Margin::symmetric(6.0, 1.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(Color32::WHITE));
        });
}

/// Draw `option` and report clicks. When `brush_anchor` is given, a drag
/// across the plot produces a brush event.
pub fn chart_canvas(
    ui: &mut Ui,
    plot_id: &str,
    option: &ChartOption,
    height: f32,
    brush_anchor: Option<&mut Option<f64>>,
) -> Option<ChartEvent> {
    if option.is_empty() {
        ui.allocate_ui(Vec2::new(ui.available_width(), height), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No data to display").weak());
            });
        });
        return None;
    }

    if option.kind.is_pie() {
        return paint_pie(ui, option, height);
    }

    let plot = Plot::new(plot_id)
        .height(height)
        .show_grid(true)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0);

    plot.show(ui, |plot_ui| {
        match option.kind {
            ChartKind::Bar => plot_ui.bar_chart(bar_series(option)),
            _ => plot_ui.line(line_series(option)),
        }

        let response = plot_ui.response().clone();
        let pointer = plot_ui.pointer_coordinate().map(|p| p.x);

        if response.clicked() {
            if let Some(anchor) = brush_anchor {
                *anchor = None;
            }
            return pointer
                .and_then(|x| nearest_index(x, option.len()))
                .and_then(|index| point_at(option, index))
                .map(ChartEvent::PointClicked);
        }

        let anchor = brush_anchor?;
        if response.drag_started() {
            *anchor = pointer;
        }
        if let (Some(start), Some(current)) = (*anchor, pointer) {
            if response.dragged() {
                let color = theme::accent_color();
                plot_ui.vline(VLine::new(start).color(color).width(2.0));
                plot_ui.vline(VLine::new(current).color(color).width(2.0));
            }
        }
        if response.drag_released() {
            let start = anchor.take()?;
            return Some(brush_event(start, pointer.unwrap_or(start)));
        }
        None
    })
    .inner
}

fn bar_series(option: &ChartOption) -> BarChart {
    let bars = option
        .categories
        .iter()
        .zip(&option.values)
        .enumerate()
        .map(|(i, (name, value))| {
            let fill = match option.fill {
                SeriesFill::Palette => palette_color(0),
                SeriesFill::Gradient(top, bottom) => gradient_at(top, bottom, i, option.len()),
            };
            Bar::new(i as f64, value.unwrap_or(0.0))
                .width(BAR_WIDTH)
                .name(name.display())
                .fill(fill)
        })
        .collect();

    let mut chart = BarChart::new(bars);
    if let Some(title) = &option.title {
        chart = chart.name(title);
    }
    chart
}

fn line_series(option: &ChartOption) -> Line {
    let points: Vec<[f64; 2]> = option
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.map(|v| [i as f64, v]))
        .collect();

    let color = match option.fill {
        SeriesFill::Palette => palette_color(0),
        SeriesFill::Gradient(top, _) => to_color32(top),
    };
    let mut line = Line::new(PlotPoints::new(points)).color(color).width(2.0);
    if option.kind == ChartKind::Area {
        line = line.fill(0.0);
    }
    if let Some(title) = &option.title {
        line = line.name(title);
    }
    line
}

fn point_at(option: &ChartOption, index: usize) -> Option<ChartPoint> {
    let (name, value) = option.point(index)?;
    Some(ChartPoint {
        index,
        name: name.clone(),
        value,
    })
}

/// Point under plot position `x`, if within half a slot of one
pub fn nearest_index(x: f64, len: usize) -> Option<usize> {
    if !x.is_finite() || len == 0 {
        return None;
    }
    let rounded = x.round();
    if rounded < 0.0 || rounded as usize >= len {
        return None;
    }
    Some(rounded as usize)
}

/// Event produced by a brush dragged from `start` to `end`
pub fn brush_event(start: f64, end: f64) -> ChartEvent {
    match CoordRange::from_plot_x(start, end) {
        Some(range) => ChartEvent::BrushComplete(range),
        None => ChartEvent::BrushCleared,
    }
}

/// Start angle and sweep of each slice, clockwise from 12 o'clock.
///
/// Missing, negative and non-finite values get an empty slice.
pub fn pie_slices(values: &[Option<f64>]) -> Vec<(f32, f32)> {
    let weight = |v: &Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0);
    let total: f64 = values.iter().map(weight).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0_f32;
    values
        .iter()
        .map(|v| {
            let sweep = (weight(v) / total) as f32 * TAU;
            let slice = (start, sweep);
            start += sweep;
            slice
        })
        .collect()
}

/// Slice under `offset` from the pie center
pub fn slice_at(slices: &[(f32, f32)], offset: Vec2, radius: f32) -> Option<usize> {
    if offset.length() > radius {
        return None;
    }
    let mut angle = offset.x.atan2(-offset.y);
    if angle < 0.0 {
        angle += TAU;
    }
    slices
        .iter()
        .position(|(start, sweep)| *sweep > 0.0 && angle >= *start && angle < start + sweep)
}

fn on_circle(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::new(angle.sin(), -angle.cos()) * radius
}

fn paint_pie(ui: &mut Ui, option: &ChartOption, height: f32) -> Option<ChartEvent> {
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(ui.available_width(), height), Sense::click());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = rect.width().min(rect.height()) * 0.4;
    let slices = pie_slices(&option.values);

    let hovered = response
        .hover_pos()
        .and_then(|pos| slice_at(&slices, pos - center, radius));
    let text_color = ui.visuals().text_color();

    for (i, (start, sweep)) in slices.iter().enumerate() {
        if *sweep <= 0.0 {
            continue;
        }
        let mut color = palette_color(i);
        if hovered == Some(i) {
            color = color.linear_multiply(1.2);
        }

        // Convex pieces of at most a quarter turn
        let pieces = (sweep / (TAU / 4.0)).ceil().max(1.0) as usize;
        let piece = sweep / pieces as f32;
        for p in 0..pieces {
            let from = start + piece * p as f32;
            let steps = ((piece / 0.05).ceil() as usize).max(2);
            let mut points = vec![center];
            points.extend(
                (0..=steps).map(|s| on_circle(center, radius, from + piece * s as f32 / steps as f32)),
            );
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }

        if *sweep > 0.25 {
            let label_pos = on_circle(center, radius * 1.15, start + sweep / 2.0);
            let name = option.categories.get(i).map(|c| c.display()).unwrap_or_default();
            painter.text(label_pos, Align2::CENTER_CENTER, name, FontId::proportional(11.0), text_color);
        }
    }

    if let Some(i) = hovered {
        if let Some((name, value)) = option.point(i) {
            let text = match value {
                Some(v) => format!("{}: {}", name, v),
                None => name.display(),
            };
            response.clone().on_hover_text(text);
        }
    }

    if response.clicked() {
        let pos = response.interact_pointer_pos()?;
        let index = slice_at(&slices, pos - center, radius)?;
        return point_at(option, index).map(ChartEvent::PointClicked);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_nearest_index() {
        assert_eq!(nearest_index(0.3, 3), Some(0));
        assert_eq!(nearest_index(1.6, 3), Some(2));
        assert_eq!(nearest_index(2.6, 3), None);
        assert_eq!(nearest_index(-0.6, 3), None);
        assert_eq!(nearest_index(0.0, 0), None);
    }

    #[test]
    fn test_brush_event_from_drag() {
        assert_eq!(brush_event(-0.4, 1.3), ChartEvent::BrushComplete(CoordRange::new(0, 1)));
        assert_eq!(brush_event(1.3, -0.4), ChartEvent::BrushComplete(CoordRange::new(0, 1)));
        assert_eq!(brush_event(0.1, 0.2), ChartEvent::BrushCleared);
    }

    #[test]
    fn test_pie_slices_share_full_turn() {
        let slices = pie_slices(&[Some(1.0), None, Some(3.0)]);
        assert_eq!(slices.len(), 3);
        assert!((slices[0].1 - TAU / 4.0).abs() < 1e-5);
        assert_eq!(slices[1].1, 0.0);
        assert!((slices[2].0 - TAU / 4.0).abs() < 1e-5);
        assert!(pie_slices(&[Some(0.0), None]).is_empty());
    }

    #[test]
    fn test_slice_at_goes_clockwise_from_top() {
        let slices = pie_slices(&[Some(1.0), Some(1.0), Some(1.0), Some(1.0)]);
        // Right of center is a quarter turn clockwise
        assert_eq!(slice_at(&slices, Vec2::new(10.0, -1.0), 50.0), Some(0));
        assert_eq!(slice_at(&slices, Vec2::new(10.0, 1.0), 50.0), Some(1));
        assert_eq!(slice_at(&slices, Vec2::new(-10.0, 1.0), 50.0), Some(2));
        assert_eq!(slice_at(&slices, Vec2::new(-10.0, -1.0), 50.0), Some(3));
        assert_eq!(slice_at(&slices, Vec2::new(60.0, 0.0), 50.0), None);
    }

    #[test]
    fn test_on_circle_top_and_right() {
        let center = Pos2::new(0.0, 0.0);
        let top = on_circle(center, 10.0, 0.0);
        let right = on_circle(center, 10.0, PI / 2.0);
        assert!((top.y + 10.0).abs() < 1e-4);
        assert!((right.x - 10.0).abs() < 1e-4);
    }
}
