//! Drill-down window
//!
//! Shows the navigator's current frame in a floating window with a back
//! button, the level badge, the filter applied to reach the level and the
//! breadcrumb trail.

use bi_core::DrillNavigator;
use bi_views::ChartEvent;
use egui::{Context, Id, RichText, Ui};
use crate::chart_panel::chart_canvas;
use crate::theme;
use crate::widget_utils::WidgetId;

/// Navigation requested from the window this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillAction {
    Back,
    JumpTo(usize),
    Descend(usize),
    Close,
}

/// Apply `action` to the navigator
pub fn apply_action(navigator: &mut DrillNavigator, action: DrillAction) -> bool {
    match action {
        DrillAction::Back => navigator.ascend(),
        DrillAction::JumpTo(level) => navigator.jump_to_breadcrumb(level),
        DrillAction::Descend(index) => navigator.descend_at(index),
        DrillAction::Close => {
            let was_open = navigator.is_open();
            navigator.close();
            was_open
        }
    }
}

/// Floating window around a [`DrillNavigator`]
pub struct DrillWindow {
    chart_height: f32,
}

impl Default for DrillWindow {
    fn default() -> Self {
        Self { chart_height: 400.0 }
    }
}

impl DrillWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart_height(mut self, height: f32) -> Self {
        self.chart_height = height;
        self
    }

    /// Draw the window while a session is open
    pub fn show(&mut self, ctx: &Context, navigator: &mut DrillNavigator) {
        if !navigator.is_open() {
            return;
        }

        let title = match navigator.origin() {
            Some(point) => format!("Drill-down: {}", point.name),
            None => "Drill-down".to_string(),
        };

        let mut keep_open = true;
        let mut action = None;
        egui::Window::new(title)
            .id(Id::new("drill_window"))
            .open(&mut keep_open)
            .collapsible(false)
            .resizable(true)
            .default_width(640.0)
            .show(ctx, |ui| {
                action = self.contents(ui, navigator);
            });

        if !keep_open {
            action = Some(DrillAction::Close);
        }
        if let Some(action) = action {
            tracing::debug!("Drill window action {:?}", action);
            apply_action(navigator, action);
        }
    }

    fn contents(&self, ui: &mut Ui, navigator: &DrillNavigator) -> Option<DrillAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(navigator.can_ascend(), egui::Button::new("← Back"))
                .clicked()
            {
                action = Some(DrillAction::Back);
            }
            if let Some(badge) = navigator.level_badge() {
                ui.label(RichText::new(badge).small().color(theme::drill_badge_color()));
            }
        });

        if let Some(filter) = navigator.current_frame().and_then(|f| f.applied_filter.as_ref()) {
            ui.label(
                RichText::new(format!("Filtered by {} = {}", filter.field, filter.value))
                    .small()
                    .weak(),
            );
        }

        ui.horizontal_wrapped(|ui| {
            let crumbs = navigator.breadcrumbs();
            let last = crumbs.len().saturating_sub(1);
            for crumb in &crumbs {
                if crumb.is_current {
                    ui.label(RichText::new(&crumb.label).strong());
                } else if crumb.is_reachable {
                    if ui.link(crumb.label.as_str()).clicked() {
                        action = Some(DrillAction::JumpTo(crumb.level));
                    }
                } else {
                    ui.label(RichText::new(&crumb.label).weak());
                }
                if crumb.level < last {
                    ui.label(RichText::new("›").weak());
                }
            }
        });
        ui.separator();

        let Some(frame) = navigator.current_frame() else {
            return action;
        };

        if frame.option.is_empty() {
            ui.label(RichText::new("No data available for this level").weak());
            return action;
        }

        let plot_id = WidgetId::new("drill_plot").index(frame.level).build();
        if let Some(ChartEvent::PointClicked(point)) =
            chart_canvas(ui, &plot_id, &frame.option, self.chart_height, None)
        {
            if navigator.can_descend() {
                action = Some(DrillAction::Descend(point.index));
            }
        }

        let hint = match navigator.levels().get(frame.level + 1) {
            Some(next) => format!(
                "Click a {} element to drill down into {}",
                frame.option.kind.label().to_lowercase(),
                next.display_name()
            ),
            None => "Deepest level reached".to_string(),
        };
        ui.label(RichText::new(hint).small().weak());

        action
    }
}
