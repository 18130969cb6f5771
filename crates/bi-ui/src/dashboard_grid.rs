//! Dashboard grid
//!
//! Lays pinned charts out in rows of `grid_columns`. Each cell carries move,
//! drill path and unpin controls above its chart.

use bi_core::{AppSettings, ChartId, DashboardLayout, DrillRequest, SelectionHub};
use bi_views::ChartWidget;
use egui::{RichText, ScrollArea, Ui};
use crate::chart_panel::ChartPanel;
use crate::widget_utils::{ScrollAreaExt, WidgetId};

/// Cell control pressed this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridAction {
    Move(ChartId, isize),
    EditDrillPath(ChartId),
    Unpin(ChartId),
}

/// What the grid asks of the application after a frame
#[derive(Debug, Default)]
pub struct GridResponse {
    /// A chart with a drill path was clicked
    pub drill: Option<DrillRequest>,

    /// The drill path editor should open for this chart
    pub edit_drill_path: Option<ChartId>,

    /// Charts removed from the dashboard
    pub unpinned: Vec<ChartWidget>,
}

#[derive(Default)]
pub struct DashboardGrid {
    panel: ChartPanel,
}

impl DashboardGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(
        &mut self,
        ui: &mut Ui,
        layout: &mut DashboardLayout<ChartWidget>,
        hub: &SelectionHub,
        settings: &AppSettings,
    ) -> GridResponse {
        let mut response = GridResponse::default();

        if layout.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No charts pinned. Load a CSV file to get started.").weak());
            });
            return response;
        }

        let ids: Vec<ChartId> = layout.ids().into_iter().map(String::from).collect();
        let columns = settings.grid_columns.max(1);
        let last = ids.len() - 1;
        let mut actions = Vec::new();

        ScrollArea::vertical()
            .id_builder(WidgetId::new("dashboard_grid"))
            .show(ui, |ui| {
                for (row_idx, chunk) in ids.chunks(columns).enumerate() {
                    ui.columns(columns, |cells| {
                        for (col_idx, (cell, id)) in cells.iter_mut().zip(chunk).enumerate() {
                            let position = row_idx * columns + col_idx;
                            let Some(widget) = layout.get_mut(id) else {
                                continue;
                            };
                            cell.group(|ui| {
                                cell_toolbar(ui, id, position, last, &mut actions);
                                if let Some(event) = self.panel.show(ui, widget, hub, settings) {
                                    if let Some(request) = widget.handle_event(hub, event) {
                                        response.drill = Some(request);
                                    }
                                }
                            });
                        }
                    });
                    ui.add_space(8.0);
                }
            });

        for action in actions {
            match action {
                GridAction::Move(id, delta) => {
                    layout.move_by(&id, delta);
                }
                GridAction::EditDrillPath(id) => response.edit_drill_path = Some(id),
                GridAction::Unpin(id) => {
                    hub.unregister_view(&id);
                    if let Some(widget) = layout.unpin(&id) {
                        tracing::info!("Unpinned chart '{}'", widget.config.title);
                        response.unpinned.push(widget);
                    }
                }
            }
        }
        response
    }
}

fn cell_toolbar(ui: &mut Ui, id: &str, position: usize, last: usize, actions: &mut Vec<GridAction>) {
    ui.horizontal(|ui| {
        if ui
            .add_enabled(position > 0, egui::Button::new("◀").small())
            .on_hover_text("Move left")
            .clicked()
        {
            actions.push(GridAction::Move(id.to_string(), -1));
        }
        if ui
            .add_enabled(position < last, egui::Button::new("▶").small())
            .on_hover_text("Move right")
            .clicked()
        {
            actions.push(GridAction::Move(id.to_string(), 1));
        }
        if ui.small_button("Drill path…").clicked() {
            actions.push(GridAction::EditDrillPath(id.to_string()));
        }
        if ui.small_button("✕").on_hover_text("Unpin").clicked() {
            actions.push(GridAction::Unpin(id.to_string()));
        }
    });
}
