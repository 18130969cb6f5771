//! Repaint on selection change

use bi_core::{Selection, SelectionSubscriber};
use egui::Context;

/// Requests a repaint whenever the hub's selection changes, so linked charts
/// redraw without waiting for pointer input.
pub struct RepaintOnSelection {
    ctx: Context,
}

impl RepaintOnSelection {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl SelectionSubscriber for RepaintOnSelection {
    fn on_selection_change(&self, selection: Option<&Selection>) {
        match selection {
            Some(s) => tracing::trace!("Repainting for selection of '{}'", s.owner_id),
            None => tracing::trace!("Repainting for cleared selection"),
        }
        self.ctx.request_repaint();
    }
}
