//! Selection subscriber trait

use super::Selection;

/// Trait for components that re-evaluate their view when the selection changes
pub trait SelectionSubscriber: Send + Sync {
    /// Called after every publish or clear with the new selection
    fn on_selection_change(&self, selection: Option<&Selection>);
}
