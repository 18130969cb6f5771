//! Selection broadcast hub
//!
//! Coordinates brush selections across chart widgets. At most one selection
//! is active per hub; a publish from any widget replaces it wholesale. The hub
//! is an ordinary value shared through `Arc`, so independent dashboards (and
//! tests) each own their own hub.

mod subscriber;

pub use subscriber::SelectionSubscriber;

use crate::row::Row;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// Identifier of the chart widget that owns a selection
pub type ChartId = String;

/// The active brush selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Widget that produced the selection
    pub owner_id: ChartId,

    /// Rows covered by the brush, in dataset order
    pub rows: Vec<Row>,
}

/// Synchronization settings for a specific view
#[derive(Debug, Clone)]
pub struct ViewSyncSettings {
    /// Whether this view filters itself by foreign selections
    pub sync_selection: bool,
}

impl Default for ViewSyncSettings {
    fn default() -> Self {
        Self { sync_selection: true }
    }
}

#[derive(Debug, Default)]
struct HubState {
    selection: Option<Arc<Selection>>,
    generation: u64,
}

/// Holds the single active selection and fans changes out to subscribers
pub struct SelectionHub {
    state: Arc<RwLock<HubState>>,

    subscribers: Arc<RwLock<Vec<Weak<dyn SelectionSubscriber>>>>,

    /// View-specific sync settings
    view_settings: Arc<RwLock<AHashMap<ChartId, ViewSyncSettings>>>,
}

impl SelectionHub {
    /// Create a hub with no active selection
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(HubState::default())),
            subscribers: Arc::new(RwLock::new(Vec::new())),
            view_settings: Arc::new(RwLock::new(AHashMap::new())),
        }
    }

    /// Replace the active selection.
    ///
    /// An empty `rows` is never stored: it clears the selection when
    /// `owner_id` currently owns it and is ignored otherwise. Returns whether
    /// the hub state changed.
    pub fn publish(&self, owner_id: impl Into<ChartId>, rows: Vec<Row>) -> bool {
        let owner_id = owner_id.into();

        if rows.is_empty() {
            if self.is_owner(&owner_id) {
                tracing::debug!("Empty publish from owner '{}', clearing selection", owner_id);
                return self.clear();
            }
            tracing::debug!("Ignoring empty publish from non-owner '{}'", owner_id);
            return false;
        }

        let mut state = self.state.write();
        if let Some(previous) = &state.selection {
            if previous.owner_id != owner_id {
                tracing::debug!("Selection of '{}' evicted by '{}'", previous.owner_id, owner_id);
            }
        }
        tracing::info!("Chart '{}' published a selection of {} rows", owner_id, rows.len());
        state.selection = Some(Arc::new(Selection { owner_id, rows }));
        state.generation += 1;

        drop(state);
        self.notify_subscribers();
        true
    }

    /// Drop the active selection. Idempotent; returns whether anything was
    /// cleared.
    pub fn clear(&self) -> bool {
        let mut state = self.state.write();
        if state.selection.take().is_none() {
            return false;
        }
        state.generation += 1;
        tracing::debug!("Selection cleared");

        drop(state);
        self.notify_subscribers();
        true
    }

    /// Snapshot of the active selection
    pub fn current(&self) -> Option<Arc<Selection>> {
        self.state.read().selection.clone()
    }

    /// Whether `chart_id` owns the active selection
    pub fn is_owner(&self, chart_id: &str) -> bool {
        self.state
            .read()
            .selection
            .as_ref()
            .map_or(false, |s| s.owner_id == chart_id)
    }

    /// Counter bumped on every change; lets views detect a new selection
    /// between frames without comparing rows.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Register a view with sync settings. Bumps the generation so cached
    /// renders pick up the new settings.
    pub fn register_view(&self, chart_id: impl Into<ChartId>, settings: ViewSyncSettings) {
        self.view_settings.write().insert(chart_id.into(), settings);
        self.state.write().generation += 1;
    }

    /// Unregister a view. A selection it owns is cleared with it.
    pub fn unregister_view(&self, chart_id: &str) {
        if self.view_settings.write().remove(chart_id).is_some() {
            self.state.write().generation += 1;
        }
        if self.is_owner(chart_id) {
            self.clear();
        }
    }

    /// Check if a view should filter by foreign selections
    pub fn should_sync_selection(&self, chart_id: &str) -> bool {
        self.view_settings
            .read()
            .get(chart_id)
            .map(|s| s.sync_selection)
            .unwrap_or(true)
    }

    /// Add a subscriber. The hub only keeps a weak reference.
    pub fn add_subscriber(&self, subscriber: Arc<dyn SelectionSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    fn notify_subscribers(&self) {
        let selection = self.current();
        let mut subscribers = self.subscribers.write();

        // Remove any dead weak references
        subscribers.retain(|weak| weak.strong_count() > 0);

        for weak in subscribers.iter() {
            if let Some(subscriber) = weak.upgrade() {
                subscriber.on_selection_change(selection.as_deref());
            }
        }
    }
}

impl Default for SelectionHub {
    fn default() -> Self {
        Self::new()
    }
}
