use std::path::Path;
use std::sync::Arc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::sync::SelectionHub;

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Whether to use dark mode
    pub dark_mode: bool,

    /// Whether cross-filtered charts show a "Filtered" badge
    pub show_filter_badge: bool,

    /// Number of chart columns in the dashboard grid
    pub grid_columns: usize,

    /// Chart height in points
    pub chart_height: f32,

    /// Maximum rows to load from a data source
    pub max_rows: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            show_filter_badge: true,
            grid_columns: 3,
            chart_height: 350.0,
            max_rows: 100_000,
        }
    }
}

impl AppSettings {
    /// Load settings from a JSON file. A missing file yields the defaults;
    /// missing keys take their default values.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let settings: AppSettings = serde_json::from_str(&text)?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings.normalized())
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    fn normalized(mut self) -> Self {
        if self.grid_columns == 0 {
            tracing::warn!("grid_columns must be at least 1, using 1");
            self.grid_columns = 1;
        }
        self
    }
}

/// Shared state handed to every view of a dashboard
#[derive(Clone)]
pub struct DashboardState {
    /// Cross-chart brush selection
    pub hub: Arc<SelectionHub>,

    /// Application settings
    pub settings: Arc<RwLock<AppSettings>>,
}

impl DashboardState {
    /// Create a new dashboard state
    pub fn new(settings: AppSettings) -> Self {
        Self {
            hub: Arc::new(SelectionHub::new()),
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(AppSettings::default())
    }
}
