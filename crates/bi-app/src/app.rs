//! Application state and frame loop

use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{Context as _, Result};
use eframe::egui::{self, Context, RichText};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use bi_core::{
    AppSettings, DashboardLayout, DashboardState, DrillNavigator, SelectionSubscriber,
    ViewSyncSettings,
};
use bi_data::{CsvSource, DataError, DrillPathRepository, MemoryStore, RowSource};
use bi_ui::{
    apply_theme, icons, DashboardGrid, DrillPathEditor, DrillWindow, EditorOutcome,
    RepaintOnSelection, Theme,
};
use bi_views::{export_dashboard, import_widgets, ChartWidget, DashboardConfig};

use crate::builder::default_widgets;

type PendingLoad = Arc<Mutex<Option<Result<CsvSource, DataError>>>>;

/// Main application state
pub struct InsightBoardApp {
    /// Selection hub and settings shared by every chart
    state: DashboardState,

    settings_path: PathBuf,

    layout: DashboardLayout<ChartWidget>,

    grid: DashboardGrid,

    navigator: DrillNavigator,

    drill_window: DrillWindow,

    editor: Option<DrillPathEditor>,

    source: Option<CsvSource>,

    /// Result of a CSV load running on the runtime
    pending: PendingLoad,

    drill_paths: DrillPathRepository,

    /// Tokio runtime
    runtime: tokio::runtime::Runtime,

    /// Held so the hub's weak reference stays alive
    _repaint: Arc<dyn SelectionSubscriber>,

    status: Option<String>,

    egui_ctx: egui::Context,
}

impl InsightBoardApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: tokio::runtime::Runtime,
        settings: AppSettings,
        settings_path: PathBuf,
    ) -> Self {
        apply_theme(&cc.egui_ctx, &Theme::from_settings(&settings));

        let drill_window = DrillWindow::new().with_chart_height(settings.chart_height);
        let state = DashboardState::new(settings);
        let repaint: Arc<dyn SelectionSubscriber> = Arc::new(RepaintOnSelection::new(cc.egui_ctx.clone()));
        state.hub.add_subscriber(repaint.clone());

        Self {
            state,
            settings_path,
            layout: DashboardLayout::new(),
            grid: DashboardGrid::new(),
            navigator: DrillNavigator::new(),
            drill_window,
            editor: None,
            source: None,
            pending: Arc::new(Mutex::new(None)),
            drill_paths: DrillPathRepository::new(Arc::new(MemoryStore::new())),
            runtime,
            _repaint: repaint,
            status: None,
            egui_ctx: cc.egui_ctx.clone(),
        }
    }

    /// Load a CSV file in the background
    pub fn open_csv_file(&mut self, path: PathBuf) {
        info!("Opening CSV file: {:?}", path);

        let max_rows = self.state.settings.read().max_rows;
        let pending = self.pending.clone();
        let ctx = self.egui_ctx.clone();

        self.runtime.spawn(async move {
            let result = CsvSource::new(path, max_rows).await;
            *pending.lock() = Some(result);
            ctx.request_repaint();
        });
        self.status = Some("Loading…".to_string());
    }

    fn poll_pending_load(&mut self) {
        let Some(result) = self.pending.lock().take() else {
            return;
        };
        match result {
            Ok(source) => self.install_source(source),
            Err(e) => {
                error!("Failed to open CSV file: {}", e);
                self.status = Some(format!("Failed to open CSV file: {}", e));
            }
        }
    }

    /// Replace the dashboard with default charts over `source`
    fn install_source(&mut self, source: CsvSource) {
        let widgets = default_widgets(
            source.source_name(),
            source.shared_rows(),
            &source.numeric_columns(),
            &source.categorical_columns(),
        );
        info!("Loaded '{}' with {} rows, {} charts", source.source_name(), source.rows().len(), widgets.len());

        self.status = None;
        self.source = Some(source);
        self.replace_widgets(widgets, true);
    }

    /// Swap the pinned charts. With `restore_paths`, saved drill paths are
    /// loaded for each chart; otherwise each chart's own path is saved.
    fn replace_widgets(&mut self, widgets: Vec<ChartWidget>, restore_paths: bool) {
        let hub = &self.state.hub;
        hub.clear();
        for id in self.layout.ids() {
            hub.unregister_view(id);
        }
        self.layout.clear();
        self.navigator.close();
        self.editor = None;

        for mut widget in widgets {
            if restore_paths {
                match self.runtime.block_on(self.drill_paths.load(widget.id())) {
                    Ok(Some(path)) => widget.set_drill_path(path),
                    Ok(None) => {}
                    Err(e) => warn!("Could not load drill path for '{}': {}", widget.id(), e),
                }
            } else if widget.has_drill_path() {
                if let Err(e) = self.runtime.block_on(self.drill_paths.save(widget.id(), widget.drill_path())) {
                    warn!("Could not save drill path for '{}': {}", widget.id(), e);
                }
            }
            hub.register_view(widget.id(), ViewSyncSettings::default());
            self.layout.pin(widget);
        }
    }

    fn export_to(&self, path: &Path) -> Result<()> {
        let config = export_dashboard(&self.layout, &self.state.settings.read());
        write_dashboard(path, &config)?;
        info!("Exported {} charts to {}", config.items.len(), path.display());
        Ok(())
    }

    fn import_from(&mut self, path: &Path) -> Result<()> {
        let rows = self
            .source
            .as_ref()
            .map(CsvSource::shared_rows)
            .context("Load a dataset before importing a dashboard")?;
        let config = read_dashboard(path)?;

        if let Some(settings) = config.settings.clone() {
            self.apply_settings(settings);
        }
        let widgets = import_widgets(&config, rows);
        self.replace_widgets(widgets, false);
        Ok(())
    }

    fn apply_settings(&mut self, settings: AppSettings) {
        apply_theme(&self.egui_ctx, &Theme::from_settings(&settings));
        self.drill_window = DrillWindow::new().with_chart_height(settings.chart_height);
        *self.state.settings.write() = settings;
        self.save_settings();
    }

    fn save_settings(&self) {
        if let Err(e) = self.state.settings.read().save(&self.settings_path) {
            warn!("Could not save settings to {}: {}", self.settings_path.display(), e);
        }
    }

    fn column_names(&self) -> Vec<String> {
        self.source.as_ref().map(|s| s.column_names()).unwrap_or_default()
    }

    fn show_menu(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button(format!("{} Open CSV…", icons::FOLDER)).clicked() {
                        ui.close_menu();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("CSV Files", &["csv"])
                            .pick_file()
                        {
                            self.open_csv_file(path);
                        }
                    }

                    ui.separator();

                    if ui
                        .add_enabled(!self.layout.is_empty(), egui::Button::new(format!("{} Export dashboard…", icons::EXPORT)))
                        .clicked()
                    {
                        ui.close_menu();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Dashboard", &["json"])
                            .set_file_name("dashboard.json")
                            .save_file()
                        {
                            if let Err(e) = self.export_to(&path) {
                                error!("Export failed: {:#}", e);
                                self.status = Some(format!("Export failed: {:#}", e));
                            }
                        }
                    }

                    if ui.button(format!("{} Import dashboard…", icons::IMPORT)).clicked() {
                        ui.close_menu();
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Dashboard", &["json"])
                            .pick_file()
                        {
                            if let Err(e) = self.import_from(&path) {
                                error!("Import failed: {:#}", e);
                                self.status = Some(format!("Import failed: {:#}", e));
                            }
                        }
                    }
                });

                ui.menu_button(format!("{} View", icons::SETTINGS), |ui| {
                    let mut settings = self.state.settings.read().clone();
                    ui.checkbox(&mut settings.dark_mode, "Dark mode");
                    ui.checkbox(&mut settings.show_filter_badge, "Show \"Filtered\" badge");
                    ui.add(egui::Slider::new(&mut settings.grid_columns, 1..=4).text("Columns"));
                    ui.add(egui::Slider::new(&mut settings.chart_height, 200.0..=600.0).text("Chart height"));

                    if settings != *self.state.settings.read() {
                        for widget in self.layout.iter_mut() {
                            widget.invalidate();
                        }
                        self.apply_settings(settings);
                    }
                });
            });
        });
    }

    fn show_toolbar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("selection_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let selection = self.state.hub.current();
                let clear = ui.add_enabled(
                    selection.is_some(),
                    egui::Button::new(format!("{} Clear selection", icons::CLEAR)),
                );
                if clear.clicked() {
                    self.state.hub.clear();
                }

                match &selection {
                    Some(s) => {
                        let owner = self
                            .layout
                            .get(&s.owner_id)
                            .map(|w| w.config.title.clone())
                            .unwrap_or_else(|| s.owner_id.clone());
                        ui.label(format!("{} rows selected in {}", s.rows.len(), owner));
                    }
                    None => {
                        ui.label(RichText::new("Drag across a chart to filter the others").weak());
                    }
                }

                if let Some(source) = &self.source {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{} · {} rows", source.source_name(), source.rows().len()))
                                .weak(),
                        );
                    });
                }
            });
            if let Some(status) = &self.status {
                ui.label(RichText::new(status).color(bi_ui::theme::error_color()));
            }
        });
    }

    fn show_editor(&mut self, ctx: &Context) {
        let columns = self.column_names();
        let Some(editor) = self.editor.as_mut() else {
            return;
        };

        let mut open = true;
        let mut outcome = None;
        egui::Window::new("Drill path")
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                outcome = editor.show(ui, &columns);
            });

        let chart_id = editor.chart_id().to_string();
        match outcome {
            Some(EditorOutcome::Save(path)) => {
                match self.runtime.block_on(self.drill_paths.save(&chart_id, &path)) {
                    Ok(()) => {
                        if let Some(widget) = self.layout.get_mut(&chart_id) {
                            widget.set_drill_path(path);
                        }
                    }
                    Err(e) => {
                        error!("Could not save drill path: {}", e);
                        self.status = Some(format!("Could not save drill path: {}", e));
                    }
                }
                self.editor = None;
            }
            Some(EditorOutcome::Cancel) => self.editor = None,
            None if !open => self.editor = None,
            None => {}
        }
    }

    fn show_welcome_screen(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading("Insight Board");
            ui.label(RichText::new("Linked charts with brushing and drill-down").weak());
            ui.add_space(16.0);
            if ui.button(format!("{} Open CSV…", icons::FOLDER)).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV Files", &["csv"])
                    .pick_file()
                {
                    self.open_csv_file(path);
                }
            }
        });
    }
}

impl eframe::App for InsightBoardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_pending_load();

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            if self.navigator.is_open() {
                self.navigator.close();
            } else {
                self.state.hub.clear();
            }
        }

        self.show_menu(ctx);
        self.show_toolbar(ctx);

        let settings = self.state.settings.read().clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.source.is_none() && self.layout.is_empty() {
                self.show_welcome_screen(ui);
                return;
            }

            let response = self.grid.show(ui, &mut self.layout, &self.state.hub, &settings);
            if let Some(request) = response.drill {
                self.navigator.open(request);
            }
            if let Some(chart_id) = response.edit_drill_path {
                if let Some(widget) = self.layout.get(&chart_id) {
                    self.editor = Some(DrillPathEditor::new(chart_id.clone(), widget.drill_path()));
                }
            }
            for widget in response.unpinned {
                if let Err(e) = self.runtime.block_on(self.drill_paths.remove(widget.id())) {
                    warn!("Could not remove drill path for '{}': {}", widget.id(), e);
                }
            }
        });

        self.drill_window.show(ctx, &mut self.navigator);
        self.show_editor(ctx);
    }
}

/// Write a dashboard export as pretty JSON
pub fn write_dashboard(path: &Path, config: &DashboardConfig) -> Result<()> {
    let text = config.to_json_pretty()?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read a dashboard export
pub fn read_dashboard(path: &Path) -> Result<DashboardConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config = DashboardConfig::from_json(&text)
        .with_context(|| format!("{} is not a dashboard export", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bi_core::{row, ChartKind, DrillLevel, DrillPath};
    use bi_views::WidgetConfig;

    #[test]
    fn test_dashboard_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");

        let rows = Arc::new(vec![row! { "region" => "East", "sales" => 1 }]);
        let mut widget = ChartWidget::new(WidgetConfig::new("Sales", ChartKind::Area, "region"), rows);
        widget.set_drill_path(DrillPath::from_levels(vec![DrillLevel::new("region", ChartKind::Pie)]));
        let mut layout = DashboardLayout::new();
        layout.pin(widget);

        write_dashboard(&path, &export_dashboard(&layout, &AppSettings::default())).unwrap();
        let config = read_dashboard(&path).unwrap();

        assert_eq!(config.items.len(), 1);
        assert_eq!(config.items[0].config.kind, ChartKind::Area);
        assert_eq!(config.items[0].drill_path.len(), 1);
    }

    #[test]
    fn test_read_dashboard_reports_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = read_dashboard(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("not a dashboard export"));
        assert!(read_dashboard(&dir.path().join("missing.json")).is_err());
    }
}
