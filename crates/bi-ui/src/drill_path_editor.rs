//! Drill path editor
//!
//! Edits a draft copy of a chart's drill path. The chart keeps its current
//! path until the draft validates and is saved.

use bi_core::{ChartId, ChartKind, DrillPath, LevelEdit};
use egui::{ComboBox, Grid, RichText, Ui};
use crate::theme;
use crate::widget_utils::{GridExt, WidgetId};

/// Result of an editing session
#[derive(Debug, Clone, PartialEq)]
pub enum EditorOutcome {
    Save(DrillPath),
    Cancel,
}

pub struct DrillPathEditor {
    chart_id: ChartId,
    draft: DrillPath,
    error: Option<String>,
}

impl DrillPathEditor {
    /// Start editing `path`; an unconfigured chart starts with one blank level
    pub fn new(chart_id: impl Into<ChartId>, path: &DrillPath) -> Self {
        let draft = if path.is_empty() { DrillPath::new() } else { path.clone() };
        Self {
            chart_id: chart_id.into(),
            draft,
            error: None,
        }
    }

    pub fn chart_id(&self) -> &str {
        &self.chart_id
    }

    pub fn draft(&self) -> &DrillPath {
        &self.draft
    }

    pub fn add_level(&mut self) {
        self.draft.add_level();
    }

    pub fn remove_level(&mut self, index: usize) -> bool {
        self.draft.remove_level(index)
    }

    pub fn edit_level(&mut self, index: usize, edit: LevelEdit) -> bool {
        self.error = None;
        self.draft.update_level(index, edit)
    }

    /// Validate the draft against `columns`; on success the draft is the
    /// path to save.
    pub fn try_save(&mut self, columns: &[String]) -> Option<DrillPath> {
        match self.draft.validate(columns) {
            Ok(()) => {
                self.error = None;
                Some(self.draft.clone())
            }
            Err(e) => {
                tracing::warn!("Drill path for chart '{}' rejected: {}", self.chart_id, e);
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the draft is valid for `columns` and may be saved
    pub fn can_save(&self, columns: &[String]) -> bool {
        self.draft.validate(columns).is_ok()
    }

    /// Draw the editor. `columns` are the fields a level may group by.
    pub fn show(&mut self, ui: &mut Ui, columns: &[String]) -> Option<EditorOutcome> {
        let mut outcome = None;
        let mut edits: Vec<(usize, LevelEdit)> = Vec::new();
        let mut remove = None;
        let can_remove = self.draft.len() > 1;

        ui.label(RichText::new("Levels are visited top to bottom").weak());

        Grid::new_with_id(WidgetId::new("drill_editor").with(&self.chart_id))
            .num_columns(5)
            .striped(true)
            .show(ui, |ui| {
                for (idx, level) in self.draft.levels().iter().enumerate() {
                    ui.label(format!("Level {}", idx + 1));

                    let mut field = level.field.clone();
                    let field_text = if field.is_empty() {
                        "Select field".to_string()
                    } else {
                        field.clone()
                    };
                    ComboBox::from_id_source(WidgetId::new("drill_field").with(&self.chart_id).index(idx).id())
                        .selected_text(field_text)
                        .show_ui(ui, |ui| {
                            for column in columns {
                                ui.selectable_value(&mut field, column.clone(), column.as_str());
                            }
                        });
                    if field != level.field {
                        edits.push((idx, LevelEdit::Field(field)));
                    }

                    let mut label = level.label.clone();
                    if ui
                        .add(egui::TextEdit::singleline(&mut label).hint_text("Label").desired_width(120.0))
                        .changed()
                    {
                        edits.push((idx, LevelEdit::Label(label)));
                    }

                    let mut kind = level.chart_kind;
                    ComboBox::from_id_source(WidgetId::new("drill_kind").with(&self.chart_id).index(idx).id())
                        .selected_text(kind.label())
                        .show_ui(ui, |ui| {
                            for option in ChartKind::ALL {
                                ui.selectable_value(&mut kind, option, option.label());
                            }
                        });
                    if kind != level.chart_kind {
                        edits.push((idx, LevelEdit::ChartKind(kind)));
                    }

                    if ui.add_enabled(can_remove, egui::Button::new("✕")).clicked() {
                        remove = Some(idx);
                    }
                    ui.end_row();
                }
            });

        for (idx, edit) in edits {
            self.edit_level(idx, edit);
        }
        if let Some(idx) = remove {
            self.remove_level(idx);
        }

        if ui.button("+ Add level").clicked() {
            self.add_level();
        }

        ui.label(RichText::new(format!("Path: {}", self.draft.summary())).small());
        let validation = self.draft.validate(columns);
        if let Err(e) = &validation {
            ui.label(RichText::new(e.to_string()).color(theme::error_color()));
        }

        ui.separator();
        ui.horizontal(|ui| {
            if ui.add_enabled(validation.is_ok(), egui::Button::new("Save")).clicked() {
                if let Some(path) = self.try_save(columns) {
                    outcome = Some(EditorOutcome::Save(path));
                }
            }
            if ui.button("Cancel").clicked() {
                outcome = Some(EditorOutcome::Cancel);
            }
        });

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bi_core::DrillLevel;

    fn columns() -> Vec<String> {
        vec!["region".to_string(), "category".to_string()]
    }

    #[test]
    fn test_new_editor_starts_with_one_blank_level() {
        let editor = DrillPathEditor::new("chart", &DrillPath::default());
        assert_eq!(editor.draft().len(), 1);
        assert_eq!(editor.chart_id(), "chart");
    }

    #[test]
    fn test_blank_field_is_rejected_until_set() {
        let mut editor = DrillPathEditor::new("chart", &DrillPath::default());
        assert!(editor.try_save(&columns()).is_none());
        assert!(editor.error().is_some());

        editor.edit_level(0, LevelEdit::Field("region".into()));
        assert!(editor.error().is_none());

        let saved = editor.try_save(&columns()).unwrap();
        assert_eq!(saved.levels()[0].field, "region");
    }

    #[test]
    fn test_editing_does_not_touch_original() {
        let original = DrillPath::from_levels(vec![DrillLevel::new("region", ChartKind::Bar)]);
        let mut editor = DrillPathEditor::new("chart", &original);

        editor.add_level();
        editor.edit_level(1, LevelEdit::Field("category".into()));
        editor.edit_level(1, LevelEdit::ChartKind(ChartKind::Pie));

        assert_eq!(original.len(), 1);
        assert_eq!(editor.draft().summary(), "region → category");
        assert!(editor.remove_level(0));
        assert!(!editor.remove_level(0));
    }

    #[test]
    fn test_save_offered_only_for_valid_draft() {
        let mut editor = DrillPathEditor::new("chart", &DrillPath::default());
        assert!(!editor.can_save(&columns()));

        editor.edit_level(0, LevelEdit::Field("category".into()));
        assert!(editor.can_save(&columns()));

        editor.add_level();
        assert!(!editor.can_save(&columns()));
        assert!(editor.remove_level(1));
        assert!(editor.can_save(&columns()));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let path = DrillPath::from_levels(vec![DrillLevel::new("city", ChartKind::Bar)]);
        let mut editor = DrillPathEditor::new("chart", &path);
        assert!(editor.try_save(&columns()).is_none());
        assert!(editor.error().unwrap().contains("city"));
    }
}
