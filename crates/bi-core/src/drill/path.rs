//! Drill path configuration

use crate::chart::ChartKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One level of a drill path: the field to group by and how to draw it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillLevel {
    pub field: String,

    #[serde(default)]
    pub label: String,

    #[serde(default, rename = "chartType")]
    pub chart_kind: ChartKind,
}

impl DrillLevel {
    pub fn new(field: impl Into<String>, chart_kind: ChartKind) -> Self {
        Self {
            field: field.into(),
            label: String::new(),
            chart_kind,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Label for titles and breadcrumbs, falling back to the field name
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.field
        } else {
            &self.label
        }
    }
}

/// A single edit to a level
#[derive(Debug, Clone, PartialEq)]
pub enum LevelEdit {
    Field(String),
    Label(String),
    ChartKind(ChartKind),
}

/// Errors raised when saving a drill path
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DrillPathError {
    #[error("drill path has no levels")]
    Empty,

    #[error("level {0} has no field")]
    MissingField(usize),

    #[error("level {level} uses unknown column '{field}'")]
    UnknownField { level: usize, field: String },
}

/// Ordered drill levels configured for one chart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrillPath {
    levels: Vec<DrillLevel>,
}

impl DrillPath {
    /// A path with one blank bar level, the starting point of the editor
    pub fn new() -> Self {
        Self {
            levels: vec![DrillLevel::default()],
        }
    }

    pub fn from_levels(levels: Vec<DrillLevel>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[DrillLevel] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&DrillLevel> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Append a blank bar level
    pub fn add_level(&mut self) {
        self.levels.push(DrillLevel::default());
    }

    /// Remove a level. The last remaining level cannot be removed.
    pub fn remove_level(&mut self, index: usize) -> bool {
        if self.levels.len() <= 1 || index >= self.levels.len() {
            return false;
        }
        self.levels.remove(index);
        true
    }

    pub fn update_level(&mut self, index: usize, edit: LevelEdit) -> bool {
        let Some(level) = self.levels.get_mut(index) else {
            return false;
        };
        match edit {
            LevelEdit::Field(field) => level.field = field,
            LevelEdit::Label(label) => level.label = label,
            LevelEdit::ChartKind(kind) => level.chart_kind = kind,
        }
        true
    }

    /// Human readable path, e.g. `Region → By Category`
    pub fn summary(&self) -> String {
        self.levels
            .iter()
            .map(|l| {
                if !l.label.is_empty() {
                    l.label.as_str()
                } else if !l.field.is_empty() {
                    l.field.as_str()
                } else {
                    "?"
                }
            })
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// Check the path before saving. When `columns` is non-empty every field
    /// must be one of them.
    pub fn validate(&self, columns: &[String]) -> Result<(), DrillPathError> {
        if self.levels.is_empty() {
            return Err(DrillPathError::Empty);
        }
        for (idx, level) in self.levels.iter().enumerate() {
            if level.field.is_empty() {
                return Err(DrillPathError::MissingField(idx));
            }
            if !columns.is_empty() && !columns.iter().any(|c| c == &level.field) {
                return Err(DrillPathError::UnknownField {
                    level: idx,
                    field: level.field.clone(),
                });
            }
        }
        Ok(())
    }
}

impl From<Vec<DrillLevel>> for DrillPath {
    fn from(levels: Vec<DrillLevel>) -> Self {
        Self::from_levels(levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_path_has_one_blank_level() {
        let path = DrillPath::new();
        assert_eq!(path.len(), 1);
        assert_eq!(path.levels()[0].chart_kind, ChartKind::Bar);
        assert_eq!(path.summary(), "?");
    }

    #[test]
    fn test_editing_levels() {
        let mut path = DrillPath::new();
        path.update_level(0, LevelEdit::Field("region".into()));
        path.add_level();
        path.update_level(1, LevelEdit::Field("category".into()));
        path.update_level(1, LevelEdit::Label("By Category".into()));
        path.update_level(1, LevelEdit::ChartKind(ChartKind::Pie));

        assert_eq!(path.summary(), "region → By Category");
        assert_eq!(path.levels()[1].chart_kind, ChartKind::Pie);
        assert!(!path.update_level(5, LevelEdit::Label("x".into())));
    }

    #[test]
    fn test_last_level_cannot_be_removed() {
        let mut path = DrillPath::new();
        assert!(!path.remove_level(0));

        path.add_level();
        assert!(!path.remove_level(2));
        assert!(path.remove_level(0));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_validate() {
        let columns = vec!["region".to_string(), "category".to_string()];

        assert_eq!(DrillPath::new().validate(&columns), Err(DrillPathError::MissingField(0)));
        assert_eq!(DrillPath::default().validate(&columns), Err(DrillPathError::Empty));

        let path = DrillPath::from_levels(vec![
            DrillLevel::new("region", ChartKind::Bar),
            DrillLevel::new("city", ChartKind::Bar),
        ]);
        assert_eq!(
            path.validate(&columns),
            Err(DrillPathError::UnknownField { level: 1, field: "city".into() })
        );
        assert!(path.validate(&[]).is_ok());
    }

    #[test]
    fn test_serde_uses_chart_type_key() {
        let json = r#"[{"field":"region","label":"Region","chartType":"pie"},{"field":"category"}]"#;
        let path: DrillPath = serde_json::from_str(json).unwrap();

        assert_eq!(path.levels()[0].chart_kind, ChartKind::Pie);
        assert_eq!(path.levels()[1].chart_kind, ChartKind::Bar);
        assert_eq!(path.levels()[1].display_name(), "category");
    }
}
