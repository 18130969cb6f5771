//! Per-chart drill path persistence

use std::sync::Arc;
use bi_core::DrillPath;
use serde_json::Value as Json;
use super::{record_id, EntityStore, Record};
use crate::DataError;

const ENTITY: &str = "ChartDrillPath";

/// Loads and saves the drill path configured for each chart
#[derive(Clone)]
pub struct DrillPathRepository {
    store: Arc<dyn EntityStore>,
}

impl DrillPathRepository {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    fn query(chart_id: &str) -> Record {
        let mut query = Record::new();
        query.insert("chart_id".to_string(), Json::String(chart_id.to_string()));
        query
    }

    async fn find(&self, chart_id: &str) -> Result<Option<Record>, DataError> {
        Ok(self.store.filter(ENTITY, &Self::query(chart_id)).await?.into_iter().next())
    }

    /// Drill path saved for `chart_id`, if any
    pub async fn load(&self, chart_id: &str) -> Result<Option<DrillPath>, DataError> {
        let Some(record) = self.find(chart_id).await? else {
            return Ok(None);
        };
        let levels = record.get("levels").cloned().unwrap_or(Json::Array(Vec::new()));
        Ok(Some(serde_json::from_value(levels)?))
    }

    /// Insert or replace the drill path of `chart_id`
    pub async fn save(&self, chart_id: &str, path: &DrillPath) -> Result<(), DataError> {
        let levels = serde_json::to_value(path)?;

        match self.find(chart_id).await? {
            Some(existing) => {
                let id = record_id(&existing)
                    .ok_or_else(|| DataError::Store(format!("{} record without id", ENTITY)))?
                    .to_string();
                let mut patch = Record::new();
                patch.insert("levels".to_string(), levels);
                self.store.update(ENTITY, &id, patch).await?;
            }
            None => {
                let mut record = Self::query(chart_id);
                record.insert("levels".to_string(), levels);
                self.store.create(ENTITY, record).await?;
            }
        }

        tracing::info!("Saved {}-level drill path for chart '{}'", path.len(), chart_id);
        Ok(())
    }

    /// Forget the drill path of `chart_id`. Returns whether one existed.
    pub async fn remove(&self, chart_id: &str) -> Result<bool, DataError> {
        let Some(existing) = self.find(chart_id).await? else {
            return Ok(false);
        };
        if let Some(id) = record_id(&existing) {
            self.store.delete(ENTITY, id).await?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use bi_core::{ChartKind, DrillLevel};

    fn repository() -> DrillPathRepository {
        DrillPathRepository::new(Arc::new(MemoryStore::new()))
    }

    fn path() -> DrillPath {
        DrillPath::from_levels(vec![
            DrillLevel::new("region", ChartKind::Bar).with_label("Region"),
            DrillLevel::new("category", ChartKind::Pie),
        ])
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        assert!(repository().load("chart-a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let repo = repository();
        repo.save("chart-a", &path()).await.unwrap();

        assert_eq!(repo.load("chart-a").await.unwrap(), Some(path()));
        assert!(repo.load("chart-b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_is_an_upsert() {
        let store = Arc::new(MemoryStore::new());
        let repo = DrillPathRepository::new(store.clone());
        repo.save("chart-a", &path()).await.unwrap();

        let shorter = DrillPath::from_levels(vec![DrillLevel::new("region", ChartKind::Line)]);
        repo.save("chart-a", &shorter).await.unwrap();

        assert_eq!(store.list(ENTITY).await.unwrap().len(), 1);
        assert_eq!(repo.load("chart-a").await.unwrap(), Some(shorter));
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = repository();
        repo.save("chart-a", &path()).await.unwrap();

        assert!(repo.remove("chart-a").await.unwrap());
        assert!(!repo.remove("chart-a").await.unwrap());
        assert!(repo.load("chart-a").await.unwrap().is_none());
    }
}
