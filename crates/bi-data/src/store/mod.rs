//! Entity store collaborator
//!
//! Persistence is delegated to an external CRUD service. [`EntityStore`] is
//! the slice of that service the dashboard needs; [`MemoryStore`] backs it
//! in memory for offline use and tests.

mod drill_paths;

pub use drill_paths::DrillPathRepository;

use ahash::AHashMap;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value as Json;
use crate::DataError;

/// A stored record: a JSON object carrying a string `id`
pub type Record = serde_json::Map<String, Json>;

/// Generic CRUD access to named entity collections
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// All records of an entity
    async fn list(&self, entity: &str) -> Result<Vec<Record>, DataError>;

    /// Records whose fields equal every field of `query`
    async fn filter(&self, entity: &str, query: &Record) -> Result<Vec<Record>, DataError>;

    /// Store a new record; an `id` is assigned when missing
    async fn create(&self, entity: &str, record: Record) -> Result<Record, DataError>;

    /// Merge `patch` into the record with `id`
    async fn update(&self, entity: &str, id: &str, patch: Record) -> Result<Record, DataError>;

    async fn delete(&self, entity: &str, id: &str) -> Result<(), DataError>;
}

/// Id of a record, if it has one
pub fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Json::as_str)
}

/// In-memory entity store
#[derive(Default)]
pub struct MemoryStore {
    entities: RwLock<AHashMap<String, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list(&self, entity: &str) -> Result<Vec<Record>, DataError> {
        Ok(self.entities.read().get(entity).cloned().unwrap_or_default())
    }

    async fn filter(&self, entity: &str, query: &Record) -> Result<Vec<Record>, DataError> {
        let entities = self.entities.read();
        let Some(records) = entities.get(entity) else {
            return Ok(Vec::new());
        };
        Ok(records
            .iter()
            .filter(|record| query.iter().all(|(k, v)| record.get(k) == Some(v)))
            .cloned()
            .collect())
    }

    async fn create(&self, entity: &str, mut record: Record) -> Result<Record, DataError> {
        if record_id(&record).is_none() {
            record.insert("id".to_string(), Json::String(uuid::Uuid::new_v4().to_string()));
        }

        let mut entities = self.entities.write();
        let records = entities.entry(entity.to_string()).or_default();
        if let Some(id) = record_id(&record) {
            if records.iter().any(|r| record_id(r) == Some(id)) {
                return Err(DataError::Store(format!("{} '{}' already exists", entity, id)));
            }
        }
        records.push(record.clone());

        tracing::debug!("Created {} record", entity);
        Ok(record)
    }

    async fn update(&self, entity: &str, id: &str, patch: Record) -> Result<Record, DataError> {
        let mut entities = self.entities.write();
        let record = entities
            .get_mut(entity)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| DataError::Store(format!("{} '{}' not found", entity, id)))?;

        for (key, value) in patch {
            if key != "id" {
                record.insert(key, value);
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, entity: &str, id: &str) -> Result<(), DataError> {
        let mut entities = self.entities.write();
        let records = entities
            .get_mut(entity)
            .ok_or_else(|| DataError::Store(format!("{} '{}' not found", entity, id)))?;

        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Err(DataError::Store(format!("{} '{}' not found", entity, id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Json) -> Record {
        match value {
            Json::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let store = MemoryStore::new();
        let created = store.create("Report", record(json!({ "name": "weekly" }))).await.unwrap();

        assert!(record_id(&created).is_some());
        assert_eq!(store.list("Report").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        store.create("Report", record(json!({ "id": "r1" }))).await.unwrap();
        let result = store.create("Report", record(json!({ "id": "r1" }))).await;

        assert!(matches!(result, Err(DataError::Store(_))));
    }

    #[tokio::test]
    async fn test_filter_matches_all_query_fields() {
        let store = MemoryStore::new();
        store.create("Chart", record(json!({ "owner": "a", "kind": "bar" }))).await.unwrap();
        store.create("Chart", record(json!({ "owner": "a", "kind": "pie" }))).await.unwrap();
        store.create("Chart", record(json!({ "owner": "b", "kind": "bar" }))).await.unwrap();

        let found = store
            .filter("Chart", &record(json!({ "owner": "a", "kind": "bar" })))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(store.filter("Missing", &Record::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_id() {
        let store = MemoryStore::new();
        store.create("Chart", record(json!({ "id": "c1", "kind": "bar" }))).await.unwrap();

        let updated = store
            .update("Chart", "c1", record(json!({ "id": "other", "kind": "pie", "title": "T" })))
            .await
            .unwrap();
        assert_eq!(updated["id"], "c1");
        assert_eq!(updated["kind"], "pie");
        assert_eq!(updated["title"], "T");

        assert!(store.update("Chart", "nope", Record::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        store.create("Chart", record(json!({ "id": "c1" }))).await.unwrap();

        store.delete("Chart", "c1").await.unwrap();
        assert!(store.list("Chart").await.unwrap().is_empty());
        assert!(store.delete("Chart", "c1").await.is_err());
    }
}
