use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use crate::services::store::{Collection, DocumentStore, Filter, StoreError, StoredDocument};

/// In-process document store
///
/// Documents live only as long as the process. Used for local development
/// and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<StoredDocument>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(
        &self,
        collection: Collection,
        mut document: Map<String, Value>,
    ) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        document.remove("_id");

        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(StoredDocument {
            id: id.clone(),
            data: document,
        });

        tracing::debug!("Inserted document {} into {}", id, collection);
        Ok(id)
    }

    async fn query(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(documents)
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(collection, _)| collection.as_str().to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::to_document;
    use serde_json::json;

    #[test]
    fn test_insert_then_query_in_order() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();

            let first = store
                .insert(Collection::Vacancy, to_document(&json!({"subject": "Math"})).unwrap())
                .await
                .unwrap();
            let second = store
                .insert(Collection::Vacancy, to_document(&json!({"subject": "Bio"})).unwrap())
                .await
                .unwrap();
            assert_ne!(first, second);

            let docs = store.query(Collection::Vacancy, &Filter::new()).await.unwrap();
            let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
            assert_eq!(ids, vec![first.as_str(), second.as_str()]);
        });
    }

    #[test]
    fn test_query_filters_and_isolates_collections() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store
                .insert(Collection::Reward, to_document(&json!({"student_id": "s1", "points": 5})).unwrap())
                .await
                .unwrap();
            store
                .insert(Collection::Reward, to_document(&json!({"student_id": "s2", "points": 7})).unwrap())
                .await
                .unwrap();

            let docs = store
                .query(Collection::Reward, &Filter::new().eq("student_id", "s2"))
                .await
                .unwrap();
            assert_eq!(docs.len(), 1);
            assert_eq!(docs[0].data["points"], json!(7));

            let other = store.query(Collection::Tutor, &Filter::new()).await.unwrap();
            assert!(other.is_empty());

            assert_eq!(store.list_collections().await.unwrap(), vec!["reward".to_string()]);
        });
    }
}
