use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument, warn};

use super::{
    ensure_id, Collection, DeleteResult, Document, DocumentStore, Filter, FindQuery,
    InsertOneResult, Update, UpdateResult, WriteMode, ID_FIELD,
};
use crate::shared::AppError;

type Collections = HashMap<Collection, Vec<Document>>;

/// In-memory implementation of DocumentStore for development and testing
///
/// Documents keep insertion order within a collection. Data is lost when
/// the application restarts.
pub struct InMemoryDocumentStore {
    collections: Mutex<Collections>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the number of documents in a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.lock()
            .map(|c| c.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, AppError> {
        self.collections.lock().map_err(|_| {
            warn!("In-memory document store lock poisoned");
            AppError::Internal
        })
    }
}

fn has_id(document: &Document, id: &str) -> bool {
    document.get(ID_FIELD).and_then(|v| v.as_str()) == Some(id)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[instrument(skip(self, document))]
    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOneResult, AppError> {
        let id = ensure_id(&mut document);
        debug!(collection = %collection, id = %id, "Inserting document in memory");

        let mut collections = self.lock()?;
        let documents = collections.entry(collection).or_default();
        if documents.iter().any(|d| has_id(d, &id)) {
            warn!(collection = %collection, id = %id, "Document already exists in memory");
            return Err(AppError::DatabaseError(format!(
                "Duplicate key {} in {}",
                id, collection
            )));
        }
        documents.push(document);

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, AppError> {
        let collections = self.lock()?;
        let document = collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)))
            .cloned();

        match &document {
            Some(_) => debug!(collection = %collection, id = %id, "Document found in memory"),
            None => debug!(collection = %collection, id = %id, "Document not found in memory"),
        }

        Ok(document)
    }

    #[instrument(skip(self, filter))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, AppError> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    #[instrument(skip(self, query))]
    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Document>, AppError> {
        let collections = self.lock()?;
        let documents = collections
            .get(&collection)
            .map(|docs| query.apply(docs.iter().cloned()))
            .unwrap_or_default();

        debug!(collection = %collection, count = documents.len(), "Documents listed from memory");
        Ok(documents)
    }

    #[instrument(skip(self, update))]
    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        update: &Update,
        mode: WriteMode,
    ) -> Result<UpdateResult, AppError> {
        let mut collections = self.lock()?;
        let documents = collections.entry(collection).or_default();

        if let Some(document) = documents.iter_mut().find(|d| has_id(d, id)) {
            let modified = update.apply(document);
            debug!(collection = %collection, id = %id, modified, "Document updated in memory");
            return Ok(UpdateResult::matched(modified));
        }

        match mode {
            WriteMode::UpdateExisting => {
                debug!(collection = %collection, id = %id, "No document matched update");
                Ok(UpdateResult::unmatched())
            }
            WriteMode::Upsert => {
                documents.push(update.to_upserted(id));
                debug!(collection = %collection, id = %id, "Document upserted in memory");
                Ok(UpdateResult::upserted(id))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_one(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<DeleteResult, AppError> {
        let mut collections = self.lock()?;
        let deleted_count = match collections.get_mut(&collection) {
            Some(documents) => {
                let before = documents.len();
                if let Some(position) = documents.iter().position(|d| has_id(d, id)) {
                    documents.remove(position);
                }
                (before - documents.len()) as u64
            }
            None => 0,
        };

        debug!(collection = %collection, id = %id, deleted_count, "Delete applied in memory");
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_find_by_id() {
        let store = InMemoryDocumentStore::new();

        let result = store
            .insert_one(Collection::Pets, doc(json!({"name": "Max"})))
            .await
            .unwrap();
        assert!(result.acknowledged);
        assert!(!result.inserted_id.is_empty());

        let found = store
            .find_by_id(Collection::Pets, &result.inserted_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("name"), Some(&json!("Max")));
        assert_eq!(store.count(Collection::Pets), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Users, doc(json!({"_id": "u1"})))
            .await
            .unwrap();

        let result = store
            .insert_one(Collection::Users, doc(json!({"_id": "u1"})))
            .await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Pets, doc(json!({"_id": "same"})))
            .await
            .unwrap();

        assert!(store
            .find_by_id(Collection::Payments, "same")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_update_existing_does_not_create() {
        let store = InMemoryDocumentStore::new();
        let update = Update::new().set_field("role", "admin");

        let result = store
            .update_one(Collection::Users, "missing", &update, WriteMode::UpdateExisting)
            .await
            .unwrap();

        assert_eq!(result, UpdateResult::unmatched());
        assert_eq!(store.count(Collection::Users), 0);
    }

    #[tokio::test]
    async fn test_upsert_creates_stub_then_updates_in_place() {
        let store = InMemoryDocumentStore::new();
        let update = Update::new().inc("donatedAmount", 10.0);

        let first = store
            .update_one(Collection::DonationCampaigns, "c1", &update, WriteMode::Upsert)
            .await
            .unwrap();
        assert_eq!(first.upserted_id.as_deref(), Some("c1"));

        let second = store
            .update_one(Collection::DonationCampaigns, "c1", &update, WriteMode::Upsert)
            .await
            .unwrap();
        assert_eq!(second, UpdateResult::matched(true));

        let stored = store
            .find_by_id(Collection::DonationCampaigns, "c1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, doc(json!({"_id": "c1", "donatedAmount": 20})));
        assert_eq!(store.count(Collection::DonationCampaigns), 1);
    }

    #[tokio::test]
    async fn test_update_reports_unmodified_when_values_equal() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Pets, doc(json!({"_id": "p1", "adopted": true})))
            .await
            .unwrap();

        let result = store
            .update_one(
                Collection::Pets,
                "p1",
                &Update::new().set_field("adopted", true),
                WriteMode::Upsert,
            )
            .await
            .unwrap();

        assert_eq!(result, UpdateResult::matched(false));
    }

    #[tokio::test]
    async fn test_delete_reports_count() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one(Collection::Payments, doc(json!({"_id": "pay1"})))
            .await
            .unwrap();

        let removed = store.delete_one(Collection::Payments, "pay1").await.unwrap();
        assert_eq!(removed.deleted_count, 1);

        let missing = store.delete_one(Collection::Payments, "pay1").await.unwrap();
        assert_eq!(missing.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_find_with_filter_and_find_one() {
        let store = InMemoryDocumentStore::new();
        for (id, email) in [("a", "x@y.com"), ("b", "z@y.com"), ("c", "x@y.com")] {
            store
                .insert_one(Collection::Payments, doc(json!({"_id": id, "email": email})))
                .await
                .unwrap();
        }

        let filter = Filter::new().eq("email", "x@y.com");
        let found = store
            .find(Collection::Payments, &FindQuery::new(filter.clone()))
            .await
            .unwrap();
        assert_eq!(found.len(), 2);

        let first = store
            .find_one(Collection::Payments, &filter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.get(ID_FIELD), Some(&json!("a")));
    }
}
