// Public API - what other modules can use
pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;
pub use query::{Document, Filter, FindQuery, Update, ID_FIELD};

// Internal modules
mod memory;
mod postgres;
pub mod query;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::shared::AppError;

/// Named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Pets,
    Adoptions,
    DonationCampaigns,
    Payments,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Pets => "pets",
            Collection::Adoptions => "adoptions",
            Collection::DonationCampaigns => "donationCampaigns",
            Collection::Payments => "payments",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an update does when the id matches no document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Report zero matches and write nothing
    UpdateExisting,
    /// Create a document holding the id and the updated fields
    Upsert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            upserted_id: None,
        }
    }

    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: None,
        }
    }

    pub fn upserted(id: &str) -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Trait for document store operations
///
/// Every operation touches a single document or reads one collection.
/// Nothing here spans documents atomically.
#[async_trait]
pub trait DocumentStore {
    /// Inserts a document, assigning a fresh `_id` when it has none
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertOneResult, AppError>;

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, AppError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, AppError>;

    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Document>, AppError>;

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        update: &Update,
        mode: WriteMode,
    ) -> Result<UpdateResult, AppError>;

    async fn delete_one(&self, collection: Collection, id: &str)
        -> Result<DeleteResult, AppError>;
}

pub fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}

/// Makes sure the document carries a non-empty `_id` and returns it.
pub(crate) fn ensure_id(document: &mut Document) -> String {
    match document.get(ID_FIELD).and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            let id = new_document_id();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    }
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document, AppError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => {
            warn!(kind = ?other, "Value did not serialize to a document");
            Err(AppError::Internal)
        }
        Err(e) => {
            warn!(error = %e, "Failed to serialize document");
            Err(AppError::Internal)
        }
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| {
        warn!(error = %e, "Stored document does not match the expected shape");
        AppError::DatabaseError(format!("Malformed document: {}", e))
    })
}
