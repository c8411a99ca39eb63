use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgRow, PgPool, Postgres, Row, Transaction};
use tracing::{debug, info, instrument, warn};

use super::{
    ensure_id, Collection, DeleteResult, Document, DocumentStore, Filter, FindQuery,
    InsertOneResult, Update, UpdateResult, WriteMode,
};
use crate::shared::AppError;

const CREATE_DOCUMENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (collection, id)
)";

/// PostgreSQL implementation of the document store
///
/// All collections share one `documents` table keyed by (collection, id)
/// with the document held as JSONB. Filters and ordering run in process
/// over the collection's rows.
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database and makes sure the documents table exists
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await.map_err(|e| {
            warn!(error = %e, "Failed to connect to database");
            AppError::DatabaseError(e.to_string())
        })?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    #[instrument(skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_DOCUMENTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        info!("Document table ready");
        Ok(())
    }

    async fn load_collection(&self, collection: Collection) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter().map(body_of).collect()
    }
}

fn db_error(e: sqlx::Error) -> AppError {
    warn!(error = %e, "Document store query failed");
    AppError::DatabaseError(e.to_string())
}

fn body_of(row: &PgRow) -> Result<Document, AppError> {
    match row.try_get::<Value, _>("body").map_err(db_error)? {
        Value::Object(document) => Ok(document),
        other => {
            warn!(kind = ?other, "Stored body is not a JSON object");
            Err(AppError::DatabaseError(
                "Stored body is not a document".to_string(),
            ))
        }
    }
}

async fn lock_row(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
    id: &str,
) -> Result<Option<Document>, AppError> {
    let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE")
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_error)?;

    row.as_ref().map(body_of).transpose()
}

/// Applies `update` to a row already locked by `lock_row` and writes it back when it changed.
async fn apply_locked(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
    id: &str,
    update: &Update,
    mut document: Document,
) -> Result<UpdateResult, AppError> {
    let modified = update.apply(&mut document);
    if modified {
        sqlx::query("UPDATE documents SET body = $3 WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .bind(Value::Object(document))
            .execute(&mut **tx)
            .await
            .map_err(db_error)?;
    }
    Ok(UpdateResult::matched(modified))
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, document))]
    async fn insert_one(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertOneResult, AppError> {
        let id = ensure_id(&mut document);
        debug!(collection = %collection, id = %id, "Inserting document in database");

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection.as_str())
            .bind(&id)
            .bind(Value::Object(document))
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

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
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        match row {
            Some(row) => {
                debug!(collection = %collection, id = %id, "Document found in database");
                body_of(&row).map(Some)
            }
            None => {
                debug!(collection = %collection, id = %id, "Document not found in database");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, filter))]
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, AppError> {
        let documents = self.load_collection(collection).await?;
        Ok(documents.into_iter().find(|d| filter.matches(d)))
    }

    #[instrument(skip(self, query))]
    async fn find(
        &self,
        collection: Collection,
        query: &FindQuery,
    ) -> Result<Vec<Document>, AppError> {
        let documents = self.load_collection(collection).await?;
        let matched = query.apply(documents);
        debug!(collection = %collection, count = matched.len(), "Documents listed from database");
        Ok(matched)
    }

    /// Read-modify-write under a row lock, so updates to one document serialize.
    ///
    /// A missing row cannot be locked, so two upserts of the same new id can
    /// both reach the insert. The loser of that race re-reads the winner's row
    /// under lock and applies its update on top.
    #[instrument(skip(self, update))]
    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        update: &Update,
        mode: WriteMode,
    ) -> Result<UpdateResult, AppError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = match (lock_row(&mut tx, collection, id).await?, mode) {
            (Some(document), _) => apply_locked(&mut tx, collection, id, update, document).await?,
            (None, WriteMode::UpdateExisting) => UpdateResult::unmatched(),
            (None, WriteMode::Upsert) => {
                let inserted = sqlx::query(
                    "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3) ON CONFLICT (collection, id) DO NOTHING",
                )
                .bind(collection.as_str())
                .bind(id)
                .bind(Value::Object(update.to_upserted(id)))
                .execute(&mut *tx)
                .await
                .map_err(db_error)?
                .rows_affected();

                if inserted == 1 {
                    UpdateResult::upserted(id)
                } else {
                    debug!(collection = %collection, id = %id, "Concurrent insert won, updating its row");
                    match lock_row(&mut tx, collection, id).await? {
                        Some(document) => {
                            apply_locked(&mut tx, collection, id, update, document).await?
                        }
                        None => {
                            warn!(collection = %collection, id = %id, "Conflicting row vanished during upsert");
                            return Err(AppError::DatabaseError(format!(
                                "Upsert conflict on {} in {}",
                                id, collection
                            )));
                        }
                    }
                }
            }
        };

        tx.commit().await.map_err(db_error)?;

        debug!(
            collection = %collection,
            id = %id,
            matched = result.matched_count,
            modified = result.modified_count,
            upserted = result.upserted_id.is_some(),
            "Update applied in database"
        );
        Ok(result)
    }

    #[instrument(skip(self))]
    async fn delete_one(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<DeleteResult, AppError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }
}
