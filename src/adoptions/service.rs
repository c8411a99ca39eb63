use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::{AdoptionModel, AdoptionStatus},
    types::{AcceptAdoptionResponse, CreateAdoptionRequest},
};
use crate::shared::AppError;
use crate::store::{
    from_document, to_document, Collection, DeleteResult, DocumentStore, Filter, FindQuery,
    InsertOneResult, Update, UpdateResult, WriteMode,
};

/// Service for the adoption request lifecycle
pub struct AdoptionService {
    store: Arc<dyn DocumentStore + Send + Sync>,
}

impl AdoptionService {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, request), fields(pet_id = %request.pet_id))]
    pub async fn create_adoption(
        &self,
        request: CreateAdoptionRequest,
    ) -> Result<InsertOneResult, AppError> {
        request.validate()?;

        let adoption = AdoptionModel {
            id: String::new(),
            pet_id: request.pet_id,
            pet_name: request.pet_name,
            pet_image: request.pet_image,
            owner_email: request.owner_email,
            requester_name: request.requester_name,
            requester_email: request.requester_email,
            phone: request.phone,
            address: request.address,
            status: AdoptionStatus::Pending,
            requested_at: Some(Utc::now()),
        };

        let result = self
            .store
            .insert_one(Collection::Adoptions, to_document(&adoption)?)
            .await?;
        info!(adoption_id = %result.inserted_id, "Adoption request created");
        Ok(result)
    }

    /// Requests received for pets listed by `owner_email`, newest first
    #[instrument(skip(self))]
    pub async fn list_for_owner(&self, owner_email: &str) -> Result<Vec<AdoptionModel>, AppError> {
        let query =
            FindQuery::new(Filter::new().eq("ownerEmail", owner_email)).sort_desc("requestedAt");
        self.store
            .find(Collection::Adoptions, &query)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get_adoption(&self, adoption_id: &str) -> Result<Option<AdoptionModel>, AppError> {
        self.store
            .find_by_id(Collection::Adoptions, adoption_id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Accepts the request unless it is already accepted, in which case nothing is written
    #[instrument(skip(self))]
    pub async fn accept(&self, adoption_id: &str) -> Result<AcceptAdoptionResponse, AppError> {
        if let Some(adoption) = self.get_adoption(adoption_id).await? {
            if adoption.status == AdoptionStatus::Accepted {
                info!(adoption_id = %adoption_id, "Adoption already accepted");
                return Ok(AcceptAdoptionResponse::already_accepted());
            }
        }

        let result = self.set_status(adoption_id, AdoptionStatus::Accepted).await?;
        Ok(AcceptAdoptionResponse::Updated(result))
    }

    /// Rejects the request; repeated rejects rewrite the same status
    #[instrument(skip(self))]
    pub async fn reject(&self, adoption_id: &str) -> Result<UpdateResult, AppError> {
        self.set_status(adoption_id, AdoptionStatus::Rejected).await
    }

    #[instrument(skip(self))]
    pub async fn delete_adoption(&self, adoption_id: &str) -> Result<DeleteResult, AppError> {
        self.store
            .delete_one(Collection::Adoptions, adoption_id)
            .await
    }

    async fn set_status(
        &self,
        adoption_id: &str,
        status: AdoptionStatus,
    ) -> Result<UpdateResult, AppError> {
        let update = Update::new().set_field("status", status.as_str());
        let result = self
            .store
            .update_one(Collection::Adoptions, adoption_id, &update, WriteMode::Upsert)
            .await?;

        info!(
            adoption_id = %adoption_id,
            status = status.as_str(),
            upserted = result.upserted_id.is_some(),
            "Adoption status written"
        );
        Ok(result)
    }
}
