use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::PetModel,
    types::{CreatePetRequest, PetListQuery, UpdatePetRequest},
};
use crate::shared::AppError;
use crate::store::{
    from_document, to_document, Collection, DeleteResult, DocumentStore, Filter, FindQuery,
    InsertOneResult, Update, UpdateResult, WriteMode,
};

const RECENCY_FIELD: &str = "addedAt";

/// Service for handling pet listing business logic
pub struct PetService {
    store: Arc<dyn DocumentStore + Send + Sync>,
}

impl PetService {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Lists pets matching the optional filters, most recently added first
    #[instrument(skip(self))]
    pub async fn list_pets(&self, query: &PetListQuery) -> Result<Vec<PetModel>, AppError> {
        let mut filter = Filter::new();
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            filter = filter.contains_ignore_case("name", search.trim());
        }
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            filter = filter.eq("category", category);
        }
        if let Some(adopted) = query.adopted {
            filter = filter.eq("adopted", adopted);
        }

        let pets = self
            .find(&FindQuery::new(filter).sort_desc(RECENCY_FIELD))
            .await?;
        debug!(pet_count = pets.len(), "Pets listed");
        Ok(pets)
    }

    /// Every pet, unfiltered, most recently added first
    #[instrument(skip(self))]
    pub async fn all_pets(&self) -> Result<Vec<PetModel>, AppError> {
        self.find(&FindQuery::all().sort_desc(RECENCY_FIELD)).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_owner(&self, owner_email: &str) -> Result<Vec<PetModel>, AppError> {
        self.find(
            &FindQuery::new(Filter::new().eq("ownerEmail", owner_email)).sort_desc(RECENCY_FIELD),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_pet(&self, pet_id: &str) -> Result<Option<PetModel>, AppError> {
        self.store
            .find_by_id(Collection::Pets, pet_id)
            .await?
            .map(from_document)
            .transpose()
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_pet(&self, request: CreatePetRequest) -> Result<InsertOneResult, AppError> {
        request.validate()?;

        let pet = PetModel {
            id: String::new(),
            name: request.name,
            age: request.age,
            category: request.category,
            location: request.location,
            image: request.image,
            short_description: request.short_description,
            long_description: request.long_description,
            adopted: false,
            owner_email: request.owner_email,
            added_at: Some(Utc::now()),
        };

        let result = self
            .store
            .insert_one(Collection::Pets, to_document(&pet)?)
            .await?;
        info!(pet_id = %result.inserted_id, "Pet listed");
        Ok(result)
    }

    /// Partial update; an unknown id creates the pet from the given fields
    #[instrument(skip(self, request))]
    pub async fn update_pet(
        &self,
        pet_id: &str,
        request: UpdatePetRequest,
    ) -> Result<UpdateResult, AppError> {
        request.validate()?;

        let update = Update::set(to_document(&request)?);
        if update.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        self.store
            .update_one(Collection::Pets, pet_id, &update, WriteMode::Upsert)
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_adopted(&self, pet_id: &str, adopted: bool) -> Result<UpdateResult, AppError> {
        let update = Update::new().set_field("adopted", adopted);
        let result = self
            .store
            .update_one(Collection::Pets, pet_id, &update, WriteMode::Upsert)
            .await?;

        info!(pet_id = %pet_id, adopted, "Adoption flag set");
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn delete_pet(&self, pet_id: &str) -> Result<DeleteResult, AppError> {
        let result = self.store.delete_one(Collection::Pets, pet_id).await?;
        info!(pet_id = %pet_id, deleted_count = result.deleted_count, "Pet delete applied");
        Ok(result)
    }

    async fn find(&self, query: &FindQuery) -> Result<Vec<PetModel>, AppError> {
        self.store
            .find(Collection::Pets, query)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }
}
