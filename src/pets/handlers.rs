use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::PetModel,
    service::PetService,
    types::{AdoptPetRequest, CreatePetRequest, PetListQuery, UpdatePetRequest},
};
use crate::shared::{AppError, AppState};
use crate::store::{DeleteResult, InsertOneResult, UpdateResult};

/// GET /pets?search=&category=&adopted=
#[instrument(name = "list_pets", skip(state))]
pub async fn list_pets(
    State(state): State<AppState>,
    Query(query): Query<PetListQuery>,
) -> Result<Json<Vec<PetModel>>, AppError> {
    let service = PetService::new(Arc::clone(&state.store));
    let pets = service.list_pets(&query).await?;

    info!(pet_count = pets.len(), "Pets listed successfully");
    Ok(Json(pets))
}

/// GET /pets/{id}
/// Unknown ids answer with a `null` body
#[instrument(name = "get_pet", skip(state))]
pub async fn get_pet(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Result<Json<Option<PetModel>>, AppError> {
    let service = PetService::new(Arc::clone(&state.store));
    Ok(Json(service.get_pet(&pet_id).await?))
}

/// GET /pets/user/{email}
#[instrument(name = "list_owner_pets", skip(state))]
pub async fn list_owner_pets(
    State(state): State<AppState>,
    Path(owner_email): Path<String>,
) -> Result<Json<Vec<PetModel>>, AppError> {
    let service = PetService::new(Arc::clone(&state.store));
    Ok(Json(service.list_by_owner(&owner_email).await?))
}

/// POST /pets
#[instrument(name = "create_pet", skip(state, request))]
pub async fn create_pet(
    State(state): State<AppState>,
    Json(request): Json<CreatePetRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    info!(name = %request.name, category = %request.category, "Listing new pet");

    let service = PetService::new(Arc::clone(&state.store));
    Ok(Json(service.create_pet(request).await?))
}

/// PATCH /pets/{id}
#[instrument(name = "update_pet", skip(state, request))]
pub async fn update_pet(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
    Json(request): Json<UpdatePetRequest>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = PetService::new(Arc::clone(&state.store));
    Ok(Json(service.update_pet(&pet_id, request).await?))
}

/// PATCH /pets/adopt/{id}
#[instrument(name = "set_pet_adopted", skip(state, request))]
pub async fn set_pet_adopted(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
    Json(request): Json<AdoptPetRequest>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = PetService::new(Arc::clone(&state.store));
    Ok(Json(service.set_adopted(&pet_id, request.adopted).await?))
}

/// DELETE /pets/{id}
#[instrument(name = "delete_pet", skip(state))]
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(pet_id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let service = PetService::new(Arc::clone(&state.store));
    Ok(Json(service.delete_pet(&pet_id).await?))
}
