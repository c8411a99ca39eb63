use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::AdoptionModel,
    service::AdoptionService,
    types::{AcceptAdoptionResponse, CreateAdoptionRequest},
};
use crate::shared::{AppError, AppState};
use crate::store::{DeleteResult, InsertOneResult, UpdateResult};

/// POST /adoptions
#[instrument(name = "create_adoption", skip(state, request))]
pub async fn create_adoption(
    State(state): State<AppState>,
    Json(request): Json<CreateAdoptionRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    info!(
        pet_id = %request.pet_id,
        requester_email = %request.requester_email,
        "Creating adoption request"
    );

    let service = AdoptionService::new(Arc::clone(&state.store));
    Ok(Json(service.create_adoption(request).await?))
}

/// GET /adoptions/{email}
#[instrument(name = "list_owner_adoptions", skip(state))]
pub async fn list_owner_adoptions(
    State(state): State<AppState>,
    Path(owner_email): Path<String>,
) -> Result<Json<Vec<AdoptionModel>>, AppError> {
    let service = AdoptionService::new(Arc::clone(&state.store));
    let adoptions = service.list_for_owner(&owner_email).await?;

    info!(adoption_count = adoptions.len(), "Adoption requests listed");
    Ok(Json(adoptions))
}

/// PATCH /adoptions/accept/{id}
#[instrument(name = "accept_adoption", skip(state))]
pub async fn accept_adoption(
    State(state): State<AppState>,
    Path(adoption_id): Path<String>,
) -> Result<Json<AcceptAdoptionResponse>, AppError> {
    let service = AdoptionService::new(Arc::clone(&state.store));
    Ok(Json(service.accept(&adoption_id).await?))
}

/// PATCH /adoptions/reject/{id}
#[instrument(name = "reject_adoption", skip(state))]
pub async fn reject_adoption(
    State(state): State<AppState>,
    Path(adoption_id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = AdoptionService::new(Arc::clone(&state.store));
    Ok(Json(service.reject(&adoption_id).await?))
}

/// DELETE /adoptions/{id}
#[instrument(name = "delete_adoption", skip(state))]
pub async fn delete_adoption(
    State(state): State<AppState>,
    Path(adoption_id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let service = AdoptionService::new(Arc::clone(&state.store));
    Ok(Json(service.delete_adoption(&adoption_id).await?))
}
