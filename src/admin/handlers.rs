use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::campaigns::{models::CampaignModel, CampaignService};
use crate::pets::{models::PetModel, PetService};
use crate::shared::{AppError, AppState};

/// GET /admin/all-pets
#[instrument(name = "admin_all_pets", skip(state))]
pub async fn all_pets(State(state): State<AppState>) -> Result<Json<Vec<PetModel>>, AppError> {
    let service = PetService::new(Arc::clone(&state.store));
    let pets = service.all_pets().await?;

    info!(pet_count = pets.len(), "All pets listed for admin");
    Ok(Json(pets))
}

/// GET /admin/all-donationCampaigns
#[instrument(name = "admin_all_campaigns", skip(state))]
pub async fn all_campaigns(
    State(state): State<AppState>,
) -> Result<Json<Vec<CampaignModel>>, AppError> {
    let service = CampaignService::new(Arc::clone(&state.store));
    let campaigns = service.all_campaigns().await?;

    info!(campaign_count = campaigns.len(), "All campaigns listed for admin");
    Ok(Json(campaigns))
}
