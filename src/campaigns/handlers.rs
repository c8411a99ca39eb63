use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::CampaignModel,
    service::CampaignService,
    types::{
        CampaignListQuery, CreateCampaignRequest, PauseCampaignRequest, RecommendedQuery,
        UpdateCampaignRequest,
    },
};
use crate::shared::{AppError, AppState};
use crate::store::{DeleteResult, InsertOneResult, UpdateResult};

/// GET /donationCampaigns?page=&size=
#[instrument(name = "list_campaigns", skip(state))]
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(query): Query<CampaignListQuery>,
) -> Result<Json<Vec<CampaignModel>>, AppError> {
    let service = CampaignService::new(Arc::clone(&state.store));
    let campaigns = service.list_campaigns(&query).await?;

    info!(campaign_count = campaigns.len(), "Campaigns listed successfully");
    Ok(Json(campaigns))
}

/// GET /donationCampaigns/recommended?exclude=
#[instrument(name = "recommended_campaigns", skip(state))]
pub async fn recommended_campaigns(
    State(state): State<AppState>,
    Query(query): Query<RecommendedQuery>,
) -> Result<Json<Vec<CampaignModel>>, AppError> {
    let service = CampaignService::new(Arc::clone(&state.store));
    Ok(Json(service.recommended(query.exclude.as_deref()).await?))
}

/// GET /donationCampaigns/{id}
/// Unknown ids answer with a `null` body
#[instrument(name = "get_campaign", skip(state))]
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<Option<CampaignModel>>, AppError> {
    let service = CampaignService::new(Arc::clone(&state.store));
    Ok(Json(service.get_campaign(&campaign_id).await?))
}

/// GET /donationCampaigns/user/{email}
#[instrument(name = "list_creator_campaigns", skip(state))]
pub async fn list_creator_campaigns(
    State(state): State<AppState>,
    Path(creator_email): Path<String>,
) -> Result<Json<Vec<CampaignModel>>, AppError> {
    let service = CampaignService::new(Arc::clone(&state.store));
    Ok(Json(service.list_by_creator(&creator_email).await?))
}

/// POST /donationCampaigns
#[instrument(name = "create_campaign", skip(state, request))]
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    info!(
        pet_name = %request.pet_name,
        creator_email = %request.creator_email,
        "Creating donation campaign"
    );

    let service = CampaignService::new(Arc::clone(&state.store));
    Ok(Json(service.create_campaign(request).await?))
}

/// PATCH /donationCampaigns/{id}
#[instrument(name = "update_campaign", skip(state, request))]
pub async fn update_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = CampaignService::new(Arc::clone(&state.store));
    Ok(Json(service.update_campaign(&campaign_id, request).await?))
}

/// PATCH /donationCampaigns/pause/{id} and PATCH /admin/paused/{id}
#[instrument(name = "pause_campaign", skip(state, request))]
pub async fn pause_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    Json(request): Json<PauseCampaignRequest>,
) -> Result<Json<UpdateResult>, AppError> {
    let service = CampaignService::new(Arc::clone(&state.store));
    Ok(Json(
        service
            .set_paused(&campaign_id, request.is_donation_stopped)
            .await?,
    ))
}

/// DELETE /donationCampaigns/{id}
#[instrument(name = "delete_campaign", skip(state))]
pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let service = CampaignService::new(Arc::clone(&state.store));
    Ok(Json(service.delete_campaign(&campaign_id).await?))
}
