use chrono::Utc;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::CampaignModel,
    types::{CampaignListQuery, CreateCampaignRequest, UpdateCampaignRequest, RECOMMENDED_SAMPLE_SIZE},
};
use crate::shared::AppError;
use crate::store::{
    from_document, to_document, Collection, DeleteResult, DocumentStore, Filter, FindQuery,
    InsertOneResult, Update, UpdateResult, WriteMode, ID_FIELD,
};

const RECENCY_FIELD: &str = "createdAt";
const STOPPED_FIELD: &str = "isDonationStopped";

/// Service for donation campaign business logic
pub struct CampaignService {
    store: Arc<dyn DocumentStore + Send + Sync>,
}

impl CampaignService {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Newest campaigns first, optionally one page at a time
    #[instrument(skip(self))]
    pub async fn list_campaigns(
        &self,
        query: &CampaignListQuery,
    ) -> Result<Vec<CampaignModel>, AppError> {
        let mut find = FindQuery::all().sort_desc(RECENCY_FIELD);
        if let Some(size) = query.size.filter(|s| *s > 0) {
            find = find
                .skip(query.page.unwrap_or(0).saturating_mul(size))
                .limit(size);
        }
        self.find(&find).await
    }

    #[instrument(skip(self))]
    pub async fn all_campaigns(&self) -> Result<Vec<CampaignModel>, AppError> {
        self.find(&FindQuery::all().sort_desc(RECENCY_FIELD)).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_creator(
        &self,
        creator_email: &str,
    ) -> Result<Vec<CampaignModel>, AppError> {
        self.find(
            &FindQuery::new(Filter::new().eq("creatorEmail", creator_email))
                .sort_desc(RECENCY_FIELD),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_campaign(&self, campaign_id: &str) -> Result<Option<CampaignModel>, AppError> {
        self.store
            .find_by_id(Collection::DonationCampaigns, campaign_id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Random sample of campaigns still accepting donations
    #[instrument(skip(self))]
    pub async fn recommended(&self, exclude: Option<&str>) -> Result<Vec<CampaignModel>, AppError> {
        let mut filter = Filter::new().ne(STOPPED_FIELD, true);
        if let Some(exclude) = exclude.filter(|e| !e.is_empty()) {
            filter = filter.ne(ID_FIELD, exclude);
        }

        let mut campaigns = self.find(&FindQuery::new(filter)).await?;
        campaigns.shuffle(&mut rand::rng());
        campaigns.truncate(RECOMMENDED_SAMPLE_SIZE);

        debug!(count = campaigns.len(), "Recommended campaigns sampled");
        Ok(campaigns)
    }

    #[instrument(skip(self, request), fields(pet_name = %request.pet_name))]
    pub async fn create_campaign(
        &self,
        request: CreateCampaignRequest,
    ) -> Result<InsertOneResult, AppError> {
        request.validate()?;

        let campaign = CampaignModel {
            id: String::new(),
            pet_name: Some(request.pet_name),
            pet_image: request.pet_image,
            max_donation: Some(request.max_donation),
            last_date: request.last_date,
            short_description: request.short_description,
            long_description: request.long_description,
            creator_email: Some(request.creator_email),
            donated_amount: 0.0,
            is_donation_stopped: false,
            created_at: Some(Utc::now()),
        };

        let result = self
            .store
            .insert_one(Collection::DonationCampaigns, to_document(&campaign)?)
            .await?;
        info!(campaign_id = %result.inserted_id, "Donation campaign created");
        Ok(result)
    }

    /// Partial update; an unknown id creates the campaign from the given fields
    #[instrument(skip(self, request))]
    pub async fn update_campaign(
        &self,
        campaign_id: &str,
        request: UpdateCampaignRequest,
    ) -> Result<UpdateResult, AppError> {
        request.validate()?;

        let update = Update::set(to_document(&request)?);
        if update.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        self.store
            .update_one(Collection::DonationCampaigns, campaign_id, &update, WriteMode::Upsert)
            .await
    }

    /// Stops or resumes donations for a campaign
    #[instrument(skip(self))]
    pub async fn set_paused(
        &self,
        campaign_id: &str,
        stopped: bool,
    ) -> Result<UpdateResult, AppError> {
        let update = Update::new().set_field(STOPPED_FIELD, stopped);
        let result = self
            .store
            .update_one(Collection::DonationCampaigns, campaign_id, &update, WriteMode::Upsert)
            .await?;

        info!(campaign_id = %campaign_id, stopped, "Campaign pause flag set");
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn delete_campaign(&self, campaign_id: &str) -> Result<DeleteResult, AppError> {
        self.store
            .delete_one(Collection::DonationCampaigns, campaign_id)
            .await
    }

    async fn find(&self, query: &FindQuery) -> Result<Vec<CampaignModel>, AppError> {
        self.store
            .find(Collection::DonationCampaigns, query)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }
}
