use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::{require_non_empty, validate_amount, validate_email, AppError};

/// Number of campaigns returned by the recommendation endpoint
pub const RECOMMENDED_SAMPLE_SIZE: usize = 3;

/// Request payload for starting a donation campaign
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub pet_name: String,
    #[serde(default)]
    pub pet_image: Option<String>,
    pub max_donation: f64,
    #[serde(default)]
    pub last_date: Option<NaiveDate>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    pub creator_email: String,
}

impl CreateCampaignRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("petName", &self.pet_name)?;
        validate_amount("maxDonation", self.max_donation)?;
        validate_email(&self.creator_email)
    }
}

/// Partial update of campaign details. The running total is not writable here.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCampaignRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_donation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
}

impl UpdateCampaignRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(pet_name) = &self.pet_name {
            require_non_empty("petName", pet_name)?;
        }
        if let Some(max_donation) = self.max_donation {
            validate_amount("maxDonation", max_donation)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseCampaignRequest {
    pub is_donation_stopped: bool,
}

/// Paging for GET /donationCampaigns; no paging when `size` is absent
#[derive(Debug, Default, Deserialize)]
pub struct CampaignListQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendedQuery {
    /// Campaign to leave out, usually the one being viewed
    pub exclude: Option<String>,
}
