use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Field holding the running donation total
pub const DONATED_AMOUNT_FIELD: &str = "donatedAmount";

/// Stored donation campaign
///
/// Every field may be absent: a payment against an unknown campaign id
/// upserts a stub holding only the id and `donatedAmount`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CampaignModel {
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_email: Option<String>,
    /// Sum of non-refunded payments referencing this campaign, kept incrementally
    pub donated_amount: f64,
    pub is_donation_stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
