use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an adoption request. Pending until the owner decides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Pending => "pending",
            AdoptionStatus::Accepted => "accepted",
            AdoptionStatus::Rejected => "rejected",
        }
    }
}

/// Stored adoption request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AdoptionModel {
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub pet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_image: Option<String>,
    /// Email of the user who listed the pet
    pub owner_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
    pub requester_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub status: AdoptionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_at: Option<DateTime<Utc>>,
}
