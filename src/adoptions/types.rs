use serde::{Deserialize, Serialize};

use crate::shared::{require_non_empty, validate_email, AppError};
use crate::store::UpdateResult;

pub const ALREADY_ACCEPTED_MESSAGE: &str = "already accepted";

/// Request payload for asking to adopt a pet
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdoptionRequest {
    pub pet_id: String,
    #[serde(default)]
    pub pet_name: Option<String>,
    #[serde(default)]
    pub pet_image: Option<String>,
    pub owner_email: String,
    #[serde(default)]
    pub requester_name: Option<String>,
    pub requester_email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl CreateAdoptionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("petId", &self.pet_id)?;
        validate_email(&self.owner_email)?;
        validate_email(&self.requester_email)
    }
}

/// Outcome of an accept call
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AcceptAdoptionResponse {
    AlreadyAccepted { message: String },
    Updated(UpdateResult),
}

impl AcceptAdoptionResponse {
    pub fn already_accepted() -> Self {
        AcceptAdoptionResponse::AlreadyAccepted {
            message: ALREADY_ACCEPTED_MESSAGE.to_string(),
        }
    }
}
