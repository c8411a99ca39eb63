use serde::{Deserialize, Serialize};

use crate::shared::{require_non_empty, validate_email, AppError};

/// Request payload for listing a new pet
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    pub category: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
}

impl CreatePetRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("category", &self.category)?;
        if let Some(email) = &self.owner_email {
            validate_email(email)?;
        }
        Ok(())
    }
}

/// Partial update: only fields present in the body are written
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adopted: Option<bool>,
}

impl UpdatePetRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require_non_empty("name", name)?;
        }
        if let Some(category) = &self.category {
            require_non_empty("category", category)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct AdoptPetRequest {
    pub adopted: bool,
}

/// Query string for GET /pets
#[derive(Debug, Default, Deserialize)]
pub struct PetListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub adopted: Option<bool>,
}
