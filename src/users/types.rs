use serde::{Deserialize, Serialize};

use crate::shared::{validate_email, AppError};
use crate::store::InsertOneResult;

pub const USER_EXISTS_MESSAGE: &str = "user already exists";

/// Request payload for signing a user in for the first time
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)
    }
}

/// Either the insert acknowledgement or the "already exists" sentinel
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CreateUserResponse {
    AlreadyExists {
        message: String,
        #[serde(rename = "insertedId")]
        inserted_id: Option<String>,
    },
    Created(InsertOneResult),
}

impl CreateUserResponse {
    pub fn already_exists() -> Self {
        CreateUserResponse::AlreadyExists {
            message: USER_EXISTS_MESSAGE.to_string(),
            inserted_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AdminStatusResponse {
    pub admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_already_exists_shape() {
        let value = serde_json::to_value(CreateUserResponse::already_exists()).unwrap();
        assert_eq!(value, json!({"message": "user already exists", "insertedId": null}));
    }

    #[test]
    fn test_created_shape_round_trips_untagged() {
        let created = CreateUserResponse::Created(InsertOneResult {
            acknowledged: true,
            inserted_id: "u1".to_string(),
        });
        let value = serde_json::to_value(&created).unwrap();
        assert_eq!(value, json!({"acknowledged": true, "insertedId": "u1"}));

        let parsed: CreateUserResponse = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, created);
    }
}
