use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role marker that grants access to admin routes
pub const ADMIN_ROLE: &str = "admin";

/// Stored user document, keyed by email
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserModel {
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserModel {
    pub fn new(email: String, name: Option<String>, photo: Option<String>) -> Self {
        Self {
            id: String::new(),
            email,
            name,
            photo,
            role: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}
