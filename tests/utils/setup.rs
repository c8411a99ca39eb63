use axum::Router;
use serde_json::json;
use std::sync::Arc;

use pet_adoption::{
    app_router, store::Document, AppConfig, AppState, Collection, DocumentStore,
    InMemoryDocumentStore,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-secret";

pub struct TestSetup {
    pub app: Router,
    pub store: Arc<InMemoryDocumentStore>,
}

pub struct TestSetupBuilder {
    admins: Vec<String>,
    users: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            admins: vec![],
            users: vec![],
        }
    }

    /// Seeds a stored user holding the admin role
    pub fn with_admin(mut self, email: &str) -> Self {
        self.admins.push(email.to_string());
        self
    }

    /// Seeds a stored user without a role
    pub fn with_user(mut self, email: &str) -> Self {
        self.users.push(email.to_string());
        self
    }

    pub async fn build(self) -> TestSetup {
        let store = Arc::new(InMemoryDocumentStore::new());

        for email in &self.admins {
            store
                .insert_one(Collection::Users, user_document(email, Some("admin")))
                .await
                .unwrap();
        }
        for email in &self.users {
            store
                .insert_one(Collection::Users, user_document(email, None))
                .await
                .unwrap();
        }

        let state = AppState::new(AppConfig::new(TEST_SECRET), store.clone());

        TestSetup {
            app: app_router(state),
            store,
        }
    }
}

fn user_document(email: &str, role: Option<&str>) -> Document {
    let mut user = json!({"email": email, "name": email});
    if let Some(role) = role {
        user["role"] = json!(role);
    }
    user.as_object().cloned().unwrap()
}
