use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{UserModel, ADMIN_ROLE},
    types::{CreateUserRequest, CreateUserResponse},
};
use crate::shared::AppError;
use crate::store::{
    from_document, to_document, Collection, DocumentStore, Filter, FindQuery, Update,
    UpdateResult, WriteMode,
};

/// Service for handling user business logic
pub struct UserService {
    store: Arc<dyn DocumentStore + Send + Sync>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Creates the user unless one with the same email exists.
    /// Check-then-insert: two identical concurrent requests can both insert.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<CreateUserResponse, AppError> {
        request.validate()?;

        if self.find_by_email(&request.email).await?.is_some() {
            info!("User already exists, skipping insert");
            return Ok(CreateUserResponse::already_exists());
        }

        let user = UserModel::new(request.email, request.name, request.photo);
        let result = self
            .store
            .insert_one(Collection::Users, to_document(&user)?)
            .await?;

        info!(user_id = %result.inserted_id, "User created");
        Ok(CreateUserResponse::Created(result))
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let documents = self
            .store
            .find(Collection::Users, &FindQuery::all())
            .await?;
        documents.into_iter().map(from_document).collect()
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        self.store
            .find_one(Collection::Users, &Filter::new().eq("email", email))
            .await?
            .map(from_document)
            .transpose()
    }

    /// True only when a stored user with this email carries the admin role
    #[instrument(skip(self))]
    pub async fn is_admin(&self, email: &str) -> Result<bool, AppError> {
        let admin = self
            .find_by_email(email)
            .await?
            .map(|user| user.is_admin())
            .unwrap_or(false);

        debug!(admin, "Checked admin role");
        Ok(admin)
    }

    /// Grants the admin role to an existing user. Unknown ids match nothing.
    #[instrument(skip(self))]
    pub async fn make_admin(&self, user_id: &str) -> Result<UpdateResult, AppError> {
        let update = Update::new().set_field("role", ADMIN_ROLE);
        let result = self
            .store
            .update_one(Collection::Users, user_id, &update, WriteMode::UpdateExisting)
            .await?;

        info!(
            matched = result.matched_count,
            modified = result.modified_count,
            "Admin role update applied"
        );
        Ok(result)
    }
}
