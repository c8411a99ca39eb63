use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::UserModel,
    service::UserService,
    types::{AdminStatusResponse, CreateUserRequest, CreateUserResponse},
};
use crate::session::SessionClaims;
use crate::shared::{AppError, AppState};
use crate::store::UpdateResult;

/// POST /users
/// Creates the user on first sign-in; repeated emails get the "already exists" sentinel
#[instrument(name = "create_user", skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, AppError> {
    info!(email = %request.email, "Creating user");

    let service = UserService::new(Arc::clone(&state.store));
    let response = service.create_user(request).await?;

    Ok(Json(response))
}

/// GET /users
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserModel>>, AppError> {
    let service = UserService::new(Arc::clone(&state.store));
    let users = service.list_users().await?;

    info!(user_count = users.len(), "Users listed successfully");

    Ok(Json(users))
}

/// GET /users/admin/{email}
/// Callers may only ask about their own email
#[instrument(name = "check_admin", skip(state, claims))]
pub async fn check_admin(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Extension(claims): Extension<SessionClaims>,
) -> Result<Json<AdminStatusResponse>, AppError> {
    if claims.email() != Some(email.as_str()) {
        warn!(
            email = %email,
            caller = ?claims.email(),
            "Caller asked for another user's admin status"
        );
        return Err(AppError::Forbidden("Forbidden Access".to_string()));
    }

    let service = UserService::new(Arc::clone(&state.store));
    let admin = service.is_admin(&email).await?;

    Ok(Json(AdminStatusResponse { admin }))
}

/// PATCH /users/admin/{id}
#[instrument(name = "make_admin", skip(state))]
pub async fn make_admin(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UpdateResult>, AppError> {
    info!(user_id = %user_id, "Granting admin role");

    let service = UserService::new(Arc::clone(&state.store));
    let result = service.make_admin(&user_id).await?;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::jwt_auth;
    use crate::shared::test_utils::{body_json, AppStateBuilder};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::{get, post},
        Router,
    };
    use serde_json::json;
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        let protected = Router::new()
            .route("/users", get(list_users))
            .route("/users/admin/:key", get(check_admin).patch(make_admin))
            .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth));

        Router::new()
            .route("/users", post(create_user))
            .merge(protected)
            .with_state(state)
    }

    fn token_for(state: &AppState, email: &str) -> String {
        state
            .token_config
            .create_token(json!({ "email": email }).as_object().cloned().unwrap())
            .unwrap()
    }

    fn post_user(email: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "email": email, "name": "Ada" }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_user_handler_twice() {
        let state = AppStateBuilder::new().build();

        let response = app(state.clone()).oneshot(post_user("a@x.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["acknowledged"], true);
        assert!(body["insertedId"].is_string());

        let response = app(state).oneshot(post_user("a@x.com")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["message"], "user already exists");
        assert!(body["insertedId"].is_null());
    }

    #[tokio::test]
    async fn test_create_user_handler_invalid_email() {
        let state = AppStateBuilder::new().build();
        let response = app(state).oneshot(post_user("nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_users_requires_token() {
        let state = AppStateBuilder::new().build();
        let request = Request::builder()
            .uri("/users")
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_check_admin_for_own_email() {
        let state = AppStateBuilder::new().build();
        app(state.clone()).oneshot(post_user("a@x.com")).await.unwrap();

        let request = Request::builder()
            .uri("/users/admin/a@x.com")
            .header("Authorization", format!("Bearer {}", token_for(&state, "a@x.com")))
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"admin": false}));
    }

    #[tokio::test]
    async fn test_check_admin_for_other_email_is_forbidden() {
        let state = AppStateBuilder::new().build();

        let request = Request::builder()
            .uri("/users/admin/b@x.com")
            .header("Authorization", format!("Bearer {}", token_for(&state, "a@x.com")))
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_make_admin_handler() {
        let state = AppStateBuilder::new().build();
        let response = app(state.clone()).oneshot(post_user("a@x.com")).await.unwrap();
        let user_id = body_json(response).await["insertedId"]
            .as_str()
            .unwrap()
            .to_string();

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/users/admin/{}", user_id))
            .header("Authorization", format!("Bearer {}", token_for(&state, "a@x.com")))
            .body(Body::empty())
            .unwrap();

        let response = app(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["modifiedCount"], 1);

        let service = UserService::new(Arc::clone(&state.store));
        assert!(service.is_admin("a@x.com").await.unwrap());
    }
}
