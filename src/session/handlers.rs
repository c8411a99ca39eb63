use axum::{extract::State, Json};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::types::TokenResponse;
use crate::shared::{AppError, AppState};

/// HTTP handler for issuing a session token
///
/// POST /jwt
/// Accepts any JSON object as the identity payload and returns a signed token
#[instrument(name = "issue_token", skip(state, identity))]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(identity): Json<Map<String, Value>>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = identity
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    info!(email = %email, field_count = identity.len(), "Issuing session token");

    let token = state.token_config.create_token(identity)?;

    info!(email = %email, token_length = token.len(), "Session token issued");

    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app() -> (Router, AppState) {
        let state = AppStateBuilder::new().build();
        let router = Router::new()
            .route("/jwt", axum::routing::post(issue_token))
            .with_state(state.clone());
        (router, state)
    }

    #[tokio::test]
    async fn test_issue_token_handler() {
        let (app, state) = app();

        let request = Request::builder()
            .method("POST")
            .uri("/jwt")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"email": "a@x.com"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let token_response: TokenResponse = serde_json::from_slice(&body).unwrap();

        let claims = state
            .token_config
            .validate_token(&token_response.token)
            .unwrap();
        assert_eq!(claims.email(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn test_issue_token_accepts_payload_without_email() {
        let (app, _) = app();

        let request = Request::builder()
            .method("POST")
            .uri("/jwt")
            .header("content-type", "application/json")
            .body(Body::from(r#"{}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_issue_token_rejects_non_object() {
        let (app, _) = app();

        let request = Request::builder()
            .method("POST")
            .uri("/jwt")
            .header("content-type", "application/json")
            .body(Body::from(r#"["a@x.com"]"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
