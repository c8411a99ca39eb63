use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{token::UNAUTHORIZED_MESSAGE, types::SessionClaims};
use crate::shared::{AppError, AppState};
use crate::users::UserService;

const FORBIDDEN_MESSAGE: &str = "Forbidden Access";

/// JWT authentication middleware - validates Authorization Bearer header and adds SessionClaims to request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::jwt_auth))
/// Handlers can then extract Extension(claims): Extension<SessionClaims>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    info!(
        "JWT authentication middleware triggered for request {}",
        req.uri()
    );

    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
        })?;

    // Token is the second space-separated part: "Bearer <token>"
    let token = auth_header.split_whitespace().nth(1).ok_or_else(|| {
        warn!("Authorization header carries no token");
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    })?;

    let claims = match state.token_config.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("JWT authentication failed: {}", e);
            return Err(e);
        }
    };

    info!(email = ?claims.email(), "Authentication successful, adding claims to request");

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role authorization middleware - must run after `jwt_auth`.
/// Lets the request through only when the caller's stored user has the admin role.
#[instrument(skip(state, req, next))]
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let email = req
        .extensions()
        .get::<SessionClaims>()
        .and_then(|claims| claims.email())
        .map(str::to_string);

    let Some(email) = email else {
        warn!("No email in session claims, denying admin access");
        return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()));
    };

    let service = UserService::new(Arc::clone(&state.store));
    if !service.is_admin(&email).await? {
        warn!(email = %email, "Non-admin attempted admin route");
        return Err(AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()));
    }

    info!(email = %email, "Admin access granted");
    Ok(next.run(req).await)
}
