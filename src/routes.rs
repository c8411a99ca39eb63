use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::{adoptions, admin, campaigns, payments, pets, session, users};

const ROOT_MESSAGE: &str = "Pet adoption server is running";

/// Builds the full HTTP surface.
///
/// Routes are grouped by guard: public, token-protected, and admin (token plus
/// role check). Paths shared between groups use the same parameter name so
/// the method routers merge.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .merge(admin_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { ROOT_MESSAGE }))
        .route("/jwt", post(session::issue_token))
        .route("/users", post(users::create_user))
        .route("/pets", get(pets::list_pets))
        .route("/pets/:id", get(pets::get_pet))
        .route("/donationCampaigns", get(campaigns::list_campaigns))
        .route(
            "/donationCampaigns/recommended",
            get(campaigns::recommended_campaigns),
        )
        .route("/donationCampaigns/:id", get(campaigns::get_campaign))
        .route("/payments", post(payments::create_payment))
        // Refunds are not token-guarded
        .route("/payments/refund/:id", patch(payments::refund_payment))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/users/admin/:key",
            get(users::check_admin).patch(users::make_admin),
        )
        .route("/pets", post(pets::create_pet))
        .route("/pets/:id", patch(pets::update_pet).delete(pets::delete_pet))
        .route("/pets/user/:email", get(pets::list_owner_pets))
        .route("/pets/adopt/:id", patch(pets::set_pet_adopted))
        .route("/adoptions", post(adoptions::create_adoption))
        .route(
            "/adoptions/:key",
            get(adoptions::list_owner_adoptions).delete(adoptions::delete_adoption),
        )
        .route("/adoptions/accept/:id", patch(adoptions::accept_adoption))
        .route("/adoptions/reject/:id", patch(adoptions::reject_adoption))
        .route("/donationCampaigns", post(campaigns::create_campaign))
        .route(
            "/donationCampaigns/:id",
            patch(campaigns::update_campaign).delete(campaigns::delete_campaign),
        )
        .route(
            "/donationCampaigns/user/:email",
            get(campaigns::list_creator_campaigns),
        )
        .route(
            "/donationCampaigns/pause/:id",
            patch(campaigns::pause_campaign),
        )
        .route(
            "/payments/:key",
            get(payments::list_donor_payments).delete(payments::delete_payment),
        )
        .route("/payments/user/:petId", get(payments::list_campaign_payments))
        .route_layer(middleware::from_fn_with_state(state, session::jwt_auth))
}

/// `require_admin` reads the claims `jwt_auth` stores, so `jwt_auth` is layered last to run first.
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/all-pets", get(admin::all_pets))
        .route("/admin/all-donationCampaigns", get(admin::all_campaigns))
        .route("/admin/paused/:id", patch(admin::pause_campaign))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_admin,
        ))
        .route_layer(middleware::from_fn_with_state(state, session::jwt_auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use rstest::rstest;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_answers_liveness_text() {
        let app = app_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], ROOT_MESSAGE.as_bytes());
    }

    #[rstest]
    #[case("GET", "/users")]
    #[case("GET", "/users/admin/a@x.com")]
    #[case("PATCH", "/users/admin/u1")]
    #[case("POST", "/pets")]
    #[case("PATCH", "/pets/p1")]
    #[case("DELETE", "/pets/p1")]
    #[case("GET", "/pets/user/a@x.com")]
    #[case("PATCH", "/pets/adopt/p1")]
    #[case("POST", "/adoptions")]
    #[case("GET", "/adoptions/a@x.com")]
    #[case("DELETE", "/adoptions/a1")]
    #[case("PATCH", "/adoptions/accept/a1")]
    #[case("PATCH", "/adoptions/reject/a1")]
    #[case("POST", "/donationCampaigns")]
    #[case("PATCH", "/donationCampaigns/c1")]
    #[case("DELETE", "/donationCampaigns/c1")]
    #[case("GET", "/donationCampaigns/user/a@x.com")]
    #[case("PATCH", "/donationCampaigns/pause/c1")]
    #[case("GET", "/payments/a@x.com")]
    #[case("DELETE", "/payments/pay1")]
    #[case("GET", "/payments/user/c1")]
    #[case("GET", "/admin/all-pets")]
    #[case("GET", "/admin/all-donationCampaigns")]
    #[case("PATCH", "/admin/paused/c1")]
    #[tokio::test]
    async fn test_guarded_routes_reject_missing_token(#[case] method: &str, #[case] uri: &str) {
        let app = app_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case("/pets")]
    #[case("/pets/p1")]
    #[case("/donationCampaigns")]
    #[case("/donationCampaigns/recommended")]
    #[case("/donationCampaigns/c1")]
    #[tokio::test]
    async fn test_public_reads_need_no_token(#[case] uri: &str) {
        let app = app_router(AppStateBuilder::new().build());

        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
