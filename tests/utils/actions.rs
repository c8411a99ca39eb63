use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    /// Send a request through the router and decode the JSON response
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    /// Obtain a session token for the given email through POST /jwt
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self.post("/jwt", None, json!({"email": email})).await;
        assert_eq!(status, StatusCode::OK, "token issue failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// List a pet and return its id
    pub async fn create_pet(&self, token: &str, name: &str, owner_email: &str) -> String {
        let (status, body) = self
            .post(
                "/pets",
                Some(token),
                json!({
                    "name": name,
                    "category": "dog",
                    "age": 2,
                    "location": "Dhaka",
                    "ownerEmail": owner_email
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "pet creation failed: {}", body);
        body["insertedId"].as_str().unwrap().to_string()
    }

    /// Start a donation campaign and return its id
    pub async fn create_campaign(&self, token: &str, pet_name: &str, creator_email: &str) -> String {
        let (status, body) = self
            .post(
                "/donationCampaigns",
                Some(token),
                json!({
                    "petName": pet_name,
                    "maxDonation": 500,
                    "lastDate": "2030-01-31",
                    "creatorEmail": creator_email
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "campaign creation failed: {}", body);
        body["insertedId"].as_str().unwrap().to_string()
    }

    /// Record a payment towards a campaign and return its id
    pub async fn donate(&self, email: &str, campaign_id: &str, amount: f64) -> String {
        let (status, body) = self
            .post(
                "/payments",
                None,
                json!({
                    "email": email,
                    "donationAmount": amount,
                    "petId": campaign_id,
                    "transactionId": "tx_test"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "payment failed: {}", body);
        body["insertedId"].as_str().unwrap().to_string()
    }

    /// Current `donatedAmount` of a campaign as seen through the public read
    pub async fn donated_amount(&self, campaign_id: &str) -> f64 {
        let (_, body) = self
            .get(&format!("/donationCampaigns/{}", campaign_id), None)
            .await;
        body["donatedAmount"].as_f64().unwrap()
    }
}
