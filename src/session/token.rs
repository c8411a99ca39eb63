use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::types::SessionClaims;
use crate::config::AppConfig;
use crate::shared::AppError;

pub(crate) const UNAUTHORIZED_MESSAGE: &str = "Unauthorized Access";

/// Configuration for JWT token operations
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub expiration: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, expiration: Duration) -> Self {
        Self {
            secret: secret.into(),
            expiration,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.token_secret(), config.token_expiration)
    }

    /// Creates a JWT embedding every field of `identity`, issued now
    pub fn create_token(&self, identity: Map<String, Value>) -> Result<String, AppError> {
        self.create_token_at(identity, Utc::now())
    }

    /// Creates a JWT as if issued at `issued_at`. Caller-supplied `exp`/`iat` are replaced.
    #[instrument(skip(self, identity))]
    pub fn create_token_at(
        &self,
        mut identity: Map<String, Value>,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        identity.remove("exp");
        identity.remove("iat");

        let exp = (issued_at + self.expiration).timestamp().max(0) as usize;
        debug!(
            expiration_minutes = self.expiration.num_minutes(),
            exp_timestamp = exp,
            "Creating JWT token with expiration"
        );

        let claims = SessionClaims {
            identity,
            exp,
            iat: issued_at.timestamp().max(0) as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::JwtError(e.to_string())
        })
    }

    /// Validates signature and expiration and returns the claims.
    /// Every failure is reported as `Unauthorized`.
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, AppError> {
        debug!("Decoding and validating JWT token");

        // Expiry is exact: no clock leeway
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| {
            debug!(
                email = ?data.claims.email(),
                exp = data.claims.exp,
                "JWT token decoded successfully"
            );
            data.claims
        })
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn identity(email: &str) -> Map<String, Value> {
        json!({ "email": email }).as_object().cloned().unwrap()
    }

    fn config() -> TokenConfig {
        TokenConfig::new("test-secret", Duration::hours(1))
    }

    #[test]
    fn test_create_and_validate_token() {
        let config = config();

        let token = config.create_token(identity("a@x.com")).unwrap();
        assert!(!token.is_empty());

        let claims = config.validate_token(&token).unwrap();
        assert_eq!(claims.email(), Some("a@x.com"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_arbitrary_fields_are_embedded() {
        let config = config();
        let payload = json!({"email": "a@x.com", "name": "Ada", "nested": {"k": [1, 2]}})
            .as_object()
            .cloned()
            .unwrap();

        let claims = config
            .validate_token(&config.create_token(payload.clone()).unwrap())
            .unwrap();
        assert_eq!(claims.identity, payload);
    }

    #[test]
    fn test_supplied_exp_is_replaced() {
        let config = config();
        let mut payload = identity("a@x.com");
        payload.insert("exp".to_string(), json!(1));

        let claims = config
            .validate_token(&config.create_token(payload).unwrap())
            .unwrap();
        assert!(claims.exp > 1);
        assert!(!claims.identity.contains_key("exp"));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let config = config();
        let token = config
            .create_token_at(identity("a@x.com"), Utc::now() - Duration::hours(2))
            .unwrap();

        let result = config.validate_token(&token);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[rstest]
    #[case(Duration::hours(1) + Duration::seconds(30), false)]
    #[case(Duration::hours(1) - Duration::seconds(30), true)]
    fn test_expiry_boundary_has_no_leeway(#[case] age: Duration, #[case] accepted: bool) {
        let config = config();
        let token = config
            .create_token_at(identity("a@x.com"), Utc::now() - age)
            .unwrap();

        let result = config.validate_token(&token);
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert!(matches!(result, Err(AppError::Unauthorized(_))));
        }
    }

    #[test]
    fn test_invalid_token() {
        let result = config().validate_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_token_with_different_secret() {
        let issuer = config();
        let other = TokenConfig::new("another-secret", Duration::hours(1));

        let token = issuer.create_token(identity("a@x.com")).unwrap();

        assert!(issuer.validate_token(&token).is_ok());
        assert!(matches!(
            other.validate_token(&token),
            Err(AppError::Unauthorized(_))
        ));
    }
}
