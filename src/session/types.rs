use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JWT claims: every identity field supplied at issuance plus the standard timestamps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub identity: Map<String, Value>,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

impl SessionClaims {
    /// The `email` identity field, when present and a string
    pub fn email(&self) -> Option<&str> {
        self.identity.get("email").and_then(Value::as_str)
    }
}

/// Response structure for the token issuing endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct TokenResponse {
    pub token: String,
}
