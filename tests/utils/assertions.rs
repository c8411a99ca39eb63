use axum::http::StatusCode;
use serde_json::Value;

// ============================================================================
// Response Assertions
// ============================================================================

pub struct ResponseAssertion {
    status: StatusCode,
    body: Value,
}

impl ResponseAssertion {
    pub fn new((status, body): (StatusCode, Value)) -> Self {
        Self { status, body }
    }

    pub fn status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status, expected,
            "unexpected status, body was: {}",
            self.body
        );
        self
    }

    pub fn message(self, expected: &str) -> Self {
        assert_eq!(
            self.body["message"].as_str(),
            Some(expected),
            "unexpected message in {}",
            self.body
        );
        self
    }

    pub fn field(self, name: &str, expected: Value) -> Self {
        assert_eq!(self.body[name], expected, "field {} in {}", name, self.body);
        self
    }

    pub fn array_len(self, expected: usize) -> Self {
        let len = self.body.as_array().map(Vec::len);
        assert_eq!(len, Some(expected), "unexpected array in {}", self.body);
        self
    }

    pub fn is_null(self) -> Self {
        assert!(self.body.is_null(), "expected null, got {}", self.body);
        self
    }

    pub fn body(self) -> Value {
        self.body
    }
}
