// Public API - what other modules can use
pub use handlers::issue_token;
pub use middleware::{jwt_auth, require_admin};
pub use token::TokenConfig;
pub use types::{SessionClaims, TokenResponse};

// Internal modules
mod handlers;
mod middleware;
mod token;
mod types;
