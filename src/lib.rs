// Library crate for the pet adoption server
// This file exposes the public API for integration tests

pub mod admin;
pub mod adoptions;
pub mod campaigns;
pub mod config;
pub mod payments;
pub mod pets;
pub mod routes;
pub mod session;
pub mod shared;
pub mod store;
pub mod users;

// Re-export commonly used types for easier access in tests
pub use config::{AppConfig, ConfigError};
pub use routes::app_router;
pub use session::{SessionClaims, TokenConfig};
pub use shared::{AppError, AppState};
pub use store::{Collection, DocumentStore, InMemoryDocumentStore, PostgresDocumentStore};
