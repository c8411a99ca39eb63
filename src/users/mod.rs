// Public API - what other modules can use
pub use handlers::{check_admin, create_user, list_users, make_admin};
pub use service::UserService;

// Internal modules
mod handlers;
pub mod models;
mod service;
pub mod types;
