// Public API - what other modules can use
pub use handlers::{
    accept_adoption, create_adoption, delete_adoption, list_owner_adoptions, reject_adoption,
};
pub use service::AdoptionService;

// Internal modules
mod handlers;
pub mod models;
mod service;
pub mod types;
