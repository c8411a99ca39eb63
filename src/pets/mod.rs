// Public API - what other modules can use
pub use handlers::{
    create_pet, delete_pet, get_pet, list_owner_pets, list_pets, set_pet_adopted, update_pet,
};
pub use service::PetService;

// Internal modules
mod handlers;
pub mod models;
mod service;
pub mod types;
