//! Privileged listings. Every route here sits behind both the token check and the admin role check.

pub use crate::campaigns::pause_campaign;
pub use handlers::{all_campaigns, all_pets};

mod handlers;
