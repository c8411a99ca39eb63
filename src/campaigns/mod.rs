// Public API - what other modules can use
pub use handlers::{
    create_campaign, delete_campaign, get_campaign, list_campaigns, list_creator_campaigns,
    pause_campaign, recommended_campaigns, update_campaign,
};
pub use service::CampaignService;

// Internal modules
mod handlers;
pub mod models;
mod service;
pub mod types;
