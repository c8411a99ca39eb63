// Public API - what other modules can use
pub use balance::BalanceUpdater;
pub use handlers::{
    create_payment, delete_payment, list_campaign_payments, list_donor_payments, refund_payment,
};
pub use service::PaymentService;

// Internal modules
mod balance;
mod handlers;
pub mod models;
mod service;
pub mod types;
