use serde::{Deserialize, Serialize};

use crate::shared::{validate_amount, validate_email, AppError};
use crate::store::UpdateResult;

pub const PAYMENT_REMOVED_MESSAGE: &str = "donation removed";
pub const PAYMENT_NOT_FOUND_MESSAGE: &str = "no donation found to remove";

/// Request payload for recording a completed payment
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub email: String,
    pub donation_amount: f64,
    #[serde(default)]
    pub pet_id: Option<String>,
    #[serde(default)]
    pub pet_name: Option<String>,
    #[serde(default)]
    pub pet_image: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

impl CreatePaymentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_email(&self.email)?;
        validate_amount("donationAmount", self.donation_amount)
    }
}

/// Refund details. Fields left out are read from the stored payment.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundPaymentRequest {
    #[serde(default)]
    pub donation_amount: Option<f64>,
    #[serde(default)]
    pub pet_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefundPaymentResponse {
    /// Decrement applied to the campaign total
    pub campaign_result: UpdateResult,
    /// Refund flag written on the payment
    pub payment_result: UpdateResult,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeletePaymentResponse {
    pub deleted_count: u64,
    pub message: String,
}

impl DeletePaymentResponse {
    pub fn from_count(deleted_count: u64) -> Self {
        let message = if deleted_count > 0 {
            PAYMENT_REMOVED_MESSAGE
        } else {
            PAYMENT_NOT_FOUND_MESSAGE
        };
        Self {
            deleted_count,
            message: message.to_string(),
        }
    }
}
