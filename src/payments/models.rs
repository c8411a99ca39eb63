use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored payment. Refunds flip `refund`; the record is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentModel {
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Donor email
    pub email: String,
    pub donation_amount: f64,
    /// Donation campaign this payment counts towards
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub refund: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}
