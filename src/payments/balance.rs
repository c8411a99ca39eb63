use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::campaigns::models::DONATED_AMOUNT_FIELD;
use crate::shared::AppError;
use crate::store::{Collection, DocumentStore, Update, UpdateResult, WriteMode};

/// Keeps `donatedAmount` on a campaign in step with its payments.
///
/// Each adjustment is a single-document write issued after the payment write,
/// with no transaction spanning the two. A failure or a concurrent write in
/// between leaves the total out of step with the payments, and nothing stops
/// the same payment from being reversed twice.
pub struct BalanceUpdater {
    store: Arc<dyn DocumentStore + Send + Sync>,
}

impl BalanceUpdater {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Adds a donation to the campaign total.
    /// An unknown campaign id gets a stub document holding just the total.
    #[instrument(skip(self))]
    pub async fn record_donation(
        &self,
        campaign_id: &str,
        amount: f64,
    ) -> Result<UpdateResult, AppError> {
        let update = Update::new().inc(DONATED_AMOUNT_FIELD, amount);
        let result = self
            .store
            .update_one(
                Collection::DonationCampaigns,
                campaign_id,
                &update,
                WriteMode::Upsert,
            )
            .await?;

        if result.upserted_id.is_some() {
            warn!(campaign_id = %campaign_id, "Donation recorded against unknown campaign, stub created");
        }
        info!(campaign_id = %campaign_id, amount, "Campaign total incremented");
        Ok(result)
    }

    /// Subtracts a refunded donation from the campaign total. Unknown campaigns are left alone.
    #[instrument(skip(self))]
    pub async fn reverse_donation(
        &self,
        campaign_id: &str,
        amount: f64,
    ) -> Result<UpdateResult, AppError> {
        let update = Update::new().inc(DONATED_AMOUNT_FIELD, -amount);
        let result = self
            .store
            .update_one(
                Collection::DonationCampaigns,
                campaign_id,
                &update,
                WriteMode::UpdateExisting,
            )
            .await?;

        if result.matched_count == 0 {
            warn!(campaign_id = %campaign_id, "Refund references unknown campaign");
        }
        info!(campaign_id = %campaign_id, amount, "Campaign total decremented");
        Ok(result)
    }
}
