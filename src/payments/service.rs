use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    balance::BalanceUpdater,
    models::PaymentModel,
    types::{CreatePaymentRequest, DeletePaymentResponse, RefundPaymentRequest, RefundPaymentResponse},
};
use crate::shared::{validate_amount, AppError};
use crate::store::{
    from_document, to_document, Collection, DocumentStore, Filter, FindQuery, InsertOneResult,
    Update, WriteMode,
};

const DATE_FIELD: &str = "date";
const REFUND_FIELD: &str = "refund";

/// Service for payment records and their effect on campaign totals
pub struct PaymentService {
    store: Arc<dyn DocumentStore + Send + Sync>,
    balance: BalanceUpdater,
}

impl PaymentService {
    pub fn new(store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        let balance = BalanceUpdater::new(Arc::clone(&store));
        Self { store, balance }
    }

    /// Stores the payment, then adds it to the referenced campaign's total.
    ///
    /// The two writes are independent: if the increment fails the payment
    /// stays recorded and the error is returned to the caller.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> Result<InsertOneResult, AppError> {
        request.validate()?;

        let payment = PaymentModel {
            id: String::new(),
            email: request.email,
            donation_amount: request.donation_amount,
            pet_id: request.pet_id.filter(|id| !id.is_empty()),
            pet_name: request.pet_name,
            pet_image: request.pet_image,
            transaction_id: request.transaction_id,
            refund: false,
            date: Some(Utc::now()),
        };

        let result = self
            .store
            .insert_one(Collection::Payments, to_document(&payment)?)
            .await?;
        info!(payment_id = %result.inserted_id, amount = payment.donation_amount, "Payment recorded");

        if let Some(campaign_id) = &payment.pet_id {
            if payment.donation_amount > 0.0 {
                if let Err(e) = self
                    .balance
                    .record_donation(campaign_id, payment.donation_amount)
                    .await
                {
                    warn!(
                        payment_id = %result.inserted_id,
                        campaign_id = %campaign_id,
                        error = %e,
                        "Payment stored but campaign total not incremented"
                    );
                    return Err(e);
                }
            }
        }

        Ok(result)
    }

    /// Payments made by a donor, newest first
    #[instrument(skip(self))]
    pub async fn list_by_donor(&self, email: &str) -> Result<Vec<PaymentModel>, AppError> {
        self.find(&FindQuery::new(Filter::new().eq("email", email)).sort_desc(DATE_FIELD))
            .await
    }

    /// Payments made towards a campaign, newest first
    #[instrument(skip(self))]
    pub async fn list_by_campaign(&self, campaign_id: &str) -> Result<Vec<PaymentModel>, AppError> {
        self.find(&FindQuery::new(Filter::new().eq("petId", campaign_id)).sort_desc(DATE_FIELD))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_payment(&self, payment_id: &str) -> Result<Option<PaymentModel>, AppError> {
        self.store
            .find_by_id(Collection::Payments, payment_id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Removes the record outright. Campaign totals are not touched.
    #[instrument(skip(self))]
    pub async fn delete_payment(&self, payment_id: &str) -> Result<DeletePaymentResponse, AppError> {
        let result = self.store.delete_one(Collection::Payments, payment_id).await?;
        if result.deleted_count == 0 {
            info!(payment_id = %payment_id, "No payment to delete");
        }
        Ok(DeletePaymentResponse::from_count(result.deleted_count))
    }

    /// Takes the amount back off the campaign, then flags the payment as refunded.
    ///
    /// Amount and campaign come from the request when given, otherwise from
    /// the stored payment. Refunding the same payment twice decrements twice.
    #[instrument(skip(self, request))]
    pub async fn refund_payment(
        &self,
        payment_id: &str,
        request: RefundPaymentRequest,
    ) -> Result<RefundPaymentResponse, AppError> {
        let stored = self.get_payment(payment_id).await?;
        if stored.as_ref().is_some_and(|p| p.refund) {
            warn!(payment_id = %payment_id, "Payment already refunded, reversing again");
        }

        let amount = request
            .donation_amount
            .or_else(|| stored.as_ref().map(|p| p.donation_amount))
            .ok_or_else(|| AppError::Validation("donationAmount is required".to_string()))?;
        validate_amount("donationAmount", amount)?;

        let campaign_id = request
            .pet_id
            .filter(|id| !id.is_empty())
            .or_else(|| stored.and_then(|p| p.pet_id))
            .ok_or_else(|| AppError::Validation("petId is required".to_string()))?;

        let campaign_result = self.balance.reverse_donation(&campaign_id, amount).await?;

        let update = Update::new().set_field(REFUND_FIELD, true);
        let payment_result = self
            .store
            .update_one(Collection::Payments, payment_id, &update, WriteMode::UpdateExisting)
            .await?;

        info!(payment_id = %payment_id, campaign_id = %campaign_id, amount, "Payment refunded");
        Ok(RefundPaymentResponse {
            campaign_result,
            payment_result,
        })
    }

    async fn find(&self, query: &FindQuery) -> Result<Vec<PaymentModel>, AppError> {
        self.store
            .find(Collection::Payments, query)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }
}
