use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    models::PaymentModel,
    service::PaymentService,
    types::{CreatePaymentRequest, DeletePaymentResponse, RefundPaymentRequest, RefundPaymentResponse},
};
use crate::shared::{AppError, AppState};
use crate::store::InsertOneResult;

/// POST /payments
#[instrument(name = "create_payment", skip(state, request))]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<Json<InsertOneResult>, AppError> {
    info!(
        email = %request.email,
        amount = request.donation_amount,
        pet_id = ?request.pet_id,
        "Recording payment"
    );

    let service = PaymentService::new(Arc::clone(&state.store));
    Ok(Json(service.create_payment(request).await?))
}

/// GET /payments/{email}
#[instrument(name = "list_donor_payments", skip(state))]
pub async fn list_donor_payments(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<PaymentModel>>, AppError> {
    let service = PaymentService::new(Arc::clone(&state.store));
    let payments = service.list_by_donor(&email).await?;

    info!(payment_count = payments.len(), "Donor payments listed");
    Ok(Json(payments))
}

/// GET /payments/user/{petId}
#[instrument(name = "list_campaign_payments", skip(state))]
pub async fn list_campaign_payments(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> Result<Json<Vec<PaymentModel>>, AppError> {
    let service = PaymentService::new(Arc::clone(&state.store));
    Ok(Json(service.list_by_campaign(&campaign_id).await?))
}

/// DELETE /payments/{id}
#[instrument(name = "delete_payment", skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<Json<DeletePaymentResponse>, AppError> {
    let service = PaymentService::new(Arc::clone(&state.store));
    Ok(Json(service.delete_payment(&payment_id).await?))
}

/// PATCH /payments/refund/{id}
/// The body is optional; missing fields are read from the stored payment.
/// A request without a JSON body refunds from stored values; a malformed one is rejected.
#[instrument(name = "refund_payment", skip(state, request))]
pub async fn refund_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    request: Result<Json<RefundPaymentRequest>, JsonRejection>,
) -> Result<Json<RefundPaymentResponse>, AppError> {
    let request = match request {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => RefundPaymentRequest::default(),
        Err(rejection) => {
            warn!(payment_id = %payment_id, error = %rejection.body_text(), "Rejected refund body");
            return Err(AppError::Validation(rejection.body_text()));
        }
    };

    let service = PaymentService::new(Arc::clone(&state.store));
    Ok(Json(service.refund_payment(&payment_id, request).await?))
}
