use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::constants::{CHARGE_SUCCESS_EVENT, CURRENCY_SUBUNITS, PAYMENT_AMOUNT};
use crate::db::{self, businesses};
use crate::email::payment_receipt_email;
use crate::error::{AppError, Result};
use crate::models::BusinessRecord;
use crate::paystack::{Authorization, ChargeRequest, Transaction, WebhookEvent};
use crate::security::verify_paystack_signature;
use crate::AppState;

/// Outcome of a successful verification
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedPayment {
    pub status: String,
    pub amount: u64,
    pub reference: String,
    pub business_id: Option<Uuid>,
    pub email: String,
}

/// Start a charge for `business_id`
///
/// Payment status is left alone; only verification or the webhook moves it.
pub async fn initialize(state: &AppState, business_id: Uuid, email: &str) -> Result<Authorization> {
    let exists = db::run(&state.db, move |db| businesses::get(db, business_id))
        .await?
        .is_some();
    if !exists {
        return Err(AppError::BusinessNotFound);
    }

    let charge = ChargeRequest {
        email: email.to_string(),
        amount: PAYMENT_AMOUNT * CURRENCY_SUBUNITS,
        business_id,
        callback_url: format!("{}/payment/success", state.config.frontend_url),
    };

    let authorization = state
        .gateway
        .initialize(charge)
        .await
        .map_err(AppError::PaymentInitialization)?;

    tracing::info!(
        "Payment initialized for business {} (reference {})",
        business_id,
        authorization.reference
    );

    Ok(authorization)
}

/// Confirm a charge with the gateway and record the outcome
pub async fn verify(state: &AppState, reference: &str) -> Result<VerifiedPayment> {
    let transaction = state
        .gateway
        .verify(reference)
        .await
        .map_err(AppError::PaymentVerification)?;

    let business_id = transaction.business_id();

    if !transaction.is_success() {
        if let Some(id) = business_id {
            let now = Utc::now().timestamp();
            db::run(&state.db, move |db| {
                businesses::modify(db, id, |record| record.mark_failed(now))
            })
            .await?;
        }
        tracing::warn!(
            "Payment {} not successful (gateway status '{}')",
            reference,
            transaction.status
        );
        return Err(AppError::PaymentNotSuccessful);
    }

    match business_id {
        Some(id) => {
            if let Some(record) = mark_paid(state, id, &transaction).await? {
                send_receipt(state, id, &record, &transaction, reference).await;
            } else {
                tracing::warn!("Verified payment {} names unknown business {}", reference, id);
            }
        }
        None => tracing::warn!("Verified payment {} carries no business id", reference),
    }

    Ok(VerifiedPayment {
        status: transaction.status.clone(),
        amount: transaction.amount,
        reference: reference.to_string(),
        business_id,
        email: transaction.customer_email(),
    })
}

/// Handle a gateway push notification
///
/// Only `charge.success` changes state. Anything else, including bodies that
/// do not parse, is acknowledged and ignored so the gateway stops resending.
pub async fn handle_webhook(state: &AppState, signature: Option<&str>, body: &[u8]) -> Result<()> {
    let secret = &state.config.paystack_secret_key;
    let signed = signature.is_some_and(|sig| verify_paystack_signature(body, sig, secret));

    if !signed {
        if state.config.verify_webhook_signatures {
            tracing::warn!("Rejecting webhook with missing or invalid signature");
            return Err(AppError::InvalidWebhookSignature);
        }
        tracing::warn!("Accepting unverified payment webhook");
    }

    let event: WebhookEvent = match serde_json::from_slice(body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Ignoring unparseable webhook body: {}", e);
            return Ok(());
        }
    };

    if event.event != CHARGE_SUCCESS_EVENT {
        tracing::debug!("Ignoring webhook event {}", event.event);
        return Ok(());
    }

    let transaction: Transaction = match serde_json::from_value(event.data) {
        Ok(transaction) => transaction,
        Err(e) => {
            tracing::warn!("Ignoring charge.success with unexpected data: {}", e);
            return Ok(());
        }
    };

    match transaction.business_id() {
        Some(id) => {
            if mark_paid(state, id, &transaction).await?.is_none() {
                tracing::warn!("charge.success for unknown business {}", id);
            }
        }
        None => tracing::warn!("charge.success without business id"),
    }

    Ok(())
}

/// Idempotent: verify and the webhook may both apply the same confirmation
async fn mark_paid(
    state: &AppState,
    business_id: Uuid,
    transaction: &Transaction,
) -> Result<Option<BusinessRecord>> {
    let customer_code = transaction.customer_code();
    let now = Utc::now().timestamp();

    let record = db::run(&state.db, move |db| {
        businesses::modify(db, business_id, |record| record.mark_paid(customer_code, now))
    })
    .await?;

    if record.is_some() {
        tracing::info!("Business {} marked as paid", business_id);
    }

    Ok(record)
}

/// Best effort: the payment is already recorded, so a failed receipt is only logged
async fn send_receipt(
    state: &AppState,
    business_id: Uuid,
    record: &BusinessRecord,
    transaction: &Transaction,
    reference: &str,
) {
    let page_url = format!("{}/b/{}", state.config.frontend_url, business_id);
    let message = payment_receipt_email(
        &record.email,
        &record.name,
        transaction.amount,
        reference,
        &page_url,
        Utc::now().date_naive(),
    );

    if let Err(e) = state.mailer.send(message).await {
        tracing::error!("Failed to send receipt for business {}: {}", business_id, e);
    }
}
