//! Payment update handler: converges the payment row from provider callbacks.

use tracing::info;

use seatgate_database::Ledger;
use seatgate_entity::payment::PaymentUpdate;

use crate::executor::ProcessError;

/// Upserts payments from `PAYMENT_UPDATE` messages.
#[derive(Debug, Clone)]
pub struct PaymentUpdateHandler {
    ledger: Ledger,
}

impl PaymentUpdateHandler {
    /// Create a new handler.
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Apply one payment callback.
    pub async fn handle(&self, update: PaymentUpdate) -> Result<(), ProcessError> {
        if update.intent_id.trim().is_empty() || update.status.trim().is_empty() {
            return Err(ProcessError::Poison(
                "Payment update without intentId or status".to_string(),
            ));
        }

        let payment = self.ledger.payments.upsert(&update).await?;
        info!(
            intent_id = %payment.intent_id,
            status = %payment.status,
            order_id = ?payment.order_id,
            "Payment updated"
        );
        Ok(())
    }
}
