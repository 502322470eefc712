//! Fraud evaluation for incoming transactions.

use std::sync::Arc;

use chrono::Duration;
use log::info;
use log::warn;

use crate::notifier::Notifier;
use crate::repository::Repository;
use crate::service::error::ServiceError;

/// Transactions strictly above this amount (KES) trip the high-value signal.
pub const HIGH_VALUE_THRESHOLD: i64 = 50_000;

/// Trailing window for the SIM-swap signal, in hours.
pub const SIM_SWAP_WINDOW_HOURS: i64 = 24;

/// Outcome of evaluating one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FraudVerdict {
    pub flagged: bool,
    /// The alert message recorded for the subscriber, when flagged.
    pub alert: Option<String>,
}

/// Service deciding whether a transaction is suspicious and recording hits.
pub struct FraudService {
    pub db: Arc<Repository>,
    pub notifier: Arc<dyn Notifier>,
}

impl FraudService {
    pub fn new(db: Arc<Repository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    /// Evaluates a transaction for a subscriber.
    ///
    /// Two suspicion signals, combined with OR: a SIM swap within the
    /// trailing 24 hours, or an amount above [`HIGH_VALUE_THRESHOLD`].
    /// A hit records an alert and sends an SMS to the subscriber; the SMS
    /// outcome is logged only. No hit leaves no trace.
    ///
    /// # Performance
    /// * DB calls: 1 (2 when flagged)
    pub async fn evaluate(
        &self,
        phone_number: &str,
        amount: i64,
    ) -> Result<FraudVerdict, ServiceError> {
        let recent_swaps = self
            .db
            .sim_swap
            .count_recent(phone_number, Duration::hours(SIM_SWAP_WINDOW_HOURS))
            .await?;
        let high_value = amount > HIGH_VALUE_THRESHOLD;

        if recent_swaps == 0 && !high_value {
            return Ok(FraudVerdict {
                flagged: false,
                alert: None,
            });
        }

        let message = format!("🚨 Fraud Alert: Suspicious transaction of KES {amount} detected!");
        self.db.alert.insert(phone_number, &message).await?;
        info!(
            "Fraud alert recorded for {phone_number} (recent_swaps={recent_swaps}, high_value={high_value})"
        );

        if let Err(e) = self.notifier.send(phone_number, &message).await {
            warn!("SMS delivery to {phone_number} failed: {e}");
        }

        Ok(FraudVerdict {
            flagged: true,
            alert: Some(message),
        })
    }
}
