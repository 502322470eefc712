pub mod error;
pub mod sms_notifier;

use crate::notifier::error::NotifierError;

/// Outbound text message delivery to a phone number.
///
/// Delivery is fire-and-forget: callers log a failed send and carry on,
/// the outcome never affects the screen or response they return.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, phone_number: &str, message: &str) -> Result<(), NotifierError>;
}
