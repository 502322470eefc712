use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;

/// A subscriber known to the service, keyed by phone number.
///
/// The phone number is the string the USSD gateway supplies, in
/// international format with a leading `+`. It is treated as an opaque
/// primary key; every read and write path uses it verbatim. Rows are
/// created implicitly on the first travel-mode toggle and never deleted.
#[derive(FromRow, Serialize, Default, Clone, Debug)]
pub struct SubscriberModel {
    pub phone_number: String,
    /// Travel-mode flag. Defaults to off for numbers never seen before.
    pub travel_mode: bool,
}

/// A persisted record of a suspicious transaction or a user-submitted
/// fraud report.
///
/// Immutable once created. `created_at` is assigned by the service at
/// insert time and is monotonically non-decreasing per insert; retrieval
/// orders newest-first with the row id as tiebreaker.
#[derive(FromRow, Serialize, Clone, Debug)]
pub struct AlertModel {
    pub id: i64,
    pub phone_number: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// A SIM-swap event for a subscriber.
///
/// Populated by an external system; this service only reads the trailing
/// 24-hour count as a fraud signal.
#[derive(FromRow, Serialize, Clone, Debug)]
pub struct SimSwapModel {
    pub id: i64,
    pub phone_number: String,
    pub swapped_at: DateTime<Utc>,
}
