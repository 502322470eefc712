//! Session menu state machine for the USSD gateway.
//!
//! Each session step arrives with the entire accumulated input for that
//! session (the gateway resends all prior selections concatenated with `*`
//! on every round trip), so dispatch works on the full string rather than
//! the latest keystroke.

use std::fmt;
use std::sync::Arc;

use log::debug;
use log::warn;

use crate::notifier::Notifier;
use crate::repository::Repository;
use crate::service::error::ServiceError;

/// The text payload returned for one session step.
///
/// Renders with the `CON ` / `END ` prefix the gateway protocol mandates:
/// `Continue` keeps the session open for further input, `End` terminates
/// it after display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Continue(String),
    End(String),
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Continue(body) => write!(f, "CON {body}"),
            Screen::End(body) => write!(f, "END {body}"),
        }
    }
}

/// Service interpreting one menu interaction and producing the next screen.
pub struct MenuService {
    pub db: Arc<Repository>,
    pub notifier: Arc<dyn Notifier>,
}

impl MenuService {
    pub fn new(db: Arc<Repository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    /// Interprets one session step and returns the screen to display.
    ///
    /// Unrecognized input, including stale multi-segment paths replayed by
    /// the gateway, falls through to the "invalid input" screen.
    pub async fn handle_step(
        &self,
        session_id: &str,
        phone_number: &str,
        text: &str,
    ) -> Result<Screen, ServiceError> {
        debug!("Session {session_id}: {phone_number} sent {text:?}");

        match text {
            "" => self.welcome(phone_number).await,
            "1" => self.activate(phone_number).await,
            "2" => self.deactivate(phone_number).await,
            "3" => self.recent_alerts(phone_number).await,
            "99" => Ok(Screen::End(
                "Thank you for using SafiriGuard. Stay safe!".to_string(),
            )),
            _ if text.starts_with("4*") => self.report_fraud(phone_number, &text[2..]).await,
            _ => Ok(Screen::Continue(
                "Invalid input. Try again.\n0. Back".to_string(),
            )),
        }
    }

    /// Top-level menu with the subscriber's current travel-mode status.
    ///
    /// # Performance
    /// * DB calls: 1
    async fn welcome(&self, phone_number: &str) -> Result<Screen, ServiceError> {
        let travel_mode = self.db.subscriber.travel_mode(phone_number).await?;
        let status = if travel_mode { "ON" } else { "OFF" };
        Ok(Screen::Continue(format!(
            "Welcome to SafiriGuard.\n\
             Travel Mode: {status}\n\
             1. Activate Travel Mode\n\
             2. Deactivate Travel Mode\n\
             3. Check Fraud Alerts\n\
             4. Report Fraud\n\
             99. Exit"
        )))
    }

    /// Turns travel mode on, confirming by SMS.
    ///
    /// Idempotent: once the flag is set, repeated calls return the
    /// "already ON" screen without writing or notifying again.
    pub async fn activate(&self, phone_number: &str) -> Result<Screen, ServiceError> {
        if self.db.subscriber.travel_mode(phone_number).await? {
            return Ok(Screen::Continue(
                "Travel Mode is already ON.\n0. Back".to_string(),
            ));
        }

        self.db.subscriber.set_travel_mode(phone_number, true).await?;
        self.notify(
            phone_number,
            "🚨 Travel Mode ACTIVATED! Transactions will require extra security. Stay safe with SafiriGuard.",
        )
        .await;

        Ok(Screen::Continue(
            "Travel Mode Activated! You'll receive an SMS confirmation.\n0. Back".to_string(),
        ))
    }

    /// Turns travel mode off, confirming by SMS. Symmetric to [`Self::activate`].
    pub async fn deactivate(&self, phone_number: &str) -> Result<Screen, ServiceError> {
        if !self.db.subscriber.travel_mode(phone_number).await? {
            return Ok(Screen::Continue(
                "Travel Mode is already OFF.\n0. Back".to_string(),
            ));
        }

        self.db.subscriber.set_travel_mode(phone_number, false).await?;
        self.notify(
            phone_number,
            "🚨 Travel Mode DEACTIVATED. Normal transactions will resume. Stay safe!",
        )
        .await;

        Ok(Screen::Continue(
            "Travel Mode Deactivated! You'll receive an SMS confirmation.\n0. Back".to_string(),
        ))
    }

    /// Renders the 3 most recent alerts for the subscriber, newest first.
    /// Read-only.
    ///
    /// # Performance
    /// * DB calls: 1
    pub async fn recent_alerts(&self, phone_number: &str) -> Result<Screen, ServiceError> {
        let alerts = self.db.alert.recent(phone_number, 3).await?;

        if alerts.is_empty() {
            return Ok(Screen::Continue(
                "No fraud alerts found. Stay safe!\n0. Back".to_string(),
            ));
        }

        let lines = alerts
            .iter()
            .map(|a| format!("- {}", a.message))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Screen::Continue(format!("Fraud Alerts:\n{lines}\n0. Back")))
    }

    /// Records a free-text fraud report as an alert and acknowledges it.
    pub async fn report_fraud(
        &self,
        phone_number: &str,
        report: &str,
    ) -> Result<Screen, ServiceError> {
        self.db.alert.insert(phone_number, report).await?;
        self.notify(
            phone_number,
            &format!("🚨 Fraud Report Received! '{report}' has been logged for investigation."),
        )
        .await;

        Ok(Screen::End(
            "Thank you! Your fraud report has been submitted.".to_string(),
        ))
    }

    async fn notify(&self, phone_number: &str, message: &str) {
        if let Err(e) = self.notifier.send(phone_number, message).await {
            warn!("SMS delivery to {phone_number} failed: {e}");
        }
    }
}
