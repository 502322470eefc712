//! HTTP entry points for the USSD gateway and the transaction notifier.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use log::error;
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::service::Services;
use crate::service::menu_service::Screen;

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
}

/// One session step as posted by the USSD gateway.
///
/// `text` carries the entire accumulated input for the session and is
/// absent on the opening step.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UssdRequest {
    #[serde(default)]
    pub session_id: String,
    pub phone_number: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub phone_number: String,
    pub amount: String,
}

pub fn router(services: Arc<Services>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ussd", post(ussd_callback))
        .route("/transaction", post(transaction))
        .with_state(AppState { services })
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Handles one USSD session step.
///
/// The gateway has no concept of an HTTP error: whatever happens, the
/// response is a displayable screen in plain text with the `CON `/`END `
/// prefix.
async fn ussd_callback(State(state): State<AppState>, Form(req): Form<UssdRequest>) -> String {
    match state
        .services
        .menu
        .handle_step(&req.session_id, &req.phone_number, &req.text)
        .await
    {
        Ok(screen) => screen.to_string(),
        Err(e) => {
            error!("Session {} failed: {e}", req.session_id);
            Screen::End("Service temporarily unavailable. Please try again later.".to_string())
                .to_string()
        }
    }
}

/// Runs the fraud evaluator for an incoming transaction.
///
/// The response reports the transaction as processed whether or not fraud
/// was flagged. A non-numeric amount is a client error; anything
/// unexpected maps to a generic server error with the detail kept in the
/// logs.
async fn transaction(
    State(state): State<AppState>,
    Form(req): Form<TransactionRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    info!(
        "Received transaction request: phone={}, amount={}",
        req.phone_number, req.amount
    );

    let amount = match req.amount.trim().parse::<i64>() {
        Ok(amount) => amount,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid amount" })),
            );
        }
    };

    match state.services.fraud.evaluate(&req.phone_number, amount).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "Transaction processed" })),
        ),
        Err(e) => {
            error!("Error processing transaction: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
        }
    }
}
