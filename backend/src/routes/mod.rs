//! Route definitions for the Store Fulfillment server

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Fulfillment workflow
        .nest("/fulfillment", fulfillment_routes())
}

/// Fulfillment workflow routes
fn fulfillment_routes() -> Router<AppState> {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/intents", post(handlers::dispatch_intent))
        // Notification
        .route("/notification/accept", post(handlers::accept_transfer))
        .route("/notification/skip", post(handlers::skip_notification))
        // Steps
        .route("/order/continue", post(handlers::continue_order))
        .route("/invoice", post(handlers::create_invoice))
        .route("/invoice/continue", post(handlers::continue_invoice))
        .route("/transfer/continue", post(handlers::continue_transfer))
        .route("/exit", post(handlers::exit_to_home))
        // Popups
        .route("/popup/dismiss", post(handlers::dismiss_popup))
        .route("/message/dismiss", post(handlers::dismiss_message))
}
