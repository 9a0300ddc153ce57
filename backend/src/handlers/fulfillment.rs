//! HTTP handlers for the fulfillment workflow endpoints
//!
//! Every mutating endpoint returns the render model after the intent has been
//! applied, so the view can redraw from a single response.

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::{Intent, Invoice, OrderLineItem, RenderModel};

use crate::error::AppResult;
use crate::AppState;

// ============================================================================
// Render Model
// ============================================================================

/// Get the current render model
pub async fn get_state(State(state): State<AppState>) -> AppResult<Json<RenderModel>> {
    let model = state.fulfillment.render().await?;
    Ok(Json(model))
}

/// Apply any intent in its tagged JSON form
pub async fn dispatch_intent(
    State(state): State<AppState>,
    Json(intent): Json<Intent>,
) -> AppResult<Json<RenderModel>> {
    let model = state.fulfillment.apply(intent).await?;
    Ok(Json(model))
}

// ============================================================================
// Notification
// ============================================================================

/// Accept the pending transfer order
pub async fn accept_transfer(State(state): State<AppState>) -> AppResult<Json<RenderModel>> {
    let model = state.fulfillment.apply(Intent::AcceptTransfer).await?;
    Ok(Json(model))
}

/// Skip the pending transfer order notification
pub async fn skip_notification(State(state): State<AppState>) -> AppResult<Json<RenderModel>> {
    let model = state.fulfillment.apply(Intent::SkipNotification).await?;
    Ok(Json(model))
}

// ============================================================================
// Workflow Steps
// ============================================================================

/// Lines submitted from the order screen
#[derive(Debug, Deserialize)]
pub struct ContinueOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLineItem>,
}

/// Submit the picked order
pub async fn continue_order(
    State(state): State<AppState>,
    Json(input): Json<ContinueOrderRequest>,
) -> AppResult<Json<RenderModel>> {
    let model = state
        .fulfillment
        .apply(Intent::ContinueOrder { items: input.items })
        .await?;
    Ok(Json(model))
}

/// Optional override of the invoice recipient
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    pub billed_to: Option<String>,
}

/// Build the invoice for short lines and continue
pub async fn create_invoice(
    State(state): State<AppState>,
    input: Option<Json<CreateInvoiceRequest>>,
) -> AppResult<Json<RenderModel>> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let model = state
        .fulfillment
        .apply(Intent::CreateInvoice {
            billed_to: input.billed_to,
        })
        .await?;
    Ok(Json(model))
}

/// Invoice produced by the view, if any
#[derive(Debug, Default, Deserialize)]
pub struct ContinueInvoiceRequest {
    pub invoice: Option<Invoice>,
}

/// Continue past the invoice step
pub async fn continue_invoice(
    State(state): State<AppState>,
    input: Option<Json<ContinueInvoiceRequest>>,
) -> AppResult<Json<RenderModel>> {
    let input = input.map(|Json(input)| input).unwrap_or_default();
    let model = state
        .fulfillment
        .apply(Intent::ContinueInvoice {
            invoice: input.invoice,
        })
        .await?;
    Ok(Json(model))
}

/// Complete the current transfer step
pub async fn continue_transfer(State(state): State<AppState>) -> AppResult<Json<RenderModel>> {
    let model = state.fulfillment.apply(Intent::ContinueTransfer).await?;
    Ok(Json(model))
}

/// Abandon the cycle and go back home
pub async fn exit_to_home(State(state): State<AppState>) -> AppResult<Json<RenderModel>> {
    let model = state.fulfillment.apply(Intent::ExitToHome).await?;
    Ok(Json(model))
}

// ============================================================================
// Popups
// ============================================================================

/// Close the completion popup
pub async fn dismiss_popup(State(state): State<AppState>) -> AppResult<Json<RenderModel>> {
    let model = state.fulfillment.apply(Intent::DismissPopup).await?;
    Ok(Json(model))
}

/// Close the transient message
pub async fn dismiss_message(State(state): State<AppState>) -> AppResult<Json<RenderModel>> {
    let model = state.fulfillment.apply(Intent::DismissMessage).await?;
    Ok(Json(model))
}
