//! Store Fulfillment Workflow - Backend Server
//!
//! Hosts the in-store transfer order workflow: the escalating pickup
//! notification, the picking screen, invoicing of short lines and the
//! damaged/picked stock transfers.

use axum::{routing::get, Router};
use shared::Workflow;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod routes;
mod services;

use config::Config;
use error::AppError;
use services::FulfillmentService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub fulfillment: FulfillmentService,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sfw_server=debug,shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Store Fulfillment Server");
    tracing::info!("Environment: {}", config.environment);

    let notification = config
        .fulfillment
        .notification()
        .map_err(|e| AppError::Configuration(e.to_string()))?;
    tracing::info!(
        max_displays = notification.max_displays,
        popup_interval_seconds = notification.popup_interval_seconds,
        skippable = notification.skippable,
        "Notification policy loaded"
    );

    // Start the workflow actor
    let workflow = Workflow::new(notification).with_billed_to(config.fulfillment.billed_to.clone());
    let fulfillment = FulfillmentService::spawn(workflow);

    // Create application state
    let state = AppState {
        fulfillment,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| AppError::Configuration(format!("invalid server.host: {e}")))?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Store Fulfillment Workflow API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
