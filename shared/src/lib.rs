//! Shared workflow core for the Store Fulfillment app
//!
//! This crate holds the fulfillment state machine and everything it depends
//! on. It is used by the backend host and by the browser build (via WASM).

pub mod classify;
pub mod error;
pub mod escalation;
pub mod models;
pub mod transfer_id;
pub mod types;
pub mod validation;
pub mod workflow;

pub use classify::*;
pub use error::*;
pub use escalation::*;
pub use models::*;
pub use transfer_id::*;
pub use types::*;
pub use validation::*;
pub use workflow::*;
