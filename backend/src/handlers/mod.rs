//! HTTP handlers for the Store Fulfillment server

pub mod fulfillment;
pub mod health;

pub use fulfillment::*;
pub use health::*;
