//! Business logic services for the Store Fulfillment server

pub mod fulfillment;

pub use fulfillment::FulfillmentService;
