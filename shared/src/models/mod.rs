//! Domain models for the store fulfillment workflow

mod invoice;
mod order;
mod summary;

pub use invoice::*;
pub use order::*;
pub use summary::*;
