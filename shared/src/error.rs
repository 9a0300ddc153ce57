//! Error types for the fulfillment workflow

use thiserror::Error;

use crate::workflow::Screen;

/// Intent rejected by the workflow. State is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("{intent} is not available on the {screen} screen")]
    UnexpectedIntent { intent: &'static str, screen: Screen },

    #[error("Notification is not active")]
    NotificationInactive,

    #[error("Skip not allowed after {times_displayed} of {max_displays} displays")]
    SkipNotAllowed { times_displayed: u32, max_displays: u32 },

    #[error("Completion popup must be dismissed first")]
    PopupPending,
}

/// Invalid notification configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max_displays must be at least 1")]
    MaxDisplaysTooLow,

    #[error("popup_interval_seconds must be finite and non-negative, got {0}")]
    InvalidInterval(f64),
    #[error("popup_interval_seconds is too large, got {0}")]
    IntervalTooLong(f64),
}
