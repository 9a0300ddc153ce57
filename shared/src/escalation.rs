//! Escalation policy for the pending transfer-order notification
//!
//! The notification starts active and may be skipped a limited number of
//! times. Each skip hides it for `popup_interval_seconds`, after which it
//! comes back. On the final allowed display, or when skipping is disabled,
//! it becomes mandatory.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, WorkflowError};

/// Notification limits, loaded once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    pub max_displays: u32,
    pub popup_interval_seconds: f64,
    pub skippable: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_displays: 3,
            popup_interval_seconds: 2.0,
            skippable: true,
        }
    }
}

impl NotificationConfig {
    pub fn new(
        max_displays: u32,
        popup_interval_seconds: f64,
        skippable: bool,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            max_displays,
            popup_interval_seconds,
            skippable,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_displays < 1 {
            return Err(ConfigError::MaxDisplaysTooLow);
        }
        if !self.popup_interval_seconds.is_finite() || self.popup_interval_seconds < 0.0 {
            return Err(ConfigError::InvalidInterval(self.popup_interval_seconds));
        }
        let fits = Duration::try_from_secs_f64(self.popup_interval_seconds)
            .is_ok_and(|interval| u64::try_from(interval.as_millis()).is_ok());
        if !fits {
            return Err(ConfigError::IntervalTooLong(self.popup_interval_seconds));
        }
        Ok(())
    }

    /// Delay before a skipped notification comes back
    pub fn popup_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.popup_interval_seconds.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// [`popup_interval`](Self::popup_interval) in whole milliseconds, saturating
    pub fn popup_interval_millis(&self) -> u64 {
        u64::try_from(self.popup_interval().as_millis()).unwrap_or(u64::MAX)
    }

    /// `times_displayed >= max_displays - 1`
    pub fn is_final_attempt(&self, times_displayed: u32) -> bool {
        times_displayed.saturating_add(1) >= self.max_displays
    }

    pub fn is_skip_allowed(&self, times_displayed: u32) -> bool {
        self.skippable && !self.is_final_attempt(times_displayed)
    }

    pub fn skips_remaining(&self, times_displayed: u32) -> u32 {
        if !self.skippable {
            return 0;
        }
        self.max_displays.saturating_sub(times_displayed.saturating_add(1))
    }

    /// Urgency band by progress through the allowed displays
    pub fn urgency(&self, times_displayed: u32) -> Urgency {
        let current = u64::from(times_displayed) + 1;
        let max = u64::from(self.max_displays);

        if current * 2 < max {
            Urgency::Low
        } else if current < max {
            Urgency::Elevated
        } else {
            Urgency::Final
        }
    }
}

/// How close the associate is to being forced to act
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Elevated,
    Final,
}

/// Phase of the notification as seen by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPhase {
    ActiveSkippable,
    ActiveMandatory,
    Dormant,
}

/// Runtime notification state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationState {
    pub active: bool,
    pub times_displayed: u32,
}

impl Default for NotificationState {
    fn default() -> Self {
        Self {
            active: true,
            times_displayed: 0,
        }
    }
}

impl NotificationState {
    pub fn is_mandatory(&self, config: &NotificationConfig) -> bool {
        self.active && (config.is_final_attempt(self.times_displayed) || !config.skippable)
    }

    pub fn is_skip_allowed(&self, config: &NotificationConfig) -> bool {
        config.is_skip_allowed(self.times_displayed)
    }

    pub fn phase(&self, config: &NotificationConfig) -> NotificationPhase {
        if !self.active {
            NotificationPhase::Dormant
        } else if self.is_mandatory(config) {
            NotificationPhase::ActiveMandatory
        } else {
            NotificationPhase::ActiveSkippable
        }
    }

    /// Count the skip and hide the notification until it is reactivated
    pub fn skip(&mut self, config: &NotificationConfig) -> Result<(), WorkflowError> {
        if !self.active {
            return Err(WorkflowError::NotificationInactive);
        }
        if !self.is_skip_allowed(config) {
            return Err(WorkflowError::SkipNotAllowed {
                times_displayed: self.times_displayed,
                max_displays: config.max_displays,
            });
        }

        self.times_displayed += 1;
        self.active = false;
        Ok(())
    }

    pub fn accept(&mut self) -> Result<(), WorkflowError> {
        if !self.active {
            return Err(WorkflowError::NotificationInactive);
        }
        self.active = false;
        Ok(())
    }

    pub fn reactivate(&mut self) {
        self.active = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Handle for one pending reactivation.
///
/// The workflow only honours a ticket whose epoch is still current; any reset,
/// accept or earlier fire moves the epoch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactivationTicket {
    pub epoch: u64,
    pub delay_ms: u64,
}

impl ReactivationTicket {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Notification fields handed to the view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub active: bool,
    pub phase: NotificationPhase,
    pub mandatory: bool,
    pub skip_allowed: bool,
    pub skips_remaining: u32,
    pub times_displayed: u32,
    pub max_displays: u32,
    pub urgency: Urgency,
    pub headline: String,
    pub detail: String,
}

impl NotificationView {
    pub fn new(state: &NotificationState, config: &NotificationConfig) -> Self {
        let mandatory = state.is_mandatory(config);
        let skip_allowed = state.is_skip_allowed(config);
        let skips_remaining = config.skips_remaining(state.times_displayed);

        let headline = format!(
            "FULFILLMENT REQUIRED ({})",
            if mandatory { "MANDATORY" } else { "PENDING" }
        );
        let detail = if skip_allowed {
            format!("({} skips left)", skips_remaining)
        } else if mandatory {
            "FINAL WARNING: ACTION REQUIRED".to_string()
        } else {
            "MANDATORY ACTION REQUIRED".to_string()
        };

        Self {
            active: state.active,
            phase: state.phase(config),
            mandatory,
            skip_allowed,
            skips_remaining,
            times_displayed: state.times_displayed,
            max_displays: config.max_displays,
            urgency: config.urgency(state.times_displayed),
            headline,
            detail,
        }
    }
}
