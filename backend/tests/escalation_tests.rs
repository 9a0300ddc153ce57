//! Notification escalation tests
//!
//! Tests for the skip/mandatory policy including:
//! - Mandatory exactly from the final allowed display
//! - Skips are refused once mandatory or when skipping is disabled
//! - Reactivation tickets from a finished cycle are ignored

use proptest::prelude::*;
use shared::*;

fn workflow(config: NotificationConfig) -> Workflow<FixedClock> {
    Workflow::with_clock(config, FixedClock(1_735_000_000_000))
}

/// Skip and let the timer fire
fn skip_and_return(wf: &mut Workflow<FixedClock>) -> Result<(), WorkflowError> {
    match wf.skip_notification()? {
        TimerCommand::Schedule { ticket } => {
            assert!(wf.reactivate(ticket));
            Ok(())
        }
        other => panic!("skip returned {:?}", other),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Three skips with max_displays=3: the third is refused
    #[test]
    fn test_third_skip_rejected() {
        let mut wf = workflow(NotificationConfig::new(3, 2.0, true).unwrap());

        assert!(!wf.is_mandatory());
        skip_and_return(&mut wf).unwrap();
        assert!(!wf.is_mandatory());
        skip_and_return(&mut wf).unwrap();

        assert_eq!(wf.notification().times_displayed, 2);
        assert!(wf.is_mandatory());
        assert_eq!(
            wf.skip_notification(),
            Err(WorkflowError::SkipNotAllowed {
                times_displayed: 2,
                max_displays: 3
            })
        );
        assert_eq!(wf.notification().times_displayed, 2);
    }

    /// Unskippable notifications are mandatory from the first display
    #[test]
    fn test_not_skippable() {
        let mut wf = workflow(NotificationConfig::new(5, 2.0, false).unwrap());

        assert!(wf.is_mandatory());
        assert!(wf.skip_notification().is_err());
        assert!(wf.accept_transfer().is_ok());
    }

    /// A single allowed display is mandatory immediately
    #[test]
    fn test_single_display() {
        let wf = workflow(NotificationConfig::new(1, 2.0, true).unwrap());
        assert!(wf.is_mandatory());
    }

    /// Skipping a hidden notification is refused
    #[test]
    fn test_skip_while_hidden() {
        let mut wf = workflow(NotificationConfig::default());
        wf.skip_notification().unwrap();

        assert_eq!(wf.skip_notification(), Err(WorkflowError::NotificationInactive));
    }

    /// Interval comes from configuration
    #[test]
    fn test_ticket_delay() {
        let mut wf = workflow(NotificationConfig::new(3, 0.5, true).unwrap());

        match wf.skip_notification().unwrap() {
            TimerCommand::Schedule { ticket } => assert_eq!(ticket.delay_ms, 500),
            other => panic!("unexpected {:?}", other),
        }
    }

    /// A ticket issued before exit does not revive the notification
    #[test]
    fn test_stale_ticket_after_exit() {
        let mut wf = workflow(NotificationConfig::default());
        let ticket = match wf.skip_notification().unwrap() {
            TimerCommand::Schedule { ticket } => ticket,
            other => panic!("unexpected {:?}", other),
        };

        assert_eq!(wf.exit_to_home(), TimerCommand::Cancel);
        wf.skip_notification().unwrap();

        assert!(!wf.reactivate(ticket));
        assert!(!wf.notification().active);
    }

    /// Invalid configuration is rejected
    #[test]
    fn test_invalid_config() {
        assert_eq!(
            NotificationConfig::new(0, 2.0, true),
            Err(ConfigError::MaxDisplaysTooLow)
        );
        assert!(NotificationConfig::new(3, -1.0, true).is_err());
        assert!(NotificationConfig::new(3, f64::NAN, true).is_err());
    }

    /// Headline switches when the notification becomes mandatory
    #[test]
    fn test_view_headline() {
        let config = NotificationConfig::default();
        let mut state = NotificationState::default();

        let view = NotificationView::new(&state, &config);
        assert_eq!(view.headline, "FULFILLMENT REQUIRED (PENDING)");
        assert_eq!(view.skips_remaining, 2);

        state.times_displayed = 2;
        let view = NotificationView::new(&state, &config);
        assert_eq!(view.headline, "FULFILLMENT REQUIRED (MANDATORY)");
        assert_eq!(view.urgency, Urgency::Final);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn max_displays_strategy() -> impl Strategy<Value = u32> {
        1u32..10
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Mandatory iff active and on the final allowed display
        #[test]
        fn prop_mandatory_threshold(max_displays in max_displays_strategy(), times_displayed in 0u32..12) {
            let config = NotificationConfig::new(max_displays, 2.0, true).unwrap();
            let state = NotificationState { active: true, times_displayed };

            prop_assert_eq!(
                state.is_mandatory(&config),
                times_displayed >= max_displays - 1
            );
        }

        /// Exactly max_displays - 1 skips are accepted
        #[test]
        fn prop_skip_budget(max_displays in max_displays_strategy()) {
            let mut wf = workflow(NotificationConfig::new(max_displays, 2.0, true).unwrap());

            let mut accepted = 0;
            while skip_and_return(&mut wf).is_ok() {
                accepted += 1;
                prop_assert!(accepted < max_displays);
            }

            prop_assert_eq!(accepted, max_displays - 1);
            prop_assert!(wf.is_mandatory());
        }

        /// Hidden notifications are never mandatory
        #[test]
        fn prop_hidden_never_mandatory(max_displays in max_displays_strategy(), times_displayed in 0u32..12, skippable in any::<bool>()) {
            let config = NotificationConfig::new(max_displays, 2.0, skippable).unwrap();
            let state = NotificationState { active: false, times_displayed };

            prop_assert!(!state.is_mandatory(&config));
            prop_assert_eq!(state.phase(&config), NotificationPhase::Dormant);
        }
    }
}
