//! Item classifier tests
//!
//! Tests for splitting a submitted pick including:
//! - Categories are disjoint and keep submission order
//! - Every line matching a predicate lands in exactly one category
//! - Rejected lines without a reason are dropped

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::*;

fn line(serial_no: u32, status: LineStatus, reason: Option<LineReason>) -> OrderLineItem {
    let mut item = OrderLineItem::new(serial_no, "PAN 40MG TAB", Decimal::new(1250, 2), 3, status);
    item.reason = reason;
    item
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Test a mixed batch is split by status
    #[test]
    fn test_mixed_batch() {
        let items = vec![
            line(1, LineStatus::Picked, None),
            line(2, LineStatus::Short, Some(LineReason::Short)),
            line(3, LineStatus::Damaged, Some(LineReason::Damaged)),
            line(4, LineStatus::Picked, Some(LineReason::None)),
        ];

        let batch = classify(&items);

        assert_eq!(batch.short_items, vec![items[1].clone()]);
        assert_eq!(batch.damaged_items, vec![items[2].clone()]);
        assert_eq!(batch.picked_items, vec![items[0].clone(), items[3].clone()]);
    }

    /// Test reason alone is enough to route a line
    #[test]
    fn test_reason_routes_without_status() {
        let item = line(1, LineStatus::Picked, Some(LineReason::Damaged));
        assert_eq!(categorize(&item), Some(LineCategory::Damaged));
    }

    /// Test short takes precedence over damaged
    #[test]
    fn test_short_precedence() {
        let item = line(1, LineStatus::Damaged, Some(LineReason::Short));
        assert_eq!(categorize(&item), Some(LineCategory::Short));
    }

    /// Test rejected lines are dropped
    #[test]
    fn test_rejected_dropped() {
        let items = vec![line(1, LineStatus::Rejected, None)];
        let batch = classify(&items);

        assert!(batch.is_empty());
    }

    /// Test empty input
    #[test]
    fn test_empty_batch() {
        let batch = classify(&[]);
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    /// Test line wire names
    #[test]
    fn test_line_from_json() {
        let json = r#"{
            "sNo": 7,
            "productName": "SHELCAL 500 TAB",
            "mrp": "10.50",
            "qty": 2,
            "amount": "21.00",
            "reason": "N/A",
            "status": "REJECTED/BOUNCED"
        }"#;

        let item: OrderLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.serial_no, 7);
        assert_eq!(item.reason, Some(LineReason::None));
        assert_eq!(item.status, LineStatus::Rejected);
        assert_eq!(categorize(&item), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = LineStatus> {
        prop_oneof![
            Just(LineStatus::Picked),
            Just(LineStatus::Short),
            Just(LineStatus::Damaged),
            Just(LineStatus::Rejected),
        ]
    }

    fn reason_strategy() -> impl Strategy<Value = Option<LineReason>> {
        prop_oneof![
            Just(None),
            Just(Some(LineReason::None)),
            Just(Some(LineReason::Short)),
            Just(Some(LineReason::Damaged)),
        ]
    }

    fn items_strategy() -> impl Strategy<Value = Vec<OrderLineItem>> {
        prop::collection::vec((status_strategy(), reason_strategy()), 0..30).prop_map(|lines| {
            lines
                .into_iter()
                .enumerate()
                .map(|(i, (status, reason))| line(i as u32 + 1, status, reason))
                .collect()
        })
    }

    fn serials(items: &[OrderLineItem]) -> Vec<u32> {
        items.iter().map(|item| item.serial_no).collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// No line appears in two categories
        #[test]
        fn prop_categories_disjoint(items in items_strategy()) {
            let batch = classify(&items);
            let short = serials(&batch.short_items);
            let damaged = serials(&batch.damaged_items);
            let picked = serials(&batch.picked_items);

            for serial in &short {
                prop_assert!(!damaged.contains(serial));
                prop_assert!(!picked.contains(serial));
            }
            for serial in &damaged {
                prop_assert!(!picked.contains(serial));
            }
        }

        /// Every line matching a predicate is classified, everything else dropped
        #[test]
        fn prop_coverage(items in items_strategy()) {
            let batch = classify(&items);
            let classified = items.iter().filter(|item| categorize(item).is_some()).count();

            prop_assert_eq!(batch.len(), classified);
            prop_assert!(batch.len() <= items.len());
        }

        /// Each category keeps submission order
        #[test]
        fn prop_order_preserved(items in items_strategy()) {
            let batch = classify(&items);

            for category in [&batch.short_items, &batch.damaged_items, &batch.picked_items] {
                let serials = serials(category);
                prop_assert!(serials.windows(2).all(|w| w[0] < w[1]));
            }
        }

        /// A line with status SHORT is always short
        #[test]
        fn prop_short_status_always_short(reason in reason_strategy()) {
            let item = line(1, LineStatus::Short, reason);
            prop_assert_eq!(categorize(&item), Some(LineCategory::Short));
        }
    }
}
