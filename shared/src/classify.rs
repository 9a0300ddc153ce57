//! Splits a submitted pick into short, damaged and picked lines

use serde::{Deserialize, Serialize};

use crate::models::{LineReason, LineStatus, OrderLineItem};

/// Category a line is routed to after picking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCategory {
    Short,
    Damaged,
    Picked,
}

/// Lines of one submitted batch, partitioned by category.
///
/// Each sequence keeps the submission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedBatch {
    pub short_items: Vec<OrderLineItem>,
    pub damaged_items: Vec<OrderLineItem>,
    pub picked_items: Vec<OrderLineItem>,
}

impl ClassifiedBatch {
    pub fn is_empty(&self) -> bool {
        self.short_items.is_empty() && self.damaged_items.is_empty() && self.picked_items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.short_items.len() + self.damaged_items.len() + self.picked_items.len()
    }
}

fn is_short(item: &OrderLineItem) -> bool {
    item.reason == Some(LineReason::Short) || item.status == LineStatus::Short
}

fn is_damaged(item: &OrderLineItem) -> bool {
    item.reason == Some(LineReason::Damaged) || item.status == LineStatus::Damaged
}

fn is_picked(item: &OrderLineItem) -> bool {
    item.has_no_reason() && item.status == LineStatus::Picked
}

/// Category of a single line, or `None` when it matches no category.
///
/// A line matching several categories (for example reason `Short` with
/// status `DAMAGED`) goes to the first match in the order
/// Short, Damaged, Picked.
pub fn categorize(item: &OrderLineItem) -> Option<LineCategory> {
    if is_short(item) {
        Some(LineCategory::Short)
    } else if is_damaged(item) {
        Some(LineCategory::Damaged)
    } else if is_picked(item) {
        Some(LineCategory::Picked)
    } else {
        None
    }
}

/// Partition a submitted batch. Lines matching no category are dropped.
pub fn classify(items: &[OrderLineItem]) -> ClassifiedBatch {
    let mut batch = ClassifiedBatch::default();

    for item in items {
        match categorize(item) {
            Some(LineCategory::Short) => batch.short_items.push(item.clone()),
            Some(LineCategory::Damaged) => batch.damaged_items.push(item.clone()),
            Some(LineCategory::Picked) => batch.picked_items.push(item.clone()),
            None => {
                tracing::debug!(
                    serial_no = item.serial_no,
                    status = %item.status,
                    "Dropping line that matches no category"
                );
            }
        }
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(serial_no: u32, status: LineStatus) -> OrderLineItem {
        OrderLineItem::new(serial_no, format!("Product {}", serial_no), Decimal::ONE, 1, status)
    }

    #[test]
    fn test_classify_empty() {
        let batch = classify(&[]);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_classify_by_status() {
        let items = vec![
            line(1, LineStatus::Short),
            line(2, LineStatus::Damaged),
            line(3, LineStatus::Picked),
            line(4, LineStatus::Picked),
        ];

        let batch = classify(&items);
        assert_eq!(batch.short_items, vec![items[0].clone()]);
        assert_eq!(batch.damaged_items, vec![items[1].clone()]);
        assert_eq!(batch.picked_items, vec![items[2].clone(), items[3].clone()]);
    }

    #[test]
    fn test_reason_overrides_picked_status() {
        let short = line(1, LineStatus::Picked).with_reason(LineReason::Short);
        let damaged = line(2, LineStatus::Picked).with_reason(LineReason::Damaged);

        assert_eq!(categorize(&short), Some(LineCategory::Short));
        assert_eq!(categorize(&damaged), Some(LineCategory::Damaged));
    }

    #[test]
    fn test_multi_match_prefers_short_then_damaged() {
        let short_and_damaged = line(1, LineStatus::Damaged).with_reason(LineReason::Short);
        let damaged_reason_short_status = line(2, LineStatus::Short).with_reason(LineReason::Damaged);

        assert_eq!(categorize(&short_and_damaged), Some(LineCategory::Short));
        assert_eq!(categorize(&damaged_reason_short_status), Some(LineCategory::Short));
    }

    #[test]
    fn test_rejected_lines_are_dropped() {
        let items = vec![line(1, LineStatus::Rejected), line(2, LineStatus::Picked)];

        let batch = classify(&items);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.picked_items[0].serial_no, 2);
    }

    #[test]
    fn test_explicit_none_reason_is_picked() {
        let item = line(1, LineStatus::Picked).with_reason(LineReason::None);
        assert_eq!(categorize(&item), Some(LineCategory::Picked));
    }
}
