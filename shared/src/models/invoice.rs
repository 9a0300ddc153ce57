//! Invoice models for short-supplied lines

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{sum_amounts, OrderLineItem};
use crate::types::Clock;

/// Party an invoice for short lines is billed to unless the caller says otherwise
pub const DEFAULT_BILLED_TO: &str = "Store Incharge";

/// Invoice raised for lines that could not be fulfilled from stock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub billed_to: String,
    pub total: Decimal,
    #[serde(default, alias = "items")]
    pub line_items: Vec<OrderLineItem>,
}

impl Invoice {
    /// Build an invoice for the short lines of the current cycle.
    ///
    /// Returns `None` when there is nothing to bill or the total does not fit.
    pub fn from_short_items(
        items: &[OrderLineItem],
        billed_to: &str,
        clock: &impl Clock,
    ) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        let millis = clock.now_millis();
        let total = sum_amounts(items)?;

        Some(Self {
            id: format!("INV-{}", millis),
            date: DateTime::from_timestamp_millis(millis),
            billed_to: billed_to.to_string(),
            total: total.round_dp(2),
            line_items: items.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineStatus;
    use crate::types::FixedClock;

    #[test]
    fn test_invoice_from_short_items() {
        let clock = FixedClock(1_735_000_000_123);
        let items = vec![
            OrderLineItem::new(1, "DOLO 650MG TAB", Decimal::new(206, 2), 30, LineStatus::Short),
            OrderLineItem::new(2, "ECOSPRIN 75MG TAB", Decimal::new(40, 2), 20, LineStatus::Short),
        ];

        let invoice = Invoice::from_short_items(&items, DEFAULT_BILLED_TO, &clock).unwrap();
        assert_eq!(invoice.id, "INV-1735000000123");
        assert_eq!(invoice.billed_to, "Store Incharge");
        assert_eq!(invoice.total, Decimal::new(6980, 2));
        assert_eq!(invoice.line_items.len(), 2);
        assert!(invoice.date.is_some());
    }

    #[test]
    fn test_invoice_requires_items() {
        let clock = FixedClock(1);
        assert!(Invoice::from_short_items(&[], DEFAULT_BILLED_TO, &clock).is_none());
    }

    #[test]
    fn test_invoice_total_overflow() {
        let clock = FixedClock(1);
        let items = vec![
            OrderLineItem::new(1, "A", Decimal::MAX, 1, LineStatus::Short),
            OrderLineItem::new(2, "B", Decimal::ONE, 1, LineStatus::Short),
        ];
        assert!(Invoice::from_short_items(&items, DEFAULT_BILLED_TO, &clock).is_none());
    }
}
