//! Order-line models for the picking screen

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line of a transfer order as submitted from the picking screen
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    #[serde(alias = "sNo")]
    pub serial_no: u32,
    pub product_name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub pack: String,
    #[serde(default)]
    pub batch: String,
    /// Unit price
    pub mrp: Decimal,
    #[serde(alias = "qty")]
    pub quantity: u32,
    /// `quantity * mrp`
    pub amount: Decimal,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub reason: Option<LineReason>,
    pub status: LineStatus,
}

/// Reason code attached to a line by the associate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LineReason {
    #[serde(alias = "N/A")]
    None,
    Short,
    Damaged,
}

/// Fulfillment status of a line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineStatus {
    Picked,
    Short,
    Damaged,
    #[serde(alias = "REJECTED/BOUNCED")]
    Rejected,
}

impl std::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineStatus::Picked => write!(f, "PICKED"),
            LineStatus::Short => write!(f, "SHORT"),
            LineStatus::Damaged => write!(f, "DAMAGED"),
            LineStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl OrderLineItem {
    /// Build a line with `amount` derived from `quantity * mrp`.
    ///
    /// An amount that does not fit saturates at `Decimal::MAX`, which
    /// line validation then rejects.
    pub fn new(
        serial_no: u32,
        product_name: impl Into<String>,
        mrp: Decimal,
        quantity: u32,
        status: LineStatus,
    ) -> Self {
        Self {
            serial_no,
            product_name: product_name.into(),
            manufacturer: String::new(),
            pack: String::new(),
            batch: String::new(),
            mrp,
            quantity,
            amount: line_amount(quantity, mrp).unwrap_or(Decimal::MAX),
            barcode: String::new(),
            reason: None,
            status,
        }
    }

    pub fn with_reason(mut self, reason: LineReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// True when the reason is absent or explicitly `None`
    pub fn has_no_reason(&self) -> bool {
        matches!(self.reason, None | Some(LineReason::None))
    }

    pub fn is_rejected(&self) -> bool {
        self.status == LineStatus::Rejected
    }
}

/// Line amount for a quantity at a unit price, `None` if it does not fit
pub fn line_amount(quantity: u32, mrp: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(mrp)
}

/// Sum of the given line amounts, `None` on overflow
pub fn sum_amounts<'a>(items: impl IntoIterator<Item = &'a OrderLineItem>) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.amount))
}

/// Sum of line amounts, skipping rejected lines
pub fn lines_total(items: &[OrderLineItem]) -> Option<Decimal> {
    sum_amounts(items.iter().filter(|item| !item.is_rejected()))
}
