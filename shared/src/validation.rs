//! Validation utilities for order lines
//!
//! Messages are shown to the associate as-is, so they are written for the
//! picking screen rather than for logs.

use crate::models::{line_amount, LineReason, LineStatus, OrderLineItem};

// ============================================================================
// Line Validations
// ============================================================================

/// Validate that the line amount equals `quantity * mrp`
pub fn validate_line_amount(item: &OrderLineItem) -> Result<(), &'static str> {
    match line_amount(item.quantity, item.mrp) {
        None => Err("Line amount is too large"),
        Some(amount) if amount != item.amount => Err("Line amount must equal quantity times MRP"),
        Some(_) => Ok(()),
    }
}

/// Validate that a reason code agrees with the line status
pub fn validate_reason_status(item: &OrderLineItem) -> Result<(), &'static str> {
    match item.reason {
        Some(LineReason::Short) if item.status != LineStatus::Short => {
            Err("Lines with reason Short must have status SHORT")
        }
        Some(LineReason::Damaged) if item.status != LineStatus::Damaged => {
            Err("Lines with reason Damaged must have status DAMAGED")
        }
        _ => Ok(()),
    }
}

/// Validate amount and reason/status together
pub fn validate_line_consistency(item: &OrderLineItem) -> Result<(), &'static str> {
    validate_line_amount(item)?;
    validate_reason_status(item)
}

// ============================================================================
// Picking Validations
// ============================================================================

/// Validate a quantity scanned against what the order still requires
pub fn validate_pick_quantity(required: u32, picked: u32) -> Result<(), &'static str> {
    if picked == 0 {
        return Err("Please enter a valid quantity greater than 0");
    }
    if picked > required {
        return Err("Cannot add more units than the order requires");
    }
    Ok(())
}

/// Short or damaged lines cannot be added to the pick
pub fn validate_pickable(item: &OrderLineItem) -> Result<(), &'static str> {
    if !item.has_no_reason() {
        return Err("Can't add short or damaged product");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(status: LineStatus) -> OrderLineItem {
        OrderLineItem::new(1, "PAN 40MG TAB", Decimal::new(1122, 2), 20, status)
    }

    // ========================================================================
    // Line Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_line_amount_valid() {
        assert!(validate_line_amount(&line(LineStatus::Picked)).is_ok());
    }

    #[test]
    fn test_validate_line_amount_mismatch() {
        let mut item = line(LineStatus::Picked);
        item.amount = Decimal::new(22441, 2);
        assert!(validate_line_amount(&item).is_err());
    }

    #[test]
    fn test_validate_line_amount_overflow() {
        let mut item = line(LineStatus::Picked);
        item.mrp = Decimal::MAX;
        item.quantity = 2;
        item.amount = Decimal::ONE;
        assert_eq!(validate_line_amount(&item), Err("Line amount is too large"));
    }

    #[test]
    fn test_validate_reason_status() {
        assert!(validate_reason_status(&line(LineStatus::Short).with_reason(LineReason::Short)).is_ok());
        assert!(validate_reason_status(&line(LineStatus::Short)).is_ok());
        assert!(validate_reason_status(&line(LineStatus::Picked).with_reason(LineReason::None)).is_ok());
        assert!(validate_reason_status(&line(LineStatus::Picked).with_reason(LineReason::Short)).is_err());
        assert!(validate_reason_status(&line(LineStatus::Short).with_reason(LineReason::Damaged)).is_err());
    }

    // ========================================================================
    // Picking Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_pick_quantity() {
        assert!(validate_pick_quantity(30, 10).is_ok());
        assert!(validate_pick_quantity(30, 30).is_ok());
        assert!(validate_pick_quantity(30, 0).is_err());
        assert!(validate_pick_quantity(30, 31).is_err());
    }

    #[test]
    fn test_validate_pickable() {
        assert!(validate_pickable(&line(LineStatus::Picked)).is_ok());
        assert!(validate_pickable(&line(LineStatus::Short).with_reason(LineReason::Short)).is_err());
    }
}
