//! Cycle summary and completion popup models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Invoice, OrderLineItem};

/// Everything recorded during one workflow cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Invoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damaged_transfer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_transfer_id: Option<String>,
    pub short_items: Vec<OrderLineItem>,
    pub damaged_items: Vec<OrderLineItem>,
    pub picked_items: Vec<OrderLineItem>,
    pub damaged_count: usize,
    pub picked_count: usize,
}

/// Partial update produced by a single workflow step.
///
/// `None` fields leave the corresponding summary field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryPatch {
    pub invoice: Option<Invoice>,
    pub damaged_transfer_id: Option<String>,
    pub picked_transfer_id: Option<String>,
    pub short_items: Option<Vec<OrderLineItem>>,
    pub damaged_items: Option<Vec<OrderLineItem>>,
    pub picked_items: Option<Vec<OrderLineItem>>,
    pub damaged_count: Option<usize>,
    pub picked_count: Option<usize>,
}

impl SummaryPatch {
    pub fn invoice(mut self, invoice: Option<Invoice>) -> Self {
        self.invoice = invoice;
        self
    }

    pub fn damaged_transfer_id(mut self, id: Option<String>) -> Self {
        self.damaged_transfer_id = id;
        self
    }

    pub fn picked_transfer_id(mut self, id: Option<String>) -> Self {
        self.picked_transfer_id = id;
        self
    }

    pub fn short_items(mut self, items: &[OrderLineItem]) -> Self {
        self.short_items = Some(items.to_vec());
        self
    }

    /// Damaged lines together with their count
    pub fn damaged_items(mut self, items: &[OrderLineItem]) -> Self {
        self.damaged_count = Some(items.len());
        self.damaged_items = Some(items.to_vec());
        self
    }

    /// Picked lines together with their count
    pub fn picked_items(mut self, items: &[OrderLineItem]) -> Self {
        self.picked_count = Some(items.len());
        self.picked_items = Some(items.to_vec());
        self
    }
}

impl SummaryRecord {
    /// Apply a step's patch; fields absent from the patch keep their value
    pub fn merge(self, patch: SummaryPatch) -> Self {
        Self {
            invoice: patch.invoice.or(self.invoice),
            damaged_transfer_id: patch.damaged_transfer_id.or(self.damaged_transfer_id),
            picked_transfer_id: patch.picked_transfer_id.or(self.picked_transfer_id),
            short_items: patch.short_items.unwrap_or(self.short_items),
            damaged_items: patch.damaged_items.unwrap_or(self.damaged_items),
            picked_items: patch.picked_items.unwrap_or(self.picked_items),
            damaged_count: patch.damaged_count.unwrap_or(self.damaged_count),
            picked_count: patch.picked_count.unwrap_or(self.picked_count),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Completion popup shown on the home screen after a cycle finishes.
///
/// Absent fields are omitted from the payload and must not be displayed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinalPopup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damaged_transfer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_transfer_id: Option<String>,
}

impl FinalPopup {
    pub fn from_summary(summary: &SummaryRecord) -> Self {
        Self {
            invoice_id: summary.invoice.as_ref().map(|invoice| invoice.id.clone()),
            invoice_amount: summary.invoice.as_ref().map(|invoice| invoice.total),
            damaged_transfer_id: summary.damaged_transfer_id.clone(),
            picked_transfer_id: summary.picked_transfer_id.clone(),
        }
    }

    /// Labelled lines in display order
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = Vec::new();
        if let Some(id) = &self.invoice_id {
            lines.push(("Invoice", id.clone()));
        }
        if let Some(amount) = self.invoice_amount {
            lines.push(("Amount", format!("₹{}", amount.round_dp(2))));
        }
        if let Some(id) = &self.damaged_transfer_id {
            lines.push(("Damaged Transfer ID", id.clone()));
        }
        if let Some(id) = &self.picked_transfer_id {
            lines.push(("Picked Transfer ID", id.clone()));
        }
        lines
    }
}
