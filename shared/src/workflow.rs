//! Fulfillment workflow state machine
//!
//! One `Workflow` value owns the whole session: the pending notification, the
//! current screen, the lines stashed for later steps and the running summary.
//! Views read a [`RenderModel`] and send back [`Intent`]s; nothing else
//! mutates the state.
//!
//! A cycle runs `Home -> Order -> [Invoice] -> [Transfer damaged] ->
//! [Transfer picked] -> Home`, where each bracketed step only happens when the
//! matching line category is non-empty. Finishing a cycle leaves a
//! [`CompletedCycle`] (popup + summary) and resets everything else.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classify::{classify, ClassifiedBatch};
use crate::error::WorkflowError;
use crate::escalation::{NotificationConfig, NotificationState, NotificationView, ReactivationTicket};
use crate::models::{
    line_amount, lines_total, sum_amounts, FinalPopup, Invoice, OrderLineItem, SummaryPatch,
    SummaryRecord, DEFAULT_BILLED_TO,
};
use crate::transfer_id::{TransferIdGenerator, DAMAGED_TRANSFER_PREFIX, PICKED_TRANSFER_PREFIX};
use crate::types::{Clock, SystemClock};
use crate::validation::validate_line_consistency;

pub const NOTHING_TO_PROCESS: &str = "No products to process";
pub const NOTHING_TO_INVOICE: &str = "No items to invoice.";
pub const AMOUNT_OUT_OF_RANGE: &str = "Line amounts are too large to process";

/// Screen currently shown to the associate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Home,
    Order,
    InvoiceStep,
    TransferStep,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Home => write!(f, "home"),
            Screen::Order => write!(f, "order"),
            Screen::InvoiceStep => write!(f, "invoice"),
            Screen::TransferStep => write!(f, "transfer"),
        }
    }
}

/// Branch of the multi-step flow in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveStep {
    Invoicing,
    TransferringDamaged,
    TransferringPicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Stage {
    #[default]
    Home,
    Order,
    Step(ActiveStep),
}

/// Per-cycle workflow state. `Default` is the idle state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    stage: Stage,
    pub invoice_items: Vec<OrderLineItem>,
    pub damaged_items: Vec<OrderLineItem>,
    pub picked_items: Vec<OrderLineItem>,
    pub summary: SummaryRecord,
}

impl WorkflowState {
    pub fn current_screen(&self) -> Screen {
        match self.stage {
            Stage::Home => Screen::Home,
            Stage::Order => Screen::Order,
            Stage::Step(ActiveStep::Invoicing) => Screen::InvoiceStep,
            Stage::Step(_) => Screen::TransferStep,
        }
    }

    /// Defined exactly when the screen is the invoice or transfer step
    pub fn active_step(&self) -> Option<ActiveStep> {
        match self.stage {
            Stage::Step(step) => Some(step),
            _ => None,
        }
    }

    /// Lines the current screen works on
    pub fn items_on_screen(&self) -> &[OrderLineItem] {
        match self.stage {
            Stage::Step(ActiveStep::Invoicing) => &self.invoice_items,
            Stage::Step(ActiveStep::TransferringDamaged) => &self.damaged_items,
            Stage::Step(ActiveStep::TransferringPicked) => &self.picked_items,
            _ => &[],
        }
    }

    fn stash(&mut self, batch: ClassifiedBatch, step: ActiveStep) {
        self.invoice_items = batch.short_items;
        self.damaged_items = batch.damaged_items;
        self.picked_items = batch.picked_items;
        self.stage = Stage::Step(step);
    }

    /// Next transfer step after the current one, if any lines remain
    fn next_transfer_step(&self) -> Option<ActiveStep> {
        if !self.damaged_items.is_empty() {
            Some(ActiveStep::TransferringDamaged)
        } else if !self.picked_items.is_empty() {
            Some(ActiveStep::TransferringPicked)
        } else {
            None
        }
    }
}

/// Result of a finished cycle, kept until the popup is dismissed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedCycle {
    pub popup: FinalPopup,
    pub summary: SummaryRecord,
}

/// User intents emitted by the views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    AcceptTransfer,
    SkipNotification,
    ContinueOrder {
        #[serde(default)]
        items: Vec<OrderLineItem>,
    },
    CreateInvoice {
        #[serde(default)]
        billed_to: Option<String>,
    },
    ContinueInvoice {
        #[serde(default)]
        invoice: Option<Invoice>,
    },
    ContinueTransfer,
    ExitToHome,
    DismissPopup,
    DismissMessage,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::AcceptTransfer => "accept_transfer",
            Intent::SkipNotification => "skip_notification",
            Intent::ContinueOrder { .. } => "continue_order",
            Intent::CreateInvoice { .. } => "create_invoice",
            Intent::ContinueInvoice { .. } => "continue_invoice",
            Intent::ContinueTransfer => "continue_transfer",
            Intent::ExitToHome => "exit_to_home",
            Intent::DismissPopup => "dismiss_popup",
            Intent::DismissMessage => "dismiss_message",
        }
    }
}

/// What the host must do with the reactivation timer after an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerCommand {
    Unchanged,
    Schedule { ticket: ReactivationTicket },
    Cancel,
}

/// Read-only model handed to the views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub screen: Screen,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_step: Option<ActiveStep>,
    pub items: Vec<OrderLineItem>,
    pub items_total: Decimal,
    pub notification: NotificationView,
    /// The notification is hidden while a completion popup is on screen
    pub notification_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_popup: Option<FinalPopup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRecord>,
}

/// The fulfillment orchestrator
#[derive(Debug)]
pub struct Workflow<C: Clock = SystemClock> {
    config: NotificationConfig,
    billed_to: String,
    clock: C,
    state: WorkflowState,
    notification: NotificationState,
    completed: Option<CompletedCycle>,
    message: Option<String>,
    transfer_ids: TransferIdGenerator,
    epoch: u64,
    cycles_completed: u64,
}

impl Workflow<SystemClock> {
    pub fn new(config: NotificationConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Workflow<C> {
    pub fn with_clock(config: NotificationConfig, clock: C) -> Self {
        Self {
            config,
            billed_to: DEFAULT_BILLED_TO.to_string(),
            clock,
            state: WorkflowState::default(),
            notification: NotificationState::default(),
            completed: None,
            message: None,
            transfer_ids: TransferIdGenerator::default(),
            epoch: 0,
            cycles_completed: 0,
        }
    }

    /// Party invoices are billed to when the view does not name one
    pub fn with_billed_to(mut self, billed_to: impl Into<String>) -> Self {
        self.billed_to = billed_to.into();
        self
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn notification(&self) -> &NotificationState {
        &self.notification
    }

    pub fn completed(&self) -> Option<&CompletedCycle> {
        self.completed.as_ref()
    }

    pub fn final_popup(&self) -> Option<&FinalPopup> {
        self.completed.as_ref().map(|cycle| &cycle.popup)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn is_mandatory(&self) -> bool {
        self.notification.is_mandatory(&self.config)
    }

    /// Dispatch a view intent
    pub fn apply(&mut self, intent: Intent) -> Result<TimerCommand, WorkflowError> {
        let name = intent.name();
        let result = match intent {
            Intent::AcceptTransfer => self.accept_transfer(),
            Intent::SkipNotification => self.skip_notification(),
            Intent::ContinueOrder { items } => self.continue_order(&items),
            Intent::CreateInvoice { billed_to } => self.create_invoice(billed_to.as_deref()),
            Intent::ContinueInvoice { invoice } => self.continue_invoice(invoice),
            Intent::ContinueTransfer => self.continue_transfer(),
            Intent::ExitToHome => Ok(self.exit_to_home()),
            Intent::DismissPopup => Ok(self.dismiss_popup()),
            Intent::DismissMessage => Ok(self.dismiss_message()),
        };

        if let Err(err) = &result {
            tracing::warn!(intent = name, error = %err, "Intent rejected");
        }
        result
    }

    /// Accept the pending transfer order and open the order screen
    pub fn accept_transfer(&mut self) -> Result<TimerCommand, WorkflowError> {
        self.ensure_no_popup()?;
        self.ensure_stage("accept_transfer", |stage| stage == Stage::Home)?;
        self.notification.accept()?;

        self.epoch += 1;
        self.message = None;
        self.state.stage = Stage::Order;
        tracing::info!(
            times_displayed = self.notification.times_displayed,
            "Transfer order accepted"
        );
        Ok(TimerCommand::Unchanged)
    }

    /// Skip the notification; the returned command schedules its return
    pub fn skip_notification(&mut self) -> Result<TimerCommand, WorkflowError> {
        self.ensure_no_popup()?;
        self.notification.skip(&self.config)?;

        let ticket = ReactivationTicket {
            epoch: self.epoch,
            delay_ms: self.config.popup_interval_millis(),
        };
        tracing::info!(
            times_displayed = self.notification.times_displayed,
            max_displays = self.config.max_displays,
            "Transfer order skipped"
        );
        Ok(TimerCommand::Schedule { ticket })
    }

    /// Bring a skipped notification back. Stale tickets are ignored.
    pub fn reactivate(&mut self, ticket: ReactivationTicket) -> bool {
        if ticket.epoch != self.epoch || self.notification.active {
            tracing::debug!(
                ticket_epoch = ticket.epoch,
                current_epoch = self.epoch,
                "Ignoring stale reactivation"
            );
            return false;
        }

        self.epoch += 1;
        self.notification.reactivate();
        tracing::debug!(
            mandatory = self.is_mandatory(),
            "Notification reactivated"
        );
        true
    }

    /// Route the submitted pick to the first applicable step
    pub fn continue_order(
        &mut self,
        items: &[OrderLineItem],
    ) -> Result<TimerCommand, WorkflowError> {
        self.ensure_stage("continue_order", |stage| stage == Stage::Order)?;

        for item in items {
            if let Err(reason) = validate_line_consistency(item) {
                tracing::warn!(serial_no = item.serial_no, reason, "Inconsistent order line");
            }
        }

        let batch = classify(items);
        if !amounts_fit(&batch) {
            tracing::warn!("Order line amounts overflow, pick not accepted");
            self.message = Some(AMOUNT_OUT_OF_RANGE.to_string());
            return Ok(TimerCommand::Unchanged);
        }
        tracing::debug!(
            short = batch.short_items.len(),
            damaged = batch.damaged_items.len(),
            picked = batch.picked_items.len(),
            dropped = items.len() - batch.len(),
            "Classified order lines"
        );

        let step = if !batch.short_items.is_empty() {
            ActiveStep::Invoicing
        } else if !batch.damaged_items.is_empty() {
            ActiveStep::TransferringDamaged
        } else if !batch.picked_items.is_empty() {
            ActiveStep::TransferringPicked
        } else {
            self.message = Some(NOTHING_TO_PROCESS.to_string());
            return Ok(TimerCommand::Unchanged);
        };

        self.message = None;
        self.state.stash(batch, step);
        tracing::info!(screen = %self.state.current_screen(), ?step, "Order submitted");
        Ok(TimerCommand::Unchanged)
    }

    /// Build the invoice for the short lines and continue with it
    pub fn create_invoice(
        &mut self,
        billed_to: Option<&str>,
    ) -> Result<TimerCommand, WorkflowError> {
        self.ensure_stage("create_invoice", |stage| {
            stage == Stage::Step(ActiveStep::Invoicing)
        })?;

        let billed_to = billed_to.unwrap_or(self.billed_to.as_str());
        match Invoice::from_short_items(&self.state.invoice_items, billed_to, &self.clock) {
            Some(invoice) => {
                tracing::info!(invoice_id = %invoice.id, total = %invoice.total, "Invoice created");
                self.continue_invoice(Some(invoice))
            }
            None => {
                self.message = Some(NOTHING_TO_INVOICE.to_string());
                Ok(TimerCommand::Unchanged)
            }
        }
    }

    /// Record the invoice step and move to the next transfer step
    pub fn continue_invoice(
        &mut self,
        invoice: Option<Invoice>,
    ) -> Result<TimerCommand, WorkflowError> {
        self.ensure_stage("continue_invoice", |stage| {
            stage == Stage::Step(ActiveStep::Invoicing)
        })?;

        let patch = SummaryPatch::default()
            .invoice(invoice)
            .short_items(&self.state.invoice_items)
            .damaged_items(&self.state.damaged_items)
            .picked_items(&self.state.picked_items);
        self.merge_summary(patch);
        self.message = None;

        match self.state.next_transfer_step() {
            Some(step) => {
                self.state.stage = Stage::Step(step);
                tracing::info!(?step, "Invoice step complete");
                Ok(TimerCommand::Unchanged)
            }
            None => Ok(self.finish_cycle()),
        }
    }

    /// Complete the current transfer step
    pub fn continue_transfer(&mut self) -> Result<TimerCommand, WorkflowError> {
        self.ensure_stage("continue_transfer", |stage| {
            matches!(
                stage,
                Stage::Step(ActiveStep::TransferringDamaged | ActiveStep::TransferringPicked)
            )
        })?;

        let finishing_damaged = self.state.stage == Stage::Step(ActiveStep::TransferringDamaged);
        if finishing_damaged && !self.state.picked_items.is_empty() {
            let damaged_id = self.damaged_transfer_id();
            let patch = SummaryPatch::default()
                .damaged_transfer_id(damaged_id)
                .damaged_items(&self.state.damaged_items);
            self.merge_summary(patch);

            self.state.stage = Stage::Step(ActiveStep::TransferringPicked);
            tracing::info!("Damaged transfer complete");
            return Ok(TimerCommand::Unchanged);
        }

        Ok(self.finish_cycle())
    }

    /// Abandon the cycle from any screen
    pub fn exit_to_home(&mut self) -> TimerCommand {
        tracing::info!(screen = %self.state.current_screen(), "Exiting to home");
        self.completed = None;
        self.reset_cycle();
        TimerCommand::Cancel
    }

    pub fn dismiss_popup(&mut self) -> TimerCommand {
        if self.completed.take().is_some() {
            self.notification.reactivate();
        }
        TimerCommand::Unchanged
    }

    pub fn dismiss_message(&mut self) -> TimerCommand {
        self.message = None;
        TimerCommand::Unchanged
    }

    pub fn render(&self) -> RenderModel {
        let items = self.state.items_on_screen().to_vec();
        // Stashed batches passed `amounts_fit`
        let items_total = lines_total(&items).unwrap_or(Decimal::ZERO);

        RenderModel {
            screen: self.state.current_screen(),
            active_step: self.state.active_step(),
            items,
            items_total,
            notification: NotificationView::new(&self.notification, &self.config),
            notification_visible: self.notification.active && self.completed.is_none(),
            final_popup: self.final_popup().cloned(),
            message: self.message.clone(),
            summary: self.completed.as_ref().map(|cycle| cycle.summary.clone()),
        }
    }

    fn ensure_stage(
        &self,
        intent: &'static str,
        allowed: impl Fn(Stage) -> bool,
    ) -> Result<(), WorkflowError> {
        if allowed(self.state.stage) {
            Ok(())
        } else {
            Err(WorkflowError::UnexpectedIntent {
                intent,
                screen: self.state.current_screen(),
            })
        }
    }

    fn ensure_no_popup(&self) -> Result<(), WorkflowError> {
        if self.completed.is_some() {
            return Err(WorkflowError::PopupPending);
        }
        Ok(())
    }

    fn merge_summary(&mut self, patch: SummaryPatch) {
        let summary = std::mem::take(&mut self.state.summary);
        self.state.summary = summary.merge(patch);
    }

    /// Damaged transfer id for this cycle, reusing one already recorded
    fn damaged_transfer_id(&mut self) -> Option<String> {
        if self.state.damaged_items.is_empty() {
            return None;
        }
        let existing = self.state.summary.damaged_transfer_id.clone();
        Some(existing.unwrap_or_else(|| {
            self.transfer_ids.generate(DAMAGED_TRANSFER_PREFIX, &self.clock)
        }))
    }

    fn picked_transfer_id(&mut self) -> Option<String> {
        if self.state.picked_items.is_empty() {
            return None;
        }
        let existing = self.state.summary.picked_transfer_id.clone();
        Some(existing.unwrap_or_else(|| {
            self.transfer_ids.generate(PICKED_TRANSFER_PREFIX, &self.clock)
        }))
    }

    fn finish_cycle(&mut self) -> TimerCommand {
        let damaged_id = self.damaged_transfer_id();
        let picked_id = self.picked_transfer_id();
        let patch = SummaryPatch::default()
            .damaged_items(&self.state.damaged_items)
            .picked_items(&self.state.picked_items)
            .damaged_transfer_id(damaged_id)
            .picked_transfer_id(picked_id);
        self.merge_summary(patch);

        let summary = std::mem::take(&mut self.state.summary);
        let popup = FinalPopup::from_summary(&summary);
        self.cycles_completed += 1;
        tracing::info!(
            cycle = self.cycles_completed,
            invoice_id = ?popup.invoice_id,
            damaged_transfer_id = ?popup.damaged_transfer_id,
            picked_transfer_id = ?popup.picked_transfer_id,
            "Fulfillment cycle complete"
        );

        self.completed = Some(CompletedCycle { popup, summary });
        self.reset_cycle();
        TimerCommand::Cancel
    }

    fn reset_cycle(&mut self) {
        self.state = WorkflowState::default();
        self.notification.reset();
        self.transfer_ids.reset();
        self.message = None;
        self.epoch += 1;
    }
}

/// Every amount and total a later step computes for this batch fits in a `Decimal`
fn amounts_fit(batch: &ClassifiedBatch) -> bool {
    let lines = [&batch.short_items, &batch.damaged_items, &batch.picked_items];
    lines.iter().all(|items| {
        items
            .iter()
            .all(|item| line_amount(item.quantity, item.mrp).is_some())
            && sum_amounts(items.iter()).is_some()
            && lines_total(items).is_some()
    })
}
