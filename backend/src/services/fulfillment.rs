//! Fulfillment workflow service
//!
//! The workflow is owned by a single actor task. Handlers talk to it through
//! a command queue, so intents are applied strictly one after another and a
//! repeated "continue" from the same screen is rejected instead of applied
//! twice.
//!
//! The actor also owns the notification reactivation timer. A skip spawns a
//! sleeping task guarded by a `CancellationToken`; resets cancel it, and a
//! fire that still races a reset carries a stale ticket the workflow ignores.

use shared::{Clock, Intent, ReactivationTicket, RenderModel, TimerCommand, Workflow, WorkflowError};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

const COMMAND_QUEUE_DEPTH: usize = 64;

/// Handle to the running workflow actor
#[derive(Clone)]
pub struct FulfillmentService {
    commands: mpsc::Sender<Command>,
}

enum Command {
    Apply {
        intent: Intent,
        reply: oneshot::Sender<Result<RenderModel, WorkflowError>>,
    },
    Render {
        reply: oneshot::Sender<RenderModel>,
    },
    Reactivate {
        ticket: ReactivationTicket,
    },
}

impl FulfillmentService {
    /// Start the actor on the current runtime
    pub fn spawn<C>(workflow: Workflow<C>) -> Self
    where
        C: Clock + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let actor = WorkflowActor {
            workflow,
            commands: rx,
            timer_sender: tx.downgrade(),
            pending_timer: None,
        };
        tokio::spawn(actor.run());

        Self { commands: tx }
    }

    /// Apply a view intent and return the updated render model
    pub async fn apply(&self, intent: Intent) -> AppResult<RenderModel> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Apply { intent, reply })
            .await
            .map_err(|_| AppError::WorkflowUnavailable)?;

        let model = response.await.map_err(|_| AppError::WorkflowUnavailable)??;
        Ok(model)
    }

    /// Current render model
    pub async fn render(&self) -> AppResult<RenderModel> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Render { reply })
            .await
            .map_err(|_| AppError::WorkflowUnavailable)?;

        response.await.map_err(|_| AppError::WorkflowUnavailable)
    }
}

struct WorkflowActor<C: Clock> {
    workflow: Workflow<C>,
    commands: mpsc::Receiver<Command>,
    timer_sender: mpsc::WeakSender<Command>,
    pending_timer: Option<CancellationToken>,
}

impl<C: Clock> WorkflowActor<C> {
    async fn run(mut self) {
        tracing::info!(
            max_displays = self.workflow.config().max_displays,
            skippable = self.workflow.config().skippable,
            "Fulfillment workflow started"
        );

        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Apply { intent, reply } => {
                    let result = self
                        .workflow
                        .apply(intent)
                        .map(|timer| {
                            self.handle_timer(timer);
                            self.workflow.render()
                        });
                    let _ = reply.send(result);
                }
                Command::Render { reply } => {
                    let _ = reply.send(self.workflow.render());
                }
                Command::Reactivate { ticket } => {
                    if self.workflow.reactivate(ticket) {
                        self.pending_timer = None;
                    }
                }
            }
        }

        self.cancel_timer();
        tracing::info!("Fulfillment workflow stopped");
    }

    fn handle_timer(&mut self, command: TimerCommand) {
        match command {
            TimerCommand::Unchanged => {}
            TimerCommand::Cancel => self.cancel_timer(),
            TimerCommand::Schedule { ticket } => self.schedule_reactivation(ticket),
        }
    }

    fn schedule_reactivation(&mut self, ticket: ReactivationTicket) {
        self.cancel_timer();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let sender = self.timer_sender.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    tracing::debug!(epoch = ticket.epoch, "Reactivation cancelled");
                }
                _ = tokio::time::sleep(ticket.delay()) => {
                    if let Some(sender) = sender.upgrade() {
                        let _ = sender.send(Command::Reactivate { ticket }).await;
                    }
                }
            }
        });

        tracing::debug!(epoch = ticket.epoch, delay_ms = ticket.delay_ms, "Reactivation scheduled");
        self.pending_timer = Some(token);
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.pending_timer.take() {
            token.cancel();
        }
    }
}
