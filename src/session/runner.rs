//! Operation runner: bridges UI commands to the async controller.
//!
//! [`OperationRunner`] receives [`OperationCommand`]s over a
//! `tokio::sync::mpsc` channel and spawns each one as its own task, reporting
//! an [`OperationOutcome`] back over a second channel.
//!
//! ```text
//! UI ──OperationCommand──▶ run() ──spawn──▶ controller.execute(cmd)
//!                                               │
//! UI ◀──OperationOutcome───────────────────────┘
//! ```
//!
//! Commands are not queued behind one another: a command that arrives while
//! another is in flight reaches the controller immediately and is rejected
//! with `OperationInProgress`.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::controller::{ControllerError, OperationCommand, TextOperationController};
use super::state::Operation;

/// Result of one command, delivered back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    pub operation: Operation,
    pub result: Result<(), ControllerError>,
}

/// Drives controller operations on the tokio runtime.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tokio::sync::mpsc;
/// use text_processor::capability::UnavailableProvider;
/// use text_processor::session::{OperationCommand, OperationRunner, TextOperationController};
///
/// # async fn example() {
/// let controller = Arc::new(TextOperationController::new(Arc::new(UnavailableProvider)));
/// let (command_tx, command_rx) = mpsc::channel(16);
/// let (outcome_tx, mut outcome_rx) = mpsc::channel(16);
///
/// tokio::spawn(OperationRunner::new(controller).run(command_rx, outcome_tx));
///
/// command_tx.send(OperationCommand::Summarize).await.unwrap();
/// let outcome = outcome_rx.recv().await.unwrap();
/// assert!(outcome.result.is_err());
/// # }
/// ```
pub struct OperationRunner {
    controller: Arc<TextOperationController>,
}

impl OperationRunner {
    pub fn new(controller: Arc<TextOperationController>) -> Self {
        Self { controller }
    }

    /// Run until `command_rx` is closed.
    ///
    /// Operations already spawned keep running after this returns and still
    /// report their outcome.
    pub async fn run(
        self,
        mut command_rx: mpsc::Receiver<OperationCommand>,
        outcome_tx: mpsc::Sender<OperationOutcome>,
    ) {
        while let Some(command) = command_rx.recv().await {
            log::debug!("runner: {command:?}");

            let controller = Arc::clone(&self.controller);
            let outcome_tx = outcome_tx.clone();

            tokio::spawn(async move {
                let operation = command.operation();
                let result = controller.execute(command).await;
                if let Err(e) = &result {
                    log::warn!("{} failed: {e}", operation.label());
                }
                // The UI may already be gone; nothing to do then.
                let _ = outcome_tx.send(OperationOutcome { operation, result }).await;
            });
        }

        log::info!("runner: command channel closed, shutting down");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
