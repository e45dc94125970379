//! Calculator - The Effect Runner
//!
//! [`Calculator`] owns an [`Editor`] and a [`CalculatorBackend`]. Surfaces
//! feed it user commands; it applies them to the editor and carries out the
//! resulting effects:
//!
//! - `Refresh` publishes a [`CalculatorMessage::Display`] snapshot
//! - `Calculate` spawns the remote call; its outcome is queued and applied
//!   on the next [`Calculator::poll`]
//! - `NotifyClear` spawns a fire-and-forget `ac` call
//! - `ScheduleErrorReset` / `CancelErrorReset` arm and disarm deadlines that
//!   [`Calculator::poll_at`] fires
//!
//! All editor mutation happens on the caller's task. Spawned calls only ever
//! send their outcome back through a channel.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::backend::{CalculationRequest, CalculatorBackend};
use crate::config::CalculatorConfig;
use crate::editor::{Editor, EditorConfig, Effect, ResetId};
use crate::error::CalculationError;
use crate::evaluation::ChainId;
use crate::events::CalculatorEvent;
use crate::messages::{CalculatorMessage, DisplaySnapshot};

/// Drives an [`Editor`] against a backend
pub struct Calculator<B: CalculatorBackend> {
    /// Calculation backend
    backend: Arc<B>,
    /// Expression state machine
    editor: Editor,
    /// Channel to the UI surface
    tx: mpsc::Sender<CalculatorMessage>,
    /// Outcomes of spawned calls, applied during `poll`
    resolved_tx: mpsc::UnboundedSender<CalculatorEvent>,
    resolved_rx: mpsc::UnboundedReceiver<CalculatorEvent>,
    /// Armed error reset deadlines
    timers: Vec<(Instant, ResetId)>,
    /// Spawned calls whose outcome has not been applied yet
    outstanding: usize,
}

impl<B: CalculatorBackend + 'static> Calculator<B> {
    /// Create a calculator with the editor settings from `config`
    pub fn new(backend: B, config: &CalculatorConfig, tx: mpsc::Sender<CalculatorMessage>) -> Self {
        Self::with_editor_config(backend, config.editor_config(), tx)
    }

    /// Create a calculator with explicit editor settings
    pub fn with_editor_config(
        backend: B,
        editor_config: EditorConfig,
        tx: mpsc::Sender<CalculatorMessage>,
    ) -> Self {
        let (resolved_tx, resolved_rx) = mpsc::unbounded_channel();
        Self {
            backend: Arc::new(backend),
            editor: Editor::new(editor_config),
            tx,
            resolved_tx,
            resolved_rx,
            timers: Vec::new(),
            outstanding: 0,
        }
    }

    /// The editor state
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Current contents of both display regions
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.editor.snapshot()
    }

    /// Whether an evaluation chain is waiting on the service
    pub fn is_evaluating(&self) -> bool {
        self.editor.is_evaluating()
    }

    /// Number of armed error reset timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Publish the initial display and start the background checks
    ///
    /// The health check result comes back through [`Self::poll`]; a failure
    /// shows "Server connection failed". The supported-operations list is
    /// published directly to the surface.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        tracing::info!(backend = self.backend.name(), "Starting calculator");
        self.send(CalculatorMessage::Display(self.editor.snapshot()))
            .await;

        let backend = Arc::clone(&self.backend);
        let resolved = self.resolved_tx.clone();
        let tx = self.tx.clone();
        self.outstanding += 1;
        tokio::spawn(async move {
            let outcome = match backend.health_check().await {
                Ok(text) => {
                    tracing::info!(health = %text.trim(), "Calculation service is up");
                    Ok(text)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Health check failed");
                    Err(CalculationError::Unreachable(e.to_string()))
                }
            };
            let status = CalculatorMessage::BackendStatus {
                backend: backend.name().to_string(),
                healthy: outcome.is_ok(),
                detail: match &outcome {
                    Ok(text) => text.trim().to_string(),
                    Err(e) => e.to_string(),
                },
            };
            if tx.send(status).await.is_err() {
                tracing::debug!("Surface channel closed, dropping backend status");
            }
            if resolved
                .send(CalculatorEvent::HealthChecked { outcome })
                .is_err()
            {
                tracing::debug!("Calculator dropped, discarding health check");
            }
        });

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match backend.supported_operations().await {
                Ok(description) if !description.is_empty() => {
                    tracing::debug!(%description, "Service operations");
                    if tx
                        .send(CalculatorMessage::Operations { description })
                        .await
                        .is_err()
                    {
                        tracing::debug!("Surface channel closed, dropping operations");
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, "Could not list service operations"),
            }
        });

        Ok(())
    }

    /// Apply a user command
    pub async fn handle_event(&mut self, event: CalculatorEvent) -> anyhow::Result<()> {
        if !event.is_user_command() {
            anyhow::bail!("{event:?} is produced internally and cannot be injected");
        }
        self.apply(event).await;
        Ok(())
    }

    /// Apply resolved calls and due timers using the current time
    ///
    /// Returns `true` if anything changed.
    pub async fn poll(&mut self) -> bool {
        self.poll_at(Instant::now()).await
    }

    /// Apply resolved calls and every timer due at `now`
    ///
    /// Returns `true` if anything changed.
    pub async fn poll_at(&mut self, now: Instant) -> bool {
        let mut changed = false;

        while let Ok(event) = self.resolved_rx.try_recv() {
            self.outstanding = self.outstanding.saturating_sub(1);
            self.apply(event).await;
            changed = true;
        }

        let mut due: Vec<(Instant, ResetId)> = Vec::new();
        self.timers.retain(|&(deadline, id)| {
            if deadline <= now {
                due.push((deadline, id));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(deadline, _)| deadline);
        for (_, id) in due {
            self.apply(CalculatorEvent::ErrorResetElapsed { id }).await;
            changed = true;
        }

        changed
    }

    /// Wait until every spawned call has resolved and been applied
    ///
    /// Timers are not fired. Useful for headless drivers and tests.
    pub async fn settle(&mut self) {
        while self.outstanding > 0 {
            match self.resolved_rx.recv().await {
                Some(event) => {
                    self.outstanding -= 1;
                    self.apply(event).await;
                }
                None => break,
            }
        }
    }

    /// Run one event through the editor and execute its effects
    async fn apply(&mut self, event: CalculatorEvent) {
        let effects = self.editor.handle(event);
        for effect in effects {
            self.execute(effect).await;
        }
    }

    async fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::Refresh => {
                self.send(CalculatorMessage::Display(self.editor.snapshot()))
                    .await;
            }
            Effect::Calculate { chain, request } => self.spawn_calculation(chain, request),
            Effect::NotifyClear => self.spawn_clear_notification(),
            Effect::ScheduleErrorReset { id, after } => {
                self.timers.push((Instant::now() + after, id));
            }
            Effect::CancelErrorReset { id } => {
                self.timers.retain(|&(_, armed)| armed != id);
            }
        }
    }

    fn spawn_calculation(&mut self, chain: ChainId, request: CalculationRequest) {
        let backend = Arc::clone(&self.backend);
        let resolved = self.resolved_tx.clone();
        self.outstanding += 1;

        tokio::spawn(async move {
            let outcome = match backend.calculate(&request).await {
                Ok(response) => response.into_outcome(),
                Err(e) => {
                    tracing::warn!(%chain, error = %e, "Calculation request failed");
                    Err(CalculationError::from(e))
                }
            };
            if resolved
                .send(CalculatorEvent::CalculationResolved { chain, outcome })
                .is_err()
            {
                tracing::debug!(%chain, "Calculator dropped, discarding response");
            }
        });
    }

    fn spawn_clear_notification(&self) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.calculate(&CalculationRequest::clear()).await {
                tracing::debug!(error = %e, "Clear notification failed");
            }
        });
    }

    async fn send(&self, message: CalculatorMessage) {
        if self.tx.send(message).await.is_err() {
            tracing::debug!("Surface channel closed, dropping message");
        }
    }
}
