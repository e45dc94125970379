//! Calculator Client
//!
//! Thin wrapper around the embedded [`Calculator`] for TUI integration.
//! The TUI's job is only:
//! 1. Convert terminal input to [`CalculatorEvent`]s
//! 2. Hand them to the calculator
//! 3. Drain [`CalculatorMessage`]s
//! 4. Render them

use tokio::sync::mpsc;

use calculator_core::{
    Calculator, CalculatorBackend, CalculatorConfig, CalculatorEvent, CalculatorMessage,
    DisplaySnapshot, HttpBackend,
};

/// Capacity of the calculator to TUI channel
const MESSAGE_CAPACITY: usize = 256;

/// Client for the embedded calculator
pub struct CalculatorClient<B: CalculatorBackend + 'static = HttpBackend> {
    /// The embedded calculator
    calculator: Calculator<B>,
    /// Receiver for messages from the calculator
    rx: mpsc::Receiver<CalculatorMessage>,
    /// Service root, for the status line
    server_url: String,
}

impl CalculatorClient<HttpBackend> {
    /// Create a client talking to the HTTP service named in `config`
    pub fn from_config(config: &CalculatorConfig) -> anyhow::Result<Self> {
        let backend = HttpBackend::from_config(config)?;
        Ok(Self::new(backend, config))
    }
}

impl<B: CalculatorBackend + 'static> CalculatorClient<B> {
    /// Create a client around any backend
    pub fn new(backend: B, config: &CalculatorConfig) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_CAPACITY);
        Self {
            calculator: Calculator::new(backend, config, tx),
            rx,
            server_url: config.server_url.clone(),
        }
    }

    /// Service root
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Publish the initial display and start the health check
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.calculator.start().await
    }

    /// Send a user command
    pub async fn send(&mut self, event: CalculatorEvent) -> anyhow::Result<()> {
        self.calculator.handle_event(event).await
    }

    /// Apply resolved calls and due timers (must be called regularly)
    pub async fn poll(&mut self) -> bool {
        self.calculator.poll().await
    }

    /// Wait for every in-flight call to resolve
    pub async fn settle(&mut self) {
        self.calculator.settle().await;
    }

    /// Receive all pending messages from the calculator (non-blocking)
    pub fn recv_all(&mut self) -> Vec<CalculatorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Current editor display, bypassing the message channel
    pub fn snapshot(&self) -> DisplaySnapshot {
        self.calculator.snapshot()
    }
}
