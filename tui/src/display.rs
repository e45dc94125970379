//! Display State
//!
//! What the TUI renders, derived from [`CalculatorMessage`]s. The surface
//! keeps no calculator logic: the expression and result strings are shown
//! exactly as the core sent them.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use calculator_core::{CalculatorMessage, DisplaySnapshot};

/// Health of the calculation service as last reported
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendStatus {
    /// Backend name
    pub name: String,
    /// Whether the health check succeeded
    pub healthy: bool,
    /// Health text or failure description
    pub detail: String,
}

/// Everything the renderer needs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayState {
    /// Expression region text
    pub expression: String,
    /// Result region text
    pub result: String,
    /// Result region carries the error marker
    pub error: bool,
    /// A chain is waiting on the service
    pub evaluating: bool,
    /// Health check outcome, once known
    pub backend: Option<BackendStatus>,
    /// Operations advertised by the service
    pub operations: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayState {
    /// Blank expression, result `0`, service status unknown
    pub fn new() -> Self {
        Self {
            expression: String::new(),
            result: "0".to_string(),
            error: false,
            evaluating: false,
            backend: None,
            operations: None,
        }
    }

    /// Apply a message from the calculator
    pub fn apply_message(&mut self, msg: CalculatorMessage) {
        match msg {
            CalculatorMessage::Display(snapshot) => self.apply_snapshot(snapshot),
            CalculatorMessage::BackendStatus {
                backend,
                healthy,
                detail,
            } => {
                self.backend = Some(BackendStatus {
                    name: backend,
                    healthy,
                    detail,
                });
            }
            CalculatorMessage::Operations { description } => {
                self.operations = Some(description);
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: DisplaySnapshot) {
        self.expression = snapshot.expression;
        self.result = snapshot.result;
        self.error = snapshot.error;
        self.evaluating = snapshot.evaluating;
    }

    /// Status line text
    pub fn status_text(&self, server_url: &str) -> String {
        let service = match &self.backend {
            None => format!("connecting to {server_url}"),
            Some(status) if status.healthy => format!("{} {server_url}", status.name),
            Some(status) => format!("{} {server_url} unreachable", status.name),
        };
        let activity = if self.evaluating { " | evaluating" } else { "" };
        let operations = self
            .operations
            .as_deref()
            .map(|ops| format!(" | {ops}"))
            .unwrap_or_default();
        format!(" {service}{activity} | Esc clear | Ctrl+Q quit{operations}")
    }
}

/// Right-align `text` in `width` columns
///
/// Text wider than the field keeps its right end, so the most recently
/// typed characters stay visible.
pub fn fit_right(text: &str, width: usize) -> String {
    let text_width = text.width();
    if text_width <= width {
        return format!("{}{text}", " ".repeat(width - text_width));
    }

    let mut kept = Vec::new();
    let mut used = 0;
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        kept.push(c);
    }
    let tail: String = kept.into_iter().rev().collect();
    format!("{}{tail}", " ".repeat(width - used))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initial_state() {
        let state = DisplayState::new();
        assert_eq!(state.result, "0");
        assert!(state.expression.is_empty());
        assert!(state.backend.is_none());
    }

    #[test]
    fn test_snapshot_replaces_regions() {
        let mut state = DisplayState::new();
        state.apply_message(CalculatorMessage::Display(DisplaySnapshot {
            expression: "2 + 3".into(),
            result: "Invalid expression".into(),
            error: true,
            evaluating: false,
        }));
        assert_eq!(state.expression, "2 + 3");
        assert_eq!(state.result, "Invalid expression");
        assert!(state.error);
    }

    #[test]
    fn test_backend_status_and_operations() {
        let mut state = DisplayState::new();
        assert!(state
            .status_text("http://localhost:8080")
            .contains("connecting to http://localhost:8080"));

        state.apply_message(CalculatorMessage::BackendStatus {
            backend: "HTTP".into(),
            healthy: false,
            detail: "refused".into(),
        });
        state.apply_message(CalculatorMessage::Operations {
            description: "+, -, *, /".into(),
        });

        let status = state.status_text("http://localhost:8080");
        assert!(status.contains("HTTP http://localhost:8080 unreachable"));
        assert!(status.ends_with("| +, -, *, /"));
    }

    #[test]
    fn test_fit_right_pads() {
        assert_eq!(fit_right("42", 5), "   42");
    }

    #[test]
    fn test_fit_right_keeps_tail() {
        assert_eq!(fit_right("123 + 456", 5), "+ 456");
    }

    #[test]
    fn test_fit_right_counts_display_width() {
        assert_eq!(fit_right("5 × ", 6), "  5 × ");
    }
}
