//! Expression Editor
//!
//! The editor is the calculator's state machine. It owns the expression
//! buffer and the displayed result and reacts to [`CalculatorEvent`]s by
//! mutating that state and returning the [`Effect`]s the caller must carry
//! out: redraw, send a calculation, arm or cancel the error timer.
//!
//! The editor never performs I/O and never reads the clock, so every
//! transition can be tested by feeding events and inspecting the effects.
//!
//! # Buffer Shape
//!
//! Operators are stored as `" op "` blocks, so splitting the buffer on single
//! spaces always yields `[operand, operator, operand, ...]`. A leading `-`
//! typed into an empty buffer is a sign, not an operator block.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::CalculationRequest;
use crate::error::CalculationError;
use crate::evaluation::{parse_operand, ChainId, EvaluationPlan, EvaluationSequence};
use crate::events::CalculatorEvent;
use crate::format::{display_number, format_result};
use crate::messages::DisplaySnapshot;
use crate::operator::is_operator;

/// Result region text after a clear or an error reset
pub const INITIAL_RESULT: &str = "0";

/// Default time an error stays on screen
pub const DEFAULT_ERROR_DISPLAY: Duration = Duration::from_secs(3);

/// Identifies one scheduled error reset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResetId(pub u64);

/// What happens to a pending error reset when the user keeps editing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorResetPolicy {
    /// Every scheduled reset fires, wiping whatever was typed meanwhile
    #[default]
    Preserve,
    /// The next edit cancels the reset and clears the error immediately
    CancelOnEdit,
}

impl std::str::FromStr for ErrorResetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cancel_on_edit" | "cancel" => Ok(Self::CancelOnEdit),
            "preserve" | "legacy" => Ok(Self::Preserve),
            other => Err(format!(
                "unknown error reset policy '{other}' (expected 'cancel_on_edit' or 'preserve')"
            )),
        }
    }
}

impl std::fmt::Display for ErrorResetPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CancelOnEdit => write!(f, "cancel_on_edit"),
            Self::Preserve => write!(f, "preserve"),
        }
    }
}

/// Editor behaviour knobs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorConfig {
    /// How long an error stays on screen
    pub error_display: Duration,
    /// How edits interact with a pending error reset
    pub error_reset: ErrorResetPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            error_display: DEFAULT_ERROR_DISPLAY,
            error_reset: ErrorResetPolicy::default(),
        }
    }
}

/// Side effects requested by the editor
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Both display regions need redrawing
    Refresh,
    /// Send one calculation step
    Calculate {
        /// Chain the step belongs to
        chain: ChainId,
        /// Request body
        request: CalculationRequest,
    },
    /// Tell the service the user pressed AC; the answer is ignored
    NotifyClear,
    /// Arm the error reset timer
    ScheduleErrorReset {
        /// Timer identity, echoed back in [`CalculatorEvent::ErrorResetElapsed`]
        id: ResetId,
        /// Delay before it fires
        after: Duration,
    },
    /// Disarm a previously scheduled timer
    CancelErrorReset {
        /// Timer to disarm
        id: ResetId,
    },
}

/// The expression editor state machine
#[derive(Clone, Debug)]
pub struct Editor {
    config: EditorConfig,
    /// Expression buffer
    expression: String,
    /// Result region text
    result: String,
    /// Most recently inserted operator
    last_operator: Option<char>,
    /// Next non-operator key starts a new expression
    waiting_for_operand: bool,
    /// Result region shows an error
    error: bool,
    /// Chain currently waiting on the service
    evaluation: Option<EvaluationSequence>,
    /// Most recently scheduled error reset
    pending_reset: Option<ResetId>,
    next_chain: u64,
    next_reset: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an editor with an empty expression and result `0`
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            expression: String::new(),
            result: INITIAL_RESULT.to_string(),
            last_operator: None,
            waiting_for_operand: false,
            error: false,
            evaluation: None,
            pending_reset: None,
            next_chain: 0,
            next_reset: 0,
        }
    }

    // ============================================
    // Accessors
    // ============================================

    /// Expression buffer
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Result region text
    #[must_use]
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Most recently inserted operator
    #[must_use]
    pub fn last_operator(&self) -> Option<char> {
        self.last_operator
    }

    /// Whether the next non-operator key starts a new expression
    #[must_use]
    pub fn is_waiting_for_operand(&self) -> bool {
        self.waiting_for_operand
    }

    /// Whether the result region carries the error marker
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Whether an evaluation chain is in flight
    #[must_use]
    pub fn is_evaluating(&self) -> bool {
        self.evaluation.is_some()
    }

    /// The in-flight chain, if any
    #[must_use]
    pub fn evaluation(&self) -> Option<&EvaluationSequence> {
        self.evaluation.as_ref()
    }

    /// Most recently scheduled error reset
    #[must_use]
    pub fn pending_reset(&self) -> Option<ResetId> {
        self.pending_reset
    }

    /// Editor configuration
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current contents of both display regions
    #[must_use]
    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            expression: self.expression.clone(),
            result: self.result.clone(),
            error: self.error,
            evaluating: self.is_evaluating(),
        }
    }

    // ============================================
    // Event Dispatch
    // ============================================

    /// Apply one event and return the effects it requires
    pub fn handle(&mut self, event: CalculatorEvent) -> Vec<Effect> {
        match event {
            CalculatorEvent::Append(c) => self.append(c),
            CalculatorEvent::DeleteLast => self.delete_last(),
            CalculatorEvent::Clear => self.clear_all(),
            CalculatorEvent::Evaluate => self.evaluate(),
            CalculatorEvent::CalculationResolved { chain, outcome } => {
                self.resolve_calculation(chain, outcome)
            }
            CalculatorEvent::HealthChecked { outcome } => match outcome {
                Ok(_) => Vec::new(),
                Err(err) => self.show_error(&err),
            },
            CalculatorEvent::ErrorResetElapsed { id } => self.error_reset_elapsed(id),
        }
    }

    // ============================================
    // Edit Operations
    // ============================================

    /// Append a digit, decimal point or operator
    ///
    /// An operator directly after another operator replaces it. A digit
    /// after a completed evaluation starts a new expression.
    pub fn append(&mut self, c: char) -> Vec<Effect> {
        let mut effects = self.interrupt_error();
        let operator = is_operator(c);

        if self.waiting_for_operand && !operator {
            self.expression.clear();
            self.waiting_for_operand = false;
        }

        if operator {
            if self.expression.is_empty() {
                if c == '-' {
                    self.expression.push('-');
                }
            } else if self.ends_with_operator_block() {
                pop_chars(&mut self.expression, 3);
                self.push_operator(c);
            } else if !self.expression.ends_with(is_operator) {
                self.push_operator(c);
            }
            // A bare leading sign followed by another operator: nothing to replace.
        } else {
            self.expression.push(c);
        }

        effects.push(Effect::Refresh);
        effects
    }

    /// Remove the last character, or the whole trailing `" op "` block
    pub fn delete_last(&mut self) -> Vec<Effect> {
        let mut effects = self.interrupt_error();
        if self.expression.is_empty() {
            return effects;
        }

        if self.expression.ends_with(' ') {
            pop_chars(&mut self.expression, 3);
        } else {
            self.expression.pop();
        }

        effects.push(Effect::Refresh);
        effects
    }

    /// Reset everything and notify the service
    ///
    /// Any in-flight chain is abandoned; its late responses are ignored.
    pub fn clear_all(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.config.error_reset == ErrorResetPolicy::CancelOnEdit {
            if let Some(id) = self.pending_reset.take() {
                effects.push(Effect::CancelErrorReset { id });
            }
        }

        self.expression.clear();
        self.result = INITIAL_RESULT.to_string();
        self.last_operator = None;
        self.waiting_for_operand = false;
        self.error = false;
        if let Some(seq) = self.evaluation.take() {
            tracing::debug!(chain = %seq.chain(), "Abandoning evaluation on clear");
        }

        effects.push(Effect::Refresh);
        effects.push(Effect::NotifyClear);
        effects
    }

    /// Start evaluating the expression
    ///
    /// Ignored while a previous chain is still waiting on the service.
    pub fn evaluate(&mut self) -> Vec<Effect> {
        if let Some(seq) = &self.evaluation {
            tracing::debug!(chain = %seq.chain(), "Evaluation already in flight, ignoring");
            return Vec::new();
        }

        let mut effects = self.interrupt_error();
        let chain = ChainId(self.next_chain);

        match EvaluationPlan::for_buffer(&self.expression, chain) {
            Ok(EvaluationPlan::Empty | EvaluationPlan::Incomplete) => {}
            Ok(EvaluationPlan::Immediate(value)) => {
                self.result = display_number(value);
                effects.push(Effect::Refresh);
            }
            Ok(EvaluationPlan::Chain(seq)) => {
                self.next_chain += 1;
                if let Some(request) = seq.current_request() {
                    tracing::debug!(%chain, steps = seq.len(), "Starting evaluation");
                    self.evaluation = Some(seq);
                    effects.push(Effect::Refresh);
                    effects.push(Effect::Calculate { chain, request });
                }
            }
            Err(err) => effects.extend(self.show_error(&err)),
        }

        effects
    }

    // ============================================
    // Deferred Results
    // ============================================

    fn resolve_calculation(
        &mut self,
        chain: ChainId,
        outcome: Result<f64, CalculationError>,
    ) -> Vec<Effect> {
        let Some(seq) = self.evaluation.as_mut().filter(|seq| seq.chain() == chain) else {
            tracing::debug!(%chain, "Dropping response for abandoned chain");
            return Vec::new();
        };

        match outcome {
            Ok(value) => {
                self.result = format_result(value);
                self.waiting_for_operand = true;

                // The next step continues from the displayed text, not the raw value
                let carried = parse_operand(&self.result).filter(|v| v.is_finite());
                let Some(carried) = carried.or(seq.is_last_step().then_some(value)) else {
                    tracing::debug!(%chain, result = %self.result, "Result cannot be carried, aborting");
                    self.evaluation = None;
                    return self.show_error(&CalculationError::InvalidExpression);
                };

                let mut effects = vec![Effect::Refresh];
                match seq.advance(carried) {
                    Some(request) => effects.push(Effect::Calculate { chain, request }),
                    None => {
                        tracing::debug!(%chain, result = %self.result, "Evaluation complete");
                        self.evaluation = None;
                    }
                }
                effects
            }
            Err(err) => {
                tracing::debug!(%chain, error = %err, "Evaluation aborted");
                self.evaluation = None;
                self.show_error(&err)
            }
        }
    }

    /// Put an error in the result region and arm the reset timer
    fn show_error(&mut self, err: &CalculationError) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.config.error_reset == ErrorResetPolicy::CancelOnEdit {
            if let Some(id) = self.pending_reset.take() {
                effects.push(Effect::CancelErrorReset { id });
            }
        }

        let id = ResetId(self.next_reset);
        self.next_reset += 1;
        self.pending_reset = Some(id);

        self.result = err.display_message();
        self.error = true;

        effects.push(Effect::Refresh);
        effects.push(Effect::ScheduleErrorReset {
            id,
            after: self.config.error_display,
        });
        effects
    }

    fn error_reset_elapsed(&mut self, id: ResetId) -> Vec<Effect> {
        let current = self.pending_reset == Some(id);
        if !current && self.config.error_reset == ErrorResetPolicy::CancelOnEdit {
            tracing::debug!(id = id.0, "Ignoring cancelled error reset");
            return Vec::new();
        }
        if current {
            self.pending_reset = None;
        }

        self.error = false;
        self.result = INITIAL_RESULT.to_string();
        self.expression.clear();
        vec![Effect::Refresh]
    }

    /// Under [`ErrorResetPolicy::CancelOnEdit`], a user edit while an error
    /// is showing cancels the reset and clears the error. The buffer is kept.
    fn interrupt_error(&mut self) -> Vec<Effect> {
        if self.config.error_reset != ErrorResetPolicy::CancelOnEdit {
            return Vec::new();
        }
        let Some(id) = self.pending_reset.take() else {
            return Vec::new();
        };

        self.error = false;
        self.result = INITIAL_RESULT.to_string();
        vec![Effect::CancelErrorReset { id }]
    }

    // ============================================
    // Buffer Helpers
    // ============================================

    fn ends_with_operator_block(&self) -> bool {
        let mut tail = self.expression.chars().rev();
        matches!(
            (tail.next(), tail.next(), tail.next()),
            (Some(' '), Some(op), Some(' ')) if is_operator(op)
        )
    }

    fn push_operator(&mut self, c: char) {
        self.expression.push(' ');
        self.expression.push(c);
        self.expression.push(' ');
        self.last_operator = Some(c);
    }
}

/// Remove up to `n` characters from the end of `s`
fn pop_chars(s: &mut String, n: usize) {
    for _ in 0..n {
        if s.pop().is_none() {
            break;
        }
    }
}
