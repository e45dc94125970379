//! Calculator Core - Headless expression editing and remote evaluation
//!
//! This crate holds everything the calculator does that is not drawing:
//! the expression buffer and its editing rules, the left-to-right evaluator,
//! result formatting, error display timing and the client for the remote
//! calculation service. It can drive a terminal UI, a test harness, or any
//! other surface.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI Surface                            │
//! │   keys / clicks ──► CalculatorEvent     CalculatorMessage ◄──│
//! └──────────────────────────┬───────────────────────▲───────────┘
//!                            │                       │
//! ┌──────────────────────────▼───────────────────────┴───────────┐
//! │                      Calculator<B>                           │
//! │  ┌────────────┐   Vec<Effect>   ┌──────────────────────────┐ │
//! │  │   Editor   │ ──────────────► │ effect runner            │ │
//! │  │ (pure FSM) │ ◄────────────── │ remote calls, timers     │ │
//! │  └────────────┘  resolved calls └────────────┬─────────────┘ │
//! └──────────────────────────────────────────────┼───────────────┘
//!                                                │
//!                                     CalculatorBackend (HTTP)
//! ```
//!
//! # Key Types
//!
//! - [`Editor`]: Expression state machine; consumes events, returns effects
//! - [`Calculator`]: Owns an editor and a backend, runs effects
//! - [`CalculatorBackend`]: Remote calculation service abstraction
//! - [`HttpBackend`]: reqwest implementation of the backend
//! - [`CalculatorConfig`]: Layered configuration (defaults, file, env, CLI)
//!
//! # Evaluation Order
//!
//! There is no operator precedence. `2 + 3 * 4` is sent to the service as
//! `2 + 3` followed by `5 * 4`, giving `20`.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod calculator;
pub mod config;
pub mod editor;
pub mod error;
pub mod evaluation;
pub mod events;
pub mod format;
pub mod messages;
pub mod operator;

pub use backend::{
    BackendError, CalculationRequest, CalculationResponse, CalculatorBackend, HttpBackend,
};
pub use calculator::Calculator;
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_overrides,
    CalculatorConfig, CalculatorToml, ConfigError, ConfigOverrides, ConfigSource,
};
pub use editor::{Editor, EditorConfig, Effect, ErrorResetPolicy, ResetId};
pub use error::CalculationError;
pub use evaluation::{ChainId, EvaluationPlan, EvaluationSequence};
pub use events::CalculatorEvent;
pub use format::{display_number, format_result};
pub use messages::{CalculatorMessage, DisplaySnapshot};
pub use operator::{is_operator, Operator};
