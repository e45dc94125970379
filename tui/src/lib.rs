//! Calculator TUI - Terminal surface for the calculator
//!
//! A full-screen terminal calculator: an expression region, a result region
//! and a clickable keypad. All editing and evaluation happens in
//! `calculator-core`; this crate only turns terminal input into commands and
//! draws what comes back.
//!
//! # Architecture
//!
//! - **App**: frame loop, keyboard and mouse dispatch, rendering
//! - **CalculatorClient**: owns the embedded calculator and its message channel
//! - **DisplayState**: what to draw, built from calculator messages
//! - **Keypad**: button grid and mouse hit testing

pub mod app;
pub mod calculator_client;
pub mod display;
pub mod input;
pub mod keypad;
pub mod theme;

pub use app::App;
pub use calculator_client::CalculatorClient;
