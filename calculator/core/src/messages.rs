//! Calculator Messages
//!
//! Messages sent from the calculator to the UI surface. The surface keeps
//! no calculator logic of its own; it renders what these messages say.

use serde::{Deserialize, Serialize};

/// What the two display regions should currently show
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySnapshot {
    /// Expression region text
    pub expression: String,
    /// Result region text (number or error message)
    pub result: String,
    /// Whether the result region carries the error marker
    pub error: bool,
    /// Whether an evaluation chain is waiting on the service
    pub evaluating: bool,
}

/// Messages from the calculator to a UI surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculatorMessage {
    /// Redraw both display regions
    Display(DisplaySnapshot),

    /// Result of the startup health check
    BackendStatus {
        /// Backend name
        backend: String,
        /// Whether the service answered
        healthy: bool,
        /// Health text or failure description
        detail: String,
    },

    /// Operations the service advertises
    Operations {
        /// Human-readable list
        description: String,
    },
}
