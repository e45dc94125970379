//! Calculator Events
//!
//! Everything that can change the editor's state arrives as a
//! [`CalculatorEvent`]: user commands from the surface, resolved remote
//! calls, and timers firing. Surfaces only produce the command variants;
//! the others are fed back by [`crate::Calculator`].

use crate::editor::ResetId;
use crate::error::CalculationError;
use crate::evaluation::ChainId;

/// Events consumed by the editor
#[derive(Clone, Debug, PartialEq)]
pub enum CalculatorEvent {
    // ============================================
    // User Commands
    // ============================================
    /// Append a digit, decimal point or operator
    Append(char),

    /// Remove the last character (or the whole trailing operator block)
    DeleteLast,

    /// All clear
    Clear,

    /// Evaluate the expression (`=` / Enter)
    Evaluate,

    // ============================================
    // Deferred Results
    // ============================================
    /// A remote calculation step finished
    CalculationResolved {
        /// Chain the step belongs to
        chain: ChainId,
        /// Service result or the error to display
        outcome: Result<f64, CalculationError>,
    },

    /// The startup health check finished
    HealthChecked {
        /// Health text, or the failure
        outcome: Result<String, CalculationError>,
    },

    /// An error display timer fired
    ErrorResetElapsed {
        /// Timer that fired
        id: ResetId,
    },
}

impl CalculatorEvent {
    /// Map a key name from the keyboard surface to a command
    ///
    /// Digits, `.`, `+`, `-`, `*` and `/` append; `Enter` and `=` evaluate;
    /// `Escape` clears; `Backspace` deletes. Anything else is not a
    /// calculator key and should be left to the surface.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" | "=" => Some(Self::Evaluate),
            "Escape" => Some(Self::Clear),
            "Backspace" => Some(Self::DeleteLast),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c @ ('0'..='9' | '.' | '+' | '-' | '*' | '/')), None) => {
                        Some(Self::Append(c))
                    }
                    _ => None,
                }
            }
        }
    }

    /// Whether this event is a user edit (as opposed to a deferred result)
    #[must_use]
    pub fn is_user_command(&self) -> bool {
        matches!(
            self,
            Self::Append(_) | Self::DeleteLast | Self::Clear | Self::Evaluate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_surface() {
        for key in ["0", "5", "9", ".", "+", "-", "*", "/"] {
            let c = key.chars().next().unwrap();
            assert_eq!(CalculatorEvent::from_key(key), Some(CalculatorEvent::Append(c)));
        }
        assert_eq!(CalculatorEvent::from_key("Enter"), Some(CalculatorEvent::Evaluate));
        assert_eq!(CalculatorEvent::from_key("="), Some(CalculatorEvent::Evaluate));
        assert_eq!(CalculatorEvent::from_key("Escape"), Some(CalculatorEvent::Clear));
        assert_eq!(
            CalculatorEvent::from_key("Backspace"),
            Some(CalculatorEvent::DeleteLast)
        );
    }

    #[test]
    fn test_non_calculator_keys_pass_through() {
        for key in ["a", "x", "×", "Tab", "12", "", " "] {
            assert_eq!(CalculatorEvent::from_key(key), None, "key {key:?}");
        }
    }
}
