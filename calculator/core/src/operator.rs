//! Binary Operators
//!
//! The operator characters the editor accepts and the codes sent to the
//! calculation service for them. Multiplication has two display forms:
//! `*` from the keyboard and `×` from the keypad button. Both go over the
//! wire as `*`.

use serde::{Deserialize, Serialize};

/// A binary arithmetic operator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*` or `×`
    Multiply,
    /// `/`
    Divide,
}

impl Operator {
    /// Parse a single operator character
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }

    /// Parse an operator token produced by splitting the expression buffer
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    /// Operation code understood by the calculation service
    #[must_use]
    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_code())
    }
}

/// Whether `c` is one of the operator characters `+ - * / ×`
#[must_use]
pub fn is_operator(c: char) -> bool {
    Operator::from_char(c).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_multiply_translates_to_star() {
        assert_eq!(Operator::from_char('×'), Some(Operator::Multiply));
        assert_eq!(Operator::Multiply.wire_code(), "*");
    }

    #[test]
    fn test_from_token_rejects_multi_char() {
        assert_eq!(Operator::from_token("+"), Some(Operator::Add));
        assert_eq!(Operator::from_token("×"), Some(Operator::Multiply));
        assert_eq!(Operator::from_token("++"), None);
        assert_eq!(Operator::from_token(""), None);
        assert_eq!(Operator::from_token("5"), None);
    }

    #[test]
    fn test_is_operator() {
        for c in ['+', '-', '*', '/', '×'] {
            assert!(is_operator(c), "{c} should be an operator");
        }
        for c in ['0', '9', '.', ' ', 'x', '='] {
            assert!(!is_operator(c), "{c} should not be an operator");
        }
    }
}
