//! Left-to-Right Evaluation
//!
//! The expression buffer is split on single spaces into
//! `[operand, operator, operand, operator, operand, ...]`. There is no
//! precedence: each operator is applied to the running result and the next
//! operand, one remote call at a time.
//!
//! An [`EvaluationSequence`] is the explicit state of one such chain. It is
//! advanced only when the previous call resolves, because every call's left
//! operand is the previous call's result.

use serde::{Deserialize, Serialize};

use crate::backend::CalculationRequest;
use crate::error::CalculationError;
use crate::operator::Operator;

/// Identifies one evaluation chain so late responses can be recognised
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "chain_{}", self.0)
    }
}

/// Split the expression buffer into tokens
#[must_use]
pub fn tokenize(buffer: &str) -> Vec<&str> {
    buffer.split(' ').collect()
}

/// Parse an operand the way a lenient number reader does
///
/// Takes the longest numeric prefix: optional sign, digits, optional
/// fraction, optional exponent. `"3."` is 3 and `"1.2.3"` is 1.2. A token
/// without any digits before the junk (`""`, `"-"`, `"."`) is not a number.
#[must_use]
pub fn parse_operand(token: &str) -> Option<f64> {
    let token = token.trim_start();
    let bytes = token.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if token[end..].starts_with("Infinity") {
        return token[..end + "Infinity".len()].parse().ok();
    }

    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        digits += fraction_end - fraction_start;
        end = fraction_end;
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    token[..end].trim_end_matches('.').parse().ok()
}

/// What evaluating a buffer requires
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationPlan {
    /// Nothing to evaluate
    Empty,
    /// A lone number; display it without a remote call
    Immediate(f64),
    /// Operand and operator with nothing after; nothing to do
    Incomplete,
    /// One or more remote steps
    Chain(EvaluationSequence),
}

impl EvaluationPlan {
    /// Tokenize and validate `buffer`
    ///
    /// Every operand is checked before any remote call is planned, so a bad
    /// token anywhere in the expression aborts the whole evaluation with no
    /// partial result.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidExpression`] if an operand is not
    /// numeric or an operator token is not recognised.
    pub fn for_buffer(buffer: &str, chain: ChainId) -> Result<Self, CalculationError> {
        if buffer.is_empty() {
            return Ok(Self::Empty);
        }

        let tokens = tokenize(buffer);
        match tokens.len() {
            1 => parse_operand(tokens[0])
                .map(Self::Immediate)
                .ok_or(CalculationError::InvalidExpression),
            2 => Ok(Self::Incomplete),
            _ => {
                let seed = parse_operand(tokens[0]).ok_or(CalculationError::InvalidExpression)?;
                let steps = tokens[1..]
                    .chunks(2)
                    .map(|pair| {
                        let operator = Operator::from_token(pair[0])
                            .ok_or(CalculationError::InvalidExpression)?;
                        let operand = pair
                            .get(1)
                            .and_then(|token| parse_operand(token))
                            .ok_or(CalculationError::InvalidExpression)?;
                        Ok((operator, operand))
                    })
                    .collect::<Result<Vec<_>, CalculationError>>()?;
                Ok(Self::Chain(EvaluationSequence::new(chain, seed, steps)))
            }
        }
    }
}

/// State of one in-flight evaluation chain
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationSequence {
    chain: ChainId,
    accumulator: f64,
    steps: Vec<(Operator, f64)>,
    cursor: usize,
}

impl EvaluationSequence {
    /// Start a chain seeded with `accumulator`
    #[must_use]
    pub fn new(chain: ChainId, accumulator: f64, steps: Vec<(Operator, f64)>) -> Self {
        Self {
            chain,
            accumulator,
            steps,
            cursor: 0,
        }
    }

    /// Chain identifier
    #[must_use]
    pub fn chain(&self) -> ChainId {
        self.chain
    }

    /// Running result so far
    #[must_use]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Index of the step awaiting a response
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of remote steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether every step has resolved
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Whether the step at the cursor is the final one
    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }

    /// Request for the step at the cursor
    #[must_use]
    pub fn current_request(&self) -> Option<CalculationRequest> {
        self.steps
            .get(self.cursor)
            .map(|&(operator, operand)| {
                CalculationRequest::binary(self.accumulator, operand, operator)
            })
    }

    /// Record the result of the current step and return the next request
    pub fn advance(&mut self, result: f64) -> Option<CalculationRequest> {
        self.accumulator = result;
        self.cursor += 1;
        self.current_request()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CHAIN: ChainId = ChainId(1);

    #[test]
    fn test_tokenize_alternates() {
        assert_eq!(tokenize("2 + 3 * 4"), vec!["2", "+", "3", "*", "4"]);
        assert_eq!(tokenize("-5 × 2"), vec!["-5", "×", "2"]);
        assert_eq!(tokenize("5 + "), vec!["5", "+", ""]);
    }

    #[test]
    fn test_parse_operand_prefix_rules() {
        assert_eq!(parse_operand("42"), Some(42.0));
        assert_eq!(parse_operand("-5"), Some(-5.0));
        assert_eq!(parse_operand("3."), Some(3.0));
        assert_eq!(parse_operand(".5"), Some(0.5));
        assert_eq!(parse_operand("1.2.3"), Some(1.2));
        assert_eq!(parse_operand("007"), Some(7.0));
        assert_eq!(parse_operand(""), None);
        assert_eq!(parse_operand("-"), None);
        assert_eq!(parse_operand("."), None);
        assert_eq!(parse_operand("+"), None);
    }

    #[test]
    fn test_parse_operand_reads_exponential_results() {
        assert_eq!(parse_operand("1.234568e+11"), Some(123_456_800_000.0));
        assert_eq!(parse_operand("-2.500000e-7"), Some(-2.5e-7));
        assert_eq!(parse_operand("3e"), Some(3.0));
    }

    #[test]
    fn test_single_token_is_immediate() {
        assert_eq!(
            EvaluationPlan::for_buffer("53", CHAIN),
            Ok(EvaluationPlan::Immediate(53.0))
        );
        assert_eq!(
            EvaluationPlan::for_buffer("-", CHAIN),
            Err(CalculationError::InvalidExpression)
        );
    }

    #[test]
    fn test_empty_and_incomplete() {
        assert_eq!(EvaluationPlan::for_buffer("", CHAIN), Ok(EvaluationPlan::Empty));
        assert_eq!(
            EvaluationPlan::for_buffer("5 +", CHAIN),
            Ok(EvaluationPlan::Incomplete)
        );
    }

    #[test]
    fn test_trailing_operator_is_invalid() {
        assert_eq!(
            EvaluationPlan::for_buffer("5 + ", CHAIN),
            Err(CalculationError::InvalidExpression)
        );
    }

    #[test]
    fn test_bad_operand_anywhere_aborts_before_any_call() {
        assert_eq!(
            EvaluationPlan::for_buffer("1 + 2 + . + 3", CHAIN),
            Err(CalculationError::InvalidExpression)
        );
    }

    #[test]
    fn test_chain_is_left_to_right() {
        let Ok(EvaluationPlan::Chain(mut seq)) = EvaluationPlan::for_buffer("2 + 3 * 4", CHAIN)
        else {
            panic!("expected a chain");
        };

        assert_eq!(seq.len(), 2);
        assert!(!seq.is_last_step());
        assert_eq!(
            seq.current_request(),
            Some(CalculationRequest::binary(2.0, 3.0, Operator::Add))
        );

        let next = seq.advance(5.0);
        assert_eq!(
            next,
            Some(CalculationRequest::binary(5.0, 4.0, Operator::Multiply))
        );
        assert!(!seq.is_complete());
        assert!(seq.is_last_step());

        assert_eq!(seq.advance(20.0), None);
        assert!(seq.is_complete());
        assert_eq!(seq.accumulator(), 20.0);
    }

    #[test]
    fn test_display_multiply_goes_out_as_star() {
        let Ok(EvaluationPlan::Chain(seq)) = EvaluationPlan::for_buffer("6 × 7", CHAIN) else {
            panic!("expected a chain");
        };
        assert_eq!(seq.current_request().unwrap().operation, "*");
    }
}
