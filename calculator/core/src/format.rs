//! Number Formatting
//!
//! Two renderings are needed: [`format_result`] for values returned by the
//! calculation service, and [`display_number`] for a number the user typed
//! and evaluated without any operator.

/// Results with a magnitude above this are shown in exponential notation
pub const EXPONENTIAL_ABOVE: f64 = 1e10;

/// Non-zero results with a magnitude below this are shown in exponential notation
pub const EXPONENTIAL_BELOW: f64 = 1e-6;

/// Fractional digits used for exponential notation
pub const EXPONENTIAL_DIGITS: usize = 6;

/// Scale used to round away binary floating-point noise (10 decimal places)
const ROUNDING_SCALE: f64 = 1e10;

/// Format a calculation result for the result display
///
/// Very large or very small values use exponential notation with six
/// fractional digits (`1.000000e+11`). Everything else is rounded to ten
/// decimal places and printed as a plain decimal, so `1/3` shows as
/// `0.3333333333` rather than the full binary expansion.
#[must_use]
pub fn format_result(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }

    let magnitude = value.abs();
    if magnitude > EXPONENTIAL_ABOVE || (value != 0.0 && magnitude < EXPONENTIAL_BELOW) {
        return to_exponential(value, EXPONENTIAL_DIGITS);
    }

    let rounded = (value * ROUNDING_SCALE).round() / ROUNDING_SCALE;
    display_number(rounded)
}

/// Render a number in its shortest round-trip form
///
/// Plain decimal for everyday magnitudes, exponential with an explicit
/// exponent sign outside `[1e-6, 1e21)`. Negative zero prints as `0`.
#[must_use]
pub fn display_number(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        return signed_exponent(&format!("{value:e}"));
    }
    format!("{value}")
}

/// Exponential notation with a fixed number of fractional digits
fn to_exponential(value: f64, digits: usize) -> String {
    signed_exponent(&format!("{value:.digits$e}"))
}

/// Rewrite `1.5e7` as `1.5e+7`; negative exponents are left alone
fn signed_exponent(formatted: &str) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted.to_string(),
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_sign_positive() {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_large_value_uses_exponential() {
        assert_eq!(format_result(100_000_000_000.0), "1.000000e+11");
        assert_eq!(format_result(-123_456_789_012.0), "-1.234568e+11");
    }

    #[test]
    fn test_tiny_value_uses_exponential() {
        assert_eq!(format_result(0.000_000_1), "1.000000e-7");
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(format_result(1e10), "10000000000");
        assert_eq!(format_result(1e-6), "0.000001");
    }

    #[test]
    fn test_one_third_is_rounded() {
        assert_eq!(format_result(1.0 / 3.0), "0.3333333333");
    }

    #[test]
    fn test_binary_noise_is_suppressed() {
        assert_eq!(format_result(0.1 + 0.2), "0.3");
    }

    #[test]
    fn test_integers_have_no_fraction() {
        assert_eq!(format_result(20.0), "20");
        assert_eq!(format_result(-7.0), "-7");
        assert_eq!(format_result(0.0), "0");
        assert_eq!(format_result(-0.0), "0");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_result(f64::INFINITY), "Infinity");
        assert_eq!(format_result(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_result(f64::NAN), "NaN");
    }

    #[test]
    fn test_display_number_keeps_typed_value() {
        assert_eq!(display_number(53.0), "53");
        assert_eq!(display_number(2.5), "2.5");
        assert_eq!(display_number(-0.75), "-0.75");
        assert_eq!(display_number(1e21), "1e+21");
        assert_eq!(display_number(1.5e-7), "1.5e-7");
    }
}
