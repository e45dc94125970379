//! Theme and Colors
//!
//! Calculator palette: dark keypad, orange operators, a single accent for
//! `=`, and red reserved for errors.

use ratatui::style::{Color, Modifier, Style};

use crate::keypad::KeypadKey;

// ============================================================================
// Display Colors
// ============================================================================

/// Expression region text
pub const EXPRESSION_GRAY: Color = Color::Rgb(150, 150, 150);

/// Result region text
pub const RESULT_WHITE: Color = Color::Rgb(240, 240, 240);

/// Result region while an error is showing
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Display border
pub const BORDER_GRAY: Color = Color::Rgb(90, 90, 90);

// ============================================================================
// Keypad Colors
// ============================================================================

/// Digit and decimal point buttons
pub const DIGIT_BG: Color = Color::Rgb(60, 60, 60);

/// AC and delete buttons
pub const FUNCTION_BG: Color = Color::Rgb(110, 110, 110);

/// Operator buttons
pub const OPERATOR_ORANGE: Color = Color::Rgb(255, 159, 10);

/// The `=` button
pub const EQUALS_ACCENT: Color = Color::Rgb(80, 160, 255);

/// Any button while it flashes after a press
pub const PRESSED_BG: Color = Color::Rgb(220, 220, 220);

// ============================================================================
// Status Line
// ============================================================================

/// Service answered the health check
pub const STATUS_OK: Color = Color::Rgb(120, 230, 120);

/// Service did not answer
pub const STATUS_DOWN: Color = ERROR_RED;

/// Hints and secondary text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Style for a keypad button
pub fn key_style(key: KeypadKey, pressed: bool) -> Style {
    if pressed {
        return Style::default().bg(PRESSED_BG).fg(Color::Black);
    }
    let bg = match key {
        KeypadKey::Digit(_) | KeypadKey::Point => DIGIT_BG,
        KeypadKey::Clear | KeypadKey::Delete => FUNCTION_BG,
        KeypadKey::Operator(_) => OPERATOR_ORANGE,
        KeypadKey::Equals => EQUALS_ACCENT,
    };
    Style::default()
        .bg(bg)
        .fg(RESULT_WHITE)
        .add_modifier(Modifier::BOLD)
}

/// Style for the result region
pub fn result_style(error: bool) -> Style {
    let fg = if error { ERROR_RED } else { RESULT_WHITE };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}
