//! Keyboard Mapping
//!
//! Turns crossterm key events into calculator commands. Escape belongs to
//! the calculator (all clear), so quitting is on Ctrl+C / Ctrl+Q.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use calculator_core::CalculatorEvent;

/// What a key press asks the app to do
#[derive(Clone, Debug, PartialEq)]
pub enum KeyAction {
    /// Leave the app
    Quit,
    /// Forward a command to the calculator
    Calculator(CalculatorEvent),
}

/// Map a key press; `None` for keys the calculator does not use
pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c' | 'q') => Some(KeyAction::Quit),
            _ => None,
        };
    }

    let name = match key.code {
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };
    CalculatorEvent::from_key(&name).map(KeyAction::Calculator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_calculator_keys() {
        assert_eq!(
            map_key(&press(KeyCode::Char('7'))),
            Some(KeyAction::Calculator(CalculatorEvent::Append('7')))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('*'))),
            Some(KeyAction::Calculator(CalculatorEvent::Append('*')))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('='))),
            Some(KeyAction::Calculator(CalculatorEvent::Evaluate))
        );
        assert_eq!(
            map_key(&press(KeyCode::Enter)),
            Some(KeyAction::Calculator(CalculatorEvent::Evaluate))
        );
        assert_eq!(
            map_key(&press(KeyCode::Esc)),
            Some(KeyAction::Calculator(CalculatorEvent::Clear))
        );
        assert_eq!(
            map_key(&press(KeyCode::Backspace)),
            Some(KeyAction::Calculator(CalculatorEvent::DeleteLast))
        );
    }

    #[test]
    fn test_shifted_symbols_still_append() {
        let plus = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::SHIFT);
        assert_eq!(
            map_key(&plus),
            Some(KeyAction::Calculator(CalculatorEvent::Append('+')))
        );
    }

    #[test]
    fn test_quit_keys() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), Some(KeyAction::Quit));
        assert_eq!(map_key(&ctrl_q), Some(KeyAction::Quit));
    }

    #[test]
    fn test_other_keys_are_ignored() {
        assert_eq!(map_key(&press(KeyCode::Char('a'))), None);
        assert_eq!(map_key(&press(KeyCode::Tab)), None);
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('1'), KeyModifiers::CONTROL)),
            None
        );
    }
}
