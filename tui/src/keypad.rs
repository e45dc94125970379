//! Keypad
//!
//! The clickable button grid. Layout is a fixed 4-column table; the widget
//! only remembers the area it was last drawn into so mouse clicks can be
//! mapped back to buttons.
//!
//! ```text
//! ┌────┬────┬────┬────┐
//! │ AC │ ⌫  │ /  │ ×  │
//! │ 7  │ 8  │ 9  │ -  │
//! │ 4  │ 5  │ 6  │ +  │
//! │ 1  │ 2  │ 3  │ =  │
//! │ 0       │ .  │    │
//! └────┴────┴────┴────┘
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use calculator_core::CalculatorEvent;

use crate::theme;

/// Number of button columns
pub const COLUMNS: u16 = 4;

/// Number of button rows
pub const ROWS: u16 = 5;

/// A keypad button
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeypadKey {
    /// All clear
    Clear,
    /// Delete last
    Delete,
    /// `0`-`9`
    Digit(char),
    /// Decimal point
    Point,
    /// `+`, `-`, `/` or `×`
    Operator(char),
    /// Evaluate
    Equals,
}

impl KeypadKey {
    /// Button caption
    pub fn label(self) -> String {
        match self {
            Self::Clear => "AC".to_string(),
            Self::Delete => "⌫".to_string(),
            Self::Digit(c) | Self::Operator(c) => c.to_string(),
            Self::Point => ".".to_string(),
            Self::Equals => "=".to_string(),
        }
    }

    /// Command this button sends
    pub fn event(self) -> CalculatorEvent {
        match self {
            Self::Clear => CalculatorEvent::Clear,
            Self::Delete => CalculatorEvent::DeleteLast,
            Self::Digit(c) | Self::Operator(c) => CalculatorEvent::Append(c),
            Self::Point => CalculatorEvent::Append('.'),
            Self::Equals => CalculatorEvent::Evaluate,
        }
    }

    /// The button a keyboard command corresponds to, for press feedback
    ///
    /// Typing `*` lights up the `×` button.
    pub fn for_event(event: &CalculatorEvent) -> Option<Self> {
        match *event {
            CalculatorEvent::Clear => Some(Self::Clear),
            CalculatorEvent::DeleteLast => Some(Self::Delete),
            CalculatorEvent::Evaluate => Some(Self::Equals),
            CalculatorEvent::Append(c @ '0'..='9') => Some(Self::Digit(c)),
            CalculatorEvent::Append('.') => Some(Self::Point),
            CalculatorEvent::Append('*' | '×') => Some(Self::Operator('×')),
            CalculatorEvent::Append(c @ ('+' | '-' | '/')) => Some(Self::Operator(c)),
            _ => None,
        }
    }
}

/// Rows of `(button, column span)`
const LAYOUT: [&[(KeypadKey, u16)]; ROWS as usize] = [
    &[
        (KeypadKey::Clear, 1),
        (KeypadKey::Delete, 1),
        (KeypadKey::Operator('/'), 1),
        (KeypadKey::Operator('×'), 1),
    ],
    &[
        (KeypadKey::Digit('7'), 1),
        (KeypadKey::Digit('8'), 1),
        (KeypadKey::Digit('9'), 1),
        (KeypadKey::Operator('-'), 1),
    ],
    &[
        (KeypadKey::Digit('4'), 1),
        (KeypadKey::Digit('5'), 1),
        (KeypadKey::Digit('6'), 1),
        (KeypadKey::Operator('+'), 1),
    ],
    &[
        (KeypadKey::Digit('1'), 1),
        (KeypadKey::Digit('2'), 1),
        (KeypadKey::Digit('3'), 1),
        (KeypadKey::Equals, 1),
    ],
    &[(KeypadKey::Digit('0'), 2), (KeypadKey::Point, 1)],
];

/// Clickable button grid
#[derive(Clone, Debug, Default)]
pub struct Keypad {
    /// Area of the last render
    area: Rect,
}

impl Keypad {
    /// Create a keypad that has not been drawn yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Area of the last render
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Place the keypad for the next render and for hit testing
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Every button with the cell it occupies
    ///
    /// Empty when the area is too small to give each button a cell.
    pub fn buttons(&self) -> Vec<(Rect, KeypadKey)> {
        let cell_w = self.area.width / COLUMNS;
        let cell_h = self.area.height / ROWS;
        if cell_w == 0 || cell_h == 0 {
            return Vec::new();
        }

        let mut buttons = Vec::new();
        for (row, keys) in (0u16..).zip(LAYOUT.iter()) {
            let mut column = 0u16;
            for &(key, span) in *keys {
                let rect = Rect::new(
                    self.area.x + column * cell_w,
                    self.area.y + row * cell_h,
                    cell_w * span,
                    cell_h,
                );
                buttons.push((rect, key));
                column += span;
            }
        }
        buttons
    }

    /// Button under a terminal cell
    pub fn hit(&self, column: u16, row: u16) -> Option<KeypadKey> {
        self.buttons()
            .into_iter()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x + button_width(rect)
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(_, key)| key)
    }

    /// Draw every button, flashing `pressed` if given
    pub fn render(&self, buf: &mut Buffer, pressed: Option<KeypadKey>) {
        let area = self.area.intersection(buf.area);
        if area.is_empty() {
            return;
        }

        for (rect, key) in self.buttons() {
            let face = Rect::new(rect.x, rect.y, button_width(&rect), rect.height)
                .intersection(area);
            if face.is_empty() {
                continue;
            }

            let style = theme::key_style(key, pressed == Some(key));
            buf.set_style(face, style);

            let label = key.label();
            let label_width = u16::try_from(label.width()).unwrap_or(u16::MAX);
            let x = face.x + face.width.saturating_sub(label_width) / 2;
            let y = face.y + face.height.saturating_sub(1) / 2;
            buf.set_stringn(x, y, &label, usize::from(face.width), style);
        }
    }
}

/// Drawn width of a button; the right-most column of each cell is a gap
fn button_width(rect: &Rect) -> u16 {
    if rect.width > 1 {
        rect.width - 1
    } else {
        rect.width
    }
}
