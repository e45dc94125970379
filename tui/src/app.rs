//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - CalculatorClient for the editor and the service
//! - DisplayState for rendering
//!
//! Each frame the app polls the calculator (resolved calls, error timers),
//! drains its messages into [`DisplayState`] and redraws.

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::{Frame, Terminal};

use calculator_core::{CalculatorBackend, CalculatorEvent, HttpBackend};

use crate::calculator_client::CalculatorClient;
use crate::display::{fit_right, DisplayState};
use crate::input::{map_key, KeyAction};
use crate::keypad::{Keypad, KeypadKey};
use crate::theme;

/// Target frame time
const FRAME_DURATION: Duration = Duration::from_millis(50);

/// How long a button stays lit after it is pressed
const PRESS_FLASH: Duration = Duration::from_millis(150);

/// Calculator panel width (display and keypad)
const PANEL_WIDTH: u16 = 30;

/// Display block height: border, expression, result, border
const DISPLAY_HEIGHT: u16 = 4;

/// Keypad height: two lines per button row
const KEYPAD_HEIGHT: u16 = 10;

/// Main application state
pub struct App<B: CalculatorBackend + 'static = HttpBackend> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Calculator Integration ===
    /// Client for the embedded calculator
    client: CalculatorClient<B>,
    /// Display state derived from CalculatorMessages
    display: DisplayState,

    // === UI Components ===
    /// Button grid
    keypad: Keypad,
    /// Button lit by the most recent press
    pressed: Option<(KeypadKey, Instant)>,
}

impl<B: CalculatorBackend + 'static> App<B> {
    /// Create a new App around a calculator client
    pub fn new(client: CalculatorClient<B>) -> Self {
        Self {
            running: true,
            client,
            display: DisplayState::new(),
            keypad: Keypad::new(),
            pressed: None,
        }
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Keypad as last drawn
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Main event loop
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        self.start().await;

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event).await,
                        Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                        None => self.running = false,
                    }
                }

                // Frame tick
                () = tokio::time::sleep(FRAME_DURATION) => {}
            }

            self.tick().await;
            self.render(terminal)?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                tokio::time::sleep(FRAME_DURATION - elapsed).await;
            }
        }

        Ok(())
    }

    /// Publish the initial display and kick off the health check
    pub async fn start(&mut self) {
        if let Err(e) = self.client.start().await {
            tracing::warn!("Calculator start error: {}", e);
        }
    }

    /// Dispatch one terminal event
    pub async fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse).await,
            // Layout is recomputed from the frame on every draw
            _ => {}
        }
    }

    /// Poll the calculator and absorb its messages
    pub async fn tick(&mut self) {
        self.client.poll().await;
        self.process_calculator_messages();
        self.update();
    }

    /// Wait for in-flight calculations, then absorb their messages
    pub async fn settle(&mut self) {
        self.client.settle().await;
        self.tick().await;
    }

    /// Process all pending messages from the calculator
    fn process_calculator_messages(&mut self) {
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, key: KeyEvent) {
        match map_key(&key) {
            Some(KeyAction::Quit) => self.running = false,
            Some(KeyAction::Calculator(event)) => self.dispatch(event).await,
            None => {}
        }
    }

    /// Handle mouse input
    async fn handle_mouse(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            if let Some(key) = self.keypad.hit(mouse.column, mouse.row) {
                self.dispatch(key.event()).await;
            }
        }
    }

    /// Send a command to the calculator and light its button
    async fn dispatch(&mut self, event: CalculatorEvent) {
        if let Some(key) = KeypadKey::for_event(&event) {
            self.pressed = Some((key, Instant::now()));
        }
        if let Err(e) = self.client.send(event).await {
            tracing::warn!("Calculator rejected command: {}", e);
        }
        self.process_calculator_messages();
    }

    /// Expire button flashes
    fn update(&mut self) {
        if let Some((_, at)) = self.pressed {
            if at.elapsed() >= PRESS_FLASH {
                self.pressed = None;
            }
        }
    }

    /// Render the UI
    pub fn render<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [main, status] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        let panel = centered(main, PANEL_WIDTH, DISPLAY_HEIGHT + KEYPAD_HEIGHT);
        let [display_area, keypad_area] = Layout::vertical([
            Constraint::Length(DISPLAY_HEIGHT),
            Constraint::Min(0),
        ])
        .areas(panel);

        self.render_display(frame, display_area);

        self.keypad.set_area(keypad_area);
        let pressed = self.pressed.map(|(key, _)| key);
        self.keypad.render(frame.buffer_mut(), pressed);

        self.render_status(frame, status);
    }

    /// Render the expression and result regions
    fn render_display(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().border_style(Style::default().fg(theme::BORDER_GRAY));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = usize::from(inner.width);
        let buf = frame.buffer_mut();
        buf.set_stringn(
            inner.x,
            inner.y,
            fit_right(&self.display.expression, width),
            width,
            Style::default().fg(theme::EXPRESSION_GRAY),
        );
        if inner.height > 1 {
            buf.set_stringn(
                inner.x,
                inner.y + 1,
                fit_right(&self.display.result, width),
                width,
                theme::result_style(self.display.error),
            );
        }
    }

    /// Render status bar
    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let healthy = self.display.backend.as_ref().map(|b| b.healthy);
        let style = match healthy {
            Some(true) => Style::default().fg(theme::STATUS_OK),
            Some(false) => Style::default().fg(theme::STATUS_DOWN),
            None => Style::default().fg(theme::DIM_GRAY),
        };
        let text = self.display.status_text(self.client.server_url());
        frame
            .buffer_mut()
            .set_stringn(area.x, area.y, text, usize::from(area.width), style);
    }
}

/// A `width` x `height` rect centred in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
