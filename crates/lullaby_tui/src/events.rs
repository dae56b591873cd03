//! Terminal event polling.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use lullaby_error::{TuiError, TuiErrorKind, TuiResult};
use std::time::Duration;

/// Event types for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// No input within the tick interval
    Tick,
    /// Key press
    Key(KeyEvent),
}

/// Polls the terminal for key presses.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a handler with the given tick rate in milliseconds.
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Wait for the next event, or a tick if nothing arrives in time.
    ///
    /// Key releases and non-key events yield `None`.
    pub fn next(&self) -> TuiResult<Option<Event>> {
        let ready = event::poll(self.tick_rate)
            .map_err(|e| TuiError::new(TuiErrorKind::Event(e.to_string())))?;
        if !ready {
            return Ok(Some(Event::Tick));
        }

        match event::read().map_err(|e| TuiError::new(TuiErrorKind::Event(e.to_string())))? {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(Event::Key(key))),
            _ => Ok(None),
        }
    }
}
