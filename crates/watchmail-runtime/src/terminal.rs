//! Terminal mode management for the watch loop.

use anyhow::Result;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;

/// Current terminal dimensions in (columns, rows), with an 80x24 fallback
/// when stdout is not a terminal.
pub fn dimensions() -> (usize, usize) {
    match terminal_size::terminal_size() {
        Some((terminal_size::Width(cols), terminal_size::Height(rows))) => {
            (cols as usize, rows as usize)
        }
        None => (80, 24),
    }
}

/// Switches to the alternate screen buffer with a hidden cursor, and
/// guarantees exactly-once restoration on every exit path: `restore` is
/// idempotent and `Drop` covers quit keys, signals, and faults alike.
pub struct TerminalGuard {
    raw_mode: bool,
    restored: bool,
}

impl TerminalGuard {
    pub fn enter(raw_mode: bool) -> Result<Self> {
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        if raw_mode {
            terminal::enable_raw_mode()?;
        }
        Ok(Self {
            raw_mode,
            restored: false,
        })
    }

    pub fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
