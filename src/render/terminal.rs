//! Terminal output for the dashboard board.

use crate::render::board::{Board, BoardObserver, Slot, SlotValue};
use std::io::{self, Write};
use tracing::warn;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Prints the board every time it changes.
pub struct TerminalPrinter<W: Write + Send> {
    out: W,
    clear_screen: bool,
}

impl TerminalPrinter<io::Stdout> {
    /// Print to stdout, redrawing the screen on every change.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), true)
    }
}

impl<W: Write + Send> TerminalPrinter<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    /// Consume the printer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> BoardObserver for TerminalPrinter<W> {
    fn board_changed(&mut self, board: &Board) {
        if self.clear_screen {
            if let Err(e) = self.out.write_all(CLEAR_SCREEN.as_bytes()) {
                warn!("Failed to clear terminal: {}", e);
            }
        }
        if let Err(e) = write_board(&mut self.out, board).and_then(|_| self.out.flush()) {
            warn!("Failed to print dashboard: {}", e);
        }
    }
}

/// Write a human-readable rendition of the board.
pub fn write_board(out: &mut impl Write, board: &Board) -> io::Result<()> {
    match board.updated_at() {
        Some(at) => writeln!(out, "🖥️  Server Info ({})", at.format("%Y-%m-%d %H:%M:%S UTC"))?,
        None => writeln!(out, "🖥️  Server Info (waiting for data)")?,
    }
    writeln!(out, "==========================================")?;

    for (slot, value) in board.iter() {
        if matches!(slot, Slot::CpuImage) {
            writeln!(out)?;
        }
        match value {
            SlotValue::Text(text) => writeln!(out, "  {}", text)?,
            SlotValue::Icon(icon) => writeln!(out, "  [{}]", icon.asset())?,
        }
    }
    Ok(())
}
