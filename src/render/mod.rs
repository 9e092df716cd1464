//! Rendering of snapshots onto display slots, and the outputs that show them.

pub mod board;
pub mod terminal;

// Re-export commonly used items
pub use board::{Board, BoardObserver, Renderer, Slot, SlotUpdate, SlotValue};
pub use terminal::TerminalPrinter;
