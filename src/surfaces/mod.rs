mod memory;
mod terminal;

pub use memory::{CursorNode, MemorySurface};
pub use terminal::{TerminalSurface, parse_color};
