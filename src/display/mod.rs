// src/display/mod.rs
//! Display modules for different interfaces

pub mod table;
pub mod terminal;

pub use table::{Action, Row, TableState};
pub use terminal::TerminalDisplay;

use std::io::IsTerminal;

/// Interactive mode needs a real terminal on both ends
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}
