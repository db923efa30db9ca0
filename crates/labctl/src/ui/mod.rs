//! Terminal presentation helpers

pub mod spinner;

use std::io::IsTerminal;

/// Whether stderr is attached to a terminal (spinners and prompts are TTY-only)
pub fn stderr_is_tty() -> bool {
    std::io::stderr().is_terminal()
}

/// Whether stdin is attached to a terminal
pub fn stdin_is_tty() -> bool {
    std::io::stdin().is_terminal()
}
