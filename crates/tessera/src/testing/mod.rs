//! Helpers for testing screens without a real terminal.

/// Buffer match assertions.
pub mod buf;
/// Token capability table.
pub mod caps;
/// Recording terminal.
pub mod terminal;

pub use buf::BufTest;
pub use caps::TokenCaps;
pub use terminal::RecordingTerminal;
