//! Terminal output: the device a screen writes to, and the capability layer
//! that turns abstract terminal operations into bytes.
use std::fmt::Debug;

/// ANSI capability compiler.
pub mod ansi;
/// Crossterm-backed terminal and input source.
pub mod crossterm;

use crate::{
    error::Result,
    geom::{Expanse, Point},
    style::Attr,
};

/// An abstract terminal operation. Coordinates are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cap {
    /// Absolute cursor move.
    CursorTo {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// Move the cursor up.
    CursorUp(u32),
    /// Move the cursor down.
    CursorDown(u32),
    /// Move the cursor left.
    CursorLeft(u32),
    /// Move the cursor right.
    CursorRight(u32),
    /// Insert blank lines at the cursor row, pushing lines below it down
    /// within the scroll region.
    InsertLines(u32),
    /// Delete lines at the cursor row, pulling lines below it up within the
    /// scroll region.
    DeleteLines(u32),
    /// Restrict line insertion and deletion to rows `top..=bottom`.
    SetScrollRegion {
        /// First row of the region.
        top: u32,
        /// Last row of the region.
        bottom: u32,
    },
    /// Restore the full-screen scroll region.
    ResetScrollRegion,
    /// Set colors and attributes for subsequent text.
    Attr(Attr),
    /// Switch to the alternate screen.
    EnterAltScreen,
    /// Leave the alternate screen.
    ExitAltScreen,
    /// Show the cursor.
    ShowCursor,
    /// Hide the cursor.
    HideCursor,
    /// Clear the screen.
    Clear,
}

/// Compiles terminal operations into bytes. The engine never writes escape
/// sequences directly; everything goes through this table.
pub trait Capabilities {
    /// The bytes for an operation, or `None` if the terminal does not
    /// support it.
    fn compile(&self, cap: &Cap) -> Option<Vec<u8>>;

    /// Does the terminal support an operation at all?
    fn supports(&self, cap: &Cap) -> bool {
        self.compile(cap).is_some()
    }

    /// Can this terminal shift lines within a scroll region?
    fn scroll_region(&self) -> bool {
        self.supports(&Cap::SetScrollRegion { top: 0, bottom: 1 })
            && self.supports(&Cap::ResetScrollRegion)
            && self.supports(&Cap::InsertLines(1))
            && self.supports(&Cap::DeleteLines(1))
    }
}

/// The output device.
pub trait Terminal: Debug {
    /// Write bytes to the terminal. Output may be buffered until `flush`.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Flush buffered output.
    fn flush(&mut self) -> Result<()>;

    /// The current terminal size.
    fn size(&self) -> Result<Expanse>;

    /// The current cursor position.
    fn cursor(&mut self) -> Result<Point>;

    /// Take control of the terminal: raw mode and input capture.
    fn start(&mut self) -> Result<()>;

    /// Release the terminal, restoring its modes.
    fn stop(&mut self) -> Result<()>;
}

/// Accumulates compiled capabilities into one output buffer. Unsupported
/// operations are reported back to the caller instead of being written.
pub(crate) struct Emitter<'a> {
    /// Capability table.
    caps: &'a dyn Capabilities,
    /// Pending output.
    pub out: Vec<u8>,
}

impl<'a> Emitter<'a> {
    /// An empty emitter over a capability table.
    pub fn new(caps: &'a dyn Capabilities) -> Self {
        Self {
            caps,
            out: Vec::new(),
        }
    }

    /// Append an operation. Returns `false` if it is unsupported.
    pub fn cap(&mut self, cap: Cap) -> bool {
        match self.caps.compile(&cap) {
            Some(b) => {
                self.out.extend_from_slice(&b);
                true
            }
            None => false,
        }
    }
}
