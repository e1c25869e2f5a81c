//! Pointer input.
use crate::{event::key::Mods, geom::Point};

/// A physical mouse button.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Button {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel click.
    Middle,
}

/// What the pointer did.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MouseKind {
    /// A button went down.
    Press(Button),
    /// A button came up.
    Release(Button),
    /// The pointer moved with a button held.
    Drag(Button),
    /// The pointer moved with nothing held.
    Move,
    /// One wheel notch. Positive values scroll content downward.
    Wheel(i32),
}

/// A pointer event at a screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// What happened.
    pub kind: MouseKind,
    /// Modifier keys held at the time.
    pub mods: Mods,
    /// Screen cell under the pointer.
    pub at: Point,
}

impl MouseEvent {
    /// An unmodified event at `(x, y)`.
    pub fn new(kind: MouseKind, x: u32, y: u32) -> Self {
        Self {
            kind,
            mods: Mods::NONE,
            at: Point { x, y },
        }
    }

    /// Is this a bare pointer move?
    pub fn is_move(&self) -> bool {
        self.kind == MouseKind::Move
    }
}
