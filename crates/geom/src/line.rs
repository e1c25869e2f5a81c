use super::{Point, Rect};

/// A one-row run of cells.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Line {
    /// Leftmost cell.
    pub tl: Point,
    /// Width in cells.
    pub w: u32,
}

impl Line {
    /// A run of `w` cells starting at `(x, y)`.
    pub fn new(x: u32, y: u32, w: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
        }
    }

    /// The line as a one-row rectangle.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: self.tl,
            w: self.w,
            h: 1,
        }
    }
}
