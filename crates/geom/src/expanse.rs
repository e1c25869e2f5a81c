use super::{Point, Rect};

/// A size with no position: a terminal, a buffer or measured content.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Expanse {
    /// Columns.
    pub w: u32,
    /// Rows.
    pub h: u32,
}

impl Expanse {
    /// A `w` by `h` expanse.
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    /// Number of cells.
    pub fn area(&self) -> u32 {
        self.w * self.h
    }

    /// The rect of this size anchored at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::zero(),
            w: self.w,
            h: self.h,
        }
    }

    /// Zero width or height.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        r.expanse()
    }
}

impl From<(u32, u32)> for Expanse {
    fn from((w, h): (u32, u32)) -> Self {
        Self::new(w, h)
    }
}
