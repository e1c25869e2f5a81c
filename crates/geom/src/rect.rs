use super::{Expanse, Point, Sides};

/// A rectangle of terminal cells.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The zero rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Does this rectangle cover no cells?
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// One past the rightmost column.
    pub fn right(&self) -> u32 {
        self.tl.x + self.w
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> u32 {
        self.tl.y + self.h
    }

    /// The size of the rectangle.
    pub fn expanse(&self) -> Expanse {
        Expanse::new(self.w, self.h)
    }

    /// Does this rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Does this rectangle completely enclose the other? Empty rectangles are
    /// enclosed by anything.
    pub fn contains_rect(&self, other: &Self) -> bool {
        if other.is_empty() {
            return true;
        }
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The overlapping area of two rectangles, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x = self.tl.x.max(other.tl.x);
        let y = self.tl.y.max(other.tl.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if r > x && b > y {
            Some(Self::new(x, y, r - x, b - y))
        } else {
            None
        }
    }

    /// Shrink the rectangle by the given insets. Insets larger than the
    /// rectangle collapse the corresponding dimension to zero.
    pub fn inset(&self, s: Sides<u32>) -> Self {
        let x = self.tl.x.saturating_add(s.left.min(self.w));
        let y = self.tl.y.saturating_add(s.top.min(self.h));
        Self::new(
            x,
            y,
            self.w.saturating_sub(s.horizontal()),
            self.h.saturating_sub(s.vertical()),
        )
    }
}
