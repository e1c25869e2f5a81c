use super::{Rect, Sides};

/// Where a border around a rect goes: four edge runs and four corner cells.
///
/// Edges exclude corners. A disabled side has an empty edge, and a corner is
/// present only when both sides meeting there are enabled. A rect too small
/// for the requested sides yields an all-empty frame.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Frame {
    /// Top edge.
    pub top: Rect,
    /// Bottom edge.
    pub bottom: Rect,
    /// Left edge.
    pub left: Rect,
    /// Right edge.
    pub right: Rect,
    /// Top-left corner.
    pub tl: Rect,
    /// Top-right corner.
    pub tr: Rect,
    /// Bottom-left corner.
    pub bl: Rect,
    /// Bottom-right corner.
    pub br: Rect,
}

impl Frame {
    /// Lay out a border with `sides` around `rect`.
    pub fn new(rect: Rect, sides: Sides<bool>) -> Self {
        let ins = sides.insets();
        if rect.is_empty() || rect.w < ins.horizontal() || rect.h < ins.vertical() {
            return Self::default();
        }
        let when = |on: bool, r: Rect| if on { r } else { Rect::zero() };
        let (x0, y0) = (rect.tl.x, rect.tl.y);
        let (x1, y1) = (rect.right() - 1, rect.bottom() - 1);
        let inner = rect.inset(ins);
        Self {
            top: when(sides.top, Rect::new(inner.tl.x, y0, inner.w, 1)),
            bottom: when(sides.bottom, Rect::new(inner.tl.x, y1, inner.w, 1)),
            left: when(sides.left, Rect::new(x0, inner.tl.y, 1, inner.h)),
            right: when(sides.right, Rect::new(x1, inner.tl.y, 1, inner.h)),
            tl: when(sides.top && sides.left, Rect::new(x0, y0, 1, 1)),
            tr: when(sides.top && sides.right, Rect::new(x1, y0, 1, 1)),
            bl: when(sides.bottom && sides.left, Rect::new(x0, y1, 1, 1)),
            br: when(sides.bottom && sides.right, Rect::new(x1, y1, 1, 1)),
        }
    }
}
