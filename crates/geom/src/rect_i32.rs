use super::Rect;

/// A rectangle in signed coordinates. Layout produces these before clipping,
/// since elements may be positioned partially or fully off their parent.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct RectI32 {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width; non-positive means empty.
    pub w: i32,
    /// Height; non-positive means empty.
    pub h: i32,
}

impl RectI32 {
    /// Construct a signed rectangle.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Does this rectangle cover no cells?
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Clip against an unsigned bounding rectangle. Returns `None` if nothing
    /// of this rectangle remains.
    pub fn clip(&self, bounds: Rect) -> Option<Rect> {
        if self.is_empty() || bounds.is_empty() {
            return None;
        }
        let x0 = i64::from(self.x).max(i64::from(bounds.tl.x));
        let y0 = i64::from(self.y).max(i64::from(bounds.tl.y));
        let x1 = (i64::from(self.x) + i64::from(self.w)).min(i64::from(bounds.right()));
        let y1 = (i64::from(self.y) + i64::from(self.h)).min(i64::from(bounds.bottom()));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(
            x0 as u32,
            y0 as u32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }
}

impl From<Rect> for RectI32 {
    fn from(r: Rect) -> Self {
        Self::new(r.tl.x as i32, r.tl.y as i32, r.w as i32, r.h as i32)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn clip_partial() {
        let b = Rect::new(0, 0, 10, 5);
        assert_eq!(
            RectI32::new(-3, 2, 6, 10).clip(b),
            Some(Rect::new(0, 2, 3, 3))
        );
        assert_eq!(RectI32::new(-3, 2, 3, 1).clip(b), None);
        assert_eq!(RectI32::new(2, 2, -1, 1).clip(b), None);
    }

    proptest! {
        #[test]
        fn clip_is_contained(
            x in -100i32..100, y in -100i32..100,
            w in -10i32..200, h in -10i32..200,
            bx in 0u32..50, by in 0u32..50, bw in 0u32..80, bh in 0u32..80,
        ) {
            let bounds = Rect::new(bx, by, bw, bh);
            if let Some(c) = RectI32::new(x, y, w, h).clip(bounds) {
                prop_assert!(bounds.contains_rect(&c));
                prop_assert!(!c.is_empty());
            }
        }
    }
}
