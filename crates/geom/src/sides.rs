use std::ops::Add;

/// A quantity attached to each of the four sides of a rectangle. Borders use
/// `Sides<bool>`, padding uses `Sides<u32>`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Sides<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Copy> Sides<T> {
    /// The same value on every side.
    pub fn all(v: T) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Construct from explicit values, clockwise from the top.
    pub fn new(top: T, right: T, bottom: T, left: T) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Sides<u32> {
    /// Total inset along the x axis.
    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    /// Total inset along the y axis.
    pub fn vertical(&self) -> u32 {
        self.top + self.bottom
    }
}

impl Sides<bool> {
    /// Convert enabled flags into one-cell insets.
    pub fn insets(&self) -> Sides<u32> {
        Sides {
            top: u32::from(self.top),
            right: u32::from(self.right),
            bottom: u32::from(self.bottom),
            left: u32::from(self.left),
        }
    }
}

impl Add for Sides<u32> {
    type Output = Self;

    fn add(self, o: Self) -> Self {
        Self {
            top: self.top + o.top,
            right: self.right + o.right,
            bottom: self.bottom + o.bottom,
            left: self.left + o.left,
        }
    }
}
