//! Geometry primitives used across tessera.

/// Width/height size type.
mod expanse;
/// Frame extraction for bordered rectangles.
mod frame;
/// Horizontal line helpers.
mod line;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Signed rectangle operations.
mod rect_i32;
/// Per-side quantities.
mod sides;

pub use expanse::Expanse;
pub use frame::Frame;
pub use line::Line;
pub use point::Point;
pub use rect::Rect;
pub use rect_i32::RectI32;
pub use sides::Sides;

