//! Element descriptions: where an element sits relative to its parent, how it
//! is decorated, and what it shows.
use std::str::FromStr;

use crate::{
    content::Content,
    error::{Error, Result},
    geom::Sides,
    scroll::ScrollOptions,
    style::{PartialStyle, StateStyle, Style},
};

/// Parse the percentage form shared by offsets and extents: `"50%"`,
/// `"50%-2"`, `"12.5%+1"`.
fn parse_percent(s: &str) -> Result<Option<(f32, i32)>> {
    let Some((p, rest)) = s.split_once('%') else {
        return Ok(None);
    };
    let perc = p
        .trim()
        .parse::<f32>()
        .map_err(|_| Error::InvalidSpec(format!("bad percentage: {s:?}")))?;
    let rest = rest.trim();
    let delta = if rest.is_empty() {
        0
    } else {
        let digits = rest.strip_prefix('+').unwrap_or(rest);
        digits
            .replace(' ', "")
            .parse::<i32>()
            .map_err(|_| Error::InvalidSpec(format!("bad percentage delta: {s:?}")))?
    };
    Ok(Some((perc, delta)))
}

/// Resolve a percentage of a length, truncating toward zero before adding the
/// delta.
pub(crate) fn percent_of(perc: f32, delta: i32, len: u32) -> i64 {
    let whole = (f64::from(perc) / 100.0 * f64::from(len)).trunc() as i64;
    whole.saturating_add(i64::from(delta))
}

/// A position along one axis, relative to the parent's interior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Offset {
    /// A fixed number of cells. May be negative.
    Cells(i32),
    /// A percentage of the parent's interior length, plus a cell delta.
    Percent(f32, i32),
    /// Centered in the parent.
    Center,
}

impl FromStr for Offset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("center") {
            return Ok(Self::Center);
        }
        if let Some((p, d)) = parse_percent(s)? {
            return Ok(Self::Percent(p, d));
        }
        s.parse::<i32>()
            .map(Self::Cells)
            .map_err(|_| Error::InvalidSpec(format!("bad offset: {s:?}")))
    }
}

impl From<i32> for Offset {
    fn from(v: i32) -> Self {
        Self::Cells(v)
    }
}

/// A length along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// A fixed number of cells.
    Cells(u32),
    /// A percentage of the parent's interior length, plus a cell delta.
    Percent(f32, i32),
    /// Measured from content and children.
    Shrink,
}

impl FromStr for Extent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("shrink") {
            return Ok(Self::Shrink);
        }
        if let Some((p, d)) = parse_percent(s)? {
            return Ok(Self::Percent(p, d));
        }
        s.parse::<u32>()
            .map(Self::Cells)
            .map_err(|_| Error::InvalidSpec(format!("bad extent: {s:?}")))
    }
}

impl From<u32> for Extent {
    fn from(v: u32) -> Self {
        Self::Cells(v)
    }
}

/// The position specification of an element. Unset fields fall back as
/// described on each accessor of the layout pass: a missing width with both
/// edges set stretches, otherwise it shrinks; a missing left edge with a right
/// edge anchors right, otherwise 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Distance from the parent's left interior edge.
    pub left: Option<Offset>,
    /// Distance from the parent's right interior edge.
    pub right: Option<Offset>,
    /// Distance from the parent's top interior edge.
    pub top: Option<Offset>,
    /// Distance from the parent's bottom interior edge.
    pub bottom: Option<Offset>,
    /// Width.
    pub width: Option<Extent>,
    /// Height.
    pub height: Option<Extent>,
}

impl Position {
    /// Parse a whitespace-separated list of `key=value` pairs, for example
    /// `"left=center top=2 width=50%-2 height=shrink"`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut p = Self::default();
        for pair in s.split_whitespace() {
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| Error::InvalidSpec(format!("expected key=value: {pair:?}")))?;
            match k {
                "left" => p.left = Some(v.parse()?),
                "right" => p.right = Some(v.parse()?),
                "top" => p.top = Some(v.parse()?),
                "bottom" => p.bottom = Some(v.parse()?),
                "width" => p.width = Some(v.parse()?),
                "height" => p.height = Some(v.parse()?),
                _ => return Err(Error::InvalidSpec(format!("unknown position key: {k:?}"))),
            }
        }
        Ok(p)
    }
}

/// Border glyph family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderKind {
    /// Light box-drawing lines.
    #[default]
    Line,
    /// Double box-drawing lines.
    Double,
    /// Heavy box-drawing lines.
    Heavy,
    /// A single character on every border cell. Never docks.
    Char(char),
}

/// Border glyphs in the order: horizontal, vertical, top-left, top-right,
/// bottom-left, bottom-right.
pub(crate) struct BorderGlyphs {
    /// Horizontal edge.
    pub h: char,
    /// Vertical edge.
    pub v: char,
    /// Top-left corner.
    pub tl: char,
    /// Top-right corner.
    pub tr: char,
    /// Bottom-left corner.
    pub bl: char,
    /// Bottom-right corner.
    pub br: char,
}

impl BorderKind {
    /// The glyphs for a plain (undocked) border of this kind.
    pub(crate) fn glyphs(&self) -> BorderGlyphs {
        let g = |h, v, tl, tr, bl, br| BorderGlyphs {
            h,
            v,
            tl,
            tr,
            bl,
            br,
        };
        match *self {
            Self::Line => g('─', '│', '┌', '┐', '└', '┘'),
            Self::Double => g('═', '║', '╔', '╗', '╚', '╝'),
            Self::Heavy => g('━', '┃', '┏', '┓', '┗', '┛'),
            Self::Char(c) => g(c, c, c, c, c, c),
        }
    }
}

/// A border drawn inside the element's rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Border {
    /// Which sides are drawn.
    pub sides: Sides<bool>,
    /// Glyph family.
    pub kind: BorderKind,
    /// Overrides applied to the element's style for border cells.
    pub style: PartialStyle,
}

impl Border {
    /// A border on all four sides.
    pub fn new(kind: BorderKind) -> Self {
        Self {
            sides: Sides::all(true),
            kind,
            style: PartialStyle::default(),
        }
    }

    /// Restrict the border to the given sides.
    pub fn sides(mut self, sides: Sides<bool>) -> Self {
        self.sides = sides;
        self
    }

    /// Set the border style override.
    pub fn style(mut self, style: PartialStyle) -> Self {
        self.style = style;
        self
    }
}

/// Everything an element needs to be laid out and painted.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Optional name, shown in tree dumps.
    pub name: Option<String>,
    /// Position specification.
    pub position: Position,
    /// Style with focus and hover overrides.
    pub style: StateStyle,
    /// Optional border.
    pub border: Option<Border>,
    /// Padding inside the border.
    pub padding: Sides<u32>,
    /// Content lines.
    pub content: Content,
    /// Hidden elements and their subtrees are neither laid out nor painted.
    pub hidden: bool,
    /// Can this element take keyboard focus?
    pub focusable: bool,
    /// Does this element receive mouse events?
    pub clickable: bool,
    /// Scrolling behaviour, if this element is a scrollable box.
    pub scroll: Option<ScrollOptions>,
}

impl Element {
    /// An element with no position constraints; it shrinks to its content at
    /// the parent's top-left corner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dump name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the whole position specification.
    pub fn position(mut self, p: Position) -> Self {
        self.position = p;
        self
    }

    /// Set the left offset.
    pub fn left(mut self, v: impl Into<Offset>) -> Self {
        self.position.left = Some(v.into());
        self
    }

    /// Set the right offset.
    pub fn right(mut self, v: impl Into<Offset>) -> Self {
        self.position.right = Some(v.into());
        self
    }

    /// Set the top offset.
    pub fn top(mut self, v: impl Into<Offset>) -> Self {
        self.position.top = Some(v.into());
        self
    }

    /// Set the bottom offset.
    pub fn bottom(mut self, v: impl Into<Offset>) -> Self {
        self.position.bottom = Some(v.into());
        self
    }

    /// Set the width.
    pub fn width(mut self, v: impl Into<Extent>) -> Self {
        self.position.width = Some(v.into());
        self
    }

    /// Set the height.
    pub fn height(mut self, v: impl Into<Extent>) -> Self {
        self.position.height = Some(v.into());
        self
    }

    /// Set the base style.
    pub fn style(mut self, s: Style) -> Self {
        self.style.base = s;
        self
    }

    /// Set the focus style override.
    pub fn focus_style(mut self, s: PartialStyle) -> Self {
        self.style.focus = s;
        self
    }

    /// Set the hover style override.
    pub fn hover_style(mut self, s: PartialStyle) -> Self {
        self.style.hover = s;
        self
    }

    /// Set the border.
    pub fn border(mut self, b: Border) -> Self {
        self.border = Some(b);
        self
    }

    /// Set the padding.
    pub fn padding(mut self, p: Sides<u32>) -> Self {
        self.padding = p;
        self
    }

    /// Set the content.
    pub fn content(mut self, c: impl Into<Content>) -> Self {
        self.content = c.into();
        self
    }

    /// Set the hidden flag.
    pub fn hidden(mut self, v: bool) -> Self {
        self.hidden = v;
        self
    }

    /// Set the focusable flag.
    pub fn focusable(mut self, v: bool) -> Self {
        self.focusable = v;
        self
    }

    /// Set the clickable flag.
    pub fn clickable(mut self, v: bool) -> Self {
        self.clickable = v;
        self
    }

    /// Make this element a scrollable box.
    pub fn scrollable(mut self, opts: ScrollOptions) -> Self {
        self.scroll = Some(opts);
        self
    }

    /// The total inset of border and padding on each side.
    pub fn insets(&self) -> Sides<u32> {
        let b = self.border.map(|b| b.sides.insets()).unwrap_or_default();
        b + self.padding
    }

    /// Does this element participate in focus or hit-testing?
    pub(crate) fn interactive(&self) -> bool {
        self.focusable || self.clickable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_offsets() {
        assert_eq!("10".parse::<Offset>().unwrap(), Offset::Cells(10));
        assert_eq!("-3".parse::<Offset>().unwrap(), Offset::Cells(-3));
        assert_eq!("center".parse::<Offset>().unwrap(), Offset::Center);
        assert_eq!("50%".parse::<Offset>().unwrap(), Offset::Percent(50.0, 0));
        assert_eq!("50%-2".parse::<Offset>().unwrap(), Offset::Percent(50.0, -2));
        assert_eq!("25%+1".parse::<Offset>().unwrap(), Offset::Percent(25.0, 1));
        assert!("abc".parse::<Offset>().is_err());
        assert!("50%x".parse::<Offset>().is_err());
    }

    #[test]
    fn parse_extents() {
        assert_eq!("shrink".parse::<Extent>().unwrap(), Extent::Shrink);
        assert_eq!("7".parse::<Extent>().unwrap(), Extent::Cells(7));
        assert_eq!("100%".parse::<Extent>().unwrap(), Extent::Percent(100.0, 0));
        assert!("-1".parse::<Extent>().is_err());
    }

    #[test]
    fn percent_truncates() {
        assert_eq!(percent_of(50.0, 0, 81), 40);
        assert_eq!(percent_of(50.0, -2, 80), 38);
        assert_eq!(percent_of(33.3, 0, 10), 3);
        assert_eq!(
            percent_of(100.0, i32::MAX, u32::MAX),
            i64::from(u32::MAX) + i64::from(i32::MAX)
        );
    }

    #[test]
    fn parse_position() {
        let p = Position::parse("left=center top=2 width=50%-2 height=shrink").unwrap();
        assert_eq!(p.left, Some(Offset::Center));
        assert_eq!(p.top, Some(Offset::Cells(2)));
        assert_eq!(p.width, Some(Extent::Percent(50.0, -2)));
        assert_eq!(p.height, Some(Extent::Shrink));
        assert!(Position::parse("depth=3").is_err());
        assert!(Position::parse("left").is_err());
    }

    #[test]
    fn insets_combine_border_and_padding() {
        let e = Element::new()
            .border(Border::new(BorderKind::Line).sides(Sides::new(true, false, true, false)))
            .padding(Sides::all(1));
        assert_eq!(e.insets(), Sides::new(2, 1, 2, 1));
    }
}
