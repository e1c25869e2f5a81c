//! Colors, text attributes and the packed attribute word stored in every
//! terminal cell.
use crate::color;

/// A cell colour. The named colours are the sixteen-entry ANSI palette.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash, Default)]
pub enum Color {
    /// The terminal's own default color.
    #[default]
    Default,
    /// Black.
    Black,
    /// Bright black.
    DarkGrey,
    /// Red.
    Red,
    /// Palette entry 1.
    DarkRed,
    /// Green.
    Green,
    /// Palette entry 2.
    DarkGreen,
    /// Yellow.
    Yellow,
    /// Palette entry 3, often rendered brown.
    DarkYellow,
    /// Blue.
    Blue,
    /// Palette entry 4.
    DarkBlue,
    /// Magenta.
    Magenta,
    /// Palette entry 5.
    DarkMagenta,
    /// Cyan.
    Cyan,
    /// Palette entry 6.
    DarkCyan,
    /// White.
    White,
    /// Grey.
    Grey,
    /// RGB color. Matched to the nearest xterm-256 entry when packed.
    Rgb {
        /// Red.
        r: u8,
        /// Green.
        g: u8,
        /// Blue.
        b: u8,
    },
    /// An entry in the 256-color palette.
    AnsiValue(u8),
}

impl Color {
    /// The palette index for this color, or `None` for the terminal default.
    pub fn index(self) -> Option<u8> {
        Some(match self {
            Self::Default => return None,
            Self::Black => 0,
            Self::DarkRed => 1,
            Self::DarkGreen => 2,
            Self::DarkYellow => 3,
            Self::DarkBlue => 4,
            Self::DarkMagenta => 5,
            Self::DarkCyan => 6,
            Self::Grey => 7,
            Self::DarkGrey => 8,
            Self::Red => 9,
            Self::Green => 10,
            Self::Yellow => 11,
            Self::Blue => 12,
            Self::Magenta => 13,
            Self::Cyan => 14,
            Self::White => 15,
            Self::AnsiValue(n) => n,
            Self::Rgb { r, g, b } => color::match_rgb(r, g, b),
        })
    }

    /// Parse a color name ("red", "darkblue", "default"), a palette index
    /// ("123"), or a hex triplet ("#ff8800").
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Self::Rgb { r, g, b });
        }
        if let Ok(n) = s.parse::<u8>() {
            return Some(Self::AnsiValue(n));
        }
        Some(match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "default" => Self::Default,
            "black" => Self::Black,
            "darkgrey" | "darkgray" => Self::DarkGrey,
            "red" => Self::Red,
            "darkred" => Self::DarkRed,
            "green" => Self::Green,
            "darkgreen" => Self::DarkGreen,
            "yellow" => Self::Yellow,
            "darkyellow" => Self::DarkYellow,
            "blue" => Self::Blue,
            "darkblue" => Self::DarkBlue,
            "magenta" => Self::Magenta,
            "darkmagenta" => Self::DarkMagenta,
            "cyan" => Self::Cyan,
            "darkcyan" => Self::DarkCyan,
            "white" => Self::White,
            "grey" | "gray" => Self::Grey,
            _ => return None,
        })
    }
}

/// One SGR text attribute.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Attribute {
    /// Heavier weight.
    Bold,
    /// Struck through.
    CrossedOut,
    /// Reduced intensity.
    Dim,
    /// Slanted.
    Italic,
    /// Foreground and background swapped.
    Inverse,
    /// Underlined.
    Underline,
}

/// Which attributes are on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct AttrSet {
    /// [`Attribute::Bold`].
    pub bold: bool,
    /// [`Attribute::CrossedOut`].
    pub crossedout: bool,
    /// [`Attribute::Dim`].
    pub dim: bool,
    /// [`Attribute::Italic`].
    pub italic: bool,
    /// [`Attribute::Inverse`].
    pub inverse: bool,
    /// [`Attribute::Underline`].
    pub underline: bool,
}

impl AttrSet {
    /// A set holding just `attr`.
    pub fn new(attr: Attribute) -> Self {
        Self::default().with(attr)
    }

    /// No attribute on?
    pub fn is_empty(&self) -> bool {
        !self.flags().contains(&true)
    }

    /// This set plus `attr`.
    pub fn with(mut self, attr: Attribute) -> Self {
        match attr {
            Attribute::Bold => self.bold = true,
            Attribute::Dim => self.dim = true,
            Attribute::Italic => self.italic = true,
            Attribute::CrossedOut => self.crossedout = true,
            Attribute::Underline => self.underline = true,
            Attribute::Inverse => self.inverse = true,
        };
        self
    }

    /// Flags in the order they are packed into an [`Attr`] word.
    fn flags(&self) -> [bool; 6] {
        [
            self.bold,
            self.dim,
            self.italic,
            self.underline,
            self.crossedout,
            self.inverse,
        ]
    }
}

/// Bits per packed color.
const COLOR_BITS: u32 = 9;
/// Mask for one packed color.
const COLOR_MASK: u32 = (1 << COLOR_BITS) - 1;
/// Packed value meaning "terminal default color".
const COLOR_DEFAULT: u32 = COLOR_MASK;
/// First bit of the attribute flags.
const FLAG_SHIFT: u32 = COLOR_BITS * 2;

/// The packed attribute word stored in each cell: background in the low nine
/// bits, foreground in the next nine, then one bit per text attribute.
/// Two cells render identically iff their glyphs and words are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attr(u32);

impl Default for Attr {
    fn default() -> Self {
        Self(COLOR_DEFAULT | (COLOR_DEFAULT << COLOR_BITS))
    }
}

impl Attr {
    /// Pack colors and attributes.
    pub fn new(fg: Color, bg: Color, attrs: AttrSet) -> Self {
        let pack = |c: Color| c.index().map_or(COLOR_DEFAULT, u32::from);
        let mut word = pack(bg) | (pack(fg) << COLOR_BITS);
        for (i, on) in attrs.flags().iter().enumerate() {
            if *on {
                word |= 1 << (FLAG_SHIFT + i as u32);
            }
        }
        Self(word)
    }

    /// The raw word.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Foreground palette index, `None` for the default color.
    pub fn fg(&self) -> Option<u8> {
        unpack((self.0 >> COLOR_BITS) & COLOR_MASK)
    }

    /// Background palette index, `None` for the default color.
    pub fn bg(&self) -> Option<u8> {
        unpack(self.0 & COLOR_MASK)
    }

    /// The text attributes in this word.
    pub fn attrs(&self) -> AttrSet {
        let on = |i: u32| self.0 & (1 << (FLAG_SHIFT + i)) != 0;
        AttrSet {
            bold: on(0),
            dim: on(1),
            italic: on(2),
            underline: on(3),
            crossedout: on(4),
            inverse: on(5),
        }
    }
}

/// Unpack a nine-bit color field.
fn unpack(v: u32) -> Option<u8> {
    if v == COLOR_DEFAULT {
        None
    } else {
        Some(v as u8)
    }
}

/// Everything needed to draw a cell except the glyph.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text attributes.
    pub attrs: AttrSet,
}

impl Style {
    /// A style from its parts.
    pub fn new(fg: Color, bg: Color, attrs: AttrSet) -> Self {
        Self { fg, bg, attrs }
    }

    /// Set the foreground color.
    pub fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Set the background color.
    pub fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Turn on `attr`.
    pub fn with(mut self, attr: Attribute) -> Self {
        self.attrs = self.attrs.with(attr);
        self
    }

    /// Overlay a partial style. Components set in `over` win.
    pub fn merge(&self, over: &PartialStyle) -> Self {
        Self {
            fg: over.fg.unwrap_or(self.fg),
            bg: over.bg.unwrap_or(self.bg),
            attrs: over.attrs.unwrap_or(self.attrs),
        }
    }

    /// Pack into a cell attribute word.
    pub fn attr(&self) -> Attr {
        Attr::new(self.fg, self.bg, self.attrs)
    }
}

/// A style override where unset parts fall through to the base style.
/// Focus and hover styling are partial styles.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct PartialStyle {
    /// Foreground override.
    pub fg: Option<Color>,
    /// Background override.
    pub bg: Option<Color>,
    /// Replaces the whole attribute set when present.
    pub attrs: Option<AttrSet>,
}

impl PartialStyle {
    /// Override only the foreground.
    pub fn fg(fg: Color) -> Self {
        Self {
            fg: Some(fg),
            ..Self::default()
        }
    }

    /// Override only the background.
    pub fn bg(bg: Color) -> Self {
        Self {
            bg: Some(bg),
            ..Self::default()
        }
    }

    /// Also override the foreground.
    pub fn with_fg(mut self, fg: Color) -> Self {
        self.fg = Some(fg);
        self
    }

    /// Also override the background.
    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Also turn on `attr`.
    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default().with(attr));
        self
    }

    /// Merge two partial styles; components set in `self` win.
    pub fn join(&self, other: &Self) -> Self {
        Self {
            fg: self.fg.or(other.fg),
            bg: self.bg.or(other.bg),
            attrs: self.attrs.or(other.attrs),
        }
    }

    /// Is nothing set?
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }
}

/// An element's style along with the overrides applied while it is focused
/// or hovered.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct StateStyle {
    /// Base style.
    pub base: Style,
    /// Applied while the element holds focus.
    pub focus: PartialStyle,
    /// Applied while the pointer is over the element.
    pub hover: PartialStyle,
}

impl StateStyle {
    /// The effective style for the given state. Focus takes precedence over
    /// hover when both apply.
    pub fn resolve(&self, focused: bool, hovered: bool) -> Style {
        let mut over = PartialStyle::default();
        if focused {
            over = over.join(&self.focus);
        }
        if hovered {
            over = over.join(&self.hover);
        }
        self.base.merge(&over)
    }
}

impl From<Style> for StateStyle {
    fn from(base: Style) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_word() {
        let a = Attr::default();
        assert_eq!(a.fg(), None);
        assert_eq!(a.bg(), None);
        assert!(a.attrs().is_empty());
        assert_eq!(Style::default().attr(), a);
    }

    #[test]
    fn pack_unpack() {
        let attrs = AttrSet::new(Attribute::Bold).with(Attribute::Underline);
        let a = Attr::new(Color::Red, Color::AnsiValue(200), attrs);
        assert_eq!(a.fg(), Some(9));
        assert_eq!(a.bg(), Some(200));
        assert_eq!(a.attrs(), attrs);
        assert_ne!(a, Attr::new(Color::Red, Color::AnsiValue(200), AttrSet::default()));
    }

    #[test]
    fn state_precedence() {
        let s = StateStyle {
            base: Style::new(Color::White, Color::Black, AttrSet::default()),
            focus: PartialStyle::bg(Color::Blue),
            hover: PartialStyle::bg(Color::Green).with_fg(Color::Yellow),
        };
        assert_eq!(s.resolve(false, false), s.base);
        let both = s.resolve(true, true);
        assert_eq!(both.bg, Color::Blue);
        assert_eq!(both.fg, Color::Yellow);
    }

    #[test]
    fn parse_colors() {
        assert_eq!(Color::parse("dark-blue"), Some(Color::DarkBlue));
        assert_eq!(Color::parse("42"), Some(Color::AnsiValue(42)));
        assert_eq!(
            Color::parse("#ff8000"),
            Some(Color::Rgb {
                r: 255,
                g: 128,
                b: 0
            })
        );
        assert_eq!(Color::parse("mauve"), None);
    }
}
