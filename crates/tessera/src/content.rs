//! Styled text content carried by elements.
use crate::{
    style::{PartialStyle, Style},
    text,
};

/// A run of text sharing one style override.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    /// The text. Never contains line breaks.
    pub text: String,
    /// Overrides applied on top of the element's style.
    pub style: PartialStyle,
}

impl Span {
    /// An unstyled span.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: PartialStyle::default(),
        }
    }

    /// A span with a style override.
    pub fn styled(text: impl Into<String>, style: PartialStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One line of content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentLine {
    /// Spans in display order.
    pub spans: Vec<Span>,
}

impl ContentLine {
    /// Expand tabs across all spans and resolve each span's style against
    /// `base`. Column tracking carries from span to span.
    pub fn expanded(&self, tab_stop: usize, base: Style) -> Vec<(String, Style)> {
        let mut col = 0;
        self.spans
            .iter()
            .map(|s| {
                let (t, next) = text::expand_tabs(&s.text, tab_stop, col);
                col = next;
                (t, base.merge(&s.style))
            })
            .collect()
    }

    /// Display width after tab expansion.
    pub fn width(&self, tab_stop: usize) -> usize {
        self.spans.iter().fold(0, |col, s| {
            text::expand_tabs(&s.text, tab_stop, col).1
        })
    }
}

impl From<&str> for ContentLine {
    fn from(s: &str) -> Self {
        Self {
            spans: vec![Span::new(s)],
        }
    }
}

impl From<Vec<Span>> for ContentLine {
    fn from(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}

/// The content of an element: a sequence of styled lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    /// Lines in display order.
    lines: Vec<ContentLine>,
}

impl Content {
    /// Empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split plain text into lines. `\r\n` and `\n` both break lines.
    pub fn text(s: &str) -> Self {
        if s.is_empty() {
            return Self::default();
        }
        Self {
            lines: s
                .split('\n')
                .map(|l| ContentLine::from(l.strip_suffix('\r').unwrap_or(l)))
                .collect(),
        }
    }

    /// Append a line.
    pub fn push(&mut self, line: impl Into<ContentLine>) {
        self.lines.push(line.into());
    }

    /// All lines.
    pub fn lines(&self) -> &[ContentLine] {
        &self.lines
    }

    /// A single line, if it exists.
    pub fn line(&self, i: usize) -> Option<&ContentLine> {
        self.lines.get(i)
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Is there no content at all?
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The widest line in display columns.
    pub fn width(&self, tab_stop: usize) -> usize {
        self.lines
            .iter()
            .map(|l| l.width(tab_stop))
            .max()
            .unwrap_or(0)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::text(&s)
    }
}

impl<L: Into<ContentLine>> FromIterator<L> for Content {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn widths() {
        let c = Content::text("abc\nabcdefg\nabcde");
        assert_eq!(c.len(), 3);
        assert_eq!(c.width(4), 7);
        assert_eq!(Content::text("").width(4), 0);
        assert_eq!(Content::text("a\tb\r\nxy").width(4), 5);
    }

    #[test]
    fn span_tabs_carry_columns() {
        let line = ContentLine::from(vec![
            Span::new("ab"),
            Span::styled("\tc", PartialStyle::fg(Color::Red)),
        ]);
        assert_eq!(line.width(4), 5);
        let parts = line.expanded(4, Style::default());
        assert_eq!(parts[1].0, "  c");
        assert_eq!(parts[1].1.fg, Color::Red);
    }
}
