//! Assertions over `TermBuf` contents.
use crate::{style::Color, termbuf::TermBuf};

/// Build the expected-lines argument for the buffer match assertions.
#[macro_export]
macro_rules! buf {
    ($($line:literal)*) => {
        &[$($line),*]
    };
}

/// Read-only queries and assertions over a rendered buffer.
///
/// Rows are compared as text with trailing blanks dropped. A wide glyph is
/// one character in the expected text.
pub struct BufTest<'a> {
    /// Buffer under test.
    buf: &'a TermBuf,
}

impl<'a> BufTest<'a> {
    /// Wrap a buffer.
    pub fn new(buf: &'a TermBuf) -> Self {
        Self { buf }
    }

    /// Rows with trailing blanks trimmed.
    fn rows(&self) -> Vec<String> {
        self.buf
            .lines()
            .into_iter()
            .map(|l| l.trim_end().to_string())
            .collect()
    }

    /// Does every row equal the expected row? A row count mismatch never
    /// matches.
    pub fn matches(&self, expected: &[&str]) -> bool {
        let rows = self.rows();
        rows.len() == expected.len() && rows.iter().zip(expected).all(|(a, e)| a == e.trim_end())
    }

    /// Panic with both grids side by side unless the buffer matches.
    pub fn assert_matches(&self, expected: &[&str]) {
        if self.matches(expected) {
            return;
        }
        let mut msg = String::from("buffer mismatch\nexpected:\n");
        for l in expected {
            msg.push_str(&format!("  |{l}|\n"));
        }
        msg.push_str("actual:\n");
        msg.push_str(&self.ruler());
        panic!("{msg}");
    }

    /// Is `txt` on any row?
    pub fn contains_text(&self, txt: &str) -> bool {
        self.buf.lines().iter().any(|l| l.contains(txt))
    }

    /// Is `txt` on any row with every cell drawn in foreground `fg`?
    pub fn contains_text_fg(&self, txt: &str, fg: Color) -> bool {
        let want: Vec<char> = txt.chars().collect();
        if want.is_empty() {
            return false;
        }
        (0..self.buf.size().h).any(|y| {
            self.buf.row(y).windows(want.len()).any(|cells| {
                cells
                    .iter()
                    .zip(&want)
                    .all(|(c, ch)| c.ch == *ch && c.attr.fg() == fg.index())
            })
        })
    }

    /// Row `y` as text, untrimmed.
    pub fn line_text(&self, y: u32) -> Option<String> {
        self.buf.lines().into_iter().nth(y as usize)
    }

    /// The buffer framed with row numbers and a column ruler.
    pub fn ruler(&self) -> String {
        let size = self.buf.size();
        let mut out = String::new();
        for (y, line) in self.buf.lines().iter().enumerate() {
            out.push_str(&format!("{y:>3} |{line}|\n"));
        }
        out.push_str("     ");
        out.extend((0..size.w).map(|x| char::from(b'0' + (x % 10) as u8)));
        out.push('\n');
        out
    }
}
