use unicode_segmentation::UnicodeSegmentation;

use crate::{
    element::BorderKind,
    geom::{Expanse, Line, Point, Rect},
    style::Attr,
    text,
};

/// One screen cell.
///
/// A wide glyph occupies its own cell plus a `spacer` cell to its right.
/// Combining marks ride along in `marks` so a grapheme stays in one cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// First char of the grapheme.
    pub ch: char,
    /// Remaining chars of the grapheme, usually empty.
    pub marks: String,
    /// Colours and attributes.
    pub attr: Attr,
    /// Right half of a wide glyph. Holds no text of its own.
    pub spacer: bool,
}

impl Cell {
    /// A single-char cell.
    pub fn new(ch: char, attr: Attr) -> Self {
        Self {
            ch,
            marks: String::new(),
            attr,
            spacer: false,
        }
    }

    /// A space in the default attributes: what a cleared terminal shows.
    pub fn blank() -> Self {
        Self::new(' ', Attr::default())
    }

    /// The right half of a wide glyph drawn in `attr`.
    fn spacer(attr: Attr) -> Self {
        Self {
            spacer: true,
            ..Self::new(' ', attr)
        }
    }

    /// Write the cell's text as UTF-8. Spacers write nothing: the terminal
    /// already advanced past them when it drew the wide glyph.
    pub(crate) fn push_text(&self, out: &mut Vec<u8>) {
        if !self.spacer {
            out.extend_from_slice(self.ch.encode_utf8(&mut [0; 4]).as_bytes());
            out.extend_from_slice(self.marks.as_bytes());
        }
    }
}

/// Border bookkeeping for the dock pass: which directions a border cell's
/// lines extend in, and the glyph family that painted it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DockCell {
    /// Bit set of `dock::UP`, `DOWN`, `LEFT`, `RIGHT`.
    pub arms: u8,
    /// Glyph family.
    pub kind: BorderKind,
}

/// A grid of cells, row-major. Both the committed frame and the frame being
/// painted are `TermBuf`s.
#[derive(Clone, Debug)]
pub struct TermBuf {
    /// Grid size.
    pub(crate) size: Expanse,
    /// Backing cell storage, row-major.
    pub(crate) cells: Vec<Cell>,
    /// Per-cell border information, cleared whenever a cell is overwritten
    /// by anything other than a border.
    pub(crate) dock: Vec<Option<DockCell>>,
}

impl PartialEq for TermBuf {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.cells == other.cells
    }
}

impl TermBuf {
    /// A grid of `size` with every cell set to `ch` in `attr`.
    pub fn new(size: impl Into<Expanse>, ch: char, attr: Attr) -> Self {
        let size = size.into();
        let n = size.area() as usize;
        Self {
            size,
            cells: vec![Cell::new(ch, attr); n],
            dock: vec![None; n],
        }
    }

    /// A buffer of blank cells, matching a freshly cleared terminal.
    pub fn blank(size: impl Into<Expanse>) -> Self {
        Self::new(size, ' ', Attr::default())
    }

    /// Grid size.
    pub fn size(&self) -> Expanse {
        self.size
    }

    /// The whole grid as a rect at the origin.
    pub fn rect(&self) -> Rect {
        self.size.rect()
    }

    /// Index of the cell at `p`, if it is on the grid.
    fn idx(&self, p: Point) -> Option<usize> {
        self.rect()
            .contains_point(p)
            .then(|| p.y as usize * self.size.w as usize + p.x as usize)
    }

    /// The cell at `p`.
    pub fn get(&self, p: Point) -> Option<&Cell> {
        self.cells.get(self.idx(p)?)
    }

    /// One row of cells.
    pub fn row(&self, y: u32) -> &[Cell] {
        let w = self.size.w as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::blank());
        self.dock.fill(None);
    }

    /// Replace the cell at index `i`, repairing any wide glyph it splits.
    fn set(&mut self, i: usize, cell: Cell) {
        let w = self.size.w as usize;
        let x = i % w;
        if self.cells[i].spacer && x > 0 && !cell.spacer {
            let attr = self.cells[i - 1].attr;
            self.cells[i - 1] = Cell::new(' ', attr);
        }
        if x + 1 < w && self.cells[i + 1].spacer && !cell.spacer {
            let attr = self.cells[i + 1].attr;
            self.cells[i + 1] = Cell::new(' ', attr);
        }
        self.cells[i] = cell;
        self.dock[i] = None;
    }

    /// Set one cell. Off-grid points are ignored.
    pub fn put(&mut self, p: Point, ch: char, attr: Attr) {
        if let Some(i) = self.idx(p) {
            self.set(i, Cell::new(ch, attr));
        }
    }

    /// Write a border glyph and record its arms for the dock pass.
    pub(crate) fn put_border(&mut self, p: Point, ch: char, attr: Attr, arms: u8, kind: BorderKind) {
        if let Some(i) = self.idx(p) {
            self.set(i, Cell::new(ch, attr));
            if !matches!(kind, BorderKind::Char(_)) {
                self.dock[i] = Some(DockCell { arms, kind });
            }
        }
    }

    /// Set every on-grid cell of `r`.
    pub fn fill(&mut self, r: Rect, ch: char, attr: Attr) {
        if let Some(isec) = self.rect().intersect(&r) {
            for y in isec.tl.y..isec.bottom() {
                for x in isec.tl.x..isec.right() {
                    self.put(Point { x, y }, ch, attr);
                }
            }
        }
    }

    /// Draw `txt` along `l`, cut off at its end.
    pub fn text(&mut self, l: Line, txt: &str, attr: Attr) {
        self.spans(l.tl.x as i64, l.tl.y, l.rect(), &[(txt, attr)]);
    }

    /// Draw styled runs starting at column `x` (which may be left of the
    /// screen) on row `y`, writing only cells inside `clip`. A wide glyph
    /// that straddles a clip edge is replaced by a space.
    pub fn spans<S: AsRef<str>>(&mut self, x: i64, y: u32, clip: Rect, parts: &[(S, Attr)]) {
        let Some(clip) = self.rect().intersect(&clip) else {
            return;
        };
        if y < clip.tl.y || y >= clip.bottom() {
            return;
        }
        let (lo, hi) = (i64::from(clip.tl.x), i64::from(clip.right()));
        let mut col = x;
        for (s, attr) in parts {
            for g in s.as_ref().graphemes(true) {
                if col >= hi {
                    return;
                }
                let w = text::grapheme_width(g) as i64;
                if col >= lo && col + w <= hi {
                    let p = Point { x: col as u32, y };
                    if let Some(i) = self.idx(p) {
                        let mut chars = g.chars();
                        let ch = chars.next().unwrap_or(' ');
                        self.set(
                            i,
                            Cell {
                                ch,
                                marks: chars.collect(),
                                attr: *attr,
                                spacer: false,
                            },
                        );
                        for k in 1..w {
                            if let Some(j) = self.idx(Point { x: (col + k) as u32, y }) {
                                self.set(j, Cell::spacer(*attr));
                            }
                        }
                    }
                } else {
                    for k in col.max(lo)..(col + w).min(hi) {
                        self.put(Point { x: k as u32, y }, ' ', *attr);
                    }
                }
                col += w;
            }
        }
    }

    /// Shift rows `top..=bottom` the way a terminal does for a delete-line
    /// (`n > 0`, content moves up) or insert-line (`n < 0`, content moves
    /// down) inside a scroll region. Exposed rows become blank.
    pub(crate) fn shift_rows(&mut self, top: u32, bottom: u32, n: i64) {
        let w = self.size.w as usize;
        if w == 0 || bottom >= self.size.h || top > bottom {
            return;
        }
        let height = i64::from(bottom - top + 1);
        let count = n.unsigned_abs().min(height as u64) as usize;
        let start = top as usize * w;
        let end = (bottom as usize + 1) * w;
        let region = &mut self.cells[start..end];
        if n > 0 {
            region.rotate_left(count * w);
            let len = region.len();
            region[len - count * w..].fill(Cell::blank());
        } else if n < 0 {
            region.rotate_right(count * w);
            region[..count * w].fill(Cell::blank());
        }
        self.dock[start..end].fill(None);
    }

    /// Each row as text. Spacers contribute nothing, so a row holding wide
    /// glyphs has fewer chars than columns.
    pub fn lines(&self) -> Vec<String> {
        (0..self.size.h)
            .map(|y| {
                let mut out = Vec::new();
                for c in self.row(y) {
                    c.push_text(&mut out);
                }
                String::from_utf8_lossy(&out).into_owned()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buf, testing::buf::BufTest};

    #[test]
    fn basic_fill() {
        let mut tb = TermBuf::blank(Expanse::new(4, 2));
        tb.fill(Rect::new(1, 0, 2, 2), 'x', Attr::default());
        BufTest::new(&tb).assert_matches(buf![
            " xx "
            " xx "
        ]);
    }

    #[test]
    fn text_write() {
        let mut tb = TermBuf::blank(Expanse::new(5, 1));
        tb.text(Line::new(0, 0, 5), "hi", Attr::default());
        BufTest::new(&tb).assert_matches(buf!["hi   "]);
    }

    #[test]
    fn clipped_spans() {
        let mut tb = TermBuf::new(Expanse::new(6, 1), '.', Attr::default());
        tb.spans(-2, 0, Rect::new(1, 0, 4, 1), &[("abcdefgh", Attr::default())]);
        BufTest::new(&tb).assert_matches(buf![".defg."]);
    }

    #[test]
    fn wide_glyphs() {
        let mut tb = TermBuf::new(Expanse::new(6, 1), '.', Attr::default());
        tb.spans(0, 0, tb.rect(), &[("a界b", Attr::default())]);
        assert!(tb.get(Point { x: 2, y: 0 }).unwrap().spacer);
        assert_eq!(tb.lines(), vec!["a界b.."]);
        // Straddling the clip edge yields a space.
        let mut tb = TermBuf::new(Expanse::new(4, 1), '.', Attr::default());
        tb.spans(0, 0, Rect::new(0, 0, 2, 1), &[("a界", Attr::default())]);
        assert_eq!(tb.lines(), vec!["a .."]);
        // Overwriting half a wide glyph blanks the other half.
        let mut tb = TermBuf::blank(Expanse::new(4, 1));
        tb.text(Line::new(0, 0, 4), "界界", Attr::default());
        tb.put(Point { x: 1, y: 0 }, 'x', Attr::default());
        assert_eq!(tb.lines(), vec![" x界"]);
    }

    #[test]
    fn region_shift() {
        let mut tb = TermBuf::blank(Expanse::new(2, 4));
        for (y, s) in ["aa", "bb", "cc", "dd"].iter().enumerate() {
            tb.text(Line::new(0, y as u32, 2), s, Attr::default());
        }
        let mut up = tb.clone();
        up.shift_rows(1, 3, 1);
        assert_eq!(up.lines(), vec!["aa", "cc", "dd", "  "]);
        let mut down = tb.clone();
        down.shift_rows(0, 2, -2);
        assert_eq!(down.lines(), vec!["  ", "  ", "aa", "dd"]);
    }
}
