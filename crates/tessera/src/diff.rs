//! Turning the difference between two cell grids into terminal output.
use crate::{
    backend::{Cap, Emitter},
    error::{Error, Result},
    geom::Rect,
    style::Attr,
    termbuf::TermBuf,
};

/// What a render pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Lines with at least one changed cell.
    pub lines: usize,
    /// Cells written.
    pub cells: usize,
    /// Contiguous runs of written cells.
    pub runs: usize,
    /// Bytes handed to the terminal.
    pub bytes: usize,
    /// Scroll-region shifts emitted.
    pub shifts: usize,
    /// Nothing was dirty, so the pass did no work.
    pub skipped: bool,
}

/// Diff state carried across the lines of one pass.
pub(crate) struct Differ<'a, 'b> {
    /// Output accumulator.
    pub em: &'b mut Emitter<'a>,
    /// The attribute word last sent to the terminal, if known.
    pub attr: Option<Attr>,
    /// Running totals.
    pub stats: RenderStats,
}

impl<'a, 'b> Differ<'a, 'b> {
    /// Start a pass. The terminal's attribute state is unknown.
    pub fn new(em: &'b mut Emitter<'a>) -> Self {
        Self {
            em,
            attr: None,
            stats: RenderStats::default(),
        }
    }

    /// Set the attribute word if it differs from the last one emitted.
    pub fn set_attr(&mut self, a: Attr) {
        if self.attr != Some(a) {
            self.em.cap(Cap::Attr(a));
            self.attr = Some(a);
        }
    }

    /// Emit everything needed to turn `prev` into `cur`, line by line.
    pub fn lines(&mut self, prev: &TermBuf, cur: &TermBuf) -> Result<()> {
        for y in 0..cur.size.h {
            self.line(prev, cur, y)?;
        }
        Ok(())
    }

    /// Diff one line. Each changed run is reached by an absolute move for
    /// the first run and relative moves after that.
    fn line(&mut self, prev: &TermBuf, cur: &TermBuf, y: u32) -> Result<()> {
        let (p, c) = (prev.row(y), cur.row(y));
        let w = c.len();
        let mut changed: Vec<bool> = (0..w).map(|x| p.get(x) != Some(&c[x])).collect();
        if !changed.contains(&true) {
            return Ok(());
        }
        // A run that touches part of a wide glyph must cover all of it.
        for x in 0..w {
            if !changed[x] {
                continue;
            }
            let mut b = x;
            while b > 0 && c[b].spacer {
                b -= 1;
                changed[b] = true;
            }
            let mut e = x + 1;
            while e < w && c[e].spacer {
                changed[e] = true;
                e += 1;
            }
        }

        self.stats.lines += 1;
        let mut cursor: Option<usize> = None;
        let mut x = 0;
        while x < w {
            if !changed[x] {
                x += 1;
                continue;
            }
            match cursor {
                Some(cx) if cx < x => {
                    let gap = (x - cx) as u32;
                    if !self.em.cap(Cap::CursorRight(gap)) && !self.goto(x, y) {
                        return Err(Error::Render("terminal cannot position the cursor".into()));
                    }
                }
                Some(_) => {}
                None => {
                    if !self.goto(x, y) {
                        return Err(Error::Render("terminal cannot position the cursor".into()));
                    }
                }
            }
            self.stats.runs += 1;
            while x < w && changed[x] {
                let cell = &c[x];
                if !cell.spacer {
                    self.set_attr(cell.attr);
                    cell.push_text(&mut self.em.out);
                }
                self.stats.cells += 1;
                x += 1;
            }
            cursor = Some(x);
        }
        Ok(())
    }

    /// Absolute cursor move.
    fn goto(&mut self, x: usize, y: u32) -> bool {
        self.em.cap(Cap::CursorTo { x: x as u32, y })
    }

    /// Try to move the rows of `clip` by `n` lines with a scroll region:
    /// `n > 0` means the content moved up (the window scrolled down). The
    /// shift is modelled on `prev`, and abandoned if it would disturb any
    /// cell outside the clip's columns on a row that survives the shift.
    /// Rows opened by the shift are repainted by the line diff. On success
    /// `prev` becomes the modelled terminal state and `true` is returned.
    pub fn shift(&mut self, prev: &mut TermBuf, clip: Rect, n: i64) -> bool {
        if clip.is_empty() || n == 0 || n.unsigned_abs() >= u64::from(clip.h) {
            return false;
        }
        let (top, bottom) = (clip.tl.y, clip.bottom() - 1);
        let count = n.unsigned_abs() as u32;
        let kept = if n > 0 {
            top..=bottom - count
        } else {
            top + count..=bottom
        };
        let mut shifted = prev.clone();
        shifted.shift_rows(top, bottom, n);
        for y in kept {
            let (before, after) = (prev.row(y), shifted.row(y));
            let outside = (0..before.len())
                .filter(|x| (*x as u32) < clip.tl.x || (*x as u32) >= clip.right());
            for x in outside {
                if before[x] != after[x] {
                    tracing::trace!(?clip, n, row = y, col = x, "scroll region rejected");
                    return false;
                }
            }
        }
        let op = if n > 0 {
            Cap::DeleteLines(count)
        } else {
            Cap::InsertLines(count)
        };
        // Lines opened by the shift take the current background.
        self.set_attr(Attr::default());
        self.em.cap(Cap::SetScrollRegion { top, bottom });
        self.em.cap(Cap::CursorTo { x: 0, y: top });
        self.em.cap(op);
        self.em.cap(Cap::ResetScrollRegion);
        tracing::trace!(?clip, n, "scroll region shift");
        *prev = shifted;
        self.stats.shifts += 1;
        true
    }
}
