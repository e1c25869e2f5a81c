//! Border docking: after painting, border cells that touch other border
//! cells are rewritten into junction glyphs so adjoining boxes share their
//! edges.
use crate::{element::BorderKind, termbuf::TermBuf};

/// Arm pointing up.
pub(crate) const UP: u8 = 1;
/// Arm pointing down.
pub(crate) const DOWN: u8 = 2;
/// Arm pointing left.
pub(crate) const LEFT: u8 = 4;
/// Arm pointing right.
pub(crate) const RIGHT: u8 = 8;

/// Glyph table order: vertical, horizontal, ┌ ┐ └ ┘ ├ ┤ ┬ ┴ ┼.
fn table(kind: BorderKind) -> Option<[char; 11]> {
    match kind {
        BorderKind::Line => Some(['│', '─', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '┼']),
        BorderKind::Double => Some(['║', '═', '╔', '╗', '╚', '╝', '╠', '╣', '╦', '╩', '╬']),
        BorderKind::Heavy => Some(['┃', '━', '┏', '┓', '┗', '┛', '┣', '┫', '┳', '┻', '╋']),
        BorderKind::Char(_) => None,
    }
}

/// The glyph of a family for an arm set. Returns `None` for an empty arm set
/// or a family that never docks.
pub(crate) fn glyph(kind: BorderKind, arms: u8) -> Option<char> {
    let t = table(kind)?;
    let i = match arms & 0xf {
        0 => return None,
        a if a & (LEFT | RIGHT) == 0 => 0,
        a if a & (UP | DOWN) == 0 => 1,
        a if a == DOWN | RIGHT => 2,
        a if a == DOWN | LEFT => 3,
        a if a == UP | RIGHT => 4,
        a if a == UP | LEFT => 5,
        a if a == UP | DOWN | RIGHT => 6,
        a if a == UP | DOWN | LEFT => 7,
        a if a == LEFT | RIGHT | DOWN => 8,
        a if a == LEFT | RIGHT | UP => 9,
        _ => 10,
    };
    Some(t[i])
}

/// Rewrite border cells into junctions. Each border cell's arms become the
/// union of its own arms and the arms of its four neighbours that point back
/// at it. The glyph family is the cell's own, which is the family of the
/// element painted last at that position. Arms are read from a snapshot, so
/// the result does not depend on scan order. Cells whose arm set does not
/// change are left alone.
pub(crate) fn dock(buf: &mut TermBuf) {
    let (w, h) = (buf.size.w as usize, buf.size.h as usize);
    let arms: Vec<u8> = buf.dock.iter().map(|d| d.map_or(0, |d| d.arms)).collect();
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let Some(d) = buf.dock[i] else {
                continue;
            };
            let mut joined = d.arms;
            if y > 0 && arms[i - w] & DOWN != 0 {
                joined |= UP;
            }
            if y + 1 < h && arms[i + w] & UP != 0 {
                joined |= DOWN;
            }
            if x > 0 && arms[i - 1] & RIGHT != 0 {
                joined |= LEFT;
            }
            if x + 1 < w && arms[i + 1] & LEFT != 0 {
                joined |= RIGHT;
            }
            if joined == d.arms {
                continue;
            }
            if let Some(ch) = glyph(d.kind, joined) {
                buf.cells[i].ch = ch;
                buf.cells[i].marks.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::{Expanse, Point},
        style::Attr,
    };

    fn hline(tb: &mut TermBuf, y: u32, x0: u32, x1: u32, kind: BorderKind) {
        for x in x0..=x1 {
            let mut arms = 0;
            if x > x0 {
                arms |= LEFT;
            }
            if x < x1 {
                arms |= RIGHT;
            }
            tb.put_border(Point { x, y }, '─', Attr::default(), arms, kind);
        }
    }

    fn vline(tb: &mut TermBuf, x: u32, y0: u32, y1: u32, kind: BorderKind) {
        for y in y0..=y1 {
            let mut arms = 0;
            if y > y0 {
                arms |= UP;
            }
            if y < y1 {
                arms |= DOWN;
            }
            tb.put_border(Point { x, y }, '│', Attr::default(), arms, kind);
        }
    }

    #[test]
    fn glyph_table() {
        assert_eq!(glyph(BorderKind::Line, UP), Some('│'));
        assert_eq!(glyph(BorderKind::Line, LEFT | RIGHT), Some('─'));
        assert_eq!(glyph(BorderKind::Line, UP | DOWN | LEFT | RIGHT), Some('┼'));
        assert_eq!(glyph(BorderKind::Double, DOWN | RIGHT), Some('╔'));
        assert_eq!(glyph(BorderKind::Heavy, LEFT | RIGHT | UP), Some('┻'));
        assert_eq!(glyph(BorderKind::Line, 0), None);
        assert_eq!(glyph(BorderKind::Char('*'), UP), None);
    }

    #[test]
    fn crossing_lines_join() {
        let mut tb = TermBuf::blank(Expanse::new(5, 5));
        hline(&mut tb, 2, 0, 4, BorderKind::Line);
        vline(&mut tb, 2, 0, 4, BorderKind::Line);
        dock(&mut tb);
        assert_eq!(tb.lines(), vec!["  │  ", "  │  ", "──┼──", "  │  ", "  │  "]);
    }

    #[test]
    fn tee_and_family() {
        let mut tb = TermBuf::blank(Expanse::new(3, 3));
        vline(&mut tb, 1, 0, 2, BorderKind::Line);
        hline(&mut tb, 0, 0, 2, BorderKind::Double);
        dock(&mut tb);
        // The junction takes the family painted last.
        assert_eq!(tb.lines(), vec!["═╦═", " │ ", " │ "]);
    }

    #[test]
    fn non_border_cells_are_untouched() {
        let mut tb = TermBuf::blank(Expanse::new(3, 1));
        hline(&mut tb, 0, 0, 2, BorderKind::Line);
        tb.put(Point { x: 1, y: 0 }, 'x', Attr::default());
        dock(&mut tb);
        assert_eq!(tb.lines(), vec!["─x─"]);
    }
}
