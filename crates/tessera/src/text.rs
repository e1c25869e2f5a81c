//! Cell-width arithmetic. Columns are counted per grapheme cluster: combining
//! marks add nothing, and East Asian wide glyphs take two cells.
use std::iter;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cells taken by one grapheme cluster. Zero-width clusters still take a
/// cell so that every cluster is visible.
pub fn grapheme_width(grapheme: &str) -> usize {
    match UnicodeWidthStr::width(grapheme) {
        _ if grapheme.is_empty() => 0,
        0 | 1 => 1,
        _ => 2,
    }
}

/// Replace tabs with spaces up to the next multiple of `tab_stop`, treating
/// `s` as starting at column `col`. Returns the expanded text and the column
/// where it ends, so a line made of several spans can be expanded span by
/// span. A line break resets the column.
pub fn expand_tabs(s: &str, tab_stop: usize, mut col: usize) -> (String, usize) {
    let stop = tab_stop.max(1);
    let mut out = String::with_capacity(s.len());
    for g in s.graphemes(true) {
        if g == "\t" {
            let pad = stop - col % stop;
            out.extend(iter::repeat_n(' ', pad));
            col += pad;
            continue;
        }
        out.push_str(g);
        col = if matches!(g, "\n" | "\r" | "\r\n") {
            0
        } else {
            col + grapheme_width(g)
        };
    }
    (out, col)
}
