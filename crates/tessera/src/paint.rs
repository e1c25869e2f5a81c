//! Painting resolved elements into a cell buffer.
use crate::{
    dock::{DOWN, LEFT, RIGHT, UP},
    element::Border,
    geom::{Frame, Point, Rect, RectI32},
    id::NodeKey,
    style::Attr,
    termbuf::TermBuf,
    tree::Tree,
};

impl Tree {
    /// Paint every placed node into `buf` in paint order: parents before
    /// children, siblings in child order. Layout must be current.
    pub(crate) fn paint(&self, buf: &mut TermBuf) {
        for &key in &self.paint_order {
            self.paint_node(key, buf);
        }
    }

    /// Paint one node: background, border, then content.
    fn paint_node(&self, key: NodeKey, buf: &mut TermBuf) {
        let node = &self.nodes[key];
        let Some(r) = node.resolved else {
            return;
        };
        let el = &node.element;
        let style = el
            .style
            .resolve(self.focus == Some(key), self.hover == Some(key));
        buf.fill(r.rect, ' ', style.attr());

        if let Some(border) = &el.border {
            paint_border(buf, r.full, r.rect, border, style.merge(&border.style).attr());
        }

        let Some(clip) = r.clip else {
            return;
        };
        let base = if node.scrollable() {
            i64::from(node.scroll.base)
        } else {
            0
        };
        for y in clip.tl.y..clip.bottom() {
            let row = i64::from(y) - i64::from(r.inner.y) + base;
            if row < 0 {
                continue;
            }
            let Some(line) = el.content.line(row as usize) else {
                continue;
            };
            let parts: Vec<(String, Attr)> = line
                .expanded(self.tab_size, style)
                .into_iter()
                .map(|(s, st)| (s, st.attr()))
                .collect();
            buf.spans(i64::from(r.inner.x), y, clip, &parts);
        }
    }
}

/// Draw a border around `full`, writing only cells inside `visible`.
fn paint_border(buf: &mut TermBuf, full: RectI32, visible: Rect, border: &Border, attr: Attr) {
    if full.is_empty() {
        return;
    }
    let frame = Frame::new(Rect::new(0, 0, full.w as u32, full.h as u32), border.sides);
    let g = border.kind.glyphs();
    let parts = [
        (frame.top, g.h, LEFT | RIGHT),
        (frame.bottom, g.h, LEFT | RIGHT),
        (frame.left, g.v, UP | DOWN),
        (frame.right, g.v, UP | DOWN),
        (frame.tl, g.tl, DOWN | RIGHT),
        (frame.tr, g.tr, DOWN | LEFT),
        (frame.bl, g.bl, UP | RIGHT),
        (frame.br, g.br, UP | LEFT),
    ];
    // `visible` is `full` clipped, so it sits at a non-negative local offset.
    let seen = Rect::new(
        u32::try_from(i64::from(visible.tl.x) - i64::from(full.x)).unwrap_or(0),
        u32::try_from(i64::from(visible.tl.y) - i64::from(full.y)).unwrap_or(0),
        visible.w,
        visible.h,
    );
    for (local, ch, arms) in parts {
        let Some(part) = local.intersect(&seen) else {
            continue;
        };
        for ly in part.tl.y..part.bottom() {
            for lx in part.tl.x..part.right() {
                let p = Point {
                    x: visible.tl.x + (lx - seen.tl.x),
                    y: visible.tl.y + (ly - seen.tl.y),
                };
                buf.put_border(p, ch, attr, arms, border.kind);
            }
        }
    }
}
