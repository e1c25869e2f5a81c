//! The two-phase layout pass.
//!
//! Measurement runs bottom-up and only answers "how big would this element
//! be if it shrank to fit?". Placement runs top-down, resolving each
//! element's position specification against its parent's interior and
//! clipping the result. The two never call back into each other except
//! through the measurement cache, so a pass always terminates and is a pure
//! function of the tree.
use crate::{
    element::{Extent, Offset, percent_of},
    error::{Error, Result},
    geom::{Expanse, Rect, RectI32, Sides},
    id::{NodeId, NodeKey},
    node::Resolved,
    tree::Tree,
};

/// Placed coordinates stay within this distance of the origin, so the
/// difference between any two edges still fits in an `i32`.
const REACH: i64 = (i32::MAX / 2) as i64;

/// Resolve one axis of a position specification against a parent interior
/// of length `plen`. Returns the offset from the parent's leading edge and
/// the length, which is never negative. Arithmetic is widened so that
/// extreme offsets and extents cannot overflow.
pub(crate) fn resolve_axis(
    start: Option<Offset>,
    end: Option<Offset>,
    extent: Option<Extent>,
    plen: u32,
    shrink: impl FnOnce() -> u32,
) -> (i64, i64) {
    let pl = i64::from(plen);
    let off = |o: Offset, len: i64| match o {
        Offset::Cells(n) => i64::from(n),
        Offset::Percent(p, d) => percent_of(p, d, plen),
        Offset::Center => (pl - len) / 2,
    };
    let len = match extent {
        Some(Extent::Cells(n)) => i64::from(n),
        Some(Extent::Percent(p, d)) => percent_of(p, d, plen),
        Some(Extent::Shrink) => i64::from(shrink()),
        None => match (start, end) {
            (Some(s), Some(e)) if s != Offset::Center && e != Offset::Center => {
                pl.saturating_sub(off(s, 0)).saturating_sub(off(e, 0))
            }
            _ => i64::from(shrink()),
        },
    }
    .max(0);
    let pos = match (start, end) {
        (Some(s), _) => off(s, len),
        (None, Some(e)) => pl.saturating_sub(off(e, len)).saturating_sub(len),
        (None, None) => 0,
    };
    (pos, len)
}

/// Narrow a widened span to signed cell coordinates. Both edges are pulled
/// in to `REACH`, so a span reaching past it keeps its visible part.
fn span(start: i64, len: i64) -> (i32, i32) {
    let a = start.clamp(-REACH, REACH);
    let b = start.saturating_add(len.max(0)).clamp(-REACH, REACH);
    (a as i32, (b - a) as i32)
}

/// Inset a signed rectangle, collapsing to zero size rather than going
/// negative.
fn inset_i32(r: RectI32, s: Sides<u32>) -> RectI32 {
    let shrink = |len: i32, a: u32, b: u32| i64::from(len) - i64::from(a) - i64::from(b);
    let (x, w) = span(i64::from(r.x) + i64::from(s.left), shrink(r.w, s.left, s.right));
    let (y, h) = span(i64::from(r.y) + i64::from(s.top), shrink(r.h, s.top, s.bottom));
    RectI32::new(x, y, w, h)
}

/// The extent a child contributes to its parent's shrink measurement along
/// one axis, if it can be known without the parent's size.
fn contribution(
    start: Option<Offset>,
    end: Option<Offset>,
    extent: Option<Extent>,
    natural: u32,
) -> Option<u32> {
    let len = match extent {
        Some(Extent::Cells(n)) => n,
        Some(Extent::Shrink) => natural,
        None if start.is_some() && end.is_some() => return None,
        None => natural,
        Some(Extent::Percent(..)) => return None,
    };
    let pos = match (start, end) {
        (Some(Offset::Cells(n)), _) if n >= 0 => n.unsigned_abs(),
        (None, None) => 0,
        _ => return None,
    };
    Some(pos.saturating_add(len))
}

impl Tree {
    /// The size an element takes when shrunk to fit its content and
    /// children, including border and padding. Cached per layout pass.
    pub(crate) fn natural(&mut self, key: NodeKey) -> Expanse {
        if let Some(m) = self.nodes[key].measured {
            return m;
        }
        let children = self.nodes[key].children.clone();
        let mut bw = 0u32;
        let mut bh = 0u32;
        for c in children {
            if self.nodes[c].element.hidden {
                continue;
            }
            let nat = self.natural(c);
            let p = self.nodes[c].element.position;
            if let Some(w) = contribution(p.left, p.right, p.width, nat.w) {
                bw = bw.max(w);
            }
            if let Some(h) = contribution(p.top, p.bottom, p.height, nat.h) {
                bh = bh.max(h);
            }
        }
        let node = &self.nodes[key];
        let e = &node.element;
        let ins = e.insets();
        let mut h = u32::try_from(e.content.len()).unwrap_or(u32::MAX).max(bh);
        if let Some(min) = e.scroll.and_then(|s| s.min_height) {
            h = h.max(min);
        }
        let m = Expanse::new(
            u32::try_from(e.content.width(self.tab_size))
                .unwrap_or(u32::MAX)
                .max(bw)
                .saturating_add(ins.horizontal()),
            h.saturating_add(ins.vertical()),
        );
        self.nodes[key].measured = Some(m);
        m
    }

    /// The size a node would take under its position specification, without
    /// placing it. A percentage extent needs the parent's resolved interior.
    pub fn measure(&mut self, id: NodeId) -> Result<Expanse> {
        let key = self.key(id)?;
        if !self.layout_valid {
            self.layout()?;
        }
        let nat = self.natural(key);
        let p = self.nodes[key].element.position;
        let parent_inner = self.nodes[key]
            .parent
            .and_then(|pk| self.nodes[pk].resolved)
            .map(|r| r.inner);
        let axis = |ext: Option<Extent>, natural: u32, plen: Option<i32>| match ext {
            Some(Extent::Cells(n)) => Ok(n),
            Some(Extent::Percent(pc, d)) => plen
                .map(|l| {
                    let len = percent_of(pc, d, u32::try_from(l).unwrap_or(0));
                    u32::try_from(len.max(0)).unwrap_or(u32::MAX)
                })
                .ok_or(Error::UnresolvedParent(id)),
            _ => Ok(natural),
        };
        Ok(Expanse::new(
            axis(p.width, nat.w, parent_inner.map(|r| r.w))?,
            axis(p.height, nat.h, parent_inner.map(|r| r.h))?,
        ))
    }

    /// Bring layout up to date if anything changed since the last pass.
    pub(crate) fn ensure_layout(&mut self) -> Result<()> {
        if !self.layout_valid {
            self.layout()?;
        }
        Ok(())
    }

    /// Run a full layout pass: measure, then place every attached, visible
    /// element, recording paint order.
    pub fn layout(&mut self) -> Result<()> {
        for n in self.nodes.values_mut() {
            n.measured = None;
            n.resolved = None;
        }
        self.paint_order.clear();
        self.sync_registry();
        let screen = self.size.rect();
        self.place(self.root, RectI32::from(screen), Some(screen));
        self.layout_valid = true;
        Ok(())
    }

    /// Resolve a node against its parent's interior `pinner`, clipped to
    /// `pclip`, then recurse into its children.
    fn place(&mut self, key: NodeKey, pinner: RectI32, pclip: Option<Rect>) {
        let Some(pclip) = pclip else {
            return;
        };
        if self.nodes[key].element.hidden {
            return;
        }
        let nat = self.natural(key);
        let p = self.nodes[key].element.position;
        let pw = u32::try_from(pinner.w).unwrap_or(0);
        let ph = u32::try_from(pinner.h).unwrap_or(0);
        let (x, w) = resolve_axis(p.left, p.right, p.width, pw, || nat.w);
        let (y, h) = resolve_axis(p.top, p.bottom, p.height, ph, || nat.h);
        let (x, w) = span(i64::from(pinner.x).saturating_add(x), w);
        let (y, h) = span(i64::from(pinner.y).saturating_add(y), h);
        let full = RectI32::new(x, y, w, h);
        let Some(rect) = full.clip(pclip) else {
            return;
        };
        let inner = inset_i32(full, self.nodes[key].element.insets());
        let clip = inner.clip(rect);

        let base = if self.nodes[key].scrollable() {
            let content = self.content_height(key, inner);
            let n = &mut self.nodes[key];
            n.scroll.remeasure(u32::try_from(inner.h).unwrap_or(0), content);
            n.scroll.base
        } else {
            0
        };

        self.nodes[key].resolved = Some(Resolved {
            full,
            rect,
            inner,
            clip,
        });
        self.paint_order.push(key);

        let (cy, ch) = span(i64::from(inner.y) - i64::from(base), i64::from(inner.h));
        let child_box = RectI32::new(inner.x, cy, inner.w, ch);
        for c in self.nodes[key].children.clone() {
            self.place(c, child_box, clip);
        }
    }

    /// The logical height of a scrollable box's content: its own lines, the
    /// lowest child edge, and the configured minimum, whichever is largest.
    fn content_height(&mut self, key: NodeKey, inner: RectI32) -> u32 {
        let mut h = u32::try_from(self.nodes[key].element.content.len()).unwrap_or(u32::MAX);
        if let Some(min) = self.nodes[key].element.scroll.and_then(|s| s.min_height) {
            h = h.max(min);
        }
        for c in self.nodes[key].children.clone() {
            if self.nodes[c].element.hidden {
                continue;
            }
            let nat = self.natural(c);
            let p = self.nodes[c].element.position;
            let plen = u32::try_from(inner.h).unwrap_or(0);
            let (y, len) = resolve_axis(p.top, p.bottom, p.height, plen, || nat.h);
            h = h.max(u32::try_from(y.saturating_add(len).max(0)).unwrap_or(u32::MAX));
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        element::{Border, BorderKind, Element},
        scroll::ScrollOptions,
    };

    fn tree() -> Tree {
        Tree::new(Expanse::new(80, 24))
    }

    fn rect(t: &Tree, id: NodeId) -> Rect {
        t.resolved(id).unwrap().unwrap().rect
    }

    #[test]
    fn axis_rules() {
        let s = || 5;
        assert_eq!(resolve_axis(None, None, None, 20, s), (0, 5));
        assert_eq!(
            resolve_axis(Some(Offset::Cells(2)), Some(Offset::Cells(3)), None, 20, s),
            (2, 15)
        );
        assert_eq!(resolve_axis(None, Some(Offset::Cells(3)), None, 20, s), (12, 5));
        assert_eq!(resolve_axis(Some(Offset::Center), None, None, 20, s), (7, 5));
        assert_eq!(
            resolve_axis(
                Some(Offset::Percent(50.0, -2)),
                None,
                Some(Extent::Percent(25.0, 0)),
                20,
                s
            ),
            (8, 5)
        );
        assert_eq!(
            resolve_axis(Some(Offset::Cells(-4)), None, Some(Extent::Cells(3)), 20, s),
            (-4, 3)
        );
        // Over-constrained edges never produce a negative length.
        assert_eq!(
            resolve_axis(Some(Offset::Cells(15)), Some(Offset::Cells(15)), None, 20, s),
            (15, 0)
        );
    }

    #[test]
    fn bordered_hello() {
        let mut t = tree();
        let root = t.root();
        let b = t
            .create_child(
                root,
                Element::new()
                    .left(0)
                    .right(0)
                    .top(0)
                    .height(3)
                    .border(Border::new(BorderKind::Line))
                    .content("Hello"),
            )
            .unwrap();
        t.layout().unwrap();
        let r = t.resolved(b).unwrap().unwrap();
        assert_eq!(r.rect, Rect::new(0, 0, 80, 3));
        assert_eq!(r.clip, Some(Rect::new(1, 1, 78, 1)));
    }

    #[test]
    fn shrink_to_widest_line() {
        let mut t = tree();
        let root = t.root();
        let a = t
            .create_child(root, Element::new().width(Extent::Shrink).content("abc\nabcdefg\nabcde"))
            .unwrap();
        let b = t
            .create_child(
                root,
                Element::new()
                    .top(5)
                    .border(Border::new(BorderKind::Line))
                    .padding(Sides::new(0, 1, 0, 1))
                    .content("abc\nabcdefg\nabcde"),
            )
            .unwrap();
        t.layout().unwrap();
        assert_eq!(rect(&t, a).w, 7);
        assert_eq!(rect(&t, a).h, 3);
        assert_eq!(rect(&t, b).w, 11);
        assert_eq!(rect(&t, b).h, 5);
    }

    #[test]
    fn shrink_measures_children() {
        let mut t = tree();
        let root = t.root();
        let p = t
            .create_child(root, Element::new().border(Border::new(BorderKind::Line)))
            .unwrap();
        t.create_child(p, Element::new().left(2).top(1).width(4).height(2))
            .unwrap();
        // Percentages and right-anchored children don't count.
        t.create_child(p, Element::new().width(Extent::Percent(90.0, 0)).height(1))
            .unwrap();
        t.create_child(p, Element::new().right(0).width(30).height(1))
            .unwrap();
        t.layout().unwrap();
        assert_eq!(rect(&t, p), Rect::new(0, 0, 8, 5));
        assert_eq!(t.measure(p).unwrap(), Expanse::new(8, 5));
    }

    #[test]
    fn empty_shrink_is_not_rendered() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_child(root, Element::new()).unwrap();
        t.layout().unwrap();
        assert_eq!(t.resolved(a).unwrap(), None);
    }

    #[test]
    fn children_clip_to_parent_interior() {
        let mut t = tree();
        let root = t.root();
        let p = t
            .create_child(
                root,
                Element::new()
                    .left(10)
                    .top(5)
                    .width(10)
                    .height(5)
                    .border(Border::new(BorderKind::Line)),
            )
            .unwrap();
        let c = t
            .create_child(p, Element::new().left(-3).top(2).width(20).height(20))
            .unwrap();
        let gone = t
            .create_child(p, Element::new().left(50).width(2).height(2))
            .unwrap();
        t.layout().unwrap();
        let r = t.resolved(c).unwrap().unwrap();
        assert_eq!(r.full, RectI32::new(8, 8, 20, 20));
        assert_eq!(r.rect, Rect::new(11, 8, 8, 1));
        assert_eq!(t.resolved(gone).unwrap(), None);
    }

    #[test]
    fn hidden_subtrees_are_skipped() {
        let mut t = tree();
        let root = t.root();
        let p = t
            .create_child(root, Element::new().width(5).height(5).hidden(true))
            .unwrap();
        let c = t.create_child(p, Element::new().width(1).height(1)).unwrap();
        t.layout().unwrap();
        assert_eq!(t.resolved(p).unwrap(), None);
        assert_eq!(t.resolved(c).unwrap(), None);
    }

    #[test]
    fn scrolled_children_shift() {
        let mut t = tree();
        let root = t.root();
        let s = t
            .create_child(
                root,
                Element::new()
                    .width(10)
                    .height(4)
                    .scrollable(ScrollOptions::always()),
            )
            .unwrap();
        let kids: Vec<_> = (0..10)
            .map(|i| {
                t.create_child(s, Element::new().top(i).height(1).left(0).right(0))
                    .unwrap()
            })
            .collect();
        t.layout().unwrap();
        assert_eq!(t.scroll_state(s).unwrap().unwrap().content_height(), 10);
        t.scroll(s, 3).unwrap();
        t.layout().unwrap();
        assert_eq!(t.resolved(kids[0]).unwrap(), None);
        assert_eq!(rect(&t, kids[3]), Rect::new(0, 0, 10, 1));
        assert_eq!(rect(&t, kids[6]), Rect::new(0, 3, 10, 1));
        assert_eq!(t.resolved(kids[7]).unwrap(), None);
    }

    #[test]
    fn extreme_specs_clip_instead_of_overflowing() {
        let mut t = Tree::new(Expanse::new(20, 10));
        let root = t.root();
        let wide = t
            .create_child(root, Element::new().left(0).top(0).height(1).width(u32::MAX))
            .unwrap();
        let centered = t
            .create_child(
                root,
                Element::new().left(Offset::Center).top(9).height(1).width(u32::MAX),
            )
            .unwrap();
        let huge = t
            .create_child(
                root,
                Element::new()
                    .left(Offset::Percent(f32::MAX, i32::MAX))
                    .width(Extent::Percent(f32::MAX, 0))
                    .height(1),
            )
            .unwrap();
        let p = t
            .create_child(root, Element::new().left(5).top(2).width(10).height(5))
            .unwrap();
        let far = t
            .create_child(p, Element::new().left(i32::MAX).width(3).height(1))
            .unwrap();
        let back = t
            .create_child(p, Element::new().left(i32::MIN).width(u32::MAX).height(1))
            .unwrap();
        let under = t
            .create_child(p, Element::new().bottom(i32::MIN).height(u32::MAX).width(1))
            .unwrap();
        t.layout().unwrap();
        assert_eq!(rect(&t, wide), Rect::new(0, 0, 20, 1));
        assert_eq!(rect(&t, centered), Rect::new(0, 9, 20, 1));
        assert_eq!(t.resolved(huge).unwrap(), None);
        assert_eq!(t.resolved(far).unwrap(), None);
        assert_eq!(rect(&t, back), Rect::new(5, 2, 10, 1));
        assert_eq!(rect(&t, under), Rect::new(5, 2, 1, 5));
    }

    #[test]
    fn percent_of_unresolved_parent() {
        let mut t = tree();
        let a = t.create(Element::new().width(Extent::Percent(50.0, 0)));
        assert_eq!(t.measure(a), Err(Error::UnresolvedParent(a)));
    }

    #[test]
    fn layout_is_idempotent() {
        let mut t = tree();
        let root = t.root();
        let a = t
            .create_child(root, Element::new().left(Offset::Center).top(Offset::Center).content("x\nyy"))
            .unwrap();
        t.layout().unwrap();
        let first = t.resolved(a).unwrap();
        t.layout().unwrap();
        assert_eq!(t.resolved(a).unwrap(), first);
        assert_eq!(first.unwrap().rect, Rect::new(39, 11, 2, 2));
    }
}
