//! A screen: one tree rendered onto one terminal.
use std::{
    mem,
    ops::{Deref, DerefMut},
};

use slotmap::SecondaryMap;

use crate::{
    backend::{Cap, Capabilities, Emitter, Terminal},
    config::ScreenOptions,
    diff::{Differ, RenderStats},
    dock,
    dump,
    element::{Element, Extent},
    error::Result,
    event::{
        Event, NodeEvent, Propagation,
        key::{Key, KeyCode},
        mouse::{Button, MouseEvent, MouseKind},
    },
    focus::FocusManager,
    geom::{Expanse, Point, Rect},
    id::{NodeKey, ScreenId},
    scroll::WHEEL_STEP,
    style::Attr,
    termbuf::TermBuf,
    tree::Tree,
};

/// A tree of elements bound to a terminal.
///
/// The screen keeps two cell grids: `previous` is what the terminal shows,
/// `current` is painted from the tree at each render. Rendering writes only
/// the difference. The screen dereferences to its [`Tree`], so structural,
/// focus and scroll operations are called on the screen directly.
pub struct Screen {
    /// The element tree.
    tree: Tree,
    /// Output device.
    terminal: Box<dyn Terminal>,
    /// Capability table for the terminal.
    caps: Box<dyn Capabilities>,
    /// Options.
    options: ScreenOptions,
    /// Grid painted by the current pass.
    current: TermBuf,
    /// What the terminal shows.
    previous: TermBuf,
    /// Resize waiting for the next render.
    pending_resize: Option<Expanse>,
    /// The next render clears the terminal and repaints everything.
    full_repaint: bool,
    /// Clip rectangle of each scrollable box as of the last flushed render.
    committed_clips: SecondaryMap<NodeKey, Rect>,
    /// Has the terminal been released?
    closed: bool,
}

impl Screen {
    /// Bind a new tree to a terminal. Takes control of the terminal, enters
    /// the alternate screen and hides the cursor as the options ask.
    pub fn new(
        mut terminal: impl Terminal + 'static,
        caps: impl Capabilities + 'static,
        options: ScreenOptions,
    ) -> Result<Self> {
        let size = terminal.size()?;
        let root = Element::new()
            .name("root")
            .width(Extent::Percent(100.0, 0))
            .height(Extent::Percent(100.0, 0));
        let mut tree = Tree::with_root(ScreenId::next(), size, root);
        tree.tab_size = options.tab_size.max(1);

        terminal.start()?;
        let mut em = Emitter::new(&caps);
        if options.alt_screen {
            em.cap(Cap::EnterAltScreen);
        }
        if options.hide_cursor {
            em.cap(Cap::HideCursor);
        }
        if !em.out.is_empty() {
            terminal.write(&em.out)?;
            terminal.flush()?;
        }
        Ok(Self {
            tree,
            terminal: Box::new(terminal),
            caps: Box::new(caps),
            options,
            current: TermBuf::blank(size),
            previous: TermBuf::blank(size),
            pending_resize: None,
            full_repaint: true,
            committed_clips: SecondaryMap::new(),
            closed: false,
        })
    }

    /// The element tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The element tree, mutably.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The screen's options.
    pub fn options(&self) -> &ScreenOptions {
        &self.options
    }

    /// What the terminal is showing, as of the last successful render.
    pub fn buf(&self) -> &TermBuf {
        &self.previous
    }

    /// Queue a resize. It takes effect at the start of the next render.
    pub fn resize(&mut self, size: Expanse) {
        self.pending_resize = Some(size);
        self.tree.request_render();
    }

    /// A debug dump of the tree.
    pub fn dump(&self) -> Result<String> {
        dump::dump(&self.tree, self.tree.root())
    }

    /// Reallocate both grids for a new size and force a full repaint.
    fn apply_resize(&mut self, size: Expanse) -> Result<()> {
        self.tree.set_size(size);
        self.current = TermBuf::blank(size);
        self.previous = TermBuf::blank(size);
        self.full_repaint = true;
        self.tree.request_render();
        let root = self.tree.root();
        self.tree.broadcast(root, NodeEvent::Resize(size))
    }

    /// Render the tree to the terminal. A screen with nothing dirty does
    /// no work. If the terminal write fails the error is returned, the
    /// screen stays dirty and the next render retries the whole pass.
    pub fn render(&mut self) -> Result<RenderStats> {
        if let Some(size) = self.pending_resize.take() {
            self.apply_resize(size)?;
        }
        if !self.tree.dirty && !self.full_repaint {
            return Ok(RenderStats {
                skipped: true,
                ..RenderStats::default()
            });
        }

        self.tree.ensure_layout()?;
        self.current.clear();
        self.tree.paint(&mut self.current);
        if self.options.dock_borders {
            dock::dock(&mut self.current);
        }

        let shifts = if self.full_repaint || !self.options.scroll_region || !self.caps.scroll_region()
        {
            Vec::new()
        } else {
            self.pending_shifts()
        };

        let mut em = Emitter::new(self.caps.as_ref());
        let mut d = Differ::new(&mut em);
        let mut model = if self.full_repaint {
            d.set_attr(Attr::default());
            d.em.cap(Cap::Clear);
            TermBuf::blank(self.current.size())
        } else {
            self.previous.clone()
        };
        for (clip, n) in shifts {
            d.shift(&mut model, clip, n);
        }
        d.lines(&model, &self.current)?;
        let mut stats = d.stats;
        stats.bytes = em.out.len();

        if !em.out.is_empty() {
            let written = self
                .terminal
                .write(&em.out)
                .and_then(|()| self.terminal.flush());
            if let Err(e) = written {
                tracing::warn!("render failed: {e}");
                return Err(e);
            }
        }

        mem::swap(&mut self.previous, &mut self.current);
        self.commit_scroll();
        self.full_repaint = false;
        self.tree.dirty = false;
        tracing::debug!(
            lines = stats.lines,
            cells = stats.cells,
            bytes = stats.bytes,
            shifts = stats.shifts,
            "render"
        );
        Ok(stats)
    }

    /// Scrollable boxes that moved by a pure scroll since the last flushed
    /// render: same clip rectangle, nothing else changed inside, and a shift
    /// smaller than the box.
    fn pending_shifts(&self) -> Vec<(Rect, i64)> {
        let mut out = Vec::new();
        for &key in &self.tree.paint_order {
            let node = &self.tree.nodes[key];
            if !node.scrollable() || node.scroll.disturbed {
                continue;
            }
            let Some(clip) = node.resolved.and_then(|r| r.clip) else {
                continue;
            };
            let Some(n) = node.scroll.pending_shift() else {
                continue;
            };
            if self.committed_clips.get(key) != Some(&clip) {
                tracing::trace!(?clip, "scroll region skipped: box moved");
                continue;
            }
            if n.unsigned_abs() >= u64::from(clip.h) {
                continue;
            }
            out.push((clip, n));
        }
        out
    }

    /// Record the scroll state that is now on the terminal.
    fn commit_scroll(&mut self) {
        self.committed_clips.clear();
        let painted: Vec<NodeKey> = self.tree.paint_order.clone();
        for (_, node) in self.tree.nodes.iter_mut() {
            node.scroll.committed = None;
        }
        for key in painted {
            let node = &mut self.tree.nodes[key];
            if !node.scrollable() {
                continue;
            }
            if let Some(clip) = node.resolved.and_then(|r| r.clip) {
                node.scroll.committed = Some(node.scroll.base);
                node.scroll.disturbed = false;
                self.committed_clips.insert(key, clip);
            }
        }
    }

    /// Feed an input event to the tree.
    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(k) => self.dispatch_key(k),
            Event::Mouse(m) => self.dispatch_mouse(m),
            Event::Resize(size) => {
                self.resize(size);
                Ok(())
            }
        }
    }

    /// Keys bubble from the focused node (the root if nothing is focused).
    /// If no handler stops them, Tab and BackTab move focus and navigation
    /// keys scroll the nearest scrollable box around the focus.
    fn dispatch_key(&mut self, k: Key) -> Result<()> {
        let target = self.tree.focus.unwrap_or(self.tree.root);
        let p = self.tree.bubble_key(target, &NodeEvent::Key(k));
        self.tree.flush_deferred()?;
        if p == Propagation::Stop {
            return Ok(());
        }
        if k == KeyCode::Tab {
            self.tree.focus_next();
            return Ok(());
        }
        if k.key == KeyCode::BackTab {
            self.tree.focus_prev();
            return Ok(());
        }
        let mut cur = self.tree.focus;
        while let Some(c) = cur {
            if self.tree.nodes[c].scrollable() && self.tree.scroll_for_key(c, k)? {
                break;
            }
            cur = self.tree.nodes[c].parent;
        }
        self.tree.flush_deferred()
    }

    /// The topmost painted node under a point that accepts pointer input.
    fn hit(&self, p: Point) -> Option<NodeKey> {
        self.tree.paint_order.iter().rev().copied().find(|k| {
            self.tree.nodes.get(*k).is_some_and(|n| {
                n.resolved.is_some_and(|r| r.rect.contains_point(p))
                    && (n.element.interactive() || n.scrollable())
            })
        })
    }

    /// The topmost painted node under a point.
    fn topmost(&self, p: Point) -> Option<NodeKey> {
        self.tree.paint_order.iter().rev().copied().find(|k| {
            self.tree
                .nodes
                .get(*k)
                .and_then(|n| n.resolved)
                .is_some_and(|r| r.rect.contains_point(p))
        })
    }

    /// Update the hovered node, notifying both sides of a change.
    fn set_hover(&mut self, hover: Option<NodeKey>) {
        if self.tree.hover == hover {
            return;
        }
        if let Some(old) = self.tree.hover.take() {
            self.tree.notify(old, NodeEvent::MouseOut);
        }
        self.tree.hover = hover;
        if let Some(new) = hover {
            self.tree.notify(new, NodeEvent::MouseOver);
        }
        self.tree.request_render();
    }

    /// Mouse events go to the topmost interactive node under the pointer and
    /// bubble from there. A left press focuses it, the wheel scrolls the
    /// nearest scrollable box under the pointer.
    fn dispatch_mouse(&mut self, m: MouseEvent) -> Result<()> {
        let hit = self.hit(m.at);
        self.set_hover(hit);
        if let Some(k) = hit {
            let p = self.tree.bubble_key(k, &NodeEvent::Mouse(m));
            self.tree.flush_deferred()?;
            if p == Propagation::Stop {
                return Ok(());
            }
        }
        match m.kind {
            MouseKind::Press(Button::Left) => {
                let focusable = |k: &NodeKey| {
                    self.tree.nodes.get(*k).is_some_and(|n| n.element.focusable)
                };
                if let Some(k) = hit.filter(focusable) {
                    self.tree.apply_focus(k);
                }
            }
            MouseKind::Wheel(notches) => {
                let delta = i64::from(notches) * i64::from(WHEEL_STEP);
                let mut cur = self.topmost(m.at);
                while let Some(c) = cur {
                    let n = &self.tree.nodes[c];
                    if n.scrollable() && n.element.scroll.is_some_and(|s| s.wheel) {
                        self.tree.apply_scroll(c, delta, true)?;
                        break;
                    }
                    cur = n.parent;
                }
            }
            _ => {}
        }
        self.tree.flush_deferred()
    }

    /// Release the terminal: destroy the tree, restore the cursor, leave the
    /// alternate screen and restore terminal modes. Further calls do nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let root = self.tree.root();
        for c in self.tree.children(root)? {
            self.tree.destroy(c)?;
        }
        self.tree.notify(self.tree.root, NodeEvent::Destroy);

        let mut em = Emitter::new(self.caps.as_ref());
        em.cap(Cap::Attr(Attr::default()));
        if self.options.hide_cursor {
            em.cap(Cap::ShowCursor);
        }
        if self.options.alt_screen {
            em.cap(Cap::ExitAltScreen);
        }
        let out = em.out;
        self.terminal.write(&out)?;
        self.terminal.flush()?;
        self.terminal.stop()
    }

    /// Has the screen been closed?
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Deref for Screen {
    type Target = Tree;

    fn deref(&self) -> &Tree {
        &self.tree
    }
}

impl DerefMut for Screen {
    fn deref_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!("failed to release terminal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingTerminal, TokenCaps};

    fn screen(w: u32, h: u32) -> (Screen, RecordingTerminal) {
        let (t, handle) = RecordingTerminal::new(Expanse::new(w, h));
        let s = Screen::new(t, TokenCaps::default(), ScreenOptions::default()).unwrap();
        (s, handle)
    }

    #[test]
    fn setup_and_teardown() {
        let (mut s, handle) = screen(4, 2);
        assert!(handle.state().started);
        assert_eq!(handle.take(), "{alt}{hide}");
        s.close().unwrap();
        assert!(s.is_closed());
        assert_eq!(handle.take(), "{attr default}{show}{noalt}");
        assert!(!handle.state().started);
        s.close().unwrap();
        assert_eq!(handle.take(), "");
    }

    #[test]
    fn first_render_clears() {
        let (mut s, handle) = screen(3, 1);
        handle.take();
        let root = s.root();
        s.create_child(root, Element::new().content("ab")).unwrap();
        let stats = s.render().unwrap();
        assert_eq!(handle.take(), "{attr default}{clear}{to 0,0}ab");
        assert_eq!(stats.cells, 2);
        assert!(s.render().unwrap().skipped);
    }

    #[test]
    fn resize_is_deferred() {
        let (mut s, handle) = screen(3, 1);
        s.render().unwrap();
        handle.take();
        s.dispatch(Event::Resize(Expanse::new(5, 2))).unwrap();
        assert_eq!(s.buf().size(), Expanse::new(3, 1));
        s.render().unwrap();
        assert_eq!(s.buf().size(), Expanse::new(5, 2));
        assert_eq!(s.size(), Expanse::new(5, 2));
        assert!(handle.take().contains("{clear}"));
    }

    #[test]
    fn tab_cycles_focus() {
        let (mut s, _handle) = screen(10, 3);
        let root = s.root();
        let a = s.create_child(root, Element::new().focusable(true)).unwrap();
        let b = s.create_child(root, Element::new().focusable(true)).unwrap();
        s.dispatch(Event::Key(KeyCode::Tab.into())).unwrap();
        assert_eq!(s.focused(), Some(a));
        s.dispatch(Event::Key(KeyCode::Tab.into())).unwrap();
        assert_eq!(s.focused(), Some(b));
        s.dispatch(Event::Key(KeyCode::BackTab.into())).unwrap();
        assert_eq!(s.focused(), Some(a));
    }

    #[test]
    fn click_focuses_and_hovers() {
        let (mut s, _handle) = screen(10, 3);
        let root = s.root();
        let a = s
            .create_child(root, Element::new().left(2).width(3).height(1).focusable(true))
            .unwrap();
        s.render().unwrap();
        s.dispatch(Event::Mouse(MouseEvent::new(MouseKind::Press(Button::Left), 3, 0)))
            .unwrap();
        assert_eq!(s.focused(), Some(a));
        assert_eq!(s.tree().hover, Some(a.key));
        s.dispatch(Event::Mouse(MouseEvent::new(MouseKind::Move, 9, 2)))
            .unwrap();
        assert_eq!(s.tree().hover, None);
    }

    #[test]
    fn pointer_after_destroy_before_render() {
        let (mut s, _handle) = screen(10, 3);
        let root = s.root();
        let under = s
            .create_child(root, Element::new().width(10).height(3).focusable(true))
            .unwrap();
        let a = s
            .create_child(root, Element::new().width(3).height(1).focusable(true))
            .unwrap();
        s.render().unwrap();
        s.destroy(a).unwrap();
        s.dispatch(Event::Mouse(MouseEvent::new(MouseKind::Move, 1, 0)))
            .unwrap();
        assert_eq!(s.tree().hover, Some(under.key));
        s.dispatch(Event::Mouse(MouseEvent::new(MouseKind::Press(Button::Left), 1, 0)))
            .unwrap();
        assert_eq!(s.focused(), Some(under));
    }
}
