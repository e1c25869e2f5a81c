//! The scrollable box state machine.
//!
//! A scrollable box shows a window of `visible` rows onto `content` logical
//! rows. `base` is the first visible row, `offset` is a cursor within the
//! window. Both are re-clamped against the latest measurements at every
//! layout pass, so content changes never leave the window out of range.
use crate::{
    error::Result,
    event::{
        NodeEvent,
        key::{Key, KeyCode},
    },
    id::{NodeId, NodeKey},
    tree::Tree,
};

/// Scrolling configuration for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    /// Ignore scroll calls entirely.
    pub enabled: bool,
    /// Scrolling moves the window directly, pinning the cursor to the window
    /// edge, instead of first moving the cursor within the window.
    pub always_scroll: bool,
    /// React to Up/Down/PageUp/PageDown/Home/End while focused.
    pub keys: bool,
    /// React to the mouse wheel.
    pub wheel: bool,
    /// Lower bound on the logical content height.
    pub min_height: Option<u32>,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            always_scroll: false,
            keys: true,
            wheel: true,
            min_height: None,
        }
    }
}

impl ScrollOptions {
    /// Options with `always_scroll` set.
    pub fn always() -> Self {
        Self {
            always_scroll: true,
            ..Self::default()
        }
    }
}

/// Rows moved per wheel notch.
pub(crate) const WHEEL_STEP: i32 = 2;

/// Per-node scroll state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    /// First visible logical row.
    pub(crate) base: u32,
    /// Cursor row within the window.
    pub(crate) offset: u32,
    /// Rows visible in the last layout.
    pub(crate) visible: u32,
    /// Logical content rows in the last layout.
    pub(crate) content: u32,
    /// Base as of the last successfully flushed render, if any.
    pub(crate) committed: Option<u32>,
    /// Something inside the box changed since the last flushed render, so it
    /// cannot report a pure scroll.
    pub(crate) disturbed: bool,
}

impl ScrollState {
    /// The largest legal base.
    pub fn max_base(&self) -> u32 {
        self.content.saturating_sub(self.visible)
    }

    /// First visible row.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Cursor row within the window.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Absolute cursor position.
    pub fn position(&self) -> u32 {
        self.base + self.offset
    }

    /// Logical content height.
    pub fn content_height(&self) -> u32 {
        self.content
    }

    /// Visible window height.
    pub fn visible_height(&self) -> u32 {
        self.visible
    }

    /// Scroll position as a percentage of the scrollable range. A box that
    /// cannot scroll reports 0.
    pub fn perc(&self) -> f32 {
        let max = self.max_base();
        if max == 0 {
            0.0
        } else {
            self.base as f32 / max as f32 * 100.0
        }
    }

    /// Record new measurements and pull base and offset back into range.
    pub(crate) fn remeasure(&mut self, visible: u32, content: u32) {
        self.visible = visible;
        self.content = content;
        self.clamp();
    }

    /// Enforce `0 <= base <= max_base` and `offset < visible`.
    pub(crate) fn clamp(&mut self) {
        self.base = self.base.min(self.max_base());
        self.offset = self.offset.min(self.visible.saturating_sub(1));
    }

    /// Cursor-driven scroll: move the cursor, spill overflow into the base.
    pub(crate) fn scroll_cursor(&mut self, delta: i64) {
        let last = i64::from(self.visible.saturating_sub(1));
        let off = i64::from(self.offset) + delta;
        let mut base = i64::from(self.base);
        let off = if off < 0 {
            base += off;
            0
        } else if off > last {
            base += off - last;
            last
        } else {
            off
        };
        self.set_base(base);
        self.offset = off as u32;
        self.clamp();
    }

    /// Window-driven scroll: move the base directly and pin the cursor to the
    /// leading edge of the window.
    pub(crate) fn scroll_window(&mut self, delta: i64) {
        self.set_base(i64::from(self.base) + delta);
        if delta > 0 {
            self.offset = self.visible.saturating_sub(1);
        } else if delta < 0 {
            self.offset = 0;
        }
        self.clamp();
    }

    /// Set the base from a signed value, clamping into range.
    fn set_base(&mut self, base: i64) {
        self.base = base.clamp(0, i64::from(self.max_base())) as u32;
    }

    /// The number of rows the window moved since the last flushed render.
    pub(crate) fn pending_shift(&self) -> Option<i64> {
        let committed = self.committed?;
        let n = i64::from(self.base) - i64::from(committed);
        (n != 0).then_some(n)
    }
}

impl Tree {
    /// Scroll a box without flushing deferred work. `window` forces a window
    /// scroll regardless of the box's options. Returns `true` if the base or
    /// cursor moved.
    pub(crate) fn apply_scroll(&mut self, key: NodeKey, delta: i64, window: bool) -> Result<bool> {
        if !self.nodes[key].attached || !self.nodes[key].scrollable() {
            return Ok(false);
        }
        self.ensure_layout()?;
        let always = self.nodes[key].element.scroll.is_some_and(|s| s.always_scroll);
        let n = &mut self.nodes[key];
        let before = n.scroll;
        if always || window {
            n.scroll.scroll_window(delta);
        } else {
            n.scroll.scroll_cursor(delta);
        }
        let after = n.scroll;
        if after.base != before.base {
            self.invalidate();
            self.notify(key, NodeEvent::Scroll(after.base));
        }
        Ok(after.base != before.base || after.offset != before.offset)
    }

    /// Window-scroll a box so `index` is the first visible row, clamped.
    pub(crate) fn apply_scroll_to(&mut self, key: NodeKey, index: i64) -> Result<bool> {
        if !self.nodes[key].attached || !self.nodes[key].scrollable() {
            return Ok(false);
        }
        self.ensure_layout()?;
        let base = i64::from(self.nodes[key].scroll.base);
        self.apply_scroll(key, index - base, true)
    }

    /// Look up a scrollable box, running layout first so its measurements
    /// are current. `None` for boxes that ignore scrolling.
    fn scroll_view(&mut self, id: NodeId) -> Result<Option<ScrollState>> {
        let key = self.key(id)?;
        if !self.nodes[key].attached || !self.nodes[key].scrollable() {
            return Ok(None);
        }
        self.ensure_layout()?;
        Ok(Some(self.nodes[key].scroll))
    }

    /// Scroll by `delta` rows. Cursor-driven unless the box has
    /// `always_scroll`. Detached, non-scrollable and disabled boxes ignore
    /// the call and return `false`.
    pub fn scroll(&mut self, id: NodeId, delta: i32) -> Result<bool> {
        let key = self.key(id)?;
        let r = self.apply_scroll(key, i64::from(delta), false)?;
        self.flush_deferred()?;
        Ok(r)
    }

    /// Position the window so its first row is `index`, clamped to the
    /// scrollable range.
    pub fn scroll_to(&mut self, id: NodeId, index: i64) -> Result<bool> {
        let key = self.key(id)?;
        let r = self.apply_scroll_to(key, index)?;
        self.flush_deferred()?;
        Ok(r)
    }

    /// Position the window at a percentage of the scrollable range.
    pub fn set_scroll_perc(&mut self, id: NodeId, perc: f32) -> Result<bool> {
        let Some(s) = self.scroll_view(id)? else {
            return Ok(false);
        };
        let index = (perc.clamp(0.0, 100.0) / 100.0 * s.max_base() as f32).round() as i64;
        self.scroll_to(id, index)
    }

    /// Return the window and cursor to the top.
    pub fn reset_scroll(&mut self, id: NodeId) -> Result<bool> {
        let key = self.key(id)?;
        if self.scroll_view(id)?.is_none() {
            return Ok(false);
        }
        let n = &mut self.nodes[key];
        let moved = n.scroll.base != 0;
        let changed = moved || n.scroll.offset != 0;
        n.scroll.base = 0;
        n.scroll.offset = 0;
        if moved {
            self.invalidate();
            self.notify(key, NodeEvent::Scroll(0));
            self.flush_deferred()?;
        }
        Ok(changed)
    }

    /// First visible row.
    pub fn scroll_base(&mut self, id: NodeId) -> Result<u32> {
        Ok(self.scroll_view(id)?.map_or(0, |s| s.base()))
    }

    /// Absolute cursor row: base plus offset.
    pub fn scroll_position(&mut self, id: NodeId) -> Result<u32> {
        Ok(self.scroll_view(id)?.map_or(0, |s| s.position()))
    }

    /// Logical content height.
    pub fn scroll_height(&mut self, id: NodeId) -> Result<u32> {
        Ok(self.scroll_view(id)?.map_or(0, |s| s.content_height()))
    }

    /// Scroll position as a percentage of the scrollable range.
    pub fn scroll_perc(&mut self, id: NodeId) -> Result<f32> {
        Ok(self.scroll_view(id)?.map_or(0.0, |s| s.perc()))
    }

    /// Apply a navigation key to a box that scrolls from the keyboard.
    /// Returns `true` if the key was consumed.
    pub(crate) fn scroll_for_key(&mut self, key: NodeKey, k: Key) -> Result<bool> {
        let n = &self.nodes[key];
        if !n.scrollable() || !n.element.scroll.is_some_and(|s| s.keys) || k.mods.ctrl || k.mods.alt {
            return Ok(false);
        }
        self.ensure_layout()?;
        let half = i64::from((self.nodes[key].scroll.visible / 2).max(1));
        match k.key {
            KeyCode::Up => self.apply_scroll(key, -1, false)?,
            KeyCode::Down => self.apply_scroll(key, 1, false)?,
            KeyCode::PageUp => self.apply_scroll(key, -half, true)?,
            KeyCode::PageDown => self.apply_scroll(key, half, true)?,
            KeyCode::Home => {
                self.nodes[key].scroll.offset = 0;
                self.apply_scroll_to(key, 0)?
            }
            KeyCode::End => {
                let end = i64::from(self.nodes[key].scroll.content);
                self.apply_scroll_to(key, end)?
            }
            _ => return Ok(false),
        };
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn state(visible: u32, content: u32) -> ScrollState {
        let mut s = ScrollState::default();
        s.remeasure(visible, content);
        s
    }

    #[test]
    fn cursor_moves_inside_window_first() {
        let mut s = state(5, 20);
        s.scroll_cursor(3);
        assert_eq!((s.base, s.offset), (0, 3));
        s.scroll_cursor(3);
        assert_eq!((s.base, s.offset), (2, 4));
        s.scroll_cursor(-6);
        assert_eq!((s.base, s.offset), (0, 0));
        s.scroll_cursor(100);
        assert_eq!((s.base, s.offset), (15, 4));
    }

    #[test]
    fn window_pins_cursor() {
        let mut s = state(5, 20);
        s.scroll_window(1);
        assert_eq!((s.base, s.offset), (1, 4));
        s.scroll_window(-1);
        assert_eq!((s.base, s.offset), (0, 0));
    }

    #[test]
    fn remeasure_reclamps() {
        let mut s = state(5, 20);
        s.scroll_window(15);
        assert_eq!(s.base, 15);
        s.remeasure(5, 8);
        assert_eq!(s.base, 3);
        s.remeasure(2, 8);
        assert_eq!(s.offset, 1);
        s.remeasure(10, 8);
        assert_eq!(s.base, 0);
        assert_eq!(s.perc(), 0.0);
    }

    #[test]
    fn pending_shift_needs_commit() {
        let mut s = state(5, 20);
        s.scroll_window(2);
        assert_eq!(s.pending_shift(), None);
        s.committed = Some(0);
        assert_eq!(s.pending_shift(), Some(2));
        s.committed = Some(2);
        assert_eq!(s.pending_shift(), None);
    }

    proptest! {
        #[test]
        fn round_trip(v in 1u32..40, extra in 1u32..200, k in -500i64..500, start in 0i64..300) {
            let h = v + extra;
            let mut s = state(v, h);
            s.scroll_window(start);
            s.scroll_window(k - i64::from(s.base));
            prop_assert_eq!(i64::from(s.base), k.clamp(0, i64::from(h - v)));
        }

        #[test]
        fn invariants_hold(v in 0u32..30, h in 0u32..100, deltas in prop::collection::vec(-50i64..50, 1..20)) {
            let mut s = state(v, h);
            for d in deltas {
                s.scroll_cursor(d);
                prop_assert!(s.base <= s.max_base());
                prop_assert!(s.offset <= v.saturating_sub(1));
            }
        }
    }
}
