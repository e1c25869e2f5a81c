use crate::{
    error::Result,
    event::NodeEvent,
    id::{NodeId, NodeKey},
    tree::Tree,
};

/// Keyboard focus management.
pub trait FocusManager {
    /// The focused node, if any.
    fn focused(&self) -> Option<NodeId>;

    /// Does the node hold focus?
    fn is_focused(&self, node: NodeId) -> bool;

    /// Focus a node. Detached nodes cannot take focus. Returns `true` if
    /// focus changed.
    fn set_focus(&mut self, node: NodeId) -> Result<bool>;

    /// Clear focus. Returns `true` if something was focused.
    fn blur(&mut self) -> bool;

    /// Focus the next focusable node in registry order, wrapping around.
    fn focus_next(&mut self) -> bool;

    /// Focus the previous focusable node in registry order, wrapping around.
    fn focus_prev(&mut self) -> bool;

    /// Restore focus after the focused node went away: the most recent entry
    /// in the focus history that is still attached and focusable, else the
    /// first focusable node in the registry, else nothing.
    fn rewind_focus(&mut self) -> Option<NodeId>;
}

impl Tree {
    /// Can this node take focus right now?
    fn can_focus(&self, key: NodeKey) -> bool {
        self.nodes
            .get(key)
            .is_some_and(|n| n.attached && !n.destroyed && n.element.focusable)
    }

    /// Move focus without flushing deferred work.
    pub(crate) fn apply_focus(&mut self, key: NodeKey) -> bool {
        if self.focus == Some(key) || !self.nodes.get(key).is_some_and(|n| n.attached) {
            return false;
        }
        if let Some(old) = self.focus.take() {
            self.focus_history.retain(|k| *k != old);
            self.focus_history.push(old);
            self.notify(old, NodeEvent::Blur);
        }
        self.focus = Some(key);
        self.dirty = true;
        self.notify(key, NodeEvent::Focus);
        true
    }

    /// Clear focus without flushing deferred work.
    pub(crate) fn apply_blur(&mut self) -> bool {
        let Some(old) = self.focus.take() else {
            return false;
        };
        self.focus_history.retain(|k| *k != old);
        self.focus_history.push(old);
        self.dirty = true;
        self.notify(old, NodeEvent::Blur);
        true
    }

    /// Step through focusable registry entries from the current focus.
    fn focus_step(&mut self, forward: bool) -> bool {
        self.sync_registry();
        let candidates: Vec<NodeKey> = self
            .registry
            .iter()
            .copied()
            .filter(|k| self.can_focus(*k))
            .collect();
        if candidates.is_empty() {
            return false;
        }
        let n = candidates.len();
        let next = match self.focus.and_then(|f| candidates.iter().position(|k| *k == f)) {
            Some(i) if forward => candidates[(i + 1) % n],
            Some(i) => candidates[(i + n - 1) % n],
            None if forward => candidates[0],
            None => candidates[n - 1],
        };
        let changed = self.apply_focus(next);
        if let Err(e) = self.flush_deferred() {
            tracing::warn!("focus handlers failed: {e}");
        }
        changed
    }
}

impl FocusManager for Tree {
    fn focused(&self) -> Option<NodeId> {
        self.focus.map(|k| self.id(k))
    }

    fn is_focused(&self, node: NodeId) -> bool {
        self.key(node).is_ok_and(|k| self.focus == Some(k))
    }

    fn set_focus(&mut self, node: NodeId) -> Result<bool> {
        let key = self.key(node)?;
        let changed = self.apply_focus(key);
        self.flush_deferred()?;
        Ok(changed)
    }

    fn blur(&mut self) -> bool {
        let changed = self.apply_blur();
        if let Err(e) = self.flush_deferred() {
            tracing::warn!("blur handlers failed: {e}");
        }
        changed
    }

    fn focus_next(&mut self) -> bool {
        self.focus_step(true)
    }

    fn focus_prev(&mut self) -> bool {
        self.focus_step(false)
    }

    fn rewind_focus(&mut self) -> Option<NodeId> {
        if let Some(old) = self.focus.take() {
            self.notify(old, NodeEvent::Blur);
            self.dirty = true;
        }
        while let Some(k) = self.focus_history.pop() {
            if self.can_focus(k) {
                self.apply_focus(k);
                return self.focused();
            }
        }
        self.sync_registry();
        let first = self.registry.iter().copied().find(|k| self.can_focus(*k));
        if let Some(k) = first {
            self.apply_focus(k);
        }
        self.focused()
    }
}
