//! The node arena: structure, lifecycle notifications and event propagation.
use std::mem;

use slotmap::SlotMap;

use crate::{
    content::Content,
    element::{Element, Extent},
    error::{Error, Result},
    event::{Deferred, Delivery, EventContext, Handler, NodeEvent, Propagation, Scope},
    focus::FocusManager,
    geom::Expanse,
    id::{NodeId, NodeKey, ScreenId},
    node::{Node, Resolved},
    scroll::ScrollState,
};

/// Upper bound on deferred-work rounds applied after one dispatch. Handlers
/// that keep scheduling work in response to their own notifications are cut
/// off here.
const MAX_DEFERRED_ROUNDS: usize = 32;

/// An arena of nodes belonging to one screen.
///
/// The tree owns every node, the focus and hover state, and the layout
/// results. Nodes are addressed by [`NodeId`]s, which carry the id of the
/// screen that created them; handing an id to a different screen's tree is
/// an error.
pub struct Tree {
    /// Node storage.
    pub(crate) nodes: SlotMap<NodeKey, Node>,
    /// The root node, always attached.
    pub(crate) root: NodeKey,
    /// The owning screen.
    pub(crate) screen: ScreenId,
    /// Size of the root's parent rectangle: the terminal.
    pub(crate) size: Expanse,
    /// Tab stop used when measuring and painting content.
    pub(crate) tab_size: usize,
    /// Something visible changed since the last flushed render.
    pub(crate) dirty: bool,
    /// The resolved rectangles reflect the current tree.
    pub(crate) layout_valid: bool,
    /// Attached focusable or clickable nodes in the order they became so.
    pub(crate) registry: Vec<NodeKey>,
    /// The focused node.
    pub(crate) focus: Option<NodeKey>,
    /// Previously focused nodes, most recent last.
    pub(crate) focus_history: Vec<NodeKey>,
    /// The node under the pointer.
    pub(crate) hover: Option<NodeKey>,
    /// Nodes painted in the last layout pass, in paint order.
    pub(crate) paint_order: Vec<NodeKey>,
    /// Work scheduled by handlers, applied when the current operation ends.
    deferred: Vec<Deferred>,
    /// Exit status requested by a handler.
    exit: Option<i32>,
}

impl Tree {
    /// Construct a tree with a root element that fills the screen.
    pub fn new(size: Expanse) -> Self {
        let root = Element::new()
            .name("root")
            .width(Extent::Percent(100.0, 0))
            .height(Extent::Percent(100.0, 0));
        Self::with_root(ScreenId::next(), size, root)
    }

    /// Construct a tree for a given screen and root element.
    pub(crate) fn with_root(screen: ScreenId, size: Expanse, root: Element) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut node = Node::new(root);
        node.attached = true;
        let root = nodes.insert(node);
        Self {
            nodes,
            root,
            screen,
            size,
            tab_size: 4,
            dirty: true,
            layout_valid: false,
            registry: Vec::new(),
            focus: None,
            focus_history: Vec::new(),
            hover: None,
            paint_order: Vec::new(),
            deferred: Vec::new(),
            exit: None,
        }
    }

    /// The screen this tree belongs to.
    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.id(self.root)
    }

    /// The size the root is resolved against.
    pub fn size(&self) -> Expanse {
        self.size
    }

    /// Resize the root's parent rectangle. Invalidates layout.
    pub(crate) fn set_size(&mut self, size: Expanse) {
        if self.size != size {
            self.size = size;
            self.invalidate();
        }
    }

    /// Build the public id for a key.
    pub(crate) fn id(&self, key: NodeKey) -> NodeId {
        NodeId {
            key,
            screen: self.screen,
        }
    }

    /// Validate an id and return its arena key.
    pub(crate) fn key(&self, id: NodeId) -> Result<NodeKey> {
        if id.screen != self.screen {
            return Err(Error::ForeignScreen(id));
        }
        match self.nodes.get(id.key) {
            Some(n) if !n.destroyed => Ok(id.key),
            _ => Err(Error::NodeNotFound(id)),
        }
    }

    /// Take the exit status requested by a handler, if any.
    pub fn take_exit_request(&mut self) -> Option<i32> {
        self.exit.take()
    }

    /// Does the screen need to be rendered?
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the screen dirty without changing anything.
    pub fn request_render(&mut self) {
        self.dirty = true;
    }

    /// Mark layout stale and the screen dirty.
    pub(crate) fn invalidate(&mut self) {
        self.layout_valid = false;
        self.dirty = true;
    }

    /// Record that content under `key` changed, so enclosing scrollable boxes
    /// cannot report a pure scroll.
    pub(crate) fn disturb(&mut self, key: NodeKey) {
        let mut cur = Some(key);
        while let Some(k) = cur {
            let Some(n) = self.nodes.get_mut(k) else {
                break;
            };
            if n.element.scroll.is_some() {
                n.scroll.disturbed = true;
            }
            cur = n.parent;
        }
    }

    /// Create a detached node.
    pub fn create(&mut self, element: Element) -> NodeId {
        let key = self.nodes.insert(Node::new(element));
        self.id(key)
    }

    /// Create a node and append it to `parent`.
    pub fn create_child(&mut self, parent: NodeId, element: Element) -> Result<NodeId> {
        self.key(parent)?;
        let id = self.create(element);
        self.append(parent, id)?;
        Ok(id)
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert(parent, usize::MAX, child)
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert(parent, 0, child)
    }

    /// Insert `child` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, child: NodeId) -> Result<()> {
        self.insert_beside(sibling, child, 0)
    }

    /// Insert `child` immediately after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, child: NodeId) -> Result<()> {
        self.insert_beside(sibling, child, 1)
    }

    /// Shared implementation of the sibling-relative inserts.
    fn insert_beside(&mut self, sibling: NodeId, child: NodeId, after: usize) -> Result<()> {
        let sk = self.key(sibling)?;
        let ck = self.key(child)?;
        if sk == ck {
            return Ok(());
        }
        let pk = self.nodes[sk].parent.ok_or(Error::NoParent(sibling))?;
        let parent = self.id(pk);
        // Index is computed after the child leaves its old position, so
        // moves within one parent land next to the sibling.
        self.insert_with(parent, child, |t| {
            t.nodes[pk]
                .children
                .iter()
                .position(|k| *k == sk)
                .map_or(usize::MAX, |i| i + after)
        })
    }

    /// Insert `child` at `index` among `parent`'s children. Indices past the
    /// end append. The child is first detached from any previous parent.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        self.insert_with(parent, child, |_| index)
    }

    /// Move `child` under `parent` at the index computed by `index` once the
    /// child has been unlinked.
    fn insert_with(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: impl FnOnce(&Self) -> usize,
    ) -> Result<()> {
        let pk = self.key(parent)?;
        let ck = self.key(child)?;
        if ck == self.root {
            return Err(Error::RootImmovable);
        }
        if pk == ck || self.is_ancestor(ck, pk) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        let old = self.nodes[ck].parent;
        if let Some(ok) = old {
            self.nodes[ok].children.retain(|k| *k != ck);
            self.disturb(ok);
        }
        let idx = index(self).min(self.nodes[pk].children.len());
        self.nodes[pk].children.insert(idx, ck);
        self.nodes[ck].parent = Some(pk);
        self.disturb(pk);
        self.invalidate();

        if old != Some(pk) {
            if let Some(ok) = old {
                self.notify(ok, NodeEvent::Remove(child));
            }
            self.notify(pk, NodeEvent::Adopt(child));
            let from = old.map(|k| self.id(k));
            self.notify(ck, NodeEvent::Reparent { from, to: parent });
        }

        let attached = self.nodes[pk].attached;
        self.set_attached(ck, attached);
        self.flush_deferred()
    }

    /// Remove `child` from `parent`. Does nothing and returns `false` if
    /// `child` is not a child of `parent`.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<bool> {
        let pk = self.key(parent)?;
        let ck = self.key(child)?;
        if self.nodes[ck].parent != Some(pk) {
            return Ok(false);
        }
        self.unlink(ck);
        self.flush_deferred()?;
        Ok(true)
    }

    /// Remove `child` from whatever parent holds it. Returns `false` if it had
    /// no parent.
    pub fn detach(&mut self, child: NodeId) -> Result<bool> {
        let ck = self.key(child)?;
        if ck == self.root {
            return Err(Error::RootImmovable);
        }
        if self.nodes[ck].parent.is_none() {
            return Ok(false);
        }
        self.unlink(ck);
        self.flush_deferred()?;
        Ok(true)
    }

    /// Unlink a node from its parent and propagate the detached state.
    fn unlink(&mut self, ck: NodeKey) {
        let Some(pk) = self.nodes[ck].parent.take() else {
            return;
        };
        self.nodes[pk].children.retain(|k| *k != ck);
        self.disturb(pk);
        self.invalidate();
        let child = self.id(ck);
        self.notify(pk, NodeEvent::Remove(child));
        self.set_attached(ck, false);
    }

    /// Destroy a node and its subtree, freeing their slots. Destroying a
    /// stale id is a no-op.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        if id.screen != self.screen {
            return Err(Error::ForeignScreen(id));
        }
        let Ok(key) = self.key(id) else {
            return Ok(());
        };
        if key == self.root {
            return Err(Error::RootImmovable);
        }
        self.unlink(key);
        let doomed = self.post_order(key);
        for k in &doomed {
            self.nodes[*k].destroyed = true;
        }
        for k in &doomed {
            self.notify(*k, NodeEvent::Destroy);
        }
        self.registry.retain(|k| !doomed.contains(k));
        self.focus_history.retain(|k| !doomed.contains(k));
        self.paint_order.retain(|k| !doomed.contains(k));
        for k in doomed {
            self.nodes.remove(k);
        }
        self.flush_deferred()
    }

    /// Propagate the attached flag through a subtree, firing `Attach` or
    /// `Detach` on nodes whose state actually changes.
    fn set_attached(&mut self, key: NodeKey, attached: bool) {
        if self.nodes[key].attached == attached {
            return;
        }
        let subtree = self.pre_order(key);
        for k in &subtree {
            let n = &mut self.nodes[*k];
            n.attached = attached;
            if !attached {
                n.resolved = None;
                n.scroll.committed = None;
            } else if n.element.interactive() && !self.registry.contains(k) {
                self.registry.push(*k);
            }
        }
        let event = if attached {
            NodeEvent::Attach
        } else {
            NodeEvent::Detach
        };
        for k in &subtree {
            self.notify(*k, event.clone());
        }
        if !attached {
            self.registry.retain(|k| !subtree.contains(k));
            if self.hover.is_some_and(|h| subtree.contains(&h)) {
                self.hover = None;
            }
            if self.focus.is_some_and(|f| subtree.contains(&f)) {
                self.rewind_focus();
            }
        }
    }

    /// Is `a` an ancestor of `b`?
    pub(crate) fn is_ancestor(&self, a: NodeKey, b: NodeKey) -> bool {
        let mut cur = self.nodes.get(b).and_then(|n| n.parent);
        while let Some(k) = cur {
            if k == a {
                return true;
            }
            cur = self.nodes.get(k).and_then(|n| n.parent);
        }
        false
    }

    /// Collect a subtree in pre-order, including the root.
    pub(crate) fn pre_order(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(k) = stack.pop() {
            let Some(node) = self.nodes.get(k) else {
                continue;
            };
            out.push(k);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Collect a subtree in post-order, including the root.
    pub(crate) fn post_order(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((k, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(k) else {
                continue;
            };
            if visited {
                out.push(k);
                continue;
            }
            stack.push((k, true));
            for c in node.children.iter().rev() {
                stack.push((*c, false));
            }
        }
        out
    }

    /// The parent of a node.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        let k = self.key(id)?;
        Ok(self.nodes[k].parent.map(|p| self.id(p)))
    }

    /// The children of a node, in order.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let k = self.key(id)?;
        Ok(self.nodes[k].children.iter().map(|c| self.id(*c)).collect())
    }

    /// Is the node reachable from the root?
    pub fn is_attached(&self, id: NodeId) -> Result<bool> {
        let k = self.key(id)?;
        Ok(self.nodes[k].attached)
    }

    /// Has this node been destroyed (or never existed in this tree)?
    pub fn is_destroyed(&self, id: NodeId) -> Result<bool> {
        match self.key(id) {
            Ok(_) => Ok(false),
            Err(Error::NodeNotFound(_)) => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// The element of a node.
    pub fn element(&self, id: NodeId) -> Result<&Element> {
        let k = self.key(id)?;
        Ok(&self.nodes[k].element)
    }

    /// Mutable access to the element of a node. Marks the screen dirty.
    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        let k = self.key(id)?;
        self.disturb(k);
        self.invalidate();
        Ok(&mut self.nodes[k].element)
    }

    /// Replace a node's content.
    pub fn set_content(&mut self, id: NodeId, content: impl Into<Content>) -> Result<()> {
        self.element_mut(id)?.content = content.into();
        Ok(())
    }

    /// Show or hide a node. Returns `true` if visibility changed.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> Result<bool> {
        if self.element(id)?.hidden == hidden {
            return Ok(false);
        }
        self.element_mut(id)?.hidden = hidden;
        Ok(true)
    }

    /// The rectangles computed by the last layout pass. `None` if the node
    /// was not rendered.
    pub fn resolved(&self, id: NodeId) -> Result<Option<Resolved>> {
        let k = self.key(id)?;
        Ok(self.nodes[k].resolved)
    }

    /// The scroll state of a scrollable box.
    pub fn scroll_state(&self, id: NodeId) -> Result<Option<ScrollState>> {
        let k = self.key(id)?;
        let n = &self.nodes[k];
        Ok(n.element.scroll.map(|_| n.scroll))
    }

    /// The attached nodes that are focusable or clickable, in registration
    /// order.
    pub fn registry(&self) -> Vec<NodeId> {
        self.registry.iter().map(|k| self.id(*k)).collect()
    }

    /// Bring the registry in line with the current interactive flags,
    /// keeping existing order.
    pub(crate) fn sync_registry(&mut self) {
        let nodes = &self.nodes;
        self.registry
            .retain(|k| nodes.get(*k).is_some_and(|n| n.attached && n.element.interactive()));
        for k in self.pre_order(self.root) {
            if self.nodes[k].element.interactive() && !self.registry.contains(&k) {
                self.registry.push(k);
            }
        }
    }

    /// Register an event handler on a node.
    pub fn on(
        &mut self,
        id: NodeId,
        handler: impl FnMut(&NodeEvent, &Delivery, &mut EventContext) -> Propagation + 'static,
    ) -> Result<()> {
        let k = self.key(id)?;
        self.nodes[k].handlers.push(Box::new(handler) as Handler);
        Ok(())
    }

    /// Deliver an event to a node's own handlers only.
    pub fn emit(&mut self, id: NodeId, event: NodeEvent) -> Result<Propagation> {
        let k = self.key(id)?;
        let p = self.deliver(k, &event, id, Scope::Local);
        self.flush_deferred()?;
        Ok(p)
    }

    /// Deliver an event to a node, then to each ancestor in turn, until a
    /// handler returns [`Propagation::Stop`].
    pub fn bubble(&mut self, id: NodeId, event: NodeEvent) -> Result<Propagation> {
        let k = self.key(id)?;
        let p = self.bubble_key(k, &event);
        self.flush_deferred()?;
        Ok(p)
    }

    /// Deliver an event to a node and all of its descendants in pre-order.
    pub fn broadcast(&mut self, id: NodeId, event: NodeEvent) -> Result<()> {
        let k = self.key(id)?;
        for c in self.pre_order(k) {
            self.deliver(c, &event, id, Scope::Broadcast);
        }
        self.flush_deferred()
    }

    /// Bubble without flushing deferred work.
    pub(crate) fn bubble_key(&mut self, key: NodeKey, event: &NodeEvent) -> Propagation {
        let target = self.id(key);
        let mut scope = Scope::Target;
        let mut cur = Some(key);
        while let Some(k) = cur {
            if self.deliver(k, event, target, scope) == Propagation::Stop {
                return Propagation::Stop;
            }
            scope = Scope::Ancestor;
            cur = self.nodes.get(k).and_then(|n| n.parent);
        }
        Propagation::Continue
    }

    /// Deliver a lifecycle notification to a node's own handlers.
    pub(crate) fn notify(&mut self, key: NodeKey, event: NodeEvent) {
        let id = self.id(key);
        self.deliver(key, &event, id, Scope::Local);
    }

    /// Run a node's handlers in registration order, ending at the first one
    /// that returns `Stop`. Handlers are moved out of the node for the
    /// duration of the call.
    fn deliver(
        &mut self,
        key: NodeKey,
        event: &NodeEvent,
        target: NodeId,
        scope: Scope,
    ) -> Propagation {
        let Some(node) = self.nodes.get_mut(key) else {
            return Propagation::Continue;
        };
        if node.handlers.is_empty() {
            return Propagation::Continue;
        }
        let mut handlers = mem::take(&mut node.handlers);
        let delivery = Delivery {
            target,
            current: self.id(key),
            scope,
        };
        let mut ctx = EventContext::default();
        let mut result = Propagation::Continue;
        for h in handlers.iter_mut() {
            if h(event, &delivery, &mut ctx) == Propagation::Stop {
                result = Propagation::Stop;
                break;
            }
        }
        if let Some(node) = self.nodes.get_mut(key) {
            handlers.append(&mut node.handlers);
            node.handlers = handlers;
        }
        self.deferred.append(&mut ctx.deferred);
        result
    }

    /// Apply work scheduled by handlers. Work aimed at nodes that no longer
    /// exist is dropped.
    pub(crate) fn flush_deferred(&mut self) -> Result<()> {
        for _ in 0..MAX_DEFERRED_ROUNDS {
            if self.deferred.is_empty() {
                return Ok(());
            }
            for d in mem::take(&mut self.deferred) {
                let r = match d {
                    Deferred::Focus(id) => self.key(id).map(|k| {
                        self.apply_focus(k);
                    }),
                    Deferred::Blur => {
                        self.apply_blur();
                        Ok(())
                    }
                    Deferred::Scroll(id, delta) => self
                        .key(id)
                        .and_then(|k| self.apply_scroll(k, i64::from(delta), false))
                        .map(|_| ()),
                    Deferred::ScrollTo(id, index) => self
                        .key(id)
                        .and_then(|k| self.apply_scroll_to(k, index))
                        .map(|_| ()),
                    Deferred::Content(id, content) => self.set_content(id, content),
                    Deferred::RequestRender => {
                        self.dirty = true;
                        Ok(())
                    }
                    Deferred::Exit(code) => {
                        self.exit = Some(code);
                        Ok(())
                    }
                };
                match r {
                    Ok(()) | Err(Error::NodeNotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        tracing::warn!("deferred work still pending after {MAX_DEFERRED_ROUNDS} rounds");
        self.deferred.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn tree() -> Tree {
        Tree::new(Expanse::new(20, 10))
    }

    /// Record every notification a node receives.
    fn record(t: &mut Tree, id: NodeId, log: &Rc<RefCell<Vec<(NodeId, NodeEvent)>>>) {
        let log = log.clone();
        t.on(id, move |e, d, _| {
            log.borrow_mut().push((d.current, e.clone()));
            Propagation::Continue
        })
        .unwrap();
    }

    #[test]
    fn attach_detach_transitions() {
        let mut t = tree();
        let root = t.root();
        let a = t.create(Element::new());
        let b = t.create(Element::new());
        t.append(a, b).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut t, a, &log);
        record(&mut t, b, &log);

        assert!(!t.is_attached(b).unwrap());
        t.append(root, a).unwrap();
        assert!(t.is_attached(a).unwrap());
        assert!(t.is_attached(b).unwrap());
        assert_eq!(
            *log.borrow(),
            vec![
                (
                    a,
                    NodeEvent::Reparent {
                        from: None,
                        to: root
                    }
                ),
                (a, NodeEvent::Attach),
                (b, NodeEvent::Attach),
            ]
        );

        // Moving between attached parents is not a transition.
        log.borrow_mut().clear();
        let c = t.create_child(root, Element::new()).unwrap();
        t.append(c, b).unwrap();
        assert!(log.borrow().iter().all(|(_, e)| !matches!(e, NodeEvent::Attach | NodeEvent::Detach)));
        assert_eq!(t.children(c).unwrap(), vec![b]);
        assert!(t.children(a).unwrap().is_empty());

        log.borrow_mut().clear();
        assert!(t.detach(c).unwrap());
        assert!(!t.is_attached(b).unwrap());
        assert_eq!(*log.borrow(), vec![(b, NodeEvent::Detach)]);
        assert!(!t.detach(c).unwrap());
    }

    #[test]
    fn ordering() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_child(root, Element::new()).unwrap();
        let b = t.create_child(root, Element::new()).unwrap();
        let c = t.create(Element::new());
        t.prepend(root, c).unwrap();
        assert_eq!(t.children(root).unwrap(), vec![c, a, b]);
        t.insert_after(b, c).unwrap();
        assert_eq!(t.children(root).unwrap(), vec![a, b, c]);
        t.insert_before(a, c).unwrap();
        assert_eq!(t.children(root).unwrap(), vec![c, a, b]);
        t.insert(root, 1, b).unwrap();
        assert_eq!(t.children(root).unwrap(), vec![c, b, a]);
        let orphan = t.create(Element::new());
        assert_eq!(t.insert_before(orphan, a), Err(Error::NoParent(orphan)));
    }

    #[test]
    fn remove_requires_parent_match() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_child(root, Element::new()).unwrap();
        let b = t.create_child(a, Element::new()).unwrap();
        assert!(!t.remove(root, b).unwrap());
        assert_eq!(t.parent(b).unwrap(), Some(a));
        assert!(t.remove(a, b).unwrap());
        assert_eq!(t.parent(b).unwrap(), None);
    }

    #[test]
    fn cycles_and_root() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_child(root, Element::new()).unwrap();
        let b = t.create_child(a, Element::new()).unwrap();
        assert_eq!(
            t.append(b, a),
            Err(Error::WouldCreateCycle {
                parent: b,
                child: a
            })
        );
        assert!(matches!(t.append(a, a), Err(Error::WouldCreateCycle { .. })));
        assert_eq!(t.append(a, root), Err(Error::RootImmovable));
        assert_eq!(t.destroy(root), Err(Error::RootImmovable));
    }

    #[test]
    fn foreign_ids() {
        let mut t1 = tree();
        let mut t2 = tree();
        let x = t2.create(Element::new());
        let root = t1.root();
        assert_eq!(t1.append(root, x), Err(Error::ForeignScreen(x)));
        assert_eq!(t1.destroy(x), Err(Error::ForeignScreen(x)));
        assert!(matches!(t1.element(x), Err(Error::ForeignScreen(_))));
    }

    #[test]
    fn destroy_is_depth_first_and_idempotent() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_child(root, Element::new()).unwrap();
        let b = t.create_child(a, Element::new()).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut t, a, &log);
        record(&mut t, b, &log);
        t.destroy(a).unwrap();
        let destroys: Vec<_> = log
            .borrow()
            .iter()
            .filter(|(_, e)| *e == NodeEvent::Destroy)
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(destroys, vec![b, a]);
        assert!(t.is_destroyed(a).unwrap());
        assert!(t.is_destroyed(b).unwrap());
        assert!(t.children(root).unwrap().is_empty());
        t.destroy(a).unwrap();
        assert!(matches!(t.element(b), Err(Error::NodeNotFound(_))));
    }

    #[test]
    fn bubbling_stops() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_child(root, Element::new()).unwrap();
        let b = t.create_child(a, Element::new()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for id in [root, a, b] {
            let seen = seen.clone();
            t.on(id, move |_, d, _| {
                seen.borrow_mut().push((d.current, d.scope));
                if d.current == a {
                    Propagation::Stop
                } else {
                    Propagation::Continue
                }
            })
            .unwrap();
        }
        let p = t.bubble(b, NodeEvent::Custom("ping".into())).unwrap();
        assert_eq!(p, Propagation::Stop);
        assert_eq!(
            *seen.borrow(),
            vec![(b, Scope::Target), (a, Scope::Ancestor)]
        );

        seen.borrow_mut().clear();
        t.broadcast(root, NodeEvent::Custom("all".into())).unwrap();
        let order: Vec<_> = seen.borrow().iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec![root, a, b]);

        seen.borrow_mut().clear();
        t.emit(b, NodeEvent::Custom("one".into())).unwrap();
        assert_eq!(*seen.borrow(), vec![(b, Scope::Local)]);
    }

    #[test]
    fn stop_skips_later_handlers_on_the_same_node() {
        let mut t = tree();
        let root = t.root();
        let a = t.create_child(root, Element::new()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for (tag, p) in [
            ("first", Propagation::Continue),
            ("second", Propagation::Stop),
            ("third", Propagation::Continue),
        ] {
            let seen = seen.clone();
            t.on(a, move |_, _, _| {
                seen.borrow_mut().push(tag);
                p
            })
            .unwrap();
        }
        let p = t.bubble(a, NodeEvent::Custom("ping".into())).unwrap();
        assert_eq!(p, Propagation::Stop);
        assert_eq!(*seen.borrow(), vec!["first", "second"]);

        // Handlers survive the early exit.
        seen.borrow_mut().clear();
        t.emit(a, NodeEvent::Custom("again".into())).unwrap();
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn deferred_work_applies_after_dispatch() {
        let mut t = tree();
        let root = t.root();
        let a = t
            .create_child(root, Element::new().focusable(true))
            .unwrap();
        t.on(root, move |e, _, ctx| {
            if *e == NodeEvent::Custom("focus-a".into()) {
                ctx.focus(a);
            }
            Propagation::Continue
        })
        .unwrap();
        t.emit(root, NodeEvent::Custom("focus-a".into())).unwrap();
        assert_eq!(t.focused(), Some(a));
    }

    #[test]
    fn handlers_replace_content() {
        let mut t = tree();
        let root = t.root();
        let status = t.create_child(root, Element::new().content("idle")).unwrap();
        t.on(root, move |e, _, ctx| {
            if let NodeEvent::Custom(msg) = e {
                ctx.set_content(status, msg.as_str());
            }
            Propagation::Continue
        })
        .unwrap();
        t.emit(root, NodeEvent::Custom("busy".into())).unwrap();
        assert_eq!(t.element(status).unwrap().content, Content::text("busy"));
        assert!(t.is_dirty());
    }
}
