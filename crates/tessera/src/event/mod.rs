//! Input events and the node notification protocol.

/// Keyboard input primitives.
pub mod key;
/// Mouse input primitives.
pub mod mouse;

use crate::{content::Content, geom::Expanse, id::NodeId};

/// An input event delivered to a screen.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Event {
    /// A keystroke.
    Key(key::Key),
    /// A mouse action.
    Mouse(mouse::MouseEvent),
    /// The terminal was resized.
    Resize(Expanse),
}

/// A notification delivered to node handlers.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum NodeEvent {
    /// The node became reachable from the root.
    Attach,
    /// The node stopped being reachable from the root.
    Detach,
    /// A child was added to this node.
    Adopt(NodeId),
    /// A child was removed from this node.
    Remove(NodeId),
    /// This node was moved under a new parent.
    Reparent {
        /// The previous parent, if any.
        from: Option<NodeId>,
        /// The new parent.
        to: NodeId,
    },
    /// The node is being destroyed. Its slot is freed after the handlers run.
    Destroy,
    /// The node gained focus.
    Focus,
    /// The node lost focus.
    Blur,
    /// The pointer entered the node.
    MouseOver,
    /// The pointer left the node.
    MouseOut,
    /// A key routed to the focused node.
    Key(key::Key),
    /// A mouse action routed to the node under the pointer.
    Mouse(mouse::MouseEvent),
    /// The screen changed size.
    Resize(Expanse),
    /// A scrollable box moved its window. Carries the new base.
    Scroll(u32),
    /// An application-defined notification.
    Custom(String),
}

/// Handler return value controlling bubbling.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Propagation {
    /// Keep delivering to ancestors.
    Continue,
    /// Stop here.
    Stop,
}

/// How an event reached the node whose handler is running.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Scope {
    /// Delivered only to this node.
    Local,
    /// The node the event was bubbled from.
    Target,
    /// An ancestor of the target, during bubbling.
    Ancestor,
    /// A node reached by a downward broadcast.
    Broadcast,
}

/// Delivery details passed alongside every event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Delivery {
    /// The node the event was originally sent to.
    pub target: NodeId,
    /// The node whose handler is running.
    pub current: NodeId,
    /// How the event got here.
    pub scope: Scope,
}

/// Follow-up work requested by a handler, applied once dispatch finishes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum Deferred {
    /// Move focus to a node.
    Focus(NodeId),
    /// Clear focus.
    Blur,
    /// Scroll a box by a relative amount.
    Scroll(NodeId, i32),
    /// Scroll a box to an absolute row.
    ScrollTo(NodeId, i64),
    /// Replace a node's content.
    Content(NodeId, Content),
    /// Mark the screen dirty.
    RequestRender,
    /// Ask the run loop to exit with a status code.
    Exit(i32),
}

/// Handed to handlers so they can schedule work against the tree without
/// holding a borrow of it.
#[derive(Debug, Default)]
pub struct EventContext {
    /// Queued operations.
    pub(crate) deferred: Vec<Deferred>,
}

impl EventContext {
    /// Move focus to `id` after dispatch.
    pub fn focus(&mut self, id: NodeId) {
        self.deferred.push(Deferred::Focus(id));
    }

    /// Clear focus after dispatch.
    pub fn blur(&mut self) {
        self.deferred.push(Deferred::Blur);
    }

    /// Scroll a box by `delta` rows after dispatch.
    pub fn scroll(&mut self, id: NodeId, delta: i32) {
        self.deferred.push(Deferred::Scroll(id, delta));
    }

    /// Scroll a box so row `index` is at the top after dispatch.
    pub fn scroll_to(&mut self, id: NodeId, index: i64) {
        self.deferred.push(Deferred::ScrollTo(id, index));
    }

    /// Replace a node's content after dispatch.
    pub fn set_content(&mut self, id: NodeId, content: impl Into<Content>) {
        self.deferred.push(Deferred::Content(id, content.into()));
    }

    /// Ask for a render on the next pass.
    pub fn request_render(&mut self) {
        self.deferred.push(Deferred::RequestRender);
    }

    /// Ask the run loop to exit with `code` once the current event is done.
    pub fn exit(&mut self, code: i32) {
        self.deferred.push(Deferred::Exit(code));
    }
}

/// A registered node event handler.
pub type Handler = Box<dyn FnMut(&NodeEvent, &Delivery, &mut EventContext) -> Propagation>;
