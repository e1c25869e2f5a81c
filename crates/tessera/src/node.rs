//! The arena record for a single node.
use crate::{
    element::Element,
    event::Handler,
    geom::{Expanse, Rect, RectI32},
    id::NodeKey,
    scroll::ScrollState,
};

/// The rectangles computed for an element by the last layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Unclipped rectangle in screen coordinates. May extend off screen or
    /// outside the parent.
    pub full: RectI32,
    /// `full` clipped to the parent's visible interior. Never empty.
    pub rect: Rect,
    /// Unclipped interior: `full` inset by border and padding.
    pub inner: RectI32,
    /// Visible part of the interior, if any. Children are clipped to this.
    pub clip: Option<Rect>,
}

/// A node in the arena.
pub(crate) struct Node {
    /// Parent slot, if attached to one.
    pub parent: Option<NodeKey>,
    /// Ordered child slots.
    pub children: Vec<NodeKey>,
    /// Is the ancestor chain rooted at the screen root?
    pub attached: bool,
    /// Set while the node is being torn down.
    pub destroyed: bool,
    /// What to lay out and paint.
    pub element: Element,
    /// Scroll state, meaningful when `element.scroll` is set.
    pub scroll: ScrollState,
    /// Registered event handlers.
    pub handlers: Vec<Handler>,
    /// Output of the last layout pass.
    pub resolved: Option<Resolved>,
    /// Cached shrink measurement, cleared whenever the layout is invalidated.
    pub measured: Option<Expanse>,
}

impl Node {
    /// A fresh, detached node.
    pub fn new(element: Element) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            attached: false,
            destroyed: false,
            element,
            scroll: ScrollState::default(),
            handlers: Vec::new(),
            resolved: None,
            measured: None,
        }
    }

    /// Is this node an enabled scrollable box?
    pub fn scrollable(&self) -> bool {
        self.element.scroll.is_some_and(|s| s.enabled)
    }
}
