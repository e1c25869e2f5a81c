use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::new_key_type;

new_key_type! {
    /// Opaque arena key for a node slot.
    pub(crate) struct NodeKey;
}

/// Identifies a screen. Every node carries the id of the screen whose arena
/// owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(u64);

impl ScreenId {
    /// Allocate a fresh, process-unique screen id.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable handle to a node in a screen's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    /// Slot in the arena.
    pub(crate) key: NodeKey,
    /// Owning screen.
    pub(crate) screen: ScreenId,
}

impl NodeId {
    /// The screen this node belongs to.
    pub fn screen(&self) -> ScreenId {
        self.screen
    }
}
