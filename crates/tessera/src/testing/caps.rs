//! A capability table that emits readable tokens instead of escape codes.
use crate::{
    backend::{Cap, Capabilities},
    style::Attr,
};

/// Compiles every operation into a short bracketed token, so tests can
/// assert on terminal output as plain text. Text is passed through
/// unchanged.
#[derive(Debug, Clone, Copy)]
pub struct TokenCaps {
    /// Support scroll regions and line insertion/deletion.
    pub scroll_region: bool,
}

impl Default for TokenCaps {
    fn default() -> Self {
        Self {
            scroll_region: true,
        }
    }
}

impl TokenCaps {
    /// A table without scroll region support.
    pub fn without_scroll_region() -> Self {
        Self {
            scroll_region: false,
        }
    }
}

impl Capabilities for TokenCaps {
    fn compile(&self, cap: &Cap) -> Option<Vec<u8>> {
        let s = match *cap {
            Cap::CursorTo { x, y } => format!("{{to {x},{y}}}"),
            Cap::CursorUp(n) => format!("{{up {n}}}"),
            Cap::CursorDown(n) => format!("{{down {n}}}"),
            Cap::CursorLeft(n) => format!("{{left {n}}}"),
            Cap::CursorRight(n) => format!("{{right {n}}}"),
            Cap::InsertLines(n) if self.scroll_region => format!("{{il {n}}}"),
            Cap::DeleteLines(n) if self.scroll_region => format!("{{dl {n}}}"),
            Cap::SetScrollRegion { top, bottom } if self.scroll_region => {
                format!("{{csr {top} {bottom}}}")
            }
            Cap::ResetScrollRegion if self.scroll_region => "{nocsr}".into(),
            Cap::InsertLines(_)
            | Cap::DeleteLines(_)
            | Cap::SetScrollRegion { .. }
            | Cap::ResetScrollRegion => return None,
            Cap::Attr(a) if a == Attr::default() => "{attr default}".into(),
            Cap::Attr(a) => format!("{{attr {}}}", a.bits()),
            Cap::EnterAltScreen => "{alt}".into(),
            Cap::ExitAltScreen => "{noalt}".into(),
            Cap::ShowCursor => "{show}".into(),
            Cap::HideCursor => "{hide}".into(),
            Cap::Clear => "{clear}".into(),
        };
        Some(s.into_bytes())
    }
}
