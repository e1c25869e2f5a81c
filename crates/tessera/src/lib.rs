//! A retained-mode terminal UI layout and compositing engine.
//!
//! Applications build a tree of [`Element`]s on a [`Screen`]. Each render
//! resolves element positions against their parents, paints them into a cell
//! grid, and writes only the cells that changed since the last render.
//! Scrollable boxes that move by a pure scroll are shifted with terminal
//! scroll regions instead of being repainted.
#![allow(clippy::multiple_inherent_impl)]

pub mod backend;
pub mod color;
pub mod config;
pub mod content;
pub mod diff;
mod dock;
pub mod dump;
pub mod element;
pub mod error;
pub mod event;
pub mod focus;
pub use geom;
pub mod id;
mod layout;
mod node;
mod paint;
pub mod runloop;
pub mod screen;
pub mod scroll;
pub mod style;
pub mod termbuf;
pub mod testing;
pub mod text;
pub mod tree;

pub use backend::{Cap, Capabilities, Terminal, ansi::AnsiCaps, crossterm::CrosstermTerminal};
pub use config::ScreenOptions;
pub use content::{Content, ContentLine, Span};
pub use diff::RenderStats;
pub use element::{Border, BorderKind, Element, Extent, Offset, Position};
pub use error::{Error, Result};
pub use event::{Event, EventContext, NodeEvent, Propagation};
pub use focus::FocusManager;
pub use geom::{Expanse, Point, Rect, Sides};
pub use id::{NodeId, ScreenId};
pub use node::Resolved;
pub use screen::Screen;
pub use scroll::{ScrollOptions, ScrollState};
pub use style::{Attr, Color, PartialStyle, Style};
pub use termbuf::{Cell, TermBuf};
pub use tree::Tree;
