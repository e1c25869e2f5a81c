//! Demo applications built on tessera.

/// List gym demo nodes.
pub mod listgym;
