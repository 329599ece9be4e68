//! Internal utilities.
//!
//! Kept dependency-free so the core queue stays deterministic and easy to
//! reason about.

pub mod arena;

pub use arena::{Arena, ArenaIndex};
