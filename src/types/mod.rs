//! Core types for roci-search.

pub mod content;
pub mod event;

pub use content::*;
pub use event::*;
