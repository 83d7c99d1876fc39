//! Data models
//!
//! Shared between the store client and the editor core.
//! All IDs are `i64` (server INTEGER PRIMARY KEY).

pub mod inspection;
pub mod photo;

// Re-exports
pub use inspection::*;
pub use photo::*;
