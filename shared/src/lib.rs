//! Shared types for the sitecheck workspace
//!
//! Wire-level DTOs and domain models used by both the store client
//! and the editor core.

pub mod client;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{InspectionRecord, PhotoRecord};
