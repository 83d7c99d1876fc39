//! Inspection Record Model

use serde::{Deserialize, Serialize};

use super::PhotoRecord;

/// Inspection record as returned by the store
///
/// `photos` is in server-returned order, which the editor preserves
/// as the initial display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: i64,
    pub address: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}
