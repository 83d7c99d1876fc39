//! Inspection Photo Model

use serde::{Deserialize, Serialize};

/// Photo attachment record
///
/// `url` is the publicly addressable location obtained from the object
/// store at upload time; the inspection store never serves image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub label: String,
}
