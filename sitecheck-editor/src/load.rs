//! Load adapter
//!
//! Turns a fetched record into an initial draft (edit mode) or produces an
//! empty one (create mode).

use sitecheck_client::{ClientResult, StoreClient};
use tracing::debug;

use crate::draft::InspectionDraft;

/// Build the initial draft for the editor
///
/// With an id, the record is fetched and copied into a draft; a fetch
/// failure is surfaced so the editor can refuse to submit an
/// uninitialized edit-mode draft. Without an id, an empty draft.
pub async fn load<S>(store: &S, id: Option<i64>) -> ClientResult<InspectionDraft>
where
    S: StoreClient + ?Sized,
{
    match id {
        Some(id) => {
            debug!(id, "loading inspection for edit");
            let record = store.fetch_inspection(id).await?;
            Ok(InspectionDraft::from_record(record))
        }
        None => Ok(InspectionDraft::new()),
    }
}
