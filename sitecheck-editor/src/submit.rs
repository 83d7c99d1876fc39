//! Reconciliation engine
//!
//! Converges server state to the draft on submit: one record-body upsert,
//! then the photo slots in order, sequentially. The store and the object
//! endpoint offer no idempotency keys, so slots are never processed
//! concurrently; sequential order also makes per-slot failures reportable
//! as "photo 3 of 5 failed".

use shared::client::{
    AttachPhotoRequest, CreateInspectionRequest, UpdateInspectionRequest, UpdatePhotoRequest,
};
use sitecheck_client::{ClientError, ObjectUpload, StoreClient};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::draft::{InspectionDraft, PhotoSlot};

/// Fatal submit error
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Address is empty; checked before any network call
    #[error("address is required")]
    Validation,

    /// The record-body upsert failed; no photo operation was attempted
    #[error("record write failed: {0}")]
    RecordWrite(#[source] ClientError),

    /// A submit is already in flight on this editor
    #[error("submit already in flight")]
    InFlight,

    /// Edit-mode draft never finished loading
    #[error("draft not loaded")]
    NotLoaded,
}

/// Which photo operation failed for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFailureKind {
    /// Raw file upload to the object endpoint
    Upload,
    /// Attaching the uploaded photo to the record
    Attach,
    /// Updating the label of a persisted photo
    Update,
}

/// Non-fatal per-slot failure, reported in slot order
#[derive(Debug, Clone)]
pub struct SlotFailure {
    pub index: usize,
    pub label: String,
    pub kind: SlotFailureKind,
    pub message: String,
}

/// Submit outcome: the record is saved; photos may have partially failed
#[derive(Debug)]
pub struct SubmitOutcome {
    pub inspection_id: i64,
    pub failures: Vec<SlotFailure>,
}

impl SubmitOutcome {
    /// Whether every photo operation succeeded as well
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What a slot needs after the inspection phase released its borrow
enum PhotoOp {
    Attach { url: String, label: String },
    Update { photo_id: i64, url: String, label: String },
}

/// Reconcile the draft against the store
///
/// Order is strict: the record-body upsert always comes first and its
/// failure aborts everything, since without a valid inspection id any
/// uploaded photo would be orphaned. Photo slots are then processed in
/// draft order; each failure is collected and the walk continues, so a
/// lost photo never loses the rest of the form.
///
/// On success the draft is updated in place: the server id is recorded,
/// attached slots become `Persisted` (their previews released), and
/// updated labels drop their modified tag, so an immediate re-submit is a
/// plain record overwrite with no photo calls.
pub async fn submit<S, U>(
    draft: &mut InspectionDraft,
    store: &S,
    uploader: &U,
) -> Result<SubmitOutcome, SubmitError>
where
    S: StoreClient + ?Sized,
    U: ObjectUpload + ?Sized,
{
    if draft.address().trim().is_empty() {
        return Err(SubmitError::Validation);
    }

    // Step 1: upsert the record body
    let inspection_id = match draft.id() {
        Some(id) => {
            let req = UpdateInspectionRequest {
                address: draft.address().to_string(),
                notes: draft.notes().to_string(),
            };
            store
                .update_inspection(id, &req)
                .await
                .map_err(SubmitError::RecordWrite)?;
            id
        }
        None => {
            let req = CreateInspectionRequest {
                address: draft.address().to_string(),
                notes: draft.notes().to_string(),
            };
            let id = store
                .create_inspection(&req)
                .await
                .map_err(SubmitError::RecordWrite)?;
            draft.set_id(id);
            id
        }
    };
    info!(inspection_id, "record body written");

    // Step 2: photo slots in draft order, one at a time
    let mut failures = Vec::new();
    for index in 0..draft.slots().len() {
        let op = match &draft.slots()[index] {
            PhotoSlot::Persisted { .. } => None,
            PhotoSlot::PersistedModified { photo_id, url, label } => Some(PhotoOp::Update {
                photo_id: *photo_id,
                url: url.clone(),
                label: label.clone(),
            }),
            PhotoSlot::NewLocal { file, label, .. } => match uploader.upload(file).await {
                Ok(url) => Some(PhotoOp::Attach {
                    url,
                    label: label.clone(),
                }),
                Err(err) => {
                    warn!(index, error = %err, "photo upload failed");
                    failures.push(SlotFailure {
                        index,
                        label: label.clone(),
                        kind: SlotFailureKind::Upload,
                        message: err.to_string(),
                    });
                    None
                }
            },
        };

        match op {
            None => {}
            Some(PhotoOp::Attach { url, label }) => {
                let req = AttachPhotoRequest {
                    inspection_id,
                    label: label.clone(),
                    image_url: url.clone(),
                };
                match store.attach_photo(&req).await {
                    Ok(photo_id) => {
                        debug!(index, photo_id, "photo attached");
                        let slot = &mut draft.slots_mut()[index];
                        if let PhotoSlot::NewLocal { preview, .. } = slot {
                            preview.release();
                        }
                        *slot = PhotoSlot::Persisted { photo_id, url, label };
                    }
                    Err(err) => {
                        warn!(index, error = %err, "photo attach failed");
                        failures.push(SlotFailure {
                            index,
                            label,
                            kind: SlotFailureKind::Attach,
                            message: err.to_string(),
                        });
                    }
                }
            }
            Some(PhotoOp::Update { photo_id, url, label }) => {
                let req = UpdatePhotoRequest {
                    label: label.clone(),
                    url: url.clone(),
                };
                // A NotFound here (record deleted elsewhere) stays per-slot
                match store.update_photo(photo_id, &req).await {
                    Ok(()) => {
                        debug!(index, photo_id, "photo label updated");
                        draft.slots_mut()[index] = PhotoSlot::Persisted { photo_id, url, label };
                    }
                    Err(err) => {
                        warn!(index, error = %err, "photo update failed");
                        failures.push(SlotFailure {
                            index,
                            label,
                            kind: SlotFailureKind::Update,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }
    }

    if !failures.is_empty() {
        warn!(
            failed = failures.len(),
            total = draft.slots().len(),
            "submit finished with photo failures"
        );
    }

    Ok(SubmitOutcome {
        inspection_id,
        failures,
    })
}
