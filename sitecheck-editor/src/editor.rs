//! Editor session facade
//!
//! Owns the draft for exactly one editing session and wires user actions
//! to the draft model, the eager-delete path, and the reconciliation
//! engine. Dropping the editor drops the draft, which releases every
//! outstanding preview.

use sitecheck_client::{ClientError, ObjectUpload, RawFile, StoreClient};
use thiserror::Error;
use tracing::warn;

use crate::draft::{DraftError, InspectionDraft, RemovalEffect};
use crate::submit::{SubmitError, SubmitOutcome};

/// Editor-level error
#[derive(Debug, Error)]
pub enum EditorError {
    /// A picked file is not an image; the whole batch is rejected
    #[error("not an image file: {0}")]
    NotAnImage(String),

    /// Draft operation failed
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// Edit-mode load failed; the draft stays uninitialized
    #[error("failed to load inspection: {0}")]
    Load(#[source] ClientError),

    /// Eager photo delete failed; the slot was restored unchanged
    #[error("failed to delete photo: {0}")]
    Delete(#[source] ClientError),
}

/// One editing session over one draft
pub struct Editor<S, U> {
    draft: InspectionDraft,
    store: S,
    uploader: U,
    loaded: bool,
    submitting: bool,
}

impl<S, U> Editor<S, U>
where
    S: StoreClient,
    U: ObjectUpload,
{
    /// Open in create mode with an empty draft
    pub fn new(store: S, uploader: U) -> Self {
        Self {
            draft: InspectionDraft::new(),
            store,
            uploader,
            loaded: true,
            submitting: false,
        }
    }

    /// Load an existing record for editing
    ///
    /// Until this succeeds the editor refuses to submit; a failed load may
    /// simply be retried. The previous draft is dropped on success,
    /// releasing any previews it held.
    pub async fn load(&mut self, id: i64) -> Result<(), EditorError> {
        self.loaded = false;
        let draft = crate::load::load(&self.store, Some(id))
            .await
            .map_err(EditorError::Load)?;
        self.draft = draft;
        self.loaded = true;
        Ok(())
    }

    /// The draft as currently displayed
    pub fn draft(&self) -> &InspectionDraft {
        &self.draft
    }

    /// Whether a submit is currently in flight
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.draft.set_address(address);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.set_notes(notes);
    }

    pub fn set_label(&mut self, index: usize, label: impl Into<String>) -> Result<(), EditorError> {
        self.draft.set_label(index, label)?;
        Ok(())
    }

    /// Stage picked files as new photo slots
    ///
    /// The whole batch is rejected if any file is not an image, so a
    /// misfired multi-pick never half-applies.
    pub fn add_files(&mut self, files: Vec<RawFile>) -> Result<(), EditorError> {
        if let Some(file) = files.iter().find(|f| !f.is_image()) {
            return Err(EditorError::NotAnImage(file.file_name.clone()));
        }
        self.draft.add_files(files);
        Ok(())
    }

    /// Remove the photo at `index`
    ///
    /// Persisted photos are deleted server-side immediately: removal is
    /// committed eagerly, unlike additions and label edits which wait for
    /// submit. The removal is all-or-nothing against the visible draft:
    /// on delete failure the slot is restored unchanged at its index.
    /// Removing a never-uploaded slot makes no network call; its preview
    /// is released when the slot drops.
    pub async fn remove_photo(&mut self, index: usize) -> Result<(), EditorError> {
        let (slot, effect) = self.draft.remove_slot(index)?;

        if let RemovalEffect::DeletePersisted { photo_id } = effect {
            if let Err(err) = self.store.delete_photo(photo_id).await {
                warn!(photo_id, error = %err, "eager delete failed, restoring slot");
                self.draft.restore_slot(index, slot);
                return Err(EditorError::Delete(err));
            }
        }

        Ok(())
    }

    /// Submit the draft, converging server state to it
    ///
    /// Returns the record id plus any per-slot photo failures. The
    /// in-flight flag mirrors the disabled submit button: `&mut self`
    /// already rules out a second overlapping call from safe Rust, but
    /// UI and FFI wrappers that poll `is_submitting` across re-borrows
    /// (or park this future and re-enter) get `InFlight` instead of a
    /// second round of network calls.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        if !self.loaded {
            return Err(SubmitError::NotLoaded);
        }
        if self.submitting {
            return Err(SubmitError::InFlight);
        }

        // reset on every exit path, including a dropped (abandoned) future
        let _guard = InFlightGuard::arm(&mut self.submitting);
        crate::submit::submit(&mut self.draft, &self.store, &self.uploader).await
    }
}

struct InFlightGuard<'a>(&'a mut bool);

impl<'a> InFlightGuard<'a> {
    fn arm(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
