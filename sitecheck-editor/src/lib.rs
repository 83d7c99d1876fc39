//! Sitecheck Editor - draft model and reconciliation engine
//!
//! The editor holds an in-memory [`InspectionDraft`] of one inspection
//! being authored or edited: address, notes, and an ordered collection of
//! photo slots that may be newly picked on disk, already persisted, or
//! persisted with a locally edited label. On submit, the reconciliation
//! engine converges server state to the draft through a strictly ordered
//! sequence of store and upload calls.
//!
//! Mutation rules the whole crate is built around:
//! - additions and label edits are staged locally and committed on submit;
//! - removal of an already-persisted photo is committed eagerly, the
//!   moment the user removes it, independent of the submit that may or
//!   may not follow.

pub mod draft;
pub mod editor;
pub mod load;
pub mod preview;
pub mod submit;

pub use draft::{DraftError, InspectionDraft, PhotoSlot, RemovalEffect};
pub use editor::{Editor, EditorError};
pub use load::load;
pub use preview::{PreviewHandle, PreviewWatch};
pub use submit::{SlotFailure, SlotFailureKind, SubmitError, SubmitOutcome, submit};

// Re-exports for callers wiring up an editor
pub use sitecheck_client::{ClientConfig, ObjectUpload, RawFile, StoreClient};
