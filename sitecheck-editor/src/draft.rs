//! Draft model for one inspection being edited
//!
//! Pure state: no network I/O originates here. Every operation mutates the
//! owned draft and, where a removal touches server state, hands the caller
//! a side-effect descriptor to act on.

use shared::InspectionRecord;
use sitecheck_client::RawFile;
use thiserror::Error;

use crate::preview::PreviewHandle;

/// Draft operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// Photo slot index out of range
    #[error("photo slot index {0} out of range")]
    IndexOutOfRange(usize),
}

/// One photo entry in a draft, tagged by its persistence state
///
/// A sum type by design: a slot can never hold both a raw file and a
/// server photo id.
#[derive(Debug)]
pub enum PhotoSlot {
    /// Picked on disk, not yet uploaded or saved
    NewLocal {
        preview: PreviewHandle,
        file: RawFile,
        label: String,
    },
    /// Saved on the server, unchanged since load
    Persisted {
        photo_id: i64,
        url: String,
        label: String,
    },
    /// Saved on the server, label edited locally since load
    PersistedModified {
        photo_id: i64,
        url: String,
        label: String,
    },
}

impl PhotoSlot {
    /// Current label text
    pub fn label(&self) -> &str {
        match self {
            PhotoSlot::NewLocal { label, .. }
            | PhotoSlot::Persisted { label, .. }
            | PhotoSlot::PersistedModified { label, .. } => label,
        }
    }

    /// Server-assigned photo id, if the slot originated from the server
    pub fn photo_id(&self) -> Option<i64> {
        match self {
            PhotoSlot::NewLocal { .. } => None,
            PhotoSlot::Persisted { photo_id, .. }
            | PhotoSlot::PersistedModified { photo_id, .. } => Some(*photo_id),
        }
    }

    /// Replace the label, promoting `Persisted` to `PersistedModified`
    fn apply_label(&mut self, new_label: String) {
        match self {
            PhotoSlot::NewLocal { label, .. } => *label = new_label,
            PhotoSlot::PersistedModified { label, .. } => *label = new_label,
            PhotoSlot::Persisted { photo_id, url, .. } => {
                let photo_id = *photo_id;
                let url = std::mem::take(url);
                *self = PhotoSlot::PersistedModified {
                    photo_id,
                    url,
                    label: new_label,
                };
            }
        }
    }
}

/// Side effect owed by the caller after a slot removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalEffect {
    /// Nothing to do server-side
    None,
    /// The removed slot was persisted; its photo must be deleted eagerly
    DeletePersisted { photo_id: i64 },
}

/// In-memory representation of the inspection being edited
#[derive(Debug, Default)]
pub struct InspectionDraft {
    id: Option<i64>,
    address: String,
    notes: String,
    slots: Vec<PhotoSlot>,
}

impl InspectionDraft {
    /// Empty draft for create mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft initialized from a fetched record (edit mode)
    ///
    /// Address and notes are copied verbatim; each server photo becomes a
    /// `Persisted` slot in server-returned order.
    pub fn from_record(record: InspectionRecord) -> Self {
        let slots = record
            .photos
            .into_iter()
            .map(|p| PhotoSlot::Persisted {
                photo_id: p.id,
                url: p.url,
                label: p.label,
            })
            .collect();

        Self {
            id: Some(record.id),
            address: record.address,
            notes: record.notes,
            slots,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn slots(&self) -> &[PhotoSlot] {
        &self.slots
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Append one `NewLocal` slot per picked file, in pick order
    ///
    /// Labels start empty; a preview is generated per file. Callers are
    /// expected to have validated that the files are images.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = RawFile>) {
        for file in files {
            let preview = PreviewHandle::generate(&file.bytes);
            self.slots.push(PhotoSlot::NewLocal {
                preview,
                file,
                label: String::new(),
            });
        }
    }

    /// Replace the label at `index`
    ///
    /// A `Persisted` slot is promoted to `PersistedModified` so submit
    /// knows it owes a write; other variants keep their tag.
    pub fn set_label(
        &mut self,
        index: usize,
        label: impl Into<String>,
    ) -> Result<(), DraftError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(DraftError::IndexOutOfRange(index))?;
        slot.apply_label(label.into());
        Ok(())
    }

    /// Remove the slot at `index`
    ///
    /// Returns the removed slot (the caller may need to restore it if an
    /// eager delete fails) together with the side effect owed:
    /// `DeletePersisted` when the slot carried a server photo id.
    pub fn remove_slot(&mut self, index: usize) -> Result<(PhotoSlot, RemovalEffect), DraftError> {
        if index >= self.slots.len() {
            return Err(DraftError::IndexOutOfRange(index));
        }
        let slot = self.slots.remove(index);
        let effect = match slot.photo_id() {
            Some(photo_id) => RemovalEffect::DeletePersisted { photo_id },
            None => RemovalEffect::None,
        };
        Ok((slot, effect))
    }

    /// Put a removed slot back at its old index (eager-delete rollback)
    pub fn restore_slot(&mut self, index: usize, slot: PhotoSlot) {
        let index = index.min(self.slots.len());
        self.slots.insert(index, slot);
    }

    pub(crate) fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub(crate) fn slots_mut(&mut self) -> &mut Vec<PhotoSlot> {
        &mut self.slots
    }
}
