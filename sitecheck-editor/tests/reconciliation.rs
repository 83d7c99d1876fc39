// sitecheck-editor/tests/reconciliation.rs
// Reconciliation engine and editor session tests against in-memory clients

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use shared::client::{
    AttachPhotoRequest, CreateInspectionRequest, UpdateInspectionRequest, UpdatePhotoRequest,
};
use shared::{InspectionRecord, PhotoRecord};
use sitecheck_client::{ClientError, ClientResult, ObjectUpload, RawFile, StoreClient, UploadError};
use sitecheck_editor::{
    Editor, EditorError, InspectionDraft, PhotoSlot, SlotFailureKind, SubmitError, submit,
};

// ---------------------------------------------------------------------------
// In-memory test doubles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum StoreCall {
    Create { address: String, notes: String },
    Update { id: i64, address: String, notes: String },
    Fetch { id: i64 },
    Attach { inspection_id: i64, label: String, url: String },
    UpdatePhoto { photo_id: i64, label: String, url: String },
    DeletePhoto { photo_id: i64 },
}

#[derive(Default)]
struct MockStore {
    calls: Mutex<Vec<StoreCall>>,
    record: Option<InspectionRecord>,
    next_photo_id: AtomicI64,
    fail_create: bool,
    fail_update: bool,
    fail_attach: bool,
    fail_update_photo: bool,
    fail_delete_photo: bool,
}

impl MockStore {
    fn new() -> Self {
        Self {
            next_photo_id: AtomicI64::new(500),
            ..Self::default()
        }
    }

    fn with_record(record: InspectionRecord) -> Self {
        Self {
            record: Some(record),
            ..Self::new()
        }
    }

    fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record_call(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StoreClient for MockStore {
    async fn create_inspection(&self, req: &CreateInspectionRequest) -> ClientResult<i64> {
        self.record_call(StoreCall::Create {
            address: req.address.clone(),
            notes: req.notes.clone(),
        });
        if self.fail_create {
            return Err(ClientError::Internal("injected create failure".into()));
        }
        Ok(100)
    }

    async fn update_inspection(&self, id: i64, req: &UpdateInspectionRequest) -> ClientResult<()> {
        self.record_call(StoreCall::Update {
            id,
            address: req.address.clone(),
            notes: req.notes.clone(),
        });
        if self.fail_update {
            return Err(ClientError::Internal("injected update failure".into()));
        }
        Ok(())
    }

    async fn fetch_inspection(&self, id: i64) -> ClientResult<InspectionRecord> {
        self.record_call(StoreCall::Fetch { id });
        self.record
            .clone()
            .ok_or_else(|| ClientError::NotFound("Inspection not found".into()))
    }

    async fn delete_inspection(&self, _id: i64) -> ClientResult<()> {
        Ok(())
    }

    async fn list_inspections(&self) -> ClientResult<Vec<InspectionRecord>> {
        Ok(self.record.clone().into_iter().collect())
    }

    async fn attach_photo(&self, req: &AttachPhotoRequest) -> ClientResult<i64> {
        self.record_call(StoreCall::Attach {
            inspection_id: req.inspection_id,
            label: req.label.clone(),
            url: req.image_url.clone(),
        });
        if self.fail_attach {
            return Err(ClientError::Internal("injected attach failure".into()));
        }
        Ok(self.next_photo_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn update_photo(&self, photo_id: i64, req: &UpdatePhotoRequest) -> ClientResult<()> {
        self.record_call(StoreCall::UpdatePhoto {
            photo_id,
            label: req.label.clone(),
            url: req.url.clone(),
        });
        if self.fail_update_photo {
            return Err(ClientError::NotFound("Photo not found".into()));
        }
        Ok(())
    }

    async fn delete_photo(&self, photo_id: i64) -> ClientResult<()> {
        self.record_call(StoreCall::DeletePhoto { photo_id });
        if self.fail_delete_photo {
            return Err(ClientError::Internal("injected delete failure".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct MockUploader {
    uploads: AtomicUsize,
    // 1-based call number that fails; 0 never fails
    fail_on_call: usize,
}

impl MockUploader {
    fn new() -> Self {
        Self::default()
    }

    fn failing_on(call: usize) -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            fail_on_call: call,
        }
    }

    fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectUpload for MockUploader {
    async fn upload(&self, file: &RawFile) -> Result<String, UploadError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on_call {
            return Err(UploadError::Rejected("injected upload failure".into()));
        }
        Ok(format!("https://cdn.example/{}", file.file_name))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn image_file(name: &str) -> RawFile {
    RawFile {
        file_name: name.to_string(),
        mime: "image/jpeg".to_string(),
        bytes: vec![0xff, 0xd8, 0xff, 0xe0],
    }
}

fn persisted_record() -> InspectionRecord {
    InspectionRecord {
        id: 42,
        address: "9 Acacia Ave".to_string(),
        notes: "gutter loose".to_string(),
        photos: vec![
            PhotoRecord {
                id: 201,
                url: "https://cdn.example/a.jpg".to_string(),
                label: "front".to_string(),
            },
            PhotoRecord {
                id: 202,
                url: "https://cdn.example/b.jpg".to_string(),
                label: "rear".to_string(),
            },
        ],
    }
}

// ---------------------------------------------------------------------------
// Engine: validation and ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_address_fails_validation_with_zero_network_calls() {
    let store = MockStore::new();
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::new();
    draft.add_files([image_file("a.jpg")]);

    let result = submit(&mut draft, &store, &uploader).await;

    assert!(matches!(result, Err(SubmitError::Validation)));
    assert!(store.calls().is_empty());
    assert_eq!(uploader.upload_count(), 0);
}

#[tokio::test]
async fn record_upsert_always_precedes_photo_operations() {
    let store = MockStore::new();
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::new();
    draft.set_address("1 Main St");
    draft.add_files([image_file("a.jpg"), image_file("b.jpg")]);

    submit(&mut draft, &store, &uploader).await.unwrap();

    let calls = store.calls();
    assert!(matches!(calls[0], StoreCall::Create { .. }));
    assert!(
        calls[1..]
            .iter()
            .all(|c| matches!(c, StoreCall::Attach { .. }))
    );
}

#[tokio::test]
async fn record_write_failure_aborts_before_any_photo_work() {
    let store = MockStore {
        fail_create: true,
        ..MockStore::new()
    };
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::new();
    draft.set_address("1 Main St");
    draft.add_files([image_file("a.jpg")]);

    let result = submit(&mut draft, &store, &uploader).await;

    assert!(matches!(result, Err(SubmitError::RecordWrite(_))));
    assert_eq!(store.calls().len(), 1);
    assert_eq!(uploader.upload_count(), 0);
    // no id was assigned, the draft is still create-mode
    assert!(draft.id().is_none());
}

// ---------------------------------------------------------------------------
// Engine: partial failure policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_failure_on_one_slot_spares_the_others() {
    let store = MockStore::new();
    let uploader = MockUploader::failing_on(2);
    let mut draft = InspectionDraft::new();
    draft.set_address("1 Main St");
    draft.add_files([image_file("a.jpg"), image_file("b.jpg"), image_file("c.jpg")]);

    let outcome = submit(&mut draft, &store, &uploader).await.unwrap();

    assert_eq!(outcome.inspection_id, 100);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 1);
    assert_eq!(outcome.failures[0].kind, SlotFailureKind::Upload);

    // slots 1 and 3 were attached, in order
    let attached: Vec<_> = store
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            StoreCall::Attach { url, .. } => Some(url),
            _ => None,
        })
        .collect();
    assert_eq!(
        attached,
        vec!["https://cdn.example/a.jpg", "https://cdn.example/c.jpg"]
    );

    // the failed slot stays local for a later retry; the others persisted
    assert!(matches!(draft.slots()[0], PhotoSlot::Persisted { .. }));
    assert!(matches!(draft.slots()[1], PhotoSlot::NewLocal { .. }));
    assert!(matches!(draft.slots()[2], PhotoSlot::Persisted { .. }));
}

#[tokio::test]
async fn attach_failure_is_collected_not_fatal() {
    let store = MockStore {
        fail_attach: true,
        ..MockStore::new()
    };
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::new();
    draft.set_address("1 Main St");
    draft.add_files([image_file("a.jpg"), image_file("b.jpg")]);

    let outcome = submit(&mut draft, &store, &uploader).await.unwrap();

    assert_eq!(outcome.failures.len(), 2);
    assert!(
        outcome
            .failures
            .iter()
            .all(|f| f.kind == SlotFailureKind::Attach)
    );
    // both uploads still ran; a failed attach does not stop the walk
    assert_eq!(uploader.upload_count(), 2);
}

#[tokio::test]
async fn not_found_during_photo_update_is_per_slot() {
    let store = MockStore {
        fail_update_photo: true,
        ..MockStore::with_record(persisted_record())
    };
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::from_record(persisted_record());
    draft.set_label(0, "front door").unwrap();

    let outcome = submit(&mut draft, &store, &uploader).await.unwrap();

    assert_eq!(outcome.inspection_id, 42);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].kind, SlotFailureKind::Update);
    // the slot keeps its modified tag so the user can retry
    assert!(matches!(
        draft.slots()[0],
        PhotoSlot::PersistedModified { .. }
    ));
}

// ---------------------------------------------------------------------------
// Engine: edit-mode flows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn label_only_edits_issue_exactly_the_photo_updates() {
    let store = MockStore::with_record(persisted_record());
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::from_record(persisted_record());
    draft.set_label(0, "front door").unwrap();
    draft.set_label(1, "back garden").unwrap();

    let outcome = submit(&mut draft, &store, &uploader).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(uploader.upload_count(), 0);

    let calls = store.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(calls[0], StoreCall::Update { id: 42, .. }));
    assert_eq!(
        calls[1],
        StoreCall::UpdatePhoto {
            photo_id: 201,
            label: "front door".into(),
            url: "https://cdn.example/a.jpg".into(),
        }
    );
    assert_eq!(
        calls[2],
        StoreCall::UpdatePhoto {
            photo_id: 202,
            label: "back garden".into(),
            url: "https://cdn.example/b.jpg".into(),
        }
    );
}

#[tokio::test]
async fn untouched_persisted_slots_are_skipped() {
    let store = MockStore::with_record(persisted_record());
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::from_record(persisted_record());

    let outcome = submit(&mut draft, &store, &uploader).await.unwrap();

    assert!(outcome.is_complete());
    assert_eq!(store.calls().len(), 1);
    assert!(matches!(store.calls()[0], StoreCall::Update { id: 42, .. }));
}

#[tokio::test]
async fn resubmitting_an_unchanged_draft_is_an_idempotent_overwrite() {
    let store = MockStore::with_record(persisted_record());
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::from_record(persisted_record());

    submit(&mut draft, &store, &uploader).await.unwrap();
    submit(&mut draft, &store, &uploader).await.unwrap();

    let calls = store.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(uploader.upload_count(), 0);
}

#[tokio::test]
async fn successful_submit_promotes_slots_so_resubmit_is_quiet() {
    let store = MockStore::with_record(persisted_record());
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::from_record(persisted_record());
    draft.set_label(0, "front door").unwrap();
    draft.add_files([image_file("c.jpg")]);

    let first = submit(&mut draft, &store, &uploader).await.unwrap();
    assert!(first.is_complete());
    assert!(
        draft
            .slots()
            .iter()
            .all(|s| matches!(s, PhotoSlot::Persisted { .. }))
    );

    let second = submit(&mut draft, &store, &uploader).await.unwrap();
    assert!(second.is_complete());

    // second pass: record overwrite only
    let calls = store.calls();
    assert!(matches!(calls.last().unwrap(), StoreCall::Update { .. }));
    assert_eq!(uploader.upload_count(), 1);
}

// ---------------------------------------------------------------------------
// Engine: create-mode round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_round_trip_assigns_id_and_attaches_photo() {
    let store = MockStore::new();
    let uploader = MockUploader::new();
    let mut draft = InspectionDraft::new();
    draft.set_address("1 Main St");
    draft.set_notes("first visit");
    draft.add_files([image_file("a.jpg")]);

    let outcome = submit(&mut draft, &store, &uploader).await.unwrap();

    assert_eq!(outcome.inspection_id, 100);
    assert!(outcome.is_complete());
    assert_eq!(draft.id(), Some(100));

    let calls = store.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        StoreCall::Create {
            address: "1 Main St".into(),
            notes: "first visit".into(),
        }
    );
    assert_eq!(
        calls[1],
        StoreCall::Attach {
            inspection_id: 100,
            label: String::new(),
            url: "https://cdn.example/a.jpg".into(),
        }
    );

    // the new slot now carries the server-issued photo id
    assert_eq!(draft.slots()[0].photo_id(), Some(500));
}

// ---------------------------------------------------------------------------
// Editor: eager deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn removing_a_persisted_photo_deletes_it_immediately() {
    let store = MockStore::with_record(persisted_record());
    let mut editor = Editor::new(&store, MockUploader::new());
    editor.load(42).await.unwrap();

    editor.remove_photo(0).await.unwrap();

    assert_eq!(editor.draft().slots().len(), 1);
    assert_eq!(editor.draft().slots()[0].photo_id(), Some(202));

    // exactly one delete, issued before any submit
    let deletes: Vec<_> = store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::DeletePhoto { .. }))
        .collect();
    assert_eq!(deletes, vec![StoreCall::DeletePhoto { photo_id: 201 }]);
}

#[tokio::test]
async fn eager_delete_failure_restores_the_slot_unchanged() {
    let store = MockStore {
        fail_delete_photo: true,
        ..MockStore::with_record(persisted_record())
    };
    let mut editor = Editor::new(store, MockUploader::new());
    editor.load(42).await.unwrap();

    let err = editor.remove_photo(0).await.unwrap_err();

    assert!(matches!(err, EditorError::Delete(_)));
    assert_eq!(editor.draft().slots().len(), 2);
    assert_eq!(editor.draft().slots()[0].photo_id(), Some(201));
    assert_eq!(editor.draft().slots()[0].label(), "front");
}

#[tokio::test]
async fn removing_a_new_local_slot_makes_no_network_call_and_releases_preview() {
    let store = MockStore::new();
    let mut editor = Editor::new(&store, MockUploader::new());
    editor.add_files(vec![image_file("a.jpg")]).unwrap();

    let watch = match &editor.draft().slots()[0] {
        PhotoSlot::NewLocal { preview, .. } => preview.watch(),
        other => panic!("expected NewLocal, got {:?}", other),
    };

    editor.remove_photo(0).await.unwrap();

    assert!(editor.draft().slots().is_empty());
    assert!(watch.is_released());
    assert!(store.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Editor: session behavior
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_image_batch_is_rejected_whole() {
    let store = MockStore::new();
    let mut editor = Editor::new(store, MockUploader::new());

    let pdf = RawFile {
        file_name: "report.pdf".to_string(),
        mime: "application/pdf".to_string(),
        bytes: vec![],
    };
    let err = editor
        .add_files(vec![image_file("a.jpg"), pdf])
        .unwrap_err();

    assert!(matches!(err, EditorError::NotAnImage(name) if name == "report.pdf"));
    assert!(editor.draft().slots().is_empty());
}

#[tokio::test]
async fn failed_load_blocks_submit_until_retried() {
    let store = MockStore::new(); // no record to serve
    let mut editor = Editor::new(store, MockUploader::new());

    assert!(matches!(editor.load(42).await, Err(EditorError::Load(_))));
    assert!(matches!(
        editor.submit().await,
        Err(SubmitError::NotLoaded)
    ));
}

#[tokio::test]
async fn dropping_the_editor_releases_outstanding_previews() {
    let store = MockStore::new();
    let mut editor = Editor::new(store, MockUploader::new());
    editor.add_files(vec![image_file("a.jpg")]).unwrap();

    let watch = match &editor.draft().slots()[0] {
        PhotoSlot::NewLocal { preview, .. } => preview.watch(),
        other => panic!("expected NewLocal, got {:?}", other),
    };

    drop(editor);
    assert!(watch.is_released());
}

#[tokio::test]
async fn editor_submit_runs_the_full_flow() {
    let store = MockStore::new();
    let mut editor = Editor::new(store, MockUploader::new());
    editor.set_address("1 Main St");
    editor.set_notes("first visit");
    editor.add_files(vec![image_file("a.jpg")]).unwrap();
    editor.set_label(0, "porch").unwrap();

    let outcome = editor.submit().await.unwrap();

    assert_eq!(outcome.inspection_id, 100);
    assert!(outcome.is_complete());
    assert!(!editor.is_submitting());
    assert_eq!(editor.draft().id(), Some(100));
}
