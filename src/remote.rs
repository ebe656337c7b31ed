//! Contract with the remote annotation store, plus an in-memory store.
//!
//! The editor never talks to a backend directly. Hosts implement
//! [`RemoteStore`] over whatever transport they use; [`MemoryStore`] backs the
//! tests and the replay binary.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::NormalizedAnnotation;

/// Errors reported by a remote store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The backend answered with a failure status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never reached the backend
    #[error("Transport error: {0}")]
    Transport(String),

    /// No answer within the request timeout
    #[error("Request timed out after {ms} ms")]
    Timeout { ms: u64 },
}

impl RemoteError {
    /// Create an HTTP error with a status and message.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }
}

/// Annotations of one image as stored remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(default)]
    pub objects: Vec<NormalizedAnnotation>,
}

/// Body of a save or autosave request.
///
/// `class_ids` and `class_names` are parallel to `objects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub objects: Vec<NormalizedAnnotation>,
    pub class_ids: Vec<u32>,
    pub class_names: Vec<String>,
    pub time_spent_seconds: u64,
    pub auto_annotated: bool,
}

/// Operations the editor consumes from the backend.
pub trait RemoteStore {
    /// Load the saved annotations of an image.
    fn fetch_annotations(
        &self,
        project_id: &str,
        image_id: &str,
    ) -> impl Future<Output = Result<AnnotationDocument, RemoteError>>;

    /// Explicit save requested by the annotator.
    fn save(
        &self,
        project_id: &str,
        image_id: &str,
        payload: &SavePayload,
    ) -> impl Future<Output = Result<(), RemoteError>>;

    /// Background save. Same payload as [`RemoteStore::save`], best effort.
    fn autosave(
        &self,
        project_id: &str,
        image_id: &str,
        payload: &SavePayload,
    ) -> impl Future<Output = Result<(), RemoteError>>;

    /// Ask the backend to label the image automatically.
    fn auto_annotate(
        &self,
        project_id: &str,
        image_id: &str,
    ) -> impl Future<Output = Result<AnnotationDocument, RemoteError>>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Counters of calls made against a [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch: usize,
    pub save: usize,
    pub autosave: usize,
    pub auto_annotate: usize,
}

/// Single-threaded in-memory [`RemoteStore`].
///
/// Saved coordinates are rounded to four decimals the way a backend might
/// normalize them, so reload-after-save paths see a slightly different set.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RefCell<HashMap<(String, String), AnnotationDocument>>,
    suggestions: RefCell<HashMap<(String, String), AnnotationDocument>>,
    last_payload: RefCell<Option<SavePayload>>,
    calls: Cell<CallCounts>,
    failures_pending: Cell<u32>,
    hang: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the stored document of an image.
    pub fn insert(&self, project_id: &str, image_id: &str, document: AnnotationDocument) {
        self.documents
            .borrow_mut()
            .insert(key(project_id, image_id), document);
    }

    /// Set what `auto_annotate` returns for an image.
    pub fn set_suggestions(&self, project_id: &str, image_id: &str, document: AnnotationDocument) {
        self.suggestions
            .borrow_mut()
            .insert(key(project_id, image_id), document);
    }

    /// Make the next `count` requests fail with a server error.
    pub fn fail_next(&self, count: u32) {
        self.failures_pending.set(count);
    }

    /// Make every request hang forever (until turned off again).
    pub fn set_hang(&self, hang: bool) {
        self.hang.set(hang);
    }

    /// Stored document of an image, if any.
    pub fn document(&self, project_id: &str, image_id: &str) -> Option<AnnotationDocument> {
        self.documents
            .borrow()
            .get(&key(project_id, image_id))
            .cloned()
    }

    /// Body of the most recent successful save or autosave.
    pub fn last_payload(&self) -> Option<SavePayload> {
        self.last_payload.borrow().clone()
    }

    pub fn calls(&self) -> CallCounts {
        self.calls.get()
    }

    async fn respond(&self) -> Result<(), RemoteError> {
        if self.hang.get() {
            std::future::pending::<()>().await;
        }
        let pending = self.failures_pending.get();
        if pending > 0 {
            self.failures_pending.set(pending - 1);
            return Err(RemoteError::http(500, "injected failure"));
        }
        Ok(())
    }

    fn count(&self, update: impl FnOnce(&mut CallCounts)) {
        let mut calls = self.calls.get();
        update(&mut calls);
        self.calls.set(calls);
    }

    fn store(&self, project_id: &str, image_id: &str, payload: &SavePayload) {
        let objects = payload.objects.iter().map(round_for_storage).collect();
        self.insert(project_id, image_id, AnnotationDocument { objects });
        *self.last_payload.borrow_mut() = Some(payload.clone());
    }
}

impl RemoteStore for MemoryStore {
    async fn fetch_annotations(
        &self,
        project_id: &str,
        image_id: &str,
    ) -> Result<AnnotationDocument, RemoteError> {
        self.count(|c| c.fetch += 1);
        self.respond().await?;
        Ok(self.document(project_id, image_id).unwrap_or_default())
    }

    async fn save(
        &self,
        project_id: &str,
        image_id: &str,
        payload: &SavePayload,
    ) -> Result<(), RemoteError> {
        self.count(|c| c.save += 1);
        self.respond().await?;
        self.store(project_id, image_id, payload);
        Ok(())
    }

    async fn autosave(
        &self,
        project_id: &str,
        image_id: &str,
        payload: &SavePayload,
    ) -> Result<(), RemoteError> {
        self.count(|c| c.autosave += 1);
        self.respond().await?;
        self.store(project_id, image_id, payload);
        Ok(())
    }

    async fn auto_annotate(
        &self,
        project_id: &str,
        image_id: &str,
    ) -> Result<AnnotationDocument, RemoteError> {
        self.count(|c| c.auto_annotate += 1);
        self.respond().await?;
        Ok(self
            .suggestions
            .borrow()
            .get(&key(project_id, image_id))
            .cloned()
            .unwrap_or_default())
    }
}

fn key(project_id: &str, image_id: &str) -> (String, String) {
    (project_id.to_string(), image_id.to_string())
}

fn round_for_storage(object: &NormalizedAnnotation) -> NormalizedAnnotation {
    let round = |v: f32| (v * 10_000.0).round() / 10_000.0;
    NormalizedAnnotation {
        x: round(object.x),
        y: round(object.y),
        width: round(object.width),
        height: round(object.height),
        ..object.clone()
    }
}
