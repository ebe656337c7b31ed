//! Async helpers that drive the `begin_*`/`complete_*` pairs against a
//! [`RemoteStore`] with a request timeout.
//!
//! Native only: tokio's timer does not run on `wasm32-unknown-unknown`.
//! Browser hosts call the split API and time requests out themselves.

use std::future::Future;
use std::time::Duration;

use super::AnnotationEditor;
use crate::autosave::SaveOutcome;
use crate::error::EditorError;
use crate::model::ImageSize;
use crate::remote::{RemoteError, RemoteStore};

/// Run a remote request, turning a missing answer into an error.
async fn with_timeout<T>(
    timeout_ms: u64,
    request: impl Future<Output = Result<T, RemoteError>>,
) -> Result<T, RemoteError> {
    match tokio::time::timeout(Duration::from_millis(timeout_ms), request).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("Remote request timed out after {} ms", timeout_ms);
            Err(RemoteError::Timeout { ms: timeout_ms })
        }
    }
}

impl AnnotationEditor {
    /// Open an image and load its annotations from `store`.
    pub async fn open_image<S: RemoteStore>(
        &mut self,
        store: &S,
        image_id: &str,
        image_size: ImageSize,
    ) -> Result<(), EditorError> {
        let ticket = self.begin_load(image_id, image_size);
        let project_id = self.project_id.clone();
        let result = with_timeout(
            self.request_timeout_ms(),
            store.fetch_annotations(&project_id, image_id),
        )
        .await;
        self.complete_load(ticket, result).map(|_| ())
    }

    /// Run one auto-save against `store` if one is due.
    pub async fn run_autosave<S: RemoteStore>(&mut self, store: &S) -> Option<SaveOutcome> {
        let (ticket, payload) = self.begin_autosave()?;
        let project_id = self.project_id.clone();
        let image_id = self.image_id.clone()?;
        let result = with_timeout(
            self.request_timeout_ms(),
            store.autosave(&project_id, &image_id, &payload),
        )
        .await;
        Some(self.complete_autosave(ticket, result))
    }

    /// Save now and reload what the store kept.
    pub async fn save<S: RemoteStore>(&mut self, store: &S) -> Result<SaveOutcome, EditorError> {
        let (ticket, payload) = self.begin_save()?;
        let project_id = self.project_id.clone();
        let image_id = self.current_image_id()?;
        let timeout_ms = self.request_timeout_ms();

        let result = with_timeout(timeout_ms, store.save(&project_id, &image_id, &payload)).await;
        let outcome = self.complete_save(ticket, result)?;
        if outcome != SaveOutcome::Saved {
            return Ok(outcome);
        }

        let reload = self.begin_reload()?;
        let result = with_timeout(timeout_ms, store.fetch_annotations(&project_id, &image_id)).await;
        match self.complete_load(reload, result) {
            Ok(_) => {}
            // The save itself went through; keep the local set
            Err(e) => log::warn!("Reload after save failed: {}", e),
        }
        Ok(outcome)
    }

    /// Ask `store` for automatic annotations and apply them.
    pub async fn auto_annotate<S: RemoteStore>(&mut self, store: &S) -> Result<usize, EditorError> {
        let ticket = self.begin_auto_annotate()?;
        let project_id = self.project_id.clone();
        let result = with_timeout(
            self.request_timeout_ms(),
            store.auto_annotate(&project_id, ticket.image_id()),
        )
        .await;
        self.complete_auto_annotate(ticket, result)
    }
}
