//! Remote work of the editor: loading, saving and auto-annotation.
//!
//! Each operation is split into `begin_*` (claims a ticket, builds the
//! request) and `complete_*` (applies the response) so a host can keep
//! feeding events while a request is outstanding.

use web_time::Instant;

use super::{AnnotationEditor, EditOrigin};
use crate::autosave::{self, SaveOutcome, SaveTicket};
use crate::error::EditorError;
use crate::message::Notice;
use crate::model::{Annotation, IdAllocator, ImageSize, derive_annotation_id};
use crate::remote::{AnnotationDocument, RemoteError, SavePayload};
use crate::transform::{to_normalized_form, to_screen_form};

/// Claim on a pending load, reload or auto-annotate response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    image_id: String,
    /// Reloads only apply if the live set still has this digest
    expected_digest: Option<String>,
}

impl LoadTicket {
    pub fn image_id(&self) -> &str {
        &self.image_id
    }
}

impl AnnotationEditor {
    pub(super) fn request_timeout_ms(&self) -> u64 {
        self.config.autosave.request_timeout_ms
    }

    pub(super) fn current_image_id(&self) -> Result<String, EditorError> {
        self.image_id.clone().ok_or(EditorError::NoImage)
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.mounted
            && ticket.generation == self.autosave.generation()
            && self.image_id.as_deref() == Some(ticket.image_id.as_str())
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Switch to another image and start loading its annotations.
    ///
    /// Everything belonging to the previous image is dropped, including
    /// selection and history; responses for it will be discarded.
    pub fn begin_load(&mut self, image_id: &str, image_size: ImageSize) -> LoadTicket {
        self.interaction.cancel();
        self.autosave.invalidate();

        self.mounted = true;
        self.loaded = false;
        self.image_id = Some(image_id.to_string());
        self.annotations = Vec::new();
        self.selected = None;
        self.history.reset(Vec::new());
        self.ids = IdAllocator::new();
        self.auto_annotated = false;
        self.opened_at = Some(Instant::now());
        self.draw_mode = false;
        self.hover = None;
        self.viewport.set_image(image_size);

        log::info!("Opening image {} ({}x{})", image_id, image_size.width, image_size.height);
        LoadTicket {
            generation: self.autosave.generation(),
            image_id: image_id.to_string(),
            expected_digest: None,
        }
    }

    /// Apply the response to [`begin_load`](Self::begin_load) or a reload.
    ///
    /// Returns `Ok(false)` when the response was stale and discarded.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<AnnotationDocument, RemoteError>,
    ) -> Result<bool, EditorError> {
        if !self.is_current(&ticket) {
            log::debug!("Discarding stale load for {}", ticket.image_id);
            return Ok(false);
        }

        let document = match result {
            Ok(document) => document,
            Err(e) => {
                log::warn!("Failed to load annotations for {}: {}", ticket.image_id, e);
                self.notices.push(Notice::LoadFailed {
                    message: e.to_string(),
                });
                return Err(e.into());
            }
        };

        let superseded = ticket
            .expected_digest
            .as_ref()
            .is_some_and(|expected| autosave::digest(&self.annotations) != *expected);
        if superseded {
            log::debug!("Set changed during reload, keeping local edits");
            return Ok(false);
        }

        let set = self.document_to_set(&document, &ticket.image_id, None);
        log::info!("Loaded {} annotations for {}", set.len(), ticket.image_id);
        self.loaded = true;
        if ticket.expected_digest.is_none() {
            self.apply(set, EditOrigin::Remote);
            return Ok(true);
        }

        // Ids are re-derived on reload; keep the selection on the same box
        let selected_index = self
            .selected
            .as_ref()
            .and_then(|id| self.annotations.iter().position(|a| &a.id == id));
        let same_order = set.len() == self.annotations.len();
        self.apply(set, EditOrigin::Reload);
        if same_order {
            self.selected = selected_index
                .and_then(|index| self.annotations.get(index))
                .map(|a| a.id.clone());
        }
        Ok(true)
    }

    /// Convert a stored document into image-pixel annotations with stable ids.
    fn document_to_set(
        &self,
        document: &AnnotationDocument,
        image_id: &str,
        id_prefix: Option<&str>,
    ) -> Vec<Annotation> {
        let image = self.viewport.image();
        document
            .objects
            .iter()
            .enumerate()
            .map(|(index, object)| {
                let mut object = object.clone();
                if object.class_name.is_empty() {
                    object.class_name = object
                        .class_id
                        .and_then(|id| self.catalog.name_of(id))
                        .unwrap_or_default()
                        .to_string();
                }
                let class_id = object
                    .class_id
                    .or_else(|| self.catalog.id_of(&object.class_name));

                let annotation = to_screen_form(String::new(), &object, image);
                let center = annotation.rect().center();
                Annotation {
                    id: derive_annotation_id(id_prefix, image_id, class_id, index, center),
                    ..annotation
                }
            })
            .collect()
    }

    // ========================================================================
    // Saving
    // ========================================================================

    /// Request body for the current set.
    pub fn build_payload(&self) -> Result<SavePayload, EditorError> {
        let image = self.viewport.image();
        if self.image_id.is_none() || !image.is_loaded() {
            return Err(EditorError::NoImage);
        }

        let mut payload = SavePayload {
            time_spent_seconds: self.opened_at.map_or(0, |t| t.elapsed().as_secs()),
            auto_annotated: self.auto_annotated,
            ..SavePayload::default()
        };
        for annotation in &self.annotations {
            if !annotation.is_classified() {
                return Err(EditorError::unclassified(&annotation.id));
            }
            let class_id = self
                .catalog
                .id_of(&annotation.class)
                .ok_or_else(|| EditorError::UnknownClass {
                    name: annotation.class.clone(),
                })?;
            payload
                .objects
                .push(to_normalized_form(annotation, image, &self.catalog));
            payload.class_ids.push(class_id);
            payload.class_names.push(annotation.class.clone());
        }
        Ok(payload)
    }

    /// Whether the host's save loop should run an auto-save now.
    pub fn autosave_due(&self) -> bool {
        self.accepts_input() && self.interaction.is_idle() && self.autosave.is_due()
    }

    /// Start a background save if one is due.
    pub fn begin_autosave(&mut self) -> Option<(SaveTicket, SavePayload)> {
        if !self.autosave_due() {
            return None;
        }
        let ticket = self.autosave.begin(&self.annotations)?;
        match self.build_payload() {
            Ok(payload) => Some((ticket, payload)),
            Err(e) => {
                // Counts as a failed attempt so the retry cap still applies
                self.complete_autosave(ticket, Err(RemoteError::Transport(e.to_string())));
                None
            }
        }
    }

    /// Apply the result of a background save.
    pub fn complete_autosave(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), RemoteError>,
    ) -> SaveOutcome {
        let outcome = self.autosave.finish(&ticket, &result, &self.annotations);
        if outcome == SaveOutcome::Failed {
            self.notices.push(Notice::AutoSaveFailed);
        }
        outcome
    }

    /// Start a save requested by the annotator.
    ///
    /// Fails right away when a box is unclassified or another save is
    /// outstanding.
    pub fn begin_save(&mut self) -> Result<(SaveTicket, SavePayload), EditorError> {
        if !self.accepts_input() {
            return Err(EditorError::NoImage);
        }
        let ticket = match self.autosave.begin_manual(&self.annotations) {
            Ok(ticket) => ticket,
            Err(e) => {
                if matches!(e, EditorError::Unclassified { .. }) {
                    self.notices.push(Notice::SaveNeedsClasses);
                }
                return Err(e);
            }
        };

        match self.build_payload() {
            Ok(payload) => Ok((ticket, payload)),
            Err(e) => {
                let rejected = Err(RemoteError::Transport(e.to_string()));
                self.autosave.finish(&ticket, &rejected, &self.annotations);
                self.notices.push(Notice::SaveFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Apply the result of a manual save.
    pub fn complete_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<(), RemoteError>,
    ) -> Result<SaveOutcome, EditorError> {
        let outcome = self.autosave.finish(&ticket, &result, &self.annotations);
        if let Err(e) = result {
            if outcome != SaveOutcome::Stale {
                self.notices.push(Notice::SaveFailed {
                    message: e.to_string(),
                });
            }
            return Err(e.into());
        }
        Ok(outcome)
    }

    /// Ticket for reloading the canonical set after a save, valid only while
    /// the live set stays as it is now.
    pub fn begin_reload(&self) -> Result<LoadTicket, EditorError> {
        Ok(LoadTicket {
            generation: self.autosave.generation(),
            image_id: self.current_image_id()?,
            expected_digest: Some(autosave::digest(&self.annotations)),
        })
    }

    // ========================================================================
    // Auto-annotation
    // ========================================================================

    pub fn begin_auto_annotate(&mut self) -> Result<LoadTicket, EditorError> {
        if !self.accepts_input() {
            return Err(EditorError::NoImage);
        }
        log::info!("Requesting automatic annotations");
        Ok(LoadTicket {
            generation: self.autosave.generation(),
            image_id: self.current_image_id()?,
            expected_digest: None,
        })
    }

    /// Replace the set with the suggested boxes. Undoable like any edit.
    ///
    /// Returns the number of boxes applied; 0 for a stale response.
    pub fn complete_auto_annotate(
        &mut self,
        ticket: LoadTicket,
        result: Result<AnnotationDocument, RemoteError>,
    ) -> Result<usize, EditorError> {
        if !self.is_current(&ticket) {
            log::debug!("Discarding stale auto-annotation for {}", ticket.image_id);
            return Ok(0);
        }
        let document = result.inspect_err(|e| {
            log::warn!("Auto-annotation failed: {}", e);
            self.notices.push(Notice::LoadFailed {
                message: e.to_string(),
            });
        })?;

        let set = self.document_to_set(&document, &ticket.image_id, Some("auto"));
        let count = set.len();
        self.settle_gesture();
        self.auto_annotated = true;
        self.apply(set, EditOrigin::User);
        log::info!("Applied {} automatic annotations", count);
        Ok(count)
    }
}
