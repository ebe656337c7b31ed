//! Auto-save bookkeeping: dirty tracking, debounce, single in-flight request,
//! content digests and bounded retries.
//!
//! The controller never performs I/O. The editor asks it for a [`SaveTicket`]
//! when a save may start and reports the result back with [`finish`].
//!
//! [`finish`]: AutoSaveController::finish

use std::time::Duration;

use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::config::AutoSaveConfig;
use crate::constants::MAX_RETRY_COUNT;
use crate::error::EditorError;
use crate::model::Annotation;
use crate::remote::RemoteError;

/// Save state shown to the annotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    /// No document is loaded
    NotAvailable,
    /// Remote copy matches the live set
    Saved,
    /// A request is outstanding
    Saving,
    /// Local changes are waiting to be saved
    Unsaved,
    /// Saving failed; the annotator has to act
    Error,
}

/// Whether a save was started by the save loop or by the annotator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Auto,
    Manual,
}

/// Claim on the single in-flight save slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTicket {
    digest: String,
    generation: u64,
    kind: SaveKind,
}

impl SaveTicket {
    /// Digest of the set that is being sent.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> SaveKind {
        self.kind
    }
}

/// What [`AutoSaveController::finish`] made of a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The ticket belongs to an earlier session; nothing changed
    Stale,
    /// The sent set is still the live set
    Saved,
    /// Saved, but the live set changed meanwhile; another save is due
    Superseded,
    /// Failed below the retry cap; another attempt is due
    Retrying { attempt: u32 },
    /// Gave up: manual failure or retry cap reached
    Failed,
}

/// Stable serialization of an annotation set used to detect changes.
pub fn digest(set: &[Annotation]) -> String {
    serde_json::to_string(set).unwrap_or_default()
}

/// Decides when background saves happen and tracks their results.
#[derive(Debug)]
pub struct AutoSaveController {
    status: SaveStatus,

    /// Digest of the last set the remote store accepted.
    last_saved_digest: Option<String>,

    /// Whether a save request is outstanding.
    in_flight: bool,

    /// Consecutive failed auto-save attempts.
    retry_count: u32,

    /// Bumped whenever the document changes; tickets from older sessions are stale.
    generation: u64,

    /// Whether there are changes the save loop should look at.
    dirty: bool,

    /// Time of last change that needs saving.
    last_change: Option<Instant>,

    debounce: Duration,
    enabled: bool,
}

impl AutoSaveController {
    pub fn new(config: &AutoSaveConfig) -> Self {
        Self {
            status: SaveStatus::NotAvailable,
            last_saved_digest: None,
            in_flight: false,
            retry_count: 0,
            generation: 0,
            dirty: false,
            last_change: None,
            debounce: Duration::from_millis(config.debounce_ms),
            enabled: config.enabled,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether auto-save is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::debug!("Auto-save: enabled = {}", enabled);
    }

    /// Forget the current document. Outstanding tickets become stale.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.status = SaveStatus::NotAvailable;
        self.last_saved_digest = None;
        self.in_flight = false;
        self.retry_count = 0;
        self.dirty = false;
        self.last_change = None;
        log::trace!("Auto-save: session {} started", self.generation);
    }

    /// A document was loaded from the remote store; `set` is its saved state.
    pub fn loaded(&mut self, set: &[Annotation]) {
        self.last_saved_digest = Some(digest(set));
        self.status = SaveStatus::Saved;
        self.dirty = false;
        self.last_change = None;
    }

    /// The live set changed.
    pub fn mark_changed(&mut self, set: &[Annotation]) {
        if self.status == SaveStatus::NotAvailable {
            return;
        }
        self.last_change = Some(Instant::now());

        if self.in_flight {
            // Reconsidered once the outstanding request completes
            self.dirty = true;
            self.status = SaveStatus::Unsaved;
            log::trace!("Auto-save: change deferred, request in flight");
            return;
        }

        if self.last_saved_digest.as_deref() == Some(digest(set).as_str()) {
            self.dirty = false;
            self.status = SaveStatus::Saved;
        } else {
            self.dirty = true;
            self.status = SaveStatus::Unsaved;
        }
        log::trace!("Auto-save: marked dirty = {}", self.dirty);
    }

    /// Whether the save loop should try to save now.
    pub fn is_due(&self) -> bool {
        if !self.enabled || !self.dirty || self.in_flight {
            return false;
        }

        let Some(last_change) = self.last_change else {
            return false;
        };

        last_change.elapsed() >= self.debounce
    }

    /// Claim the in-flight slot for a background save of `set`.
    ///
    /// Returns `None` when a request is outstanding, when any annotation is
    /// unclassified, or when `set` matches what was last saved.
    pub fn begin(&mut self, set: &[Annotation]) -> Option<SaveTicket> {
        if self.in_flight || self.status == SaveStatus::NotAvailable {
            return None;
        }

        if let Some(unclassified) = set.iter().find(|a| !a.is_classified()) {
            log::debug!("Auto-save: skipped, {} is unclassified", unclassified.id);
            self.dirty = false;
            return None;
        }

        let digest = digest(set);
        if self.last_saved_digest.as_deref() == Some(digest.as_str()) {
            log::trace!("Auto-save: skipped, nothing changed");
            self.dirty = false;
            self.status = SaveStatus::Saved;
            return None;
        }

        Some(self.claim(digest, SaveKind::Auto))
    }

    /// Claim the in-flight slot for a save requested by the annotator.
    ///
    /// Skips debounce and the digest check. An unclassified annotation fails
    /// the save outright.
    pub fn begin_manual(&mut self, set: &[Annotation]) -> Result<SaveTicket, EditorError> {
        if self.status == SaveStatus::NotAvailable {
            return Err(EditorError::NoImage);
        }
        if self.in_flight {
            return Err(EditorError::SaveInProgress);
        }
        if let Some(unclassified) = set.iter().find(|a| !a.is_classified()) {
            self.status = SaveStatus::Error;
            log::warn!("Save refused: {} has no class", unclassified.id);
            return Err(EditorError::unclassified(&unclassified.id));
        }

        Ok(self.claim(digest(set), SaveKind::Manual))
    }

    fn claim(&mut self, digest: String, kind: SaveKind) -> SaveTicket {
        self.in_flight = true;
        self.dirty = false;
        self.status = SaveStatus::Saving;
        log::debug!("Auto-save: {:?} save started", kind);
        SaveTicket {
            digest,
            generation: self.generation,
            kind,
        }
    }

    /// Record the result of the request `ticket` was issued for.
    ///
    /// `live` is the annotation set as it is now, which may differ from what
    /// was sent.
    pub fn finish(
        &mut self,
        ticket: &SaveTicket,
        result: &Result<(), RemoteError>,
        live: &[Annotation],
    ) -> SaveOutcome {
        if ticket.generation != self.generation {
            log::debug!(
                "Auto-save: discarding result of session {} (now {})",
                ticket.generation,
                self.generation
            );
            return SaveOutcome::Stale;
        }
        self.in_flight = false;

        match result {
            Ok(()) => {
                self.retry_count = 0;
                if digest(live) == ticket.digest {
                    self.last_saved_digest = Some(ticket.digest.clone());
                    self.status = SaveStatus::Saved;
                    self.dirty = false;
                    log::info!("Saved annotations");
                    SaveOutcome::Saved
                } else {
                    self.status = SaveStatus::Unsaved;
                    self.dirty = true;
                    log::debug!("Auto-save: set changed while saving, follow-up needed");
                    SaveOutcome::Superseded
                }
            }
            Err(e) if ticket.kind == SaveKind::Manual => {
                self.status = SaveStatus::Error;
                log::warn!("Save failed: {}", e);
                SaveOutcome::Failed
            }
            Err(e) => {
                self.retry_count += 1;
                if self.retry_count >= MAX_RETRY_COUNT {
                    log::warn!(
                        "Auto-save failed {} times, giving up: {}",
                        self.retry_count,
                        e
                    );
                    self.retry_count = 0;
                    self.status = SaveStatus::Error;
                    self.dirty = false;
                    SaveOutcome::Failed
                } else {
                    log::warn!(
                        "Auto-save attempt {} of {} failed: {}",
                        self.retry_count,
                        MAX_RETRY_COUNT,
                        e
                    );
                    self.status = SaveStatus::Unsaved;
                    self.dirty = true;
                    self.last_change = Some(Instant::now());
                    SaveOutcome::Retrying {
                        attempt: self.retry_count,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    fn controller() -> AutoSaveController {
        let config = AutoSaveConfig {
            debounce_ms: 0,
            ..AutoSaveConfig::default()
        };
        let mut controller = AutoSaveController::new(&config);
        controller.invalidate();
        controller.loaded(&[]);
        controller
    }

    fn boxed(id: &str, class: &str) -> Annotation {
        Annotation::new(id, Rect::new(10.0, 10.0, 40.0, 40.0)).with_class(class)
    }

    fn failure() -> Result<(), RemoteError> {
        Err(RemoteError::http(503, "unavailable"))
    }

    #[test]
    fn test_initial_state() {
        let controller = AutoSaveController::new(&AutoSaveConfig::default());
        assert_eq!(controller.status(), SaveStatus::NotAvailable);
        assert!(!controller.is_dirty());
        assert!(!controller.is_due());
    }

    #[test]
    fn test_change_then_save() {
        let mut controller = controller();
        let set = vec![boxed("a", "car")];
        controller.mark_changed(&set);
        assert_eq!(controller.status(), SaveStatus::Unsaved);
        assert!(controller.is_due());

        let ticket = controller.begin(&set).unwrap();
        assert_eq!(controller.status(), SaveStatus::Saving);
        assert!(!controller.is_due());

        let outcome = controller.finish(&ticket, &Ok(()), &set);
        assert_eq!(outcome, SaveOutcome::Saved);
        assert_eq!(controller.status(), SaveStatus::Saved);
    }

    #[test]
    fn test_same_digest_is_not_saved_again() {
        let mut controller = controller();
        let set = vec![boxed("a", "car")];
        controller.mark_changed(&set);
        let ticket = controller.begin(&set).unwrap();
        controller.finish(&ticket, &Ok(()), &set);

        controller.mark_changed(&set);
        assert!(!controller.is_due());
        assert_eq!(controller.begin(&set), None);
    }

    #[test]
    fn test_reverting_to_saved_content_is_clean() {
        let mut controller = controller();
        controller.mark_changed(&[boxed("a", "car")]);
        assert_eq!(controller.status(), SaveStatus::Unsaved);
        controller.mark_changed(&[]);
        assert_eq!(controller.status(), SaveStatus::Saved);
        assert!(!controller.is_dirty());
    }

    #[test]
    fn test_unclassified_blocks_autosave() {
        let mut controller = controller();
        let set = vec![boxed("a", "car"), boxed("b", "")];
        controller.mark_changed(&set);
        assert_eq!(controller.begin(&set), None);
        assert_eq!(controller.status(), SaveStatus::Unsaved);
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn test_only_one_request_in_flight() {
        let mut controller = controller();
        let first = vec![boxed("a", "car")];
        controller.mark_changed(&first);
        let ticket = controller.begin(&first).unwrap();

        let second = vec![boxed("a", "person")];
        controller.mark_changed(&second);
        assert_eq!(controller.status(), SaveStatus::Unsaved);
        assert_eq!(controller.begin(&second), None);

        // The first request lands after the set moved on
        let outcome = controller.finish(&ticket, &Ok(()), &second);
        assert_eq!(outcome, SaveOutcome::Superseded);
        assert_eq!(controller.status(), SaveStatus::Unsaved);
        assert!(controller.is_due());
        assert!(controller.begin(&second).is_some());
    }

    #[test]
    fn test_error_after_exactly_three_failures() {
        let mut controller = controller();
        let set = vec![boxed("a", "car")];
        controller.mark_changed(&set);

        for attempt in 1..MAX_RETRY_COUNT {
            let ticket = controller.begin(&set).unwrap();
            let outcome = controller.finish(&ticket, &failure(), &set);
            assert_eq!(outcome, SaveOutcome::Retrying { attempt });
            assert_eq!(controller.status(), SaveStatus::Unsaved);
            assert_eq!(controller.retry_count(), attempt);
        }

        let ticket = controller.begin(&set).unwrap();
        let outcome = controller.finish(&ticket, &failure(), &set);
        assert_eq!(outcome, SaveOutcome::Failed);
        assert_eq!(controller.status(), SaveStatus::Error);
        assert_eq!(controller.retry_count(), 0);
        assert!(!controller.is_due());
    }

    #[test]
    fn test_success_resets_retry_counter() {
        let mut controller = controller();
        let set = vec![boxed("a", "car")];
        controller.mark_changed(&set);

        let ticket = controller.begin(&set).unwrap();
        controller.finish(&ticket, &failure(), &set);
        assert_eq!(controller.retry_count(), 1);

        let ticket = controller.begin(&set).unwrap();
        controller.finish(&ticket, &Ok(()), &set);
        assert_eq!(controller.retry_count(), 0);
        assert_eq!(controller.status(), SaveStatus::Saved);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut controller = controller();
        let set = vec![boxed("a", "car")];
        controller.mark_changed(&set);
        let ticket = controller.begin(&set).unwrap();

        controller.invalidate();
        controller.loaded(&[]);

        assert_eq!(controller.finish(&ticket, &Ok(()), &set), SaveOutcome::Stale);
        assert_eq!(controller.status(), SaveStatus::Saved);
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn test_manual_save_with_unclassified_fails_loudly() {
        let mut controller = controller();
        let set = vec![boxed("a", "")];
        let result = controller.begin_manual(&set);
        assert!(matches!(result, Err(EditorError::Unclassified { .. })));
        assert_eq!(controller.status(), SaveStatus::Error);
    }

    #[test]
    fn test_manual_save_never_retries() {
        let mut controller = controller();
        let set = vec![boxed("a", "car")];
        let ticket = controller.begin_manual(&set).unwrap();
        assert!(matches!(
            controller.begin_manual(&set),
            Err(EditorError::SaveInProgress)
        ));

        let outcome = controller.finish(&ticket, &failure(), &set);
        assert_eq!(outcome, SaveOutcome::Failed);
        assert_eq!(controller.status(), SaveStatus::Error);
        assert_eq!(controller.retry_count(), 0);
        assert!(!controller.is_due());
    }

    #[test]
    fn test_disabled() {
        let mut controller = controller();
        controller.set_enabled(false);
        controller.mark_changed(&[boxed("a", "car")]);
        assert!(!controller.is_due());
    }

    #[test]
    fn test_debounce_prevents_immediate_save() {
        let config = AutoSaveConfig {
            debounce_ms: 10_000,
            ..AutoSaveConfig::default()
        };
        let mut controller = AutoSaveController::new(&config);
        controller.invalidate();
        controller.loaded(&[]);
        controller.mark_changed(&[boxed("a", "car")]);
        assert!(controller.is_dirty());
        assert!(!controller.is_due());
    }
}
