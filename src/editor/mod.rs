//! The annotation editor: owns the annotation set and wires everything else.
//!
//! Every edit of a loaded document goes through one funnel, tagged with an
//! [`EditOrigin`] that decides whether history and auto-save hear about it.
//! Pointer and keyboard handling is synchronous; remote work lives in the
//! `io` submodule, with async helpers for native hosts in `driver`.

#[cfg(not(target_arch = "wasm32"))]
mod driver;
mod io;

pub use io::LoadTicket;

use web_time::Instant;

use crate::autosave::{AutoSaveController, SaveStatus};
use crate::clipboard;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::history::HistoryLog;
use crate::interaction::{EditAction, InteractionContext, InteractionMachine};
use crate::keybindings::{HelpEntry, KeyEvent, Platform, ShortcutAction, ShortcutMap};
use crate::message::{HostRequest, Notice};
use crate::model::{Annotation, CategoryCatalog, IdAllocator, ImageSize, Point, Size};
use crate::scene::Scene;
use crate::viewport::{ViewState, ViewportController};

/// Where a change to the annotation set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// Live preview while a pointer gesture is active
    Gesture,
    /// Finished edit by the annotator; recorded in history
    User,
    /// Undo or redo; restores a snapshot without recording one
    History,
    /// Document loaded from the remote store; history starts over
    Remote,
    /// Canonical set fetched back after a save; recorded in history and
    /// taken as the saved state
    Reload,
}

/// Interactive bounding-box editor for one project.
#[derive(Debug)]
pub struct AnnotationEditor {
    config: EditorConfig,
    catalog: CategoryCatalog,
    shortcuts: ShortcutMap,
    project_id: String,

    // ========================================================================
    // Document
    // ========================================================================
    image_id: Option<String>,
    annotations: Vec<Annotation>,
    selected: Option<String>,
    history: HistoryLog<Vec<Annotation>>,
    ids: IdAllocator,
    /// Annotations came from the auto-annotate service
    auto_annotated: bool,
    /// When the current image was opened, for time tracking
    opened_at: Option<Instant>,
    /// The remote document has been applied
    loaded: bool,

    // ========================================================================
    // Interaction
    // ========================================================================
    viewport: ViewportController,
    interaction: InteractionMachine,
    draw_mode: bool,
    locked: bool,
    hover: Option<Point>,

    // ========================================================================
    // Saving and host communication
    // ========================================================================
    autosave: AutoSaveController,
    mounted: bool,
    has_previous: bool,
    has_next: bool,
    notices: Vec<Notice>,
    requests: Vec<HostRequest>,
}

impl AnnotationEditor {
    pub fn new(
        project_id: impl Into<String>,
        catalog: CategoryCatalog,
        config: EditorConfig,
        platform: Platform,
    ) -> Self {
        let autosave = AutoSaveController::new(&config.autosave);
        let history = HistoryLog::new(Vec::new(), config.history.max_history);
        Self {
            catalog,
            shortcuts: ShortcutMap::new(platform),
            project_id: project_id.into(),
            image_id: None,
            annotations: Vec::new(),
            selected: None,
            history,
            ids: IdAllocator::new(),
            auto_annotated: false,
            opened_at: None,
            loaded: false,
            viewport: ViewportController::new(),
            interaction: InteractionMachine::new(),
            draw_mode: false,
            locked: false,
            hover: None,
            autosave,
            mounted: true,
            has_previous: false,
            has_next: false,
            notices: Vec::new(),
            requests: Vec::new(),
            config,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        let id = self.selected.as_deref()?;
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn view(&self) -> ViewState {
        self.viewport.view()
    }

    pub fn image_id(&self) -> Option<&str> {
        self.image_id.as_deref()
    }

    pub fn image_size(&self) -> ImageSize {
        self.viewport.image()
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn draw_mode(&self) -> bool {
        self.draw_mode
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_auto_annotated(&self) -> bool {
        self.auto_annotated
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Rows of the keyboard help overlay.
    pub fn help_entries(&self) -> Vec<HelpEntry> {
        self.shortcuts.help_entries()
    }

    /// Take the warnings raised since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Take the host requests raised since the last call.
    pub fn drain_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Tell the editor whether neighbouring images exist for arrow-key navigation.
    pub fn set_navigation(&mut self, has_previous: bool, has_next: bool) {
        self.has_previous = has_previous;
        self.has_next = has_next;
    }

    /// Size of the area the editor is drawn in. Recenters the image.
    pub fn set_container(&mut self, size: Size) {
        self.viewport.set_container(size);
    }

    /// Tear the editor down. Responses still in flight will be discarded.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.interaction.cancel();
        self.autosave.invalidate();
        self.mounted = false;
        self.loaded = false;
        log::debug!("Editor unmounted");
    }

    fn accepts_input(&self) -> bool {
        self.mounted && self.loaded
    }

    // ========================================================================
    // Mutation funnel
    // ========================================================================

    /// Replace the annotation set of the loaded document.
    fn apply(&mut self, next: Vec<Annotation>, origin: EditOrigin) {
        let changed = next != self.annotations;
        self.annotations = next;

        let selection_gone = self
            .selected
            .as_ref()
            .is_some_and(|id| !self.annotations.iter().any(|a| &a.id == id));
        if selection_gone {
            self.selected = None;
        }

        match origin {
            EditOrigin::Remote => {
                self.history.reset(self.annotations.clone());
                self.autosave.loaded(&self.annotations);
                return;
            }
            EditOrigin::Reload => {
                self.history.push(self.annotations.clone());
                self.autosave.loaded(&self.annotations);
                return;
            }
            EditOrigin::User => {
                self.history.push(self.annotations.clone());
            }
            EditOrigin::Gesture | EditOrigin::History => {}
        }

        if changed || origin == EditOrigin::User {
            self.autosave.mark_changed(&self.annotations);
        }
    }

    fn dispatch(&mut self, actions: Vec<EditAction>) {
        for action in actions {
            match action {
                EditAction::Select(id) => self.selected = id,
                EditAction::Replace(set) => self.apply(set, EditOrigin::Gesture),
                EditAction::Commit(set) => self.apply(set, EditOrigin::User),
                EditAction::AddBox(rect) => {
                    let id = self.allocate_id();
                    let mut next = self.annotations.clone();
                    next.push(Annotation::new(id.clone(), rect));
                    self.apply(next, EditOrigin::User);
                    self.selected = Some(id);
                }
                EditAction::SetView(view) => self.viewport.set_view(view),
                EditAction::Warn(notice) => self.notices.push(notice),
            }
        }
    }

    fn allocate_id(&mut self) -> String {
        let image_id = self.image_id.as_deref().unwrap_or("image");
        self.ids.allocate(image_id, &self.annotations)
    }

    fn context(&self) -> InteractionContext<'_> {
        InteractionContext {
            annotations: &self.annotations,
            selected: self.selected.as_deref(),
            view: self.viewport.view(),
            image: self.viewport.image(),
            draw_mode: self.draw_mode,
            locked: self.locked,
            handle_size: self.config.interaction.handle_size,
            min_box_size: self.config.interaction.min_box_size,
            zoom_step: self.config.interaction.zoom_step,
        }
    }

    fn with_machine(
        &mut self,
        handle: impl FnOnce(&mut InteractionMachine, &InteractionContext<'_>) -> Vec<EditAction>,
    ) {
        if !self.accepts_input() {
            return;
        }
        let mut machine = std::mem::take(&mut self.interaction);
        let actions = handle(&mut machine, &self.context());
        self.interaction = machine;
        self.dispatch(actions);
    }

    // ========================================================================
    // Pointer input (screen coordinates)
    // ========================================================================

    pub fn pointer_down(&mut self, screen: Point) {
        self.hover = Some(screen);
        self.with_machine(|machine, ctx| machine.pointer_down(ctx, screen));
    }

    pub fn pointer_move(&mut self, screen: Point) {
        self.hover = Some(screen);
        self.with_machine(|machine, ctx| machine.pointer_move(ctx, screen));
    }

    pub fn pointer_up(&mut self, screen: Point) {
        self.hover = Some(screen);
        self.with_machine(|machine, ctx| machine.pointer_up(ctx, screen));
    }

    /// Pointer left the editor area.
    pub fn pointer_leave(&mut self) {
        self.hover = None;
    }

    /// Wheel over `screen`; negative `delta_y` zooms in.
    pub fn wheel(&mut self, screen: Point, delta_y: f32) {
        self.with_machine(|machine, ctx| machine.wheel(ctx, screen, delta_y));
    }

    /// Abort the active gesture.
    pub fn cancel_gesture(&mut self) {
        let actions = self.interaction.cancel();
        self.dispatch(actions);
    }

    /// Finish the active gesture where it stands, so a command issued in the
    /// middle of it applies on top of the gesture instead of being replaced.
    fn settle_gesture(&mut self) {
        let actions = self.interaction.settle(&self.annotations);
        self.dispatch(actions);
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    /// Handle a key press. Returns the action it triggered, if any, so the
    /// host can suppress the browser default.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<ShortcutAction> {
        if !self.mounted {
            return None;
        }
        let action = self.shortcuts.resolve(event)?;
        log::debug!("⌨️ Shortcut {:?}", action);

        match action {
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::CopySelected => {
                if let Err(e) = self.copy_selected() {
                    log::warn!("Copy failed: {}", e);
                }
            }
            ShortcutAction::Paste => self.requests.push(HostRequest::ReadClipboard),
            ShortcutAction::DeleteSelected => {
                self.delete_selected();
            }
            ShortcutAction::Save => self.requests.push(HostRequest::Save),
            ShortcutAction::CancelOrBack => {
                if self.draw_mode {
                    self.set_draw_mode(false);
                } else {
                    self.requests.push(HostRequest::GoBack);
                }
            }
            ShortcutAction::ToggleDrawMode => {
                self.toggle_draw_mode();
            }
            ShortcutAction::ResetView => self.reset_view(),
            ShortcutAction::ToggleLock => self.toggle_lock(),
            ShortcutAction::PreviousImage => {
                if self.has_previous {
                    self.requests.push(HostRequest::PreviousImage);
                }
            }
            ShortcutAction::NextImage => {
                if self.has_next {
                    self.requests.push(HostRequest::NextImage);
                }
            }
        }
        Some(action)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn undo(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.cancel_gesture();
        if let Some(snapshot) = self.history.undo().cloned() {
            self.apply(snapshot, EditOrigin::History);
        }
    }

    pub fn redo(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.cancel_gesture();
        if let Some(snapshot) = self.history.redo().cloned() {
            self.apply(snapshot, EditOrigin::History);
        }
    }

    /// Select an annotation by id, or clear the selection.
    pub fn select(&mut self, id: Option<&str>) -> Result<(), EditorError> {
        match id {
            Some(id) if !self.annotations.iter().any(|a| a.id == id) => {
                Err(EditorError::AnnotationNotFound { id: id.to_string() })
            }
            _ => {
                self.selected = id.map(str::to_string);
                Ok(())
            }
        }
    }

    /// Delete the selected box. Returns whether anything was deleted.
    pub fn delete_selected(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.settle_gesture();
        let Some(id) = self.selected.take() else {
            return false;
        };
        let next: Vec<Annotation> = self
            .annotations
            .iter()
            .filter(|a| a.id != id)
            .cloned()
            .collect();
        log::debug!("Deleted {}", id);
        self.apply(next, EditOrigin::User);
        true
    }

    /// Delete every box on the image.
    pub fn delete_all(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.settle_gesture();
        if self.annotations.is_empty() {
            return;
        }
        log::debug!("Deleted all {} annotations", self.annotations.len());
        self.selected = None;
        self.apply(Vec::new(), EditOrigin::User);
    }

    /// Assign a class from the catalog to an annotation.
    pub fn assign_class(&mut self, id: &str, class: &str) -> Result<(), EditorError> {
        if !self.accepts_input() {
            return Err(EditorError::NoImage);
        }
        if !self.catalog.contains_name(class) {
            self.notices.push(Notice::UnknownClass {
                name: class.to_string(),
            });
            return Err(EditorError::UnknownClass {
                name: class.to_string(),
            });
        }
        self.settle_gesture();
        let index = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| EditorError::AnnotationNotFound { id: id.to_string() })?;

        let mut next = self.annotations.clone();
        next[index].class = class.to_string();
        self.apply(next, EditOrigin::User);
        Ok(())
    }

    /// Assign a class to the selected annotation.
    pub fn assign_class_to_selected(&mut self, class: &str) -> Result<(), EditorError> {
        let id = self
            .selected
            .clone()
            .ok_or_else(|| EditorError::AnnotationNotFound { id: String::new() })?;
        self.assign_class(&id, class)
    }

    /// Turn draw mode on or off. Turning it on is refused while any box is
    /// unclassified. Returns the resulting mode.
    pub fn set_draw_mode(&mut self, on: bool) -> bool {
        if !self.accepts_input() {
            return self.draw_mode;
        }
        if on && self.annotations.iter().any(|a| !a.is_classified()) {
            log::warn!("Draw mode refused: unclassified box present");
            self.notices.push(Notice::ClassifyFirst);
            return self.draw_mode;
        }
        if !on && self.interaction.draft().is_some() {
            self.cancel_gesture();
        }
        self.draw_mode = on;
        log::debug!("Draw mode: {}", on);
        self.draw_mode
    }

    pub fn toggle_draw_mode(&mut self) -> bool {
        self.set_draw_mode(!self.draw_mode)
    }

    /// Recenter the image in the container.
    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Lock or unlock pointer interaction.
    pub fn set_locked(&mut self, locked: bool) {
        if !self.accepts_input() {
            return;
        }
        if locked {
            self.cancel_gesture();
        }
        self.locked = locked;
        log::debug!("🔒 Canvas locked: {}", locked);
    }

    pub fn toggle_lock(&mut self) {
        self.set_locked(!self.locked);
    }

    /// Copy the selected box to the clipboard (via the host).
    ///
    /// Returns the text, or `None` when nothing is selected.
    pub fn copy_selected(&mut self) -> Result<Option<String>, EditorError> {
        let Some(annotation) = self.selected_annotation() else {
            return Ok(None);
        };
        let text = clipboard::copy_text(annotation)?;
        self.requests.push(HostRequest::WriteClipboard(text.clone()));
        Ok(Some(text))
    }

    /// Paste a box from clipboard text. Returns the new box's id.
    ///
    /// Malformed text leaves the set untouched and raises a notice. A class
    /// the catalog does not know is dropped.
    pub fn paste(&mut self, text: &str) -> Result<String, EditorError> {
        if !self.accepts_input() {
            return Err(EditorError::NoImage);
        }
        let pasted = match clipboard::parse_paste(text) {
            Ok(pasted) => pasted,
            Err(e) => {
                log::warn!("Paste rejected: {}", e);
                self.notices.push(Notice::InvalidPaste {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        let class = if self.catalog.contains_name(&pasted.class) {
            pasted.class
        } else {
            if !pasted.class.is_empty() {
                log::debug!("Pasted class {:?} not in catalog, dropped", pasted.class);
            }
            String::new()
        };

        self.settle_gesture();
        let id = self.allocate_id();
        let mut next = self.annotations.clone();
        next.push(Annotation::new(id.clone(), pasted.rect).with_class(class));
        self.apply(next, EditOrigin::User);
        self.selected = Some(id.clone());
        Ok(id)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Describe the current frame.
    pub fn scene(&self) -> Scene {
        let ctx = self.context();
        let cursor = self.interaction.cursor(&ctx, self.hover);
        Scene::compose(&ctx, self.interaction.draft(), cursor, self.autosave.status())
    }
}
