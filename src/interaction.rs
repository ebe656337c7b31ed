//! Pointer interaction state machine.
//!
//! Translates pointer events into [`EditAction`]s. The machine never touches
//! the annotation set itself: it reads the current set through an
//! [`InteractionContext`] and proposes changes for the editor to apply.
//!
//! ```text
//! Idle --down on handle of selected--> Resizing
//! Idle --down inside a box-----------> DraggingAnnotation
//! Idle --down on canvas, draw mode---> Drawing
//! Idle --down on canvas, otherwise---> Panning
//! any  --up--------------------------> Idle (commit)
//! ```

use crate::handles::{self, Handle};
use crate::message::Notice;
use crate::model::{Annotation, ImageSize, Point, Rect};
use crate::transform::screen_to_image_point;
use crate::viewport::ViewState;

/// Current gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Rubber-band box in image space; not part of the set until pointer-up.
    Drawing { start: Point, draft: Rect },
    DraggingAnnotation {
        id: String,
        /// Image point where the box was grabbed
        grab: Point,
        /// Set as it was when the gesture started
        before: Vec<Annotation>,
    },
    Resizing {
        id: String,
        handle: Handle,
        before: Vec<Annotation>,
    },
    /// Last pointer position in screen space
    Panning { last: Point },
}

/// Change proposed by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// Change the selection
    Select(Option<String>),
    /// Live preview of a gesture; not recorded in history
    Replace(Vec<Annotation>),
    /// Finished gesture; recorded in history
    Commit(Vec<Annotation>),
    /// Add a new unclassified box covering this rectangle and select it
    AddBox(Rect),
    SetView(ViewState),
    Warn(Notice),
}

/// Read-only view of the editor the machine works against.
#[derive(Debug, Clone, Copy)]
pub struct InteractionContext<'a> {
    pub annotations: &'a [Annotation],
    pub selected: Option<&'a str>,
    pub view: ViewState,
    pub image: ImageSize,
    pub draw_mode: bool,
    pub locked: bool,
    pub handle_size: f32,
    pub min_box_size: f32,
    pub zoom_step: f32,
}

impl InteractionContext<'_> {
    fn find(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Topmost box under an image point.
    fn hit(&self, point: Point) -> Option<&Annotation> {
        self.annotations.iter().rev().find(|a| a.contains(point))
    }

    fn selected_handle(&self, point: Point) -> Option<(&Annotation, Handle)> {
        let selected = self.find(self.selected?)?;
        handles::classify_handle(point, selected, self.handle_size).map(|h| (selected, h))
    }

    fn has_unclassified(&self) -> bool {
        self.annotations.iter().any(|a| !a.is_classified())
    }
}

/// Dispatches pointer events for one editor.
#[derive(Debug, Default)]
pub struct InteractionMachine {
    state: InteractionState,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    /// Box being drawn, in image space.
    pub fn draft(&self) -> Option<Rect> {
        match &self.state {
            InteractionState::Drawing { draft, .. } => Some(*draft),
            _ => None,
        }
    }

    /// Pointer pressed at a screen position.
    ///
    /// A gesture still active here lost its pointer-up; it is settled first
    /// and the press is handled against the settled set.
    pub fn pointer_down(&mut self, ctx: &InteractionContext<'_>, screen: Point) -> Vec<EditAction> {
        if ctx.locked {
            return vec![];
        }
        let mut actions = if self.is_idle() {
            vec![]
        } else {
            log::debug!("Pointer-up lost, settling the active gesture");
            self.settle(ctx.annotations)
        };

        let point = screen_to_image_point(screen, &ctx.view);

        if let Some((selected, handle)) = ctx.selected_handle(point) {
            log::debug!("Resize {} via {:?}", selected.id, handle);
            self.state = InteractionState::Resizing {
                id: selected.id.clone(),
                handle,
                before: ctx.annotations.to_vec(),
            };
            return actions;
        }

        if let Some(hit) = ctx.hit(point) {
            log::debug!("Drag {}", hit.id);
            let id = hit.id.clone();
            self.state = InteractionState::DraggingAnnotation {
                id: id.clone(),
                grab: point,
                before: ctx.annotations.to_vec(),
            };
            actions.push(EditAction::Select(Some(id)));
            return actions;
        }

        if ctx.draw_mode {
            if ctx.has_unclassified() {
                log::warn!("Drawing refused: unclassified box present");
                actions.push(EditAction::Warn(Notice::ClassifyFirst));
                return actions;
            }
            self.state = InteractionState::Drawing {
                start: point,
                draft: Rect::new(point.x, point.y, 0.0, 0.0),
            };
            actions.push(EditAction::Select(None));
            return actions;
        }

        self.state = InteractionState::Panning { last: screen };
        actions.push(EditAction::Select(None));
        actions
    }

    /// Pointer moved to a screen position.
    pub fn pointer_move(&mut self, ctx: &InteractionContext<'_>, screen: Point) -> Vec<EditAction> {
        if ctx.locked {
            return vec![];
        }
        let point = screen_to_image_point(screen, &ctx.view);
        log::trace!("Pointer move ({:.1}, {:.1})", point.x, point.y);

        match &mut self.state {
            InteractionState::Idle => vec![],
            InteractionState::Drawing { start, draft } => {
                *draft = Rect::from_corners(*start, point);
                vec![]
            }
            InteractionState::DraggingAnnotation { id, grab, before } => {
                match dragged_set(before, id, *grab, point, ctx.image) {
                    Some(next) => vec![EditAction::Replace(next)],
                    None => vec![],
                }
            }
            InteractionState::Resizing { id, handle, before } => {
                match resized_set(before, id, *handle, point, ctx.image) {
                    Some(next) => vec![EditAction::Replace(next)],
                    None => vec![],
                }
            }
            InteractionState::Panning { last } => {
                let delta = screen.delta_from(*last);
                *last = screen;
                vec![EditAction::SetView(ctx.view.pan(delta))]
            }
        }
    }

    /// Pointer released at a screen position; commits the gesture.
    pub fn pointer_up(&mut self, ctx: &InteractionContext<'_>, screen: Point) -> Vec<EditAction> {
        if ctx.locked {
            return self.cancel();
        }
        let state = std::mem::take(&mut self.state);
        let point = screen_to_image_point(screen, &ctx.view);

        match state {
            InteractionState::Idle | InteractionState::Panning { .. } => vec![],
            InteractionState::Drawing { start, .. } => {
                let rect = Rect::from_corners(start, point);
                match validate_drawn(rect, ctx) {
                    Ok(()) => {
                        log::debug!(
                            "Drawn box {:.0}x{:.0} at ({:.0}, {:.0})",
                            rect.width,
                            rect.height,
                            rect.x,
                            rect.y
                        );
                        vec![EditAction::AddBox(rect)]
                    }
                    Err(notice) => {
                        log::warn!("Drawn box discarded: {}", notice);
                        vec![EditAction::Warn(notice)]
                    }
                }
            }
            InteractionState::DraggingAnnotation { id, grab, before } => {
                let next = dragged_set(&before, &id, grab, point, ctx.image);
                commit_if_changed(before, next)
            }
            InteractionState::Resizing { id, handle, before } => {
                let next = resized_set(&before, &id, handle, point, ctx.image);
                commit_if_changed(before, next)
            }
        }
    }

    /// Abort the active gesture, restoring the set it started from.
    pub fn cancel(&mut self) -> Vec<EditAction> {
        match std::mem::take(&mut self.state) {
            InteractionState::DraggingAnnotation { before, .. }
            | InteractionState::Resizing { before, .. } => vec![EditAction::Replace(before)],
            _ => vec![],
        }
    }

    /// End the active gesture where it stands.
    ///
    /// Drag and resize commit the geometry shown in `live` (the set the
    /// previews produced); an unfinished draft is dropped.
    pub fn settle(&mut self, live: &[Annotation]) -> Vec<EditAction> {
        match std::mem::take(&mut self.state) {
            InteractionState::DraggingAnnotation { before, .. }
            | InteractionState::Resizing { before, .. } => {
                commit_if_changed(before, Some(live.to_vec()))
            }
            _ => vec![],
        }
    }

    /// Wheel turned over a screen position; zooms around it.
    ///
    /// Negative `delta_y` (wheel away from the user) zooms in.
    pub fn wheel(&self, ctx: &InteractionContext<'_>, screen: Point, delta_y: f32) -> Vec<EditAction> {
        if ctx.locked || delta_y == 0.0 {
            return vec![];
        }
        let factor = if delta_y < 0.0 {
            ctx.zoom_step
        } else {
            1.0 / ctx.zoom_step
        };
        vec![EditAction::SetView(ctx.view.zoom(factor, screen))]
    }

    /// Cursor hint for a pointer hovering at a screen position.
    pub fn cursor(&self, ctx: &InteractionContext<'_>, screen: Option<Point>) -> &'static str {
        match &self.state {
            InteractionState::Drawing { .. } => return "crosshair",
            InteractionState::DraggingAnnotation { .. } => return "move",
            InteractionState::Resizing { handle, .. } => return handle.cursor(),
            InteractionState::Panning { .. } => return "grabbing",
            InteractionState::Idle => {}
        }
        if ctx.locked {
            return "default";
        }

        if let Some(screen) = screen {
            let point = screen_to_image_point(screen, &ctx.view);
            if let Some((_, handle)) = ctx.selected_handle(point) {
                return handle.cursor();
            }
            if ctx.hit(point).is_some() {
                return "move";
            }
        }
        if ctx.draw_mode { "crosshair" } else { "grab" }
    }
}

fn validate_drawn(rect: Rect, ctx: &InteractionContext<'_>) -> Result<(), Notice> {
    if rect.width < ctx.min_box_size || rect.height < ctx.min_box_size {
        return Err(Notice::BoxTooSmall {
            min_size: ctx.min_box_size,
        });
    }
    if ctx.image.is_loaded() && !ctx.image.contains_rect(&rect) {
        return Err(Notice::BoxOutsideImage);
    }
    Ok(())
}

fn replace_one(
    before: &[Annotation],
    id: &str,
    edit: impl FnOnce(&Annotation) -> Annotation,
) -> Option<Vec<Annotation>> {
    let index = before.iter().position(|a| a.id == id)?;
    let mut next = before.to_vec();
    next[index] = edit(&before[index]);
    Some(next)
}

fn dragged_set(
    before: &[Annotation],
    id: &str,
    grab: Point,
    point: Point,
    image: ImageSize,
) -> Option<Vec<Annotation>> {
    replace_one(before, id, |a| handles::translate(a, point.delta_from(grab), image))
}

fn resized_set(
    before: &[Annotation],
    id: &str,
    handle: Handle,
    point: Point,
    image: ImageSize,
) -> Option<Vec<Annotation>> {
    replace_one(before, id, |a| handles::resize(a, handle, point, image))
}

fn commit_if_changed(before: Vec<Annotation>, next: Option<Vec<Annotation>>) -> Vec<EditAction> {
    match next {
        Some(next) if next != before => vec![EditAction::Commit(next)],
        // Restore the pre-gesture set in case a preview left it elsewhere
        _ => vec![EditAction::Replace(before)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HANDLE_SIZE, MIN_DRAW_SIZE, zoom};
    use pretty_assertions::assert_eq;

    struct Fixture {
        annotations: Vec<Annotation>,
        selected: Option<String>,
        view: ViewState,
        draw_mode: bool,
        locked: bool,
    }

    impl Fixture {
        fn new(annotations: Vec<Annotation>) -> Self {
            Self {
                annotations,
                selected: None,
                view: ViewState::identity(),
                draw_mode: false,
                locked: false,
            }
        }

        fn ctx(&self) -> InteractionContext<'_> {
            InteractionContext {
                annotations: &self.annotations,
                selected: self.selected.as_deref(),
                view: self.view,
                image: ImageSize::new(1000.0, 1000.0),
                draw_mode: self.draw_mode,
                locked: self.locked,
                handle_size: HANDLE_SIZE,
                min_box_size: MIN_DRAW_SIZE,
                zoom_step: zoom::STEP,
            }
        }

        /// Apply actions the way the editor would (minus history).
        fn apply(&mut self, actions: Vec<EditAction>) -> Vec<EditAction> {
            for action in &actions {
                match action {
                    EditAction::Select(id) => self.selected = id.clone(),
                    EditAction::Replace(set) | EditAction::Commit(set) => {
                        self.annotations = set.clone()
                    }
                    EditAction::AddBox(rect) => {
                        let id = format!("new-{}", self.annotations.len());
                        self.annotations.push(Annotation::new(id.clone(), *rect));
                        self.selected = Some(id);
                    }
                    EditAction::SetView(view) => self.view = *view,
                    EditAction::Warn(_) => {}
                }
            }
            actions
        }
    }

    fn car(id: &str, rect: Rect) -> Annotation {
        Annotation::new(id, rect).with_class("car")
    }

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn gesture(
        machine: &mut InteractionMachine,
        fixture: &mut Fixture,
        from: Point,
        to: Point,
    ) -> Vec<EditAction> {
        let down = machine.pointer_down(&fixture.ctx(), from);
        fixture.apply(down);
        let moved = machine.pointer_move(&fixture.ctx(), to);
        fixture.apply(moved);
        let up = machine.pointer_up(&fixture.ctx(), to);
        fixture.apply(up)
    }

    #[test]
    fn draw_adds_box_and_selects_it() {
        let mut fixture = Fixture::new(vec![]);
        fixture.draw_mode = true;
        let mut machine = InteractionMachine::new();

        let actions = gesture(&mut machine, &mut fixture, p(500.0, 500.0), p(100.0, 100.0));
        assert_eq!(actions, vec![EditAction::AddBox(Rect::new(100.0, 100.0, 400.0, 400.0))]);
        assert_eq!(fixture.selected.as_deref(), Some("new-0"));
        assert!(machine.is_idle());
    }

    #[test]
    fn draft_follows_pointer() {
        let fixture = Fixture {
            draw_mode: true,
            ..Fixture::new(vec![])
        };
        let mut machine = InteractionMachine::new();
        machine.pointer_down(&fixture.ctx(), p(50.0, 50.0));
        machine.pointer_move(&fixture.ctx(), p(20.0, 80.0));
        assert_eq!(machine.draft(), Some(Rect::new(20.0, 50.0, 30.0, 30.0)));
    }

    #[test]
    fn small_box_is_discarded() {
        let mut fixture = Fixture::new(vec![]);
        fixture.draw_mode = true;
        let mut machine = InteractionMachine::new();

        let actions = gesture(&mut machine, &mut fixture, p(100.0, 100.0), p(119.0, 300.0));
        assert_eq!(
            actions,
            vec![EditAction::Warn(Notice::BoxTooSmall { min_size: MIN_DRAW_SIZE })]
        );
        assert!(fixture.annotations.is_empty());
    }

    #[test]
    fn box_leaving_image_is_discarded() {
        let mut fixture = Fixture::new(vec![]);
        fixture.draw_mode = true;
        let mut machine = InteractionMachine::new();

        let actions = gesture(&mut machine, &mut fixture, p(900.0, 900.0), p(1100.0, 950.0));
        assert_eq!(actions, vec![EditAction::Warn(Notice::BoxOutsideImage)]);
        assert!(fixture.annotations.is_empty());
    }

    #[test]
    fn drawing_refused_while_unclassified() {
        let mut fixture = Fixture::new(vec![Annotation::new("a", Rect::new(0.0, 0.0, 50.0, 50.0))]);
        fixture.draw_mode = true;
        let mut machine = InteractionMachine::new();

        let actions = machine.pointer_down(&fixture.ctx(), p(500.0, 500.0));
        assert_eq!(actions, vec![EditAction::Warn(Notice::ClassifyFirst)]);
        assert!(machine.is_idle());
    }

    #[test]
    fn drag_selects_previews_and_commits_once() {
        let mut fixture = Fixture::new(vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))]);
        let mut machine = InteractionMachine::new();

        let down = fixture.apply(machine.pointer_down(&fixture.ctx(), p(150.0, 150.0)));
        assert_eq!(down, vec![EditAction::Select(Some("a".to_string()))]);

        let first = fixture.apply(machine.pointer_move(&fixture.ctx(), p(160.0, 150.0)));
        assert!(matches!(first.as_slice(), [EditAction::Replace(_)]));
        let second = fixture.apply(machine.pointer_move(&fixture.ctx(), p(170.0, 170.0)));
        assert!(matches!(second.as_slice(), [EditAction::Replace(_)]));

        let up = fixture.apply(machine.pointer_up(&fixture.ctx(), p(170.0, 170.0)));
        assert_eq!(
            up,
            vec![EditAction::Commit(vec![car("a", Rect::new(120.0, 120.0, 100.0, 100.0))])]
        );
    }

    #[test]
    fn click_without_move_commits_nothing() {
        let mut fixture = Fixture::new(vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))]);
        let mut machine = InteractionMachine::new();
        let actions = gesture(&mut machine, &mut fixture, p(150.0, 150.0), p(150.0, 150.0));
        assert!(actions.iter().all(|a| !matches!(a, EditAction::Commit(_))));
        assert_eq!(fixture.selected.as_deref(), Some("a"));
    }

    #[test]
    fn topmost_box_wins() {
        let mut fixture = Fixture::new(vec![
            car("below", Rect::new(0.0, 0.0, 300.0, 300.0)),
            car("above", Rect::new(100.0, 100.0, 100.0, 100.0)),
        ]);
        let mut machine = InteractionMachine::new();
        let actions = fixture.apply(machine.pointer_down(&fixture.ctx(), p(150.0, 150.0)));
        assert_eq!(actions, vec![EditAction::Select(Some("above".to_string()))]);
    }

    #[test]
    fn resize_from_handle_of_selected() {
        let mut fixture = Fixture::new(vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))]);
        fixture.selected = Some("a".to_string());
        let mut machine = InteractionMachine::new();

        let actions = gesture(&mut machine, &mut fixture, p(200.0, 200.0), p(260.0, 240.0));
        assert_eq!(
            actions,
            vec![EditAction::Commit(vec![car("a", Rect::new(100.0, 100.0, 160.0, 140.0))])]
        );
    }

    #[test]
    fn handles_of_unselected_boxes_are_ignored() {
        let fixture = Fixture::new(vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))]);
        let mut machine = InteractionMachine::new();
        machine.pointer_down(&fixture.ctx(), p(200.0, 200.0));
        assert!(matches!(
            machine.state(),
            InteractionState::DraggingAnnotation { .. }
        ));
    }

    #[test]
    fn empty_canvas_pans_and_clears_selection() {
        let mut fixture = Fixture::new(vec![]);
        fixture.selected = Some("gone".to_string());
        let mut machine = InteractionMachine::new();

        gesture(&mut machine, &mut fixture, p(10.0, 10.0), p(40.0, -5.0));
        assert_eq!(fixture.selected, None);
        assert_eq!(fixture.view.position, p(30.0, -15.0));
    }

    #[test]
    fn pointer_maps_through_view() {
        let mut fixture = Fixture::new(vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))]);
        fixture.view = ViewState::new(0.5, p(20.0, 20.0));
        let mut machine = InteractionMachine::new();
        // Screen (95, 95) is image (150, 150)
        let actions = machine.pointer_down(&fixture.ctx(), p(95.0, 95.0));
        assert_eq!(actions, vec![EditAction::Select(Some("a".to_string()))]);
    }

    #[test]
    fn cancel_restores_pre_gesture_set() {
        let original = vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))];
        let mut fixture = Fixture::new(original.clone());
        let mut machine = InteractionMachine::new();
        fixture.apply(machine.pointer_down(&fixture.ctx(), p(150.0, 150.0)));
        fixture.apply(machine.pointer_move(&fixture.ctx(), p(300.0, 300.0)));
        assert_ne!(fixture.annotations, original);

        fixture.apply(machine.cancel());
        assert_eq!(fixture.annotations, original);
        assert!(machine.is_idle());
    }

    #[test]
    fn settle_commits_what_the_preview_showed() {
        let original = vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))];
        let mut fixture = Fixture::new(original.clone());
        let mut machine = InteractionMachine::new();
        fixture.apply(machine.pointer_down(&fixture.ctx(), p(150.0, 150.0)));
        fixture.apply(machine.pointer_move(&fixture.ctx(), p(200.0, 150.0)));

        let moved = fixture.annotations.clone();
        assert_eq!(machine.settle(&moved), vec![EditAction::Commit(moved.clone())]);
        assert!(machine.is_idle());

        // Later moves and the pointer-up no longer touch the set
        assert!(machine.pointer_move(&fixture.ctx(), p(400.0, 400.0)).is_empty());
        assert!(machine.pointer_up(&fixture.ctx(), p(400.0, 400.0)).is_empty());
    }

    #[test]
    fn settle_drops_unfinished_draft() {
        let mut fixture = Fixture::new(vec![]);
        fixture.draw_mode = true;
        let mut machine = InteractionMachine::new();
        fixture.apply(machine.pointer_down(&fixture.ctx(), p(100.0, 100.0)));
        fixture.apply(machine.pointer_move(&fixture.ctx(), p(300.0, 300.0)));

        assert!(machine.settle(&fixture.annotations).is_empty());
        assert_eq!(machine.draft(), None);
    }

    #[test]
    fn press_after_lost_pointer_up_is_still_handled() {
        let mut fixture = Fixture::new(vec![
            car("a", Rect::new(100.0, 100.0, 100.0, 100.0)),
            car("b", Rect::new(600.0, 600.0, 100.0, 100.0)),
        ]);
        let mut machine = InteractionMachine::new();
        fixture.apply(machine.pointer_down(&fixture.ctx(), p(150.0, 150.0)));
        fixture.apply(machine.pointer_move(&fixture.ctx(), p(170.0, 150.0)));
        let moved = fixture.annotations.clone();

        // No pointer-up for the drag of "a"; the next press grabs "b"
        let actions = fixture.apply(machine.pointer_down(&fixture.ctx(), p(650.0, 650.0)));
        assert_eq!(
            actions,
            vec![
                EditAction::Commit(moved),
                EditAction::Select(Some("b".to_string())),
            ]
        );
        assert!(matches!(
            machine.state(),
            InteractionState::DraggingAnnotation { id, .. } if id == "b"
        ));
    }

    #[test]
    fn lock_suppresses_pointer_input() {
        let mut fixture = Fixture::new(vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))]);
        fixture.locked = true;
        let mut machine = InteractionMachine::new();
        assert!(machine.pointer_down(&fixture.ctx(), p(150.0, 150.0)).is_empty());
        assert!(machine.wheel(&fixture.ctx(), p(0.0, 0.0), -1.0).is_empty());
        assert!(machine.is_idle());
    }

    #[test]
    fn wheel_zooms_around_pointer() {
        let fixture = Fixture::new(vec![]);
        let machine = InteractionMachine::new();
        let actions = machine.wheel(&fixture.ctx(), p(100.0, 100.0), -120.0);
        let [EditAction::SetView(view)] = actions.as_slice() else {
            panic!("expected a view change, got {actions:?}");
        };
        assert!((view.scale - zoom::STEP).abs() < 1e-6);
        let under = screen_to_image_point(p(100.0, 100.0), view);
        assert!((under.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn cursor_hints() {
        let mut fixture = Fixture::new(vec![car("a", Rect::new(100.0, 100.0, 100.0, 100.0))]);
        fixture.selected = Some("a".to_string());
        let machine = InteractionMachine::new();
        assert_eq!(machine.cursor(&fixture.ctx(), Some(p(100.0, 100.0))), "nwse-resize");
        assert_eq!(machine.cursor(&fixture.ctx(), Some(p(150.0, 150.0))), "move");
        assert_eq!(machine.cursor(&fixture.ctx(), Some(p(500.0, 500.0))), "grab");
        fixture.draw_mode = true;
        assert_eq!(machine.cursor(&fixture.ctx(), None), "crosshair");
    }
}
