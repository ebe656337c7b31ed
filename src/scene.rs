//! Renderer-agnostic description of what the editor shows.
//!
//! A [`Scene`] is a flat list of screen-space rectangles over the image.
//! Hosts draw it with whatever surface they have (canvas, SVG, GPU).

use serde::Serialize;

use crate::autosave::SaveStatus;
use crate::handles::Handle;
use crate::interaction::InteractionContext;
use crate::model::{ImageSize, Point, Rect};
use crate::transform::{image_rect_to_screen, image_to_screen_point};
use crate::viewport::ViewState;

/// One annotation as drawn on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneBox {
    pub id: String,
    pub class: String,
    /// Screen-space rectangle
    pub rect: Rect,
    pub selected: bool,
    /// Drawn with a warning style until a class is assigned
    pub unclassified: bool,
}

/// A resize handle of the selected box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneHandle {
    pub handle: Handle,
    /// Screen-space square centered on the handle anchor
    pub rect: Rect,
    pub cursor: &'static str,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub image: ImageSize,
    /// Where the image lands on screen
    pub image_rect: Rect,
    pub view: ViewState,
    /// Annotations in paint order (last on top)
    pub boxes: Vec<SceneBox>,
    pub handles: Vec<SceneHandle>,
    /// Rubber-band box while drawing, screen space
    pub draft: Option<Rect>,
    pub cursor: &'static str,
    pub draw_mode: bool,
    pub locked: bool,
    pub status: SaveStatus,
}

impl Scene {
    /// Build the scene for the editor state in `ctx`.
    ///
    /// `draft` is in image space.
    pub fn compose(
        ctx: &InteractionContext<'_>,
        draft: Option<Rect>,
        cursor: &'static str,
        status: SaveStatus,
    ) -> Scene {
        let view = ctx.view;
        let boxes: Vec<SceneBox> = ctx
            .annotations
            .iter()
            .map(|a| SceneBox {
                id: a.id.clone(),
                class: a.class.clone(),
                rect: image_rect_to_screen(a.rect(), &view),
                selected: ctx.selected == Some(a.id.as_str()),
                unclassified: !a.is_classified(),
            })
            .collect();

        let handles = ctx
            .selected
            .and_then(|id| ctx.annotations.iter().find(|a| a.id == id))
            .filter(|_| !ctx.locked)
            .map(|a| {
                let side = ctx.handle_size * view.scale;
                Handle::ALL
                    .iter()
                    .map(|&handle| {
                        let center = image_to_screen_point(handle.anchor(&a.rect()), &view);
                        SceneHandle {
                            handle,
                            rect: square_at(center, side),
                            cursor: handle.cursor(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Scene {
            image: ctx.image,
            image_rect: image_rect_to_screen(
                Rect::new(0.0, 0.0, ctx.image.width, ctx.image.height),
                &view,
            ),
            view,
            boxes,
            handles,
            draft: draft.map(|d| image_rect_to_screen(d, &view)),
            cursor,
            draw_mode: ctx.draw_mode,
            locked: ctx.locked,
            status,
        }
    }
}

fn square_at(center: Point, side: f32) -> Rect {
    Rect::new(center.x - side / 2.0, center.y - side / 2.0, side, side)
}
