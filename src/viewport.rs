//! Pan and zoom of the image inside its container.
//!
//! This module contains the viewport math, kept free of any rendering so it
//! can be tested on its own.

use serde::{Deserialize, Serialize};

use crate::constants::zoom;
use crate::model::{ImageSize, Point, Size};

/// Viewport transform applied to the image and its annotations.
///
/// Screen position of an image point `p` is `position + p * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub scale: f32,
    pub position: Point,
}

impl ViewState {
    /// Create a view with the given scale and offset.
    pub fn new(scale: f32, position: Point) -> Self {
        Self { scale, position }
    }

    /// Identity view (scale 1, no offset).
    pub fn identity() -> Self {
        Self::new(1.0, Point::default())
    }

    /// Fit and center an image in a container.
    ///
    /// The scale is the largest value not above 1 that fits the image into
    /// 80% of the container on its constraining axis, clamped to the zoom
    /// limits.
    pub fn center_image(container: Size, image: ImageSize) -> ViewState {
        if !image.is_loaded() {
            return ViewState::identity();
        }

        let fit_x = container.width * zoom::FIT_RATIO / image.width;
        let fit_y = container.height * zoom::FIT_RATIO / image.height;
        let scale = fit_x.min(fit_y).min(zoom::MAX_FIT).clamp(zoom::MIN, zoom::MAX_FIT);

        let position = Point::new(
            (container.width - image.width * scale) / 2.0,
            (container.height - image.height * scale) / 2.0,
        );
        ViewState { scale, position }
    }

    /// Zoom by `factor` keeping the point under `pivot` fixed on screen.
    ///
    /// The resulting scale is clamped; the pivot correction uses the factor
    /// actually applied after clamping.
    pub fn zoom(&self, factor: f32, pivot: Point) -> ViewState {
        let scale = (self.scale * factor).clamp(zoom::MIN, zoom::MAX);
        let applied = scale / self.scale;
        ViewState {
            scale,
            position: Point::new(
                self.position.x - (pivot.x - self.position.x) * (applied - 1.0),
                self.position.y - (pivot.y - self.position.y) * (applied - 1.0),
            ),
        }
    }

    /// Move the view by a screen-space delta. No clamping: the image may be
    /// dragged off-screen.
    pub fn pan(&self, delta: Point) -> ViewState {
        ViewState {
            scale: self.scale,
            position: Point::new(self.position.x + delta.x, self.position.y + delta.y),
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Owns the current view together with the sizes needed to reset it.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    view: ViewState,
    container: Size,
    image: ImageSize,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn image(&self) -> ImageSize {
        self.image
    }

    pub fn container(&self) -> Size {
        self.container
    }

    /// Replace the view (e.g. after a pan gesture).
    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    /// Record a new container size and recenter.
    pub fn set_container(&mut self, container: Size) {
        self.container = container;
        self.reset();
    }

    /// Record a new image size and recenter.
    pub fn set_image(&mut self, image: ImageSize) {
        self.image = image;
        self.reset();
    }

    /// Recenter the image in the container.
    pub fn reset(&mut self) {
        self.view = ViewState::center_image(self.container, self.image);
        log::debug!(
            "Viewport reset: scale {:.3}, position ({:.1}, {:.1})",
            self.view.scale,
            self.view.position.x,
            self.view.position.y
        );
    }

    /// Zoom around a screen-space pivot.
    pub fn zoom_at(&mut self, factor: f32, pivot: Point) {
        self.view = self.view.zoom(factor, pivot);
        log::trace!("Zoom {:.3}x at ({:.1}, {:.1})", self.view.scale, pivot.x, pivot.y);
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, delta: Point) {
        self.view = self.view.pan(delta);
    }
}
