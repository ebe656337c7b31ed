//! Annotation types in image-pixel and normalized (wire) form.

use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect};

/// A bounding box in image-pixel space with a top-left origin.
///
/// An empty `class` means the annotator has not classified the box yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable identifier, unique within one image.
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Class name, empty while unclassified.
    #[serde(default)]
    pub class: String,
}

impl Annotation {
    /// Create an unclassified annotation covering `rect`.
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: id.into(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            class: String::new(),
        }
    }

    /// Set the class name.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Copy of this annotation with new geometry, keeping id and class.
    pub fn with_rect(&self, rect: Rect) -> Self {
        Self {
            id: self.id.clone(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            class: self.class.clone(),
        }
    }

    pub fn is_classified(&self) -> bool {
        !self.class.is_empty()
    }

    /// Check if a point (image space) is inside the box.
    pub fn contains(&self, point: Point) -> bool {
        self.rect().contains(point)
    }
}

/// Detection-format box: center and size normalized to `[0, 1]`.
///
/// This is the only form exchanged with the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAnnotation {
    /// Center X as a fraction of image width
    pub x: f32,
    /// Center Y as a fraction of image height
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Numeric class id, absent when the class name is not in the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<u32>,
    #[serde(default)]
    pub class_name: String,
}

/// Derive a deterministic annotation id.
///
/// Combines the image id, the source class id, the position in the source
/// list and the rounded pixel center so reloading the same document yields the
/// same ids without collisions between otherwise identical boxes.
pub fn derive_annotation_id(
    prefix: Option<&str>,
    image_id: &str,
    class_id: Option<u32>,
    index: usize,
    center: Point,
) -> String {
    let class = class_id.map_or_else(|| "none".to_string(), |id| id.to_string());
    let (cx, cy) = (center.x.round() as i64, center.y.round() as i64);
    match prefix {
        Some(prefix) => format!("{prefix}-{image_id}-{class}-{index}-{cx}-{cy}"),
        None => format!("{image_id}-{class}-{index}-{cx}-{cy}"),
    }
}

/// Hands out fresh ids for drawn and pasted boxes.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for `image_id` that no annotation in `taken` already uses.
    pub fn allocate(&mut self, image_id: &str, taken: &[Annotation]) -> String {
        loop {
            let candidate = format!("{image_id}-box-{}", self.next);
            self.next += 1;
            if !taken.iter().any(|a| a.id == candidate) {
                return candidate;
            }
        }
    }
}
