//! Data models for the BBAT editor.

mod annotation;
mod category;
mod geometry;

pub use annotation::{Annotation, IdAllocator, NormalizedAnnotation, derive_annotation_id};
pub use category::{Category, CategoryCatalog};
pub use geometry::{ImageSize, Point, Rect, Size};
