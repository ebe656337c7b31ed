//! Coordinate conversions between the three spaces the editor works in.
//!
//! - **Normalized** (detection format): box center and size as fractions of
//!   the image dimensions, the form exchanged with the remote store.
//! - **Image pixels**: top-left origin and size in pixels, the form held in
//!   the editor's annotation set.
//! - **Screen**: image pixels mapped through the viewport's pan and zoom.

use crate::model::{Annotation, CategoryCatalog, ImageSize, NormalizedAnnotation, Point, Rect};
use crate::viewport::ViewState;

/// Convert a normalized box to image-pixel form.
pub fn to_screen_form(
    id: impl Into<String>,
    normalized: &NormalizedAnnotation,
    image: ImageSize,
) -> Annotation {
    let width = normalized.width * image.width;
    let height = normalized.height * image.height;
    let x = (normalized.x - normalized.width / 2.0) * image.width;
    let y = (normalized.y - normalized.height / 2.0) * image.height;
    Annotation::new(id, Rect::new(x, y, width, height)).with_class(normalized.class_name.clone())
}

/// Convert an image-pixel annotation to normalized form.
///
/// While the image size is unknown the pixel values are passed through
/// unchanged; callers must not persist the result in that case.
pub fn to_normalized_form(
    annotation: &Annotation,
    image: ImageSize,
    catalog: &CategoryCatalog,
) -> NormalizedAnnotation {
    let class_id = catalog.id_of(&annotation.class);
    if !image.is_loaded() {
        log::debug!(
            "Image size unknown, passing annotation {} through unnormalized",
            annotation.id
        );
        return NormalizedAnnotation {
            x: annotation.x,
            y: annotation.y,
            width: annotation.width,
            height: annotation.height,
            class_id,
            class_name: annotation.class.clone(),
        };
    }

    NormalizedAnnotation {
        x: (annotation.x + annotation.width / 2.0) / image.width,
        y: (annotation.y + annotation.height / 2.0) / image.height,
        width: annotation.width / image.width,
        height: annotation.height / image.height,
        class_id,
        class_name: annotation.class.clone(),
    }
}

/// Map a pointer position on screen to image-pixel space.
pub fn screen_to_image_point(pointer: Point, view: &ViewState) -> Point {
    Point::new(
        (pointer.x - view.position.x) / view.scale,
        (pointer.y - view.position.y) / view.scale,
    )
}

/// Map an image-pixel position to screen space.
pub fn image_to_screen_point(point: Point, view: &ViewState) -> Point {
    Point::new(
        point.x * view.scale + view.position.x,
        point.y * view.scale + view.position.y,
    )
}

/// Map an image-pixel rectangle to screen space.
pub fn image_rect_to_screen(rect: Rect, view: &ViewState) -> Rect {
    let origin = image_to_screen_point(Point::new(rect.x, rect.y), view);
    Rect::new(
        origin.x,
        origin.y,
        rect.width * view.scale,
        rect.height * view.scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(vec![Category::new(0, "person"), Category::new(1, "car")])
    }

    #[test]
    fn normalized_corners_to_pixels() {
        // Box spanning (0.1, 0.1)-(0.5, 0.5) on a 1000x1000 image
        let normalized = NormalizedAnnotation {
            x: 0.3,
            y: 0.3,
            width: 0.4,
            height: 0.4,
            class_id: Some(1),
            class_name: "car".to_string(),
        };
        let a = to_screen_form("a", &normalized, ImageSize::new(1000.0, 1000.0));
        assert!(approx_eq(a.x, 100.0));
        assert!(approx_eq(a.y, 100.0));
        assert!(approx_eq(a.width, 400.0));
        assert!(approx_eq(a.height, 400.0));
        assert_eq!(a.class, "car");
        assert_eq!(a.id, "a");
    }

    #[test]
    fn round_trip_is_identity_for_loaded_images() {
        let sizes = [
            ImageSize::new(640.0, 480.0),
            ImageSize::new(1.0, 1.0),
            ImageSize::new(4032.0, 3024.0),
        ];
        let boxes = [
            Annotation::new("a", Rect::new(0.0, 0.0, 1.0, 1.0)).with_class("car"),
            Annotation::new("b", Rect::new(12.5, 40.25, 100.0, 33.0)).with_class("person"),
            Annotation::new("c", Rect::new(0.2, 0.3, 0.4, 0.5)),
        ];
        for size in sizes {
            for original in &boxes {
                let normalized = to_normalized_form(original, size, &catalog());
                let back = to_screen_form(original.id.clone(), &normalized, size);
                assert!(approx_eq(back.x, original.x), "x for {size:?}");
                assert!(approx_eq(back.y, original.y), "y for {size:?}");
                assert!(approx_eq(back.width, original.width), "w for {size:?}");
                assert!(approx_eq(back.height, original.height), "h for {size:?}");
                assert_eq!(back.class, original.class);
            }
        }
    }

    #[test]
    fn normalized_form_resolves_class_id() {
        let a = Annotation::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)).with_class("car");
        let n = to_normalized_form(&a, ImageSize::new(100.0, 100.0), &catalog());
        assert_eq!(n.class_id, Some(1));
        assert!(approx_eq(n.x, 0.05));

        let unknown = a.clone().with_class("tram");
        let n = to_normalized_form(&unknown, ImageSize::new(100.0, 100.0), &catalog());
        assert_eq!(n.class_id, None);
    }

    #[test]
    fn zero_image_size_passes_through() {
        let a = Annotation::new("a", Rect::new(10.0, 20.0, 30.0, 40.0));
        let n = to_normalized_form(&a, ImageSize::new(0.0, 480.0), &catalog());
        assert_eq!((n.x, n.y, n.width, n.height), (10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn screen_and_image_points_are_inverse() {
        let view = ViewState::new(2.0, Point::new(50.0, -20.0));
        let screen = Point::new(150.0, 80.0);
        let image = screen_to_image_point(screen, &view);
        assert!(approx_eq(image.x, 50.0));
        assert!(approx_eq(image.y, 50.0));
        let back = image_to_screen_point(image, &view);
        assert!(approx_eq(back.x, screen.x));
        assert!(approx_eq(back.y, screen.y));
    }

    #[test]
    fn rect_to_screen_scales_size() {
        let view = ViewState::new(0.5, Point::new(10.0, 10.0));
        let r = image_rect_to_screen(Rect::new(100.0, 100.0, 40.0, 20.0), &view);
        assert_eq!(r, Rect::new(60.0, 60.0, 20.0, 10.0));
    }
}
