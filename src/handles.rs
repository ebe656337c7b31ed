//! Resize handles of the selected box: hit-testing and clamped edits.
//!
//! All inputs are in image-pixel space.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_RESIZE_SIZE;
use crate::model::{Annotation, ImageSize, Point, Rect};

/// One of the eight hit zones on a selected box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    /// All handles, clockwise from the top-left corner.
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomRight | Handle::BottomLeft
        )
    }

    /// Pointer cursor to show while hovering or dragging this handle.
    pub fn cursor(&self) -> &'static str {
        match self {
            Handle::TopLeft | Handle::BottomRight => "nwse-resize",
            Handle::TopRight | Handle::BottomLeft => "nesw-resize",
            Handle::Top | Handle::Bottom => "ns-resize",
            Handle::Left | Handle::Right => "ew-resize",
        }
    }

    /// Where the handle sits on `rect` (corner or edge midpoint).
    pub fn anchor(&self, rect: &Rect) -> Point {
        let center = rect.center();
        match self {
            Handle::TopLeft => Point::new(rect.x, rect.y),
            Handle::Top => Point::new(center.x, rect.y),
            Handle::TopRight => Point::new(rect.right(), rect.y),
            Handle::Right => Point::new(rect.right(), center.y),
            Handle::BottomRight => Point::new(rect.right(), rect.bottom()),
            Handle::Bottom => Point::new(center.x, rect.bottom()),
            Handle::BottomLeft => Point::new(rect.x, rect.bottom()),
            Handle::Left => Point::new(rect.x, center.y),
        }
    }

    fn moves_left(&self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Left | Handle::BottomLeft)
    }

    fn moves_right(&self) -> bool {
        matches!(self, Handle::TopRight | Handle::Right | Handle::BottomRight)
    }

    fn moves_top(&self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Top | Handle::TopRight)
    }

    fn moves_bottom(&self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::Bottom | Handle::BottomRight)
    }
}

/// Find the handle of `annotation` under `point`, if any.
///
/// Corners win over sides. A side only matches when the point is near that
/// single edge and inside the edge's span shrunk by `handle_size` at both ends.
pub fn classify_handle(point: Point, annotation: &Annotation, handle_size: f32) -> Option<Handle> {
    let rect = annotation.rect();
    let near = |a: f32, b: f32| (a - b).abs() <= handle_size;

    let near_left = near(point.x, rect.x);
    let near_right = near(point.x, rect.right());
    let near_top = near(point.y, rect.y);
    let near_bottom = near(point.y, rect.bottom());

    match (near_left, near_right, near_top, near_bottom) {
        (true, _, true, _) => return Some(Handle::TopLeft),
        (_, true, true, _) => return Some(Handle::TopRight),
        (true, _, _, true) => return Some(Handle::BottomLeft),
        (_, true, _, true) => return Some(Handle::BottomRight),
        _ => {}
    }

    let near_count = [near_left, near_right, near_top, near_bottom]
        .iter()
        .filter(|n| **n)
        .count();
    if near_count != 1 {
        return None;
    }

    let in_x_span = point.x >= rect.x + handle_size && point.x <= rect.right() - handle_size;
    let in_y_span = point.y >= rect.y + handle_size && point.y <= rect.bottom() - handle_size;

    if near_top && in_x_span {
        Some(Handle::Top)
    } else if near_bottom && in_x_span {
        Some(Handle::Bottom)
    } else if near_left && in_y_span {
        Some(Handle::Left)
    } else if near_right && in_y_span {
        Some(Handle::Right)
    } else {
        None
    }
}

/// Move the edge(s) owned by `handle` to `point`.
///
/// Width and height never drop below one pixel, and moved edges stay inside
/// the image once its size is known. Id and class are kept.
pub fn resize(annotation: &Annotation, handle: Handle, point: Point, image: ImageSize) -> Annotation {
    let (min_x, max_x, min_y, max_y) = bounds(image);
    let rect = annotation.rect();
    let (mut left, mut top, mut right, mut bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

    if handle.moves_left() {
        left = point.x.max(min_x).min(right - MIN_RESIZE_SIZE);
    }
    if handle.moves_right() {
        right = point.x.min(max_x).max(left + MIN_RESIZE_SIZE);
    }
    if handle.moves_top() {
        top = point.y.max(min_y).min(bottom - MIN_RESIZE_SIZE);
    }
    if handle.moves_bottom() {
        bottom = point.y.min(max_y).max(top + MIN_RESIZE_SIZE);
    }

    annotation.with_rect(Rect::from_edges(left, top, right, bottom))
}

/// Move a box by `delta`, keeping it inside the image once its size is known.
pub fn translate(annotation: &Annotation, delta: Point, image: ImageSize) -> Annotation {
    let (min_x, max_x, min_y, max_y) = bounds(image);
    let x = (annotation.x + delta.x)
        .min(max_x - annotation.width)
        .max(min_x);
    let y = (annotation.y + delta.y)
        .min(max_y - annotation.height)
        .max(min_y);
    annotation.with_rect(Rect::new(x, y, annotation.width, annotation.height))
}

fn bounds(image: ImageSize) -> (f32, f32, f32, f32) {
    if image.is_loaded() {
        (0.0, image.width, 0.0, image.height)
    } else {
        (
            f32::NEG_INFINITY,
            f32::INFINITY,
            f32::NEG_INFINITY,
            f32::INFINITY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HANDLE_SIZE;

    fn square() -> Annotation {
        Annotation::new("a", Rect::new(0.0, 0.0, 100.0, 100.0)).with_class("car")
    }

    fn image() -> ImageSize {
        ImageSize::new(500.0, 400.0)
    }

    #[test]
    fn classify_corner_side_and_inside() {
        let a = square();
        assert_eq!(classify_handle(Point::new(0.0, 0.0), &a, HANDLE_SIZE), Some(Handle::TopLeft));
        assert_eq!(classify_handle(Point::new(50.0, 0.0), &a, HANDLE_SIZE), Some(Handle::Top));
        assert_eq!(classify_handle(Point::new(50.0, 50.0), &a, HANDLE_SIZE), None);
    }

    #[test]
    fn classify_every_handle() {
        let a = square();
        let cases = [
            (Point::new(100.0, 0.0), Handle::TopRight),
            (Point::new(98.0, 50.0), Handle::Right),
            (Point::new(105.0, 103.0), Handle::BottomRight),
            (Point::new(50.0, 100.0), Handle::Bottom),
            (Point::new(-4.0, 96.0), Handle::BottomLeft),
            (Point::new(3.0, 50.0), Handle::Left),
        ];
        for (point, expected) in cases {
            assert_eq!(classify_handle(point, &a, HANDLE_SIZE), Some(expected), "{point:?}");
        }
    }

    #[test]
    fn side_requires_shrunk_span() {
        let a = square();
        assert_eq!(classify_handle(Point::new(12.0, 0.0), &a, HANDLE_SIZE), Some(Handle::TopLeft));
        assert_eq!(classify_handle(Point::new(12.5, 0.0), &a, HANDLE_SIZE), Some(Handle::Top));
        // Level with the top edge but beyond the left end of the box
        assert_eq!(classify_handle(Point::new(-20.0, 0.0), &a, HANDLE_SIZE), None);
    }

    #[test]
    fn far_away_point_is_none() {
        assert_eq!(classify_handle(Point::new(300.0, 300.0), &square(), HANDLE_SIZE), None);
    }

    #[test]
    fn side_resize_moves_one_edge() {
        let a = Annotation::new("a", Rect::new(100.0, 100.0, 100.0, 100.0));
        let r = resize(&a, Handle::Right, Point::new(250.0, 999.0), image());
        assert_eq!(r.rect(), Rect::new(100.0, 100.0, 150.0, 100.0));

        let t = resize(&a, Handle::Top, Point::new(0.0, 50.0), image());
        assert_eq!(t.rect(), Rect::new(100.0, 50.0, 100.0, 150.0));
    }

    #[test]
    fn corner_resize_moves_two_edges() {
        let a = Annotation::new("a", Rect::new(100.0, 100.0, 100.0, 100.0)).with_class("car");
        let r = resize(&a, Handle::BottomLeft, Point::new(80.0, 260.0), image());
        assert_eq!(r.rect(), Rect::new(80.0, 100.0, 120.0, 160.0));
        assert_eq!(r.id, "a");
        assert_eq!(r.class, "car");
    }

    #[test]
    fn resize_keeps_minimum_size() {
        let a = Annotation::new("a", Rect::new(100.0, 100.0, 100.0, 100.0));
        let r = resize(&a, Handle::Left, Point::new(400.0, 150.0), image());
        assert_eq!(r.x, 199.0);
        assert_eq!(r.width, 1.0);

        let b = resize(&a, Handle::Bottom, Point::new(150.0, -50.0), image());
        assert_eq!(b.height, 1.0);
        assert_eq!(b.y, 100.0);
    }

    #[test]
    fn resize_clamps_to_image() {
        let a = Annotation::new("a", Rect::new(100.0, 100.0, 100.0, 100.0));
        let r = resize(&a, Handle::TopLeft, Point::new(-30.0, -10.0), image());
        assert_eq!(r.rect(), Rect::new(0.0, 0.0, 200.0, 200.0));

        let r = resize(&a, Handle::BottomRight, Point::new(900.0, 900.0), image());
        assert_eq!(r.rect(), Rect::new(100.0, 100.0, 400.0, 300.0));
    }

    #[test]
    fn translate_stays_inside_image() {
        let a = Annotation::new("a", Rect::new(10.0, 10.0, 50.0, 50.0));
        let moved = translate(&a, Point::new(30.0, 5.0), image());
        assert_eq!(moved.rect(), Rect::new(40.0, 15.0, 50.0, 50.0));

        let clamped = translate(&a, Point::new(1000.0, -1000.0), image());
        assert_eq!(clamped.rect(), Rect::new(450.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn translate_without_image_is_unbounded() {
        let a = Annotation::new("a", Rect::new(10.0, 10.0, 50.0, 50.0));
        let moved = translate(&a, Point::new(-100.0, 2000.0), ImageSize::default());
        assert_eq!(moved.rect(), Rect::new(-90.0, 2010.0, 50.0, 50.0));
    }

    #[test]
    fn anchors_and_cursors() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(Handle::Bottom.anchor(&rect), Point::new(50.0, 50.0));
        assert_eq!(Handle::TopRight.anchor(&rect), Point::new(100.0, 0.0));
        assert_eq!(Handle::TopLeft.cursor(), "nwse-resize");
        assert_eq!(Handle::Left.cursor(), "ew-resize");
        assert_eq!(Handle::ALL.iter().filter(|h| h.is_corner()).count(), 4);
    }
}
