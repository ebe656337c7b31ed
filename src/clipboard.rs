//! Clipboard text format for copying a single box.
//!
//! Copy writes the annotation as JSON. Paste accepts any JSON object with
//! numeric `x`, `y`, `width` and `height`; `class` is optional and the id is
//! ignored, since the editor assigns a fresh one.

use serde_json::Value;

use crate::error::EditorError;
use crate::model::{Annotation, Point, Rect};

/// Box recovered from clipboard text.
#[derive(Debug, Clone, PartialEq)]
pub struct PastedBox {
    pub rect: Rect,
    pub class: String,
}

/// Serialize an annotation for the clipboard.
pub fn copy_text(annotation: &Annotation) -> Result<String, EditorError> {
    Ok(serde_json::to_string(annotation)?)
}

/// Parse clipboard text into a box.
pub fn parse_paste(text: &str) -> Result<PastedBox, EditorError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| EditorError::invalid_clipboard(format!("not JSON ({e})")))?;
    let Value::Object(fields) = value else {
        return Err(EditorError::invalid_clipboard("expected a JSON object"));
    };

    let number = |name: &str| -> Result<f32, EditorError> {
        let n = fields
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| EditorError::invalid_clipboard(format!("missing numeric `{name}`")))?;
        if !n.is_finite() {
            return Err(EditorError::invalid_clipboard(format!("`{name}` is not finite")));
        }
        Ok(n as f32)
    };

    let (x, y) = (number("x")?, number("y")?);
    let (width, height) = (number("width")?, number("height")?);
    let class = fields
        .get("class")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    // Negative extents describe the same box from its other corner
    let rect = Rect::from_corners(Point::new(x, y), Point::new(x + width, y + height));
    Ok(PastedBox { rect, class })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn copy_then_paste_keeps_geometry_and_class() {
        let original = Annotation::new("a-1", Rect::new(10.0, 20.0, 30.0, 40.0)).with_class("car");
        let text = copy_text(&original).unwrap();
        let pasted = parse_paste(&text).unwrap();
        assert_eq!(
            pasted,
            PastedBox {
                rect: original.rect(),
                class: "car".to_string()
            }
        );
    }

    #[test]
    fn missing_size_is_rejected() {
        let err = parse_paste(r#"{"x":1}"#).unwrap_err();
        assert!(matches!(err, EditorError::InvalidClipboard { .. }));
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        let text = r#"{"x":"1","y":2,"width":3,"height":4}"#;
        assert!(parse_paste(text).is_err());
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(parse_paste("[1, 2, 3, 4]").is_err());
        assert!(parse_paste("hello").is_err());
        assert!(parse_paste("").is_err());
    }

    #[test]
    fn class_is_optional_and_extents_are_normalized() {
        let pasted = parse_paste(r#"{"x":50,"y":50,"width":-20,"height":30,"id":"x"}"#).unwrap();
        assert_eq!(pasted.rect, Rect::new(30.0, 50.0, 20.0, 30.0));
        assert_eq!(pasted.class, "");
    }
}
