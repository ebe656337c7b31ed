//! Outputs the editor queues for its host.
//!
//! Neither kind is an error: notices are shown to the annotator as transient
//! warnings, requests ask the host to do something only it can do.

use std::fmt;

use serde::Serialize;

/// Transient warning for the annotator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Draw mode refused while a box has no class
    ClassifyFirst,
    /// Drawn box discarded for being too small
    BoxTooSmall { min_size: f32 },
    /// Drawn box discarded for leaving the image
    BoxOutsideImage,
    /// Pasted text was not an annotation
    InvalidPaste { message: String },
    /// Class name not in the project's catalog
    UnknownClass { name: String },
    /// Auto-save gave up after repeated failures
    AutoSaveFailed,
    /// A save requested by the annotator failed
    SaveFailed { message: String },
    /// Save refused until every box has a class
    SaveNeedsClasses,
    /// Annotations or suggestions could not be loaded
    LoadFailed { message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ClassifyFirst => {
                write!(f, "Assign a class to every box before drawing a new one")
            }
            Notice::BoxTooSmall { min_size } => {
                write!(f, "Box discarded: width and height must be at least {min_size} px")
            }
            Notice::BoxOutsideImage => write!(f, "Box discarded: it must lie inside the image"),
            Notice::InvalidPaste { message } => write!(f, "Cannot paste: {message}"),
            Notice::UnknownClass { name } => write!(f, "Unknown class: {name}"),
            Notice::AutoSaveFailed => {
                write!(f, "Auto-save failed repeatedly; save manually to keep your work")
            }
            Notice::SaveFailed { message } => write!(f, "Save failed: {message}"),
            Notice::SaveNeedsClasses => write!(f, "Assign a class to every box before saving"),
            Notice::LoadFailed { message } => write!(f, "Could not load annotations: {message}"),
        }
    }
}

/// Something only the host can do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum HostRequest {
    /// Leave the editor
    GoBack,
    PreviousImage,
    NextImage,
    /// Put this text on the system clipboard
    WriteClipboard(String),
    /// Read the clipboard and hand the text to `paste`
    ReadClipboard,
    /// Run a manual save (the editor cannot await on its own)
    Save,
}
