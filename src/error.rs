//! Error types for editor operations.

use thiserror::Error;

use crate::config::ConfigError;
use crate::remote::RemoteError;

/// Errors that can occur while editing annotations.
///
/// Nothing here is fatal to the host: every variant leaves the annotation set
/// in memory intact so the operation can be retried.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The remote store rejected or failed a request
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An annotation still has no class assigned
    #[error("Annotation {id} has no class assigned")]
    Unclassified {
        /// The unclassified annotation's id
        id: String,
    },

    /// Class name is not part of the project's catalog
    #[error("Unknown class: {name}")]
    UnknownClass {
        /// The class name that was requested
        name: String,
    },

    /// Clipboard text is not a usable annotation
    #[error("Invalid clipboard payload: {message}")]
    InvalidClipboard {
        /// Why the payload was rejected
        message: String,
    },

    /// No annotation with this id exists
    #[error("Annotation not found: {id}")]
    AnnotationNotFound {
        /// The missing id
        id: String,
    },

    /// Operation requires an open image
    #[error("No image is open")]
    NoImage,

    /// Another save request is still outstanding
    #[error("A save is already in progress")]
    SaveInProgress,
}

impl EditorError {
    /// Create an invalid clipboard error with a message.
    pub fn invalid_clipboard(message: impl Into<String>) -> Self {
        Self::InvalidClipboard {
            message: message.into(),
        }
    }

    /// Create an unclassified annotation error.
    pub fn unclassified(id: impl Into<String>) -> Self {
        Self::Unclassified { id: id.into() }
    }
}
