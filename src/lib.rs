//! BBAT - Bounding-Box Annotation Tool editor engine
//!
//! A headless engine for drawing, selecting, resizing and classifying
//! axis-aligned boxes over an image. It owns the annotation set, undo history
//! and auto-save bookkeeping, and talks to the outside world through three
//! seams:
//!
//! - pointer and keyboard events in, [`Scene`]s out for rendering,
//! - a [`RemoteStore`] for loading and saving annotations,
//! - queued [`Notice`]s and [`HostRequest`]s the host drains.

pub mod autosave;
pub mod clipboard;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod handles;
pub mod history;
pub mod interaction;
pub mod keybindings;
pub mod message;
pub mod model;
pub mod remote;
pub mod scene;
pub mod transform;
pub mod viewport;

pub use autosave::{SaveOutcome, SaveStatus, SaveTicket};
pub use config::{EditorConfig, LogLevel};
pub use editor::{AnnotationEditor, EditOrigin, LoadTicket};
pub use error::EditorError;
pub use handles::Handle;
pub use history::HistoryLog;
pub use keybindings::{KeyEvent, Platform, ShortcutAction};
pub use message::{HostRequest, Notice};
pub use model::{Annotation, Category, CategoryCatalog, ImageSize, NormalizedAnnotation, Point, Rect, Size};
pub use remote::{AnnotationDocument, MemoryStore, RemoteError, RemoteStore, SavePayload};
pub use scene::Scene;
pub use viewport::ViewState;
