//! Global constants for the BBAT editor engine

/// Hit zone around a selected box's edges for resize handles (image pixels).
pub const HANDLE_SIZE: f32 = 12.0;

/// Smallest width or height a freshly drawn box may have (image pixels).
pub const MIN_DRAW_SIZE: f32 = 20.0;

/// Smallest width or height a box may be resized down to (image pixels).
pub const MIN_RESIZE_SIZE: f32 = 1.0;

/// Consecutive failed auto-save attempts before the status turns to error.
pub const MAX_RETRY_COUNT: u32 = 3;

/// Default number of history snapshots kept for undo.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Viewport zoom limits and defaults.
pub mod zoom {
    /// Minimum viewport scale.
    pub const MIN: f32 = 0.1;
    /// Maximum viewport scale.
    pub const MAX: f32 = 2.0;
    /// Largest scale chosen when centering an image.
    pub const MAX_FIT: f32 = 1.0;
    /// Fraction of the container an image may occupy after centering.
    pub const FIT_RATIO: f32 = 0.8;
    /// Zoom factor for one wheel notch.
    pub const STEP: f32 = 1.1;
}

/// Auto-save timing defaults (milliseconds).
pub mod autosave {
    /// Wait this long after the last change before saving.
    pub const DEBOUNCE_MS: u64 = 1_000;
    /// Give up on a remote request after this long.
    pub const REQUEST_TIMEOUT_MS: u64 = 15_000;
}
