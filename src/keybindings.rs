//! Keyboard shortcuts of the editor.
//!
//! Maps key + modifier combos to semantic [`ShortcutAction`]s. The primary
//! modifier is Command on Apple platforms and Control everywhere else.

use serde::{Deserialize, Serialize};

/// Platform family, used to pick the primary modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// macOS and iOS: primary modifier is ⌘ (meta)
    Apple,
    /// Everything else: primary modifier is Ctrl
    #[default]
    Other,
}

impl Platform {
    /// Detect the platform from a platform string such as `"MacIntel"`.
    pub fn detect(platform: &str) -> Self {
        let platform = platform.to_ascii_lowercase();
        if ["mac", "iphone", "ipad", "ipod"]
            .iter()
            .any(|p| platform.contains(p))
        {
            Platform::Apple
        } else {
            Platform::Other
        }
    }

    /// Platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_vendor = "apple") {
            Platform::Apple
        } else {
            Platform::Other
        }
    }

    /// Label of the primary modifier in help text.
    pub fn primary_glyph(&self) -> &'static str {
        match self {
            Platform::Apple => "⌘",
            Platform::Other => "Ctrl",
        }
    }
}

/// A key press as delivered by the host.
///
/// `key` uses `KeyboardEvent.key` names (`"z"`, `"Delete"`, `"ArrowLeft"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
    /// The event came from a text field; shortcuts must not fire.
    #[serde(default)]
    pub editable_target: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Mark the event as typed into an editable element.
    pub fn in_text_field(mut self) -> Self {
        self.editable_target = true;
        self
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutAction {
    // ── Edit ──
    Undo,
    Redo,
    CopySelected,
    Paste,
    DeleteSelected,
    Save,

    // ── Modes ──
    /// Leave draw mode if active, otherwise go back
    CancelOrBack,
    ToggleDrawMode,
    ToggleLock,

    // ── View ──
    ResetView,

    // ── Navigation ──
    PreviousImage,
    NextImage,
}

/// One row of the help overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    pub action: &'static str,
    pub shortcut: String,
}

/// Resolves key events into shortcut actions for one platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortcutMap {
    platform: Platform,
}

impl ShortcutMap {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn primary(&self, event: &KeyEvent) -> bool {
        match self.platform {
            Platform::Apple => event.meta,
            Platform::Other => event.ctrl,
        }
    }

    /// Resolve a key event to an action.
    ///
    /// Returns `None` if the key combo has no binding or the event came from
    /// a text field.
    pub fn resolve(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        if event.editable_target {
            return None;
        }
        let key = event.key.as_str();

        // ── Modifier combos first (most specific) ──
        if self.primary(event) {
            if event.shift {
                return match key {
                    "z" | "Z" => Some(ShortcutAction::Redo),
                    _ => None,
                };
            }
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "c" | "C" => Some(ShortcutAction::CopySelected),
                "v" | "V" => Some(ShortcutAction::Paste),
                "d" | "D" => Some(ShortcutAction::DeleteSelected),
                "s" | "S" => Some(ShortcutAction::Save),
                _ => None,
            };
        }

        if event.ctrl || event.meta || event.alt {
            return None;
        }

        // ── Single keys ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            "Escape" => Some(ShortcutAction::CancelOrBack),
            "b" | "B" => Some(ShortcutAction::ToggleDrawMode),
            "r" | "R" => Some(ShortcutAction::ResetView),
            "l" | "L" => Some(ShortcutAction::ToggleLock),
            "ArrowLeft" => Some(ShortcutAction::PreviousImage),
            "ArrowRight" => Some(ShortcutAction::NextImage),
            _ => None,
        }
    }

    /// Rows of the keyboard help overlay, with this platform's modifier glyph.
    pub fn help_entries(&self) -> Vec<HelpEntry> {
        let primary = self.platform.primary_glyph();
        let entry = |action: &'static str, shortcut: String| HelpEntry { action, shortcut };
        vec![
            entry("Undo", format!("{primary}+Z")),
            entry("Redo", format!("{primary}+Shift+Z")),
            entry("Copy selected box", format!("{primary}+C")),
            entry("Paste box", format!("{primary}+V")),
            entry("Delete selected box", format!("{primary}+D / Delete / Backspace")),
            entry("Save", format!("{primary}+S")),
            entry("Toggle draw mode", "B".to_string()),
            entry("Reset view", "R".to_string()),
            entry("Lock / unlock canvas", "L".to_string()),
            entry("Leave draw mode / go back", "Esc".to_string()),
            entry("Previous / next image", "← / →".to_string()),
        ]
    }
}
