//! The extension-point trait the legacy runtime invokes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::image::ImageHandle;
use crate::services::{LegacyService, ServiceContext};
use crate::thread::ThreadAncestors;

/// Command name that resolves to the legacy service singleton.
pub const LEGACY_SERVICE_COMMAND: &str = "lumen.legacy.LegacyService";

/// Command name that resolves to the modern service context.
pub const SERVICE_CONTEXT_COMMAND: &str = "lumen.core.Context";

/// Argument selecting the legacy runtime's file-open command.
pub const OPEN_COMMAND_ARG: &str = "open";

/// Result of intercepting a legacy command dispatch.
pub enum CommandOutcome {
    /// The legacy service singleton itself.
    Service(Arc<dyn LegacyService>),
    /// The modern service context.
    Context(Arc<dyn ServiceContext>),
    /// A file-open interception result.
    Opened(OpenedObject),
    /// The result of running a legacy-compatible modern command.
    Value(serde_json::Value),
}

impl std::fmt::Debug for CommandOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(_) => f.write_str("CommandOutcome::Service"),
            Self::Context(_) => f.write_str("CommandOutcome::Context"),
            Self::Opened(o) => write!(f, "CommandOutcome::Opened({o:?})"),
            Self::Value(v) => write!(f, "CommandOutcome::Value({v})"),
        }
    }
}

/// What an opener produced.
#[derive(Debug, Clone)]
pub enum OpenedObject {
    /// A filesystem path the legacy runtime should open directly.
    Path(String),
    /// An image already materialized on the modern side.
    Image(ImageHandle),
}

/// A normalized keyboard event from the legacy runtime.
#[derive(Debug, Clone)]
pub struct KeyEvent {
    accelerator: String,
    control_down: bool,
}

impl KeyEvent {
    /// `accelerator` is the platform combo representation, e.g.
    /// `"pressed F5"` or `"control pressed S"`.
    pub fn new(accelerator: impl Into<String>, control_down: bool) -> Self {
        Self {
            accelerator: accelerator.into(),
            control_down,
        }
    }

    pub fn accelerator(&self) -> &str {
        &self.accelerator
    }

    pub fn is_control_down(&self) -> bool {
        self.control_down
    }
}

/// Every extension point the patched legacy runtime calls into.
///
/// Implementations must never let an internal failure escape back into the
/// legacy runtime: absent collaborators and unsupported operations are
/// absorbed, and each method degrades to its documented default.
pub trait LegacyHooks: Send + Sync {
    /// Whether modern services are suppressed.
    fn is_legacy_mode(&self) -> bool {
        false
    }

    /// The modern service context, once available.
    fn context(&self) -> Option<Arc<dyn ServiceContext>> {
        None
    }

    /// One-time setup after the hooks are wired into the runtime.
    fn installed(&self) {}

    /// Counterpart of [`LegacyHooks::installed`].
    fn dispose(&self) {}

    /// Intercept a legacy command dispatch. `None` means "no interception,
    /// proceed normally".
    fn intercept_run_command(&self, _name: &str, _arg: &str) -> Option<CommandOutcome> {
        None
    }

    /// Relay a progress fraction in `[0, 1]`.
    fn show_progress(&self, _fraction: f64) {}

    /// Relay progress as a step pair.
    fn show_progress_steps(&self, _current: i64, _total: i64) {}

    /// Relay a status message.
    fn show_status(&self, _status: &str) {}

    /// An image window appeared.
    fn register_image(&self, _image: &ImageHandle) {}

    /// An image window disappeared.
    fn unregister_image(&self, _image: &ImageHandle) {}

    fn debug(&self, _message: &str) {}

    fn error(&self, _error: &(dyn std::error::Error + 'static)) {}

    /// Side-channel log relay, see the bridge's log-file handling.
    fn log(&self, _message: &str) {}

    /// Application name shown by the legacy runtime.
    fn app_name(&self) -> String;

    /// Combined application version string.
    fn app_version(&self) -> String;

    /// Icon used by the legacy runtime's windows.
    fn icon_path(&self) -> PathBuf;

    /// Invoked after the legacy runtime rebuilds its menu structure.
    fn run_after_refresh_menus(&self) {}

    /// Open `path` in the registered editor, if it is a plausible text file.
    fn open_in_editor(&self, _path: &str) -> bool {
        false
    }

    /// Create a buffer in the registered editor.
    fn create_in_editor(&self, _title: &str, _content: &str) -> bool {
        false
    }

    /// Intercept an open request with explicit plane and display choices.
    fn intercept_open(
        &self,
        _path: &str,
        _plane_index: Option<usize>,
        _display: bool,
    ) -> Option<OpenedObject> {
        None
    }

    /// Intercept the runtime's file-open dialog path (`None` = no
    /// preselected file).
    fn intercept_file_open(&self, _path: Option<&str>) -> Option<OpenedObject> {
        None
    }

    /// Intercept an image-open request that must not display.
    fn intercept_open_image(&self, _path: &str, _plane_index: Option<usize>) -> Option<OpenedObject> {
        None
    }

    /// Intercept a recent-files menu selection.
    fn intercept_open_recent(&self, _path: &str) -> Option<OpenedObject> {
        None
    }

    /// Intercept a file dropped onto the runtime.
    fn intercept_drag_and_drop_file(&self, _path: &Path) -> Option<OpenedObject> {
        None
    }

    /// Returns whether the key event was consumed by a modern shortcut.
    fn intercept_key_pressed(&self, _event: &KeyEvent) -> bool {
        false
    }

    /// Ancestors of the calling thread, or `None` when the thread service
    /// is unavailable.
    fn thread_ancestors(&self) -> Option<ThreadAncestors> {
        None
    }

    /// Returns whether the runtime should continue closing all windows.
    fn intercept_close_all_windows(&self) -> bool {
        true
    }

    /// The runtime is shutting down. Returns whether to continue shutdown
    /// (always true in practice).
    fn disposing(&self) -> bool {
        true
    }
}
