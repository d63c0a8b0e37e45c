//! Collaborator contracts on the modern and legacy sides of the bridge.

use std::sync::Arc;

use thiserror::Error;

use crate::hooks::CommandOutcome;
use crate::image::{ImageDisplay, ImageHandle};
use crate::thread::ThreadService;
use crate::window::LegacyWindow;

/// Progress and status reporting on the modern side.
pub trait StatusService: Send + Sync {
    fn show_progress(&self, current: i64, total: i64);
    fn show_status(&self, status: &str);
}

/// Errors signalled by an [`ImageMap`].
#[derive(Debug, Error)]
pub enum ImageMapError {
    /// The running configuration has no image map (headless or dummy
    /// substitute service). Callers treat this as "no capability".
    #[error("image map not supported in this configuration")]
    Unsupported,
}

/// The modern platform's mapping from legacy images to displays.
///
/// A headless substitute returns [`ImageMapError::Unsupported`] from every
/// method; the bridge swallows that signal at each call site.
pub trait ImageMap: Send + Sync {
    fn register_legacy_image(&self, image: &ImageHandle) -> Result<(), ImageMapError>;

    /// The modern display showing `image`, if one exists.
    fn lookup_display(
        &self,
        image: &ImageHandle,
    ) -> Result<Option<Arc<dyn ImageDisplay>>, ImageMapError>;

    fn unregister_legacy_image(&self, image: &ImageHandle) -> Result<(), ImageMapError>;
}

/// The modern service context hosting the bridge.
pub trait ServiceContext: Send + Sync {
    /// The thread service, when one is installed.
    fn thread_service(&self) -> Option<Arc<dyn ThreadService>>;

    /// Tear down the context. Idempotent.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

/// The modern platform's legacy-integration service.
///
/// This is the bridge's window into the service layer: mode flags, status
/// reporting, the image map, shortcut handling and legacy-compatible command
/// resolution all route through here.
pub trait LegacyService: Send + Sync {
    /// Whether modern services are suppressed and the legacy runtime runs
    /// the show alone.
    fn is_legacy_mode(&self) -> bool;

    fn is_initialized(&self) -> bool;

    fn context(&self) -> Arc<dyn ServiceContext>;

    fn status(&self) -> Arc<dyn StatusService>;

    fn image_map(&self) -> Arc<dyn ImageMap>;

    /// Whether a shortcut is bound to the given accelerator, and if so run
    /// it. Returns whether the event was consumed.
    fn handle_shortcut(&self, accelerator: &str) -> bool;

    /// Run the modern command registered under a fully-qualified legacy
    /// command name, if any.
    fn run_legacy_compatible_command(&self, name: &str) -> Option<CommandOutcome>;

    /// Version of the modern application, when one is registered.
    fn app_version(&self) -> Option<String>;
}

/// The hosted legacy runtime itself.
pub trait LegacyRuntime: Send + Sync {
    /// Fully-qualified name of the runtime's command-dispatch entry point.
    fn commands_name(&self) -> String;

    /// Ask the runtime to open `path` directly, short-circuiting its own
    /// file dialog.
    fn open_path_directly(&self, path: &str);

    fn version(&self) -> String;

    /// Snapshot of the currently open windows, oldest first.
    fn windows(&self) -> Vec<Arc<dyn LegacyWindow>>;

    /// The runtime's main window, excluded from close-all processing.
    fn main_window(&self) -> Option<Arc<dyn LegacyWindow>>;

    /// Whether a bridge-initiated disposal is already in progress.
    fn is_disposing(&self) -> bool;
}
