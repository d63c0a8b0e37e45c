//! Orchestrates the legacy runtime's close-all-windows request.

use std::sync::Arc;

use lumen_legacy_api::{same_window, LegacyRuntime, LegacyWindow, ThreadService};

/// Splits the open windows into confirmable and unconfirmable, runs
/// confirmation synchronously and defers disposal to the event queue.
///
/// Disposal must never run inline: the runtime's own close-all routine holds
/// the window-manager lock on this call path and disposing a window re-takes
/// it. Queued tasks run only after the current call stack unwinds, which
/// breaks the cycle. The runtime's main window is never considered.
pub struct WindowCloseCoordinator {
    runtime: Arc<dyn LegacyRuntime>,
    queue: Option<Arc<dyn ThreadService>>,
}

impl WindowCloseCoordinator {
    pub fn new(runtime: Arc<dyn LegacyRuntime>, queue: Option<Arc<dyn ThreadService>>) -> Self {
        Self { runtime, queue }
    }

    /// Returns whether the runtime should continue its close-all operation.
    pub fn close_all(&self) -> bool {
        let windows = self.runtime.windows();
        let main = self.runtime.main_window();

        let mut continue_close = true;
        let mut confirmable = Vec::new();
        let mut unconfirmable = Vec::new();

        // Newest first. A declined confirmation stops the partition right
        // there; windows not yet visited are left untouched. Confirmed
        // windows are hidden immediately so no further user input reaches
        // them, and disposed later.
        for window in windows.iter().rev() {
            if !continue_close {
                break;
            }
            if main.as_ref().is_some_and(|m| same_window(m, window)) {
                continue;
            }
            match window.as_confirmable() {
                Some(capability) => {
                    continue_close = capability.confirm_close();
                    if continue_close {
                        confirmable.push(Arc::clone(window));
                        window.set_visible(false);
                    }
                }
                None => unconfirmable.push(Arc::clone(window)),
            }
        }

        // Windows that confirmed are expected to close whatever happened to
        // the rest; a later refusal is a short-circuit, not a rollback.
        self.dispose_later(confirmable);

        if !continue_close {
            return false;
        }

        self.dispose_later(unconfirmable);
        true
    }

    fn dispose_later(&self, windows: Vec<Arc<dyn LegacyWindow>>) {
        if windows.is_empty() {
            return;
        }
        match &self.queue {
            Some(queue) => queue.queue(Box::new(move || {
                for window in &windows {
                    window.dispose();
                }
            })),
            None => {
                tracing::warn!(
                    count = windows.len(),
                    "no event queue available; windows left undisposed"
                );
            }
        }
    }
}
