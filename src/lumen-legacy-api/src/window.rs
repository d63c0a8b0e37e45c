//! Window handles and the close-confirmation capability.

use std::sync::Arc;

/// Capability for windows that want a say before being closed.
pub trait CloseConfirmable: Send + Sync {
    /// Ask whether the window may close. Returning `false` cancels the
    /// enclosing close-all operation.
    fn confirm_close(&self) -> bool;
}

/// A window owned by the legacy runtime.
pub trait LegacyWindow: Send + Sync {
    fn title(&self) -> String;

    fn set_visible(&self, visible: bool);

    /// Release the window's native resources. Must only be invoked from the
    /// event queue, never while the window manager's lock is held.
    fn dispose(&self);

    /// The close-confirmation capability, when this window carries one.
    fn as_confirmable(&self) -> Option<&dyn CloseConfirmable> {
        None
    }
}

/// Identity comparison for window handles.
pub fn same_window(a: &Arc<dyn LegacyWindow>, b: &Arc<dyn LegacyWindow>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
