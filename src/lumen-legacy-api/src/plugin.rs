//! Pluggable collaborators resolved from the plugin framework.
//!
//! All of these are optional: the bridge runs with any subset absent and
//! treats a missing collaborator as "feature disabled".

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::hooks::OpenedObject;

/// A pluggable file-open handler.
///
/// Openers form an ordered chain; the first one to return `Some` wins and
/// the rest are not consulted.
pub trait LegacyOpener: Send + Sync {
    /// Attempt to open `path` (`None` means the opener may prompt for one)
    /// at the given plane index (`None` = unspecified), optionally showing
    /// the result. Return `None` to decline.
    fn open(
        &self,
        path: Option<&str>,
        plane_index: Option<usize>,
        display: bool,
    ) -> Option<OpenedObject>;
}

/// A text editor the legacy runtime can delegate to.
pub trait LegacyEditor: Send + Sync {
    /// Open an existing file. Returns whether the file was opened.
    fn open(&self, path: &Path) -> bool;

    /// Create a new buffer with the given title and content. Returns whether
    /// it was created.
    fn create(&self, title: &str, content: &str) -> bool;
}

/// Branding overrides for the hosted legacy runtime.
pub trait AppConfiguration: Send + Sync {
    fn app_name(&self) -> String;

    fn icon_path(&self) -> PathBuf;
}

/// Zero-argument action invoked after the legacy runtime rebuilds its menus.
pub trait PostRefreshAction: Send + Sync {
    fn run(&self);
}

/// Discovery seam into the plugin framework.
///
/// The bridge resolves its collaborators through this once, at install time.
/// A framework that is not running simply yields nothing.
pub trait PluginResolver: Send + Sync {
    fn editor(&self) -> Option<Arc<dyn LegacyEditor>> {
        None
    }

    fn app_configuration(&self) -> Option<Arc<dyn AppConfiguration>> {
        None
    }

    fn post_refresh_actions(&self) -> Vec<Arc<dyn PostRefreshAction>> {
        Vec::new()
    }

    fn openers(&self) -> Vec<Arc<dyn LegacyOpener>> {
        Vec::new()
    }
}
