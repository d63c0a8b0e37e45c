//! # Lumen Legacy API
//!
//! The narrow seam between the Lumen platform and the legacy imaging
//! application it hosts in-process. This crate defines:
//!
//! - the [`LegacyHooks`] extension-point trait the patched legacy runtime
//!   invokes at well-defined points (plugin dispatch, file opens, progress
//!   and status reporting, window close, shutdown),
//! - the collaborator contracts the bridge consumes from the modern side
//!   ([`LegacyService`], [`StatusService`], [`ImageMap`], [`ThreadService`],
//!   [`PluginResolver`] and the plugins it resolves),
//! - the contracts the bridge consumes from the legacy side
//!   ([`LegacyRuntime`], [`LegacyWindow`], [`CloseConfirmable`]),
//! - identity handles for legacy images ([`ImageHandle`]).
//!
//! Everything here is interface; the implementation lives in
//! `lumen-legacy-bridge`. Collaborators are optional by design: an absent
//! service means "feature disabled", never an error.

pub mod hooks;
pub mod image;
pub mod plugin;
pub mod services;
pub mod thread;
pub mod window;

pub use hooks::{
    CommandOutcome, KeyEvent, LegacyHooks, OpenedObject, LEGACY_SERVICE_COMMAND, OPEN_COMMAND_ARG,
    SERVICE_CONTEXT_COMMAND,
};
pub use image::{ImageDisplay, ImageHandle, LegacyImage};
pub use plugin::{AppConfiguration, LegacyEditor, LegacyOpener, PluginResolver, PostRefreshAction};
pub use services::{ImageMap, ImageMapError, LegacyRuntime, LegacyService, ServiceContext, StatusService};
pub use thread::{ThreadAncestors, ThreadService};
pub use window::{same_window, CloseConfirmable, LegacyWindow};
