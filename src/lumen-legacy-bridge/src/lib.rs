//! # Lumen Legacy Bridge
//!
//! Hosts the legacy imaging application inside the Lumen platform's process
//! and keeps the two worlds honest with each other. The bridge intercepts
//! the legacy runtime's extension points — plugin dispatch, file opens,
//! drag-and-drop, keyboard shortcuts, progress/status reporting, window
//! closing and shutdown — and routes them through Lumen's service layer,
//! while tracking which images each legacy invocation created or closed.
//!
//! ## Pieces
//!
//! - [`BridgeHooks`]: the single implementation of every extension point
//!   the patched legacy runtime calls.
//! - [`ThreadGroupRegistry`] + [`OutputTrackerRegistry`]: per-invocation
//!   bookkeeping of legacy side effects, keyed by explicit thread groups.
//! - [`WindowCloseCoordinator`]: confirm-then-defer-dispose orchestration
//!   of the runtime's close-all-windows request.
//! - [`BridgeThreadService`]: parent-link tracking and the single-consumer
//!   event queue disposal is deferred onto.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lumen_legacy_bridge::{
//!     BridgeConfig, BridgeHooks, BridgeThreadService, OutputTrackerRegistry,
//!     ThreadGroupRegistry,
//! };
//!
//! let threads = Arc::new(BridgeThreadService::new());
//! let groups = Arc::new(ThreadGroupRegistry::new(Some(threads.clone() as _)));
//! let trackers = Arc::new(OutputTrackerRegistry::new(groups));
//! let hooks = BridgeHooks::new(service, runtime, trackers, resolver, BridgeConfig::default());
//! legacy_runtime.install_hooks(Arc::new(hooks));
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod hooks;
pub mod logfile;
pub mod openers;
pub mod threads;
pub mod thread_group;
pub mod tracker;
pub mod window_close;

pub use config::{BridgeConfig, DEFAULT_APP_NAME, DEFAULT_ICON_PATH, LOG_FILE_PROPERTY};
pub use error::{BridgeError, Result};
pub use hooks::BridgeHooks;
pub use logfile::LogFileSink;
pub use openers::{OpenerChain, LUT_EXTENSION};
pub use threads::BridgeThreadService;
pub use thread_group::{GroupId, GroupGuard, ThreadGroupRegistry};
pub use tracker::{NullOutputTracker, OutputTracker, OutputTrackerRegistry, SessionOutputTracker};
pub use window_close::WindowCloseCoordinator;
