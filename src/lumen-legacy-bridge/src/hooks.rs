//! The bridge's implementation of every legacy extension point.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lumen_legacy_api::{
    AppConfiguration, CommandOutcome, ImageHandle, KeyEvent, LegacyEditor, LegacyHooks,
    LegacyRuntime, LegacyService, OpenedObject, PluginResolver, PostRefreshAction, ServiceContext,
    ThreadAncestors, LEGACY_SERVICE_COMMAND, OPEN_COMMAND_ARG, SERVICE_CONTEXT_COMMAND,
};
use parking_lot::RwLock;

use crate::config::{BridgeConfig, DEFAULT_APP_NAME, DEFAULT_ICON_PATH};
use crate::editor::{self, ReentryGuard};
use crate::logfile::LogFileSink;
use crate::openers::{OpenerChain, LUT_EXTENSION};
use crate::tracker::OutputTrackerRegistry;
use crate::window_close::WindowCloseCoordinator;

/// Resolution used when converting a progress fraction to a step ratio.
const PROGRESS_GRANULARITY: i64 = 1000;

/// Collaborators resolved from the plugin framework at install time.
#[derive(Default)]
struct Collaborators {
    installed: bool,
    editor: Option<Arc<dyn LegacyEditor>>,
    app_config: Option<Arc<dyn AppConfiguration>>,
    post_refresh: Vec<Arc<dyn PostRefreshAction>>,
    openers: OpenerChain,
}

/// The hooks object wired into the patched legacy runtime.
///
/// Every method is defensive: absent collaborators, absent services and
/// unsupported-operation signals from headless substitutes are treated as
/// "no capability", never as errors. Nothing thrown inside a hook escapes
/// back into the legacy runtime's control flow.
pub struct BridgeHooks {
    service: Arc<dyn LegacyService>,
    runtime: Arc<dyn LegacyRuntime>,
    trackers: Arc<OutputTrackerRegistry>,
    resolver: Option<Arc<dyn PluginResolver>>,
    config: BridgeConfig,
    collaborators: RwLock<Collaborators>,
    processing_events: AtomicBool,
    log_sink: LogFileSink,
}

impl BridgeHooks {
    pub fn new(
        service: Arc<dyn LegacyService>,
        runtime: Arc<dyn LegacyRuntime>,
        trackers: Arc<OutputTrackerRegistry>,
        resolver: Option<Arc<dyn PluginResolver>>,
        config: BridgeConfig,
    ) -> Self {
        let log_sink = LogFileSink::new(config.log_file.clone());
        Self {
            service,
            runtime,
            trackers,
            resolver,
            config,
            collaborators: RwLock::new(Collaborators::default()),
            processing_events: AtomicBool::new(false),
            log_sink,
        }
    }

    /// The output-tracker registry this dispatcher records into.
    pub fn trackers(&self) -> &Arc<OutputTrackerRegistry> {
        &self.trackers
    }

    /// Whether the calling thread belongs to a legacy thread group.
    fn is_legacy_thread(&self) -> bool {
        self.trackers.thread_groups().current_group().is_some()
    }

    fn open_with_chain(
        &self,
        path: Option<&str>,
        plane_index: Option<usize>,
        display: bool,
    ) -> Option<OpenedObject> {
        self.collaborators.read().openers.open(path, plane_index, display)
    }
}

/// Clears the re-entrancy flag when dropped, so the prior state is restored
/// on every exit path.
struct ResetFlag<'a>(&'a AtomicBool);

impl Drop for ResetFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl LegacyHooks for BridgeHooks {
    fn is_legacy_mode(&self) -> bool {
        self.service.is_legacy_mode()
    }

    fn context(&self) -> Option<Arc<dyn ServiceContext>> {
        Some(self.service.context())
    }

    fn installed(&self) {
        let mut collaborators = self.collaborators.write();
        if collaborators.installed {
            return;
        }
        collaborators.installed = true;
        if let Some(resolver) = &self.resolver {
            collaborators.editor = resolver.editor();
            collaborators.app_config = resolver.app_configuration();
            collaborators.post_refresh = resolver.post_refresh_actions();
            collaborators.openers = OpenerChain::new(resolver.openers());
        }
        tracing::debug!("legacy hooks installed");
    }

    fn dispose(&self) {
        let mut collaborators = self.collaborators.write();
        *collaborators = Collaborators::default();
        tracing::debug!("legacy hooks disposed");
    }

    fn intercept_run_command(&self, name: &str, arg: &str) -> Option<CommandOutcome> {
        if name == LEGACY_SERVICE_COMMAND {
            return Some(CommandOutcome::Service(Arc::clone(&self.service)));
        }
        if name == SERVICE_CONTEXT_COMMAND {
            return Some(CommandOutcome::Context(self.service.context()));
        }
        if name == self.runtime.commands_name() && arg == OPEN_COMMAND_ARG {
            if let Some(opened) = self.intercept_file_open(None) {
                if let OpenedObject::Path(path) = &opened {
                    self.runtime.open_path_directly(path);
                }
                return Some(CommandOutcome::Opened(opened));
            }
        }
        self.service.run_legacy_compatible_command(name)
    }

    fn show_progress(&self, fraction: f64) {
        let current = (PROGRESS_GRANULARITY as f64 * fraction) as i64;
        self.show_progress_steps(current, PROGRESS_GRANULARITY);
    }

    fn show_progress_steps(&self, current: i64, total: i64) {
        // A held flag means the status bar itself triggered this call;
        // relaying again would feed the loop.
        if !self.is_legacy_mode() && !self.processing_events.load(Ordering::SeqCst) {
            self.service.status().show_progress(current, total);
        }
    }

    fn show_status(&self, status: &str) {
        if !self.service.is_initialized() || self.is_legacy_mode() {
            return;
        }
        if self.processing_events.swap(true, Ordering::SeqCst) {
            // Already relaying; skip silently.
            return;
        }
        let _reset = ResetFlag(&self.processing_events);
        self.service.status().show_status(status);
    }

    fn register_image(&self, image: &ImageHandle) {
        if !image.image().is_renderable() {
            return;
        }
        if !image.image().has_window() {
            return;
        }
        if !self.is_legacy_mode() {
            if !self.is_legacy_thread() {
                return;
            }
            tracing::debug!(image = %image.image().title(), "register legacy image");
        }
        // A headless substitute has no image map.
        let _ = self.service.image_map().register_legacy_image(image);
    }

    fn unregister_image(&self, image: &ImageHandle) {
        if self.is_legacy_mode() {
            return;
        }
        if !self.is_legacy_thread() {
            return;
        }
        tracing::debug!(image = %image.image().title(), "image window hidden");
        self.trackers.remove_output(image);
        self.trackers.remove_closed(image);
        let image_map = self.service.image_map();
        match image_map.lookup_display(image) {
            Ok(Some(display)) => display.close(),
            Ok(None) => {
                let _ = image_map.unregister_legacy_image(image);
            }
            // A headless substitute has no image map.
            Err(_) => {}
        }
    }

    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn error(&self, error: &(dyn std::error::Error + 'static)) {
        tracing::error!("{error}");
    }

    fn log(&self, message: &str) {
        self.log_sink.log(message);
    }

    fn app_name(&self) -> String {
        if let Some(app_config) = &self.collaborators.read().app_config {
            return app_config.app_name();
        }
        self.config
            .app_name
            .clone()
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
    }

    fn app_version(&self) -> String {
        let legacy = self.runtime.version();
        match self.service.app_version() {
            Some(modern) => format!("{modern}/{legacy}"),
            None => legacy,
        }
    }

    fn icon_path(&self) -> PathBuf {
        if let Some(app_config) = &self.collaborators.read().app_config {
            return app_config.icon_path();
        }
        self.config
            .icon
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ICON_PATH))
    }

    fn run_after_refresh_menus(&self) {
        for action in &self.collaborators.read().post_refresh {
            action.run();
        }
    }

    fn open_in_editor(&self, path: &str) -> bool {
        let Some(editor) = self.collaborators.read().editor.clone() else {
            return false;
        };
        if editor::looks_remote(path) {
            return false;
        }
        // No plausible extension, no editor.
        if !editor::has_plausible_extension(path) {
            return false;
        }
        let Some(_guard) = ReentryGuard::enter() else {
            return false;
        };
        let file = Path::new(path);
        if !file.exists() {
            return false;
        }
        if editor::is_binary_file(file) {
            return false;
        }
        editor.open(file)
    }

    fn create_in_editor(&self, title: &str, content: &str) -> bool {
        match self.collaborators.read().editor.clone() {
            Some(editor) => editor.create(title, content),
            None => false,
        }
    }

    fn intercept_open(
        &self,
        path: &str,
        plane_index: Option<usize>,
        display: bool,
    ) -> Option<OpenedObject> {
        self.open_with_chain(Some(path), plane_index, display)
    }

    fn intercept_file_open(&self, path: Option<&str>) -> Option<OpenedObject> {
        self.open_with_chain(path, None, true)
    }

    fn intercept_open_image(&self, path: &str, plane_index: Option<usize>) -> Option<OpenedObject> {
        self.open_with_chain(Some(path), plane_index, false)
    }

    fn intercept_open_recent(&self, path: &str) -> Option<OpenedObject> {
        self.open_with_chain(Some(path), None, true)
    }

    fn intercept_drag_and_drop_file(&self, path: &Path) -> Option<OpenedObject> {
        let name = path.file_name()?.to_string_lossy();
        if name.ends_with(LUT_EXTENSION) {
            return None;
        }
        match path.canonicalize() {
            Ok(canonical) => {
                let canonical = canonical.to_string_lossy();
                self.open_with_chain(Some(&canonical), None, true)
            }
            Err(err) => {
                tracing::error!("{err}");
                None
            }
        }
    }

    fn intercept_key_pressed(&self, event: &KeyEvent) -> bool {
        let accelerator = event
            .accelerator()
            .strip_prefix("pressed ")
            .unwrap_or(event.accelerator());
        self.service.handle_shortcut(accelerator)
            || (!event.is_control_down()
                && self.service.handle_shortcut(&format!("control {accelerator}")))
    }

    fn thread_ancestors(&self) -> Option<ThreadAncestors> {
        let threads = self.service.context().thread_service()?;
        Some(ThreadAncestors::of_current(threads))
    }

    fn intercept_close_all_windows(&self) -> bool {
        let queue = self.service.context().thread_service();
        WindowCloseCoordinator::new(Arc::clone(&self.runtime), queue).close_all()
    }

    fn disposing(&self) -> bool {
        if !self.runtime.is_disposing() {
            // The shutdown originated inside the legacy runtime, not from a
            // bridge-initiated dispose; take the modern context down with it.
            self.service.context().dispose();
        }
        true
    }
}
