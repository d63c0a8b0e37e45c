//! Mock collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;

use parking_lot::Mutex;

use lumen_legacy_api::{
    AppConfiguration, CloseConfirmable, CommandOutcome, ImageDisplay, ImageHandle, ImageMap,
    ImageMapError, LegacyEditor, LegacyImage, LegacyOpener, LegacyRuntime, LegacyService,
    LegacyWindow, OpenedObject, PluginResolver, PostRefreshAction, ServiceContext, StatusService,
    ThreadService,
};
use lumen_legacy_bridge::{
    BridgeConfig, BridgeHooks, OutputTrackerRegistry, ThreadGroupRegistry,
};

pub fn image(title: &str) -> ImageHandle {
    let image = LegacyImage::new(title, true);
    image.set_window_open(true);
    ImageHandle::from(image)
}

// =============================================================================
// Task queue that only runs when drained
// =============================================================================

/// Collects queued tasks so tests can assert disposal really is deferred.
#[derive(Default)]
pub struct ManualQueue {
    tasks: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
    parents: Mutex<HashMap<ThreadId, ThreadId>>,
}

impl ManualQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Run everything queued so far, in order.
    pub fn drain(&self) {
        let tasks: Vec<_> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            task();
        }
    }

    pub fn set_parent(&self, child: ThreadId, parent: ThreadId) {
        self.parents.lock().insert(child, parent);
    }
}

impl ThreadService for ManualQueue {
    fn parent_of(&self, thread: ThreadId) -> Option<ThreadId> {
        self.parents.lock().get(&thread).copied()
    }

    fn queue(&self, task: Box<dyn FnOnce() + Send>) {
        self.tasks.lock().push(task);
    }
}

// =============================================================================
// Windows
// =============================================================================

pub struct MockWindow {
    title: String,
    confirm: Option<bool>,
    confirm_calls: AtomicUsize,
    visible: AtomicBool,
    disposed: AtomicBool,
}

impl MockWindow {
    /// An unconfirmable window.
    pub fn plain(title: &str) -> Arc<Self> {
        Arc::new(Self {
            title: title.to_string(),
            confirm: None,
            confirm_calls: AtomicUsize::new(0),
            visible: AtomicBool::new(true),
            disposed: AtomicBool::new(false),
        })
    }

    /// A confirmable window answering `answer` when asked.
    pub fn confirmable(title: &str, answer: bool) -> Arc<Self> {
        Arc::new(Self {
            title: title.to_string(),
            confirm: Some(answer),
            confirm_calls: AtomicUsize::new(0),
            visible: AtomicBool::new(true),
            disposed: AtomicBool::new(false),
        })
    }

    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl LegacyWindow for MockWindow {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn as_confirmable(&self) -> Option<&dyn CloseConfirmable> {
        if self.confirm.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl CloseConfirmable for MockWindow {
    fn confirm_close(&self) -> bool {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        self.confirm.unwrap_or(true)
    }
}

// =============================================================================
// Legacy runtime
// =============================================================================

pub struct MockRuntime {
    pub windows: Mutex<Vec<Arc<dyn LegacyWindow>>>,
    pub main: Mutex<Option<Arc<dyn LegacyWindow>>>,
    pub opened_directly: Mutex<Vec<String>>,
    pub disposing: AtomicBool,
}

impl MockRuntime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            windows: Mutex::new(Vec::new()),
            main: Mutex::new(None),
            opened_directly: Mutex::new(Vec::new()),
            disposing: AtomicBool::new(false),
        })
    }
}

impl LegacyRuntime for MockRuntime {
    fn commands_name(&self) -> String {
        "legacy.Commands".to_string()
    }

    fn open_path_directly(&self, path: &str) {
        self.opened_directly.lock().push(path.to_string());
    }

    fn version(&self) -> String {
        "1.54f".to_string()
    }

    fn windows(&self) -> Vec<Arc<dyn LegacyWindow>> {
        self.windows.lock().clone()
    }

    fn main_window(&self) -> Option<Arc<dyn LegacyWindow>> {
        self.main.lock().clone()
    }

    fn is_disposing(&self) -> bool {
        self.disposing.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Modern services
// =============================================================================

pub struct MockContext {
    pub threads: Mutex<Option<Arc<dyn ThreadService>>>,
    pub disposed: AtomicBool,
}

impl MockContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            threads: Mutex::new(None),
            disposed: AtomicBool::new(false),
        })
    }
}

impl ServiceContext for MockContext {
    fn thread_service(&self) -> Option<Arc<dyn ThreadService>> {
        self.threads.lock().clone()
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

/// Records relayed status updates; optionally re-enters the dispatcher from
/// inside `show_status` to simulate the status-bar feedback loop.
#[derive(Default)]
pub struct RecordingStatus {
    pub statuses: Mutex<Vec<String>>,
    pub progress: Mutex<Vec<(i64, i64)>>,
    pub reenter: Mutex<Option<Arc<BridgeHooks>>>,
}

impl StatusService for RecordingStatus {
    fn show_progress(&self, current: i64, total: i64) {
        self.progress.lock().push((current, total));
    }

    fn show_status(&self, status: &str) {
        self.statuses.lock().push(status.to_string());
        let reenter = self.reenter.lock().clone();
        if let Some(hooks) = reenter {
            use lumen_legacy_api::LegacyHooks;
            hooks.show_status("nested update");
        }
    }
}

pub struct MockDisplay {
    pub closed: AtomicBool,
}

impl ImageDisplay for MockDisplay {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// Image map that can also play the headless dummy.
#[derive(Default)]
pub struct MockImageMap {
    pub unsupported: AtomicBool,
    pub registered: Mutex<Vec<ImageHandle>>,
    pub unregistered: Mutex<Vec<ImageHandle>>,
    pub displays: Mutex<HashMap<ImageHandle, Arc<MockDisplay>>>,
}

impl MockImageMap {
    fn check(&self) -> Result<(), ImageMapError> {
        if self.unsupported.load(Ordering::SeqCst) {
            Err(ImageMapError::Unsupported)
        } else {
            Ok(())
        }
    }
}

impl ImageMap for MockImageMap {
    fn register_legacy_image(&self, image: &ImageHandle) -> Result<(), ImageMapError> {
        self.check()?;
        self.registered.lock().push(image.clone());
        Ok(())
    }

    fn lookup_display(
        &self,
        image: &ImageHandle,
    ) -> Result<Option<Arc<dyn ImageDisplay>>, ImageMapError> {
        self.check()?;
        Ok(self
            .displays
            .lock()
            .get(image)
            .map(|display| Arc::clone(display) as Arc<dyn ImageDisplay>))
    }

    fn unregister_legacy_image(&self, image: &ImageHandle) -> Result<(), ImageMapError> {
        self.check()?;
        self.unregistered.lock().push(image.clone());
        Ok(())
    }
}

pub struct MockService {
    pub legacy_mode: AtomicBool,
    pub initialized: AtomicBool,
    pub context: Arc<MockContext>,
    pub status: Arc<RecordingStatus>,
    pub image_map: Arc<MockImageMap>,
    pub bound_shortcuts: Mutex<Vec<String>>,
    pub shortcut_attempts: Mutex<Vec<String>>,
    pub compat_commands: Mutex<Vec<String>>,
    pub modern_version: Mutex<Option<String>>,
}

impl MockService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            legacy_mode: AtomicBool::new(false),
            initialized: AtomicBool::new(true),
            context: MockContext::new(),
            status: Arc::new(RecordingStatus::default()),
            image_map: Arc::new(MockImageMap::default()),
            bound_shortcuts: Mutex::new(Vec::new()),
            shortcut_attempts: Mutex::new(Vec::new()),
            compat_commands: Mutex::new(Vec::new()),
            modern_version: Mutex::new(None),
        })
    }
}

impl LegacyService for MockService {
    fn is_legacy_mode(&self) -> bool {
        self.legacy_mode.load(Ordering::SeqCst)
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn context(&self) -> Arc<dyn ServiceContext> {
        Arc::clone(&self.context) as Arc<dyn ServiceContext>
    }

    fn status(&self) -> Arc<dyn StatusService> {
        Arc::clone(&self.status) as Arc<dyn StatusService>
    }

    fn image_map(&self) -> Arc<dyn ImageMap> {
        Arc::clone(&self.image_map) as Arc<dyn ImageMap>
    }

    fn handle_shortcut(&self, accelerator: &str) -> bool {
        self.shortcut_attempts.lock().push(accelerator.to_string());
        self.bound_shortcuts.lock().iter().any(|bound| bound == accelerator)
    }

    fn run_legacy_compatible_command(&self, name: &str) -> Option<CommandOutcome> {
        if self.compat_commands.lock().iter().any(|known| known == name) {
            Some(CommandOutcome::Value(serde_json::json!({ "command": name })))
        } else {
            None
        }
    }

    fn app_version(&self) -> Option<String> {
        self.modern_version.lock().clone()
    }
}

// =============================================================================
// Plugins
// =============================================================================

#[derive(Default)]
pub struct MockEditor {
    pub accept: bool,
    pub opened: Mutex<Vec<PathBuf>>,
    pub created: Mutex<Vec<(String, String)>>,
}

impl MockEditor {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            accept: true,
            ..Self::default()
        })
    }
}

impl LegacyEditor for MockEditor {
    fn open(&self, path: &Path) -> bool {
        self.opened.lock().push(path.to_path_buf());
        self.accept
    }

    fn create(&self, title: &str, content: &str) -> bool {
        self.created.lock().push((title.to_string(), content.to_string()));
        self.accept
    }
}

pub struct MockAppConfig {
    pub name: String,
    pub icon: PathBuf,
}

impl AppConfiguration for MockAppConfig {
    fn app_name(&self) -> String {
        self.name.clone()
    }

    fn icon_path(&self) -> PathBuf {
        self.icon.clone()
    }
}

/// Opener that records every consultation and answers with a fixed path.
#[derive(Default)]
pub struct RecordingOpener {
    pub answer: Option<String>,
    pub calls: Mutex<Vec<(Option<String>, Option<usize>, bool)>>,
}

impl RecordingOpener {
    pub fn declining() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn answering(path: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(path.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(Option<String>, Option<usize>, bool)> {
        self.calls.lock().clone()
    }
}

impl LegacyOpener for RecordingOpener {
    fn open(
        &self,
        path: Option<&str>,
        plane_index: Option<usize>,
        display: bool,
    ) -> Option<OpenedObject> {
        self.calls
            .lock()
            .push((path.map(str::to_string), plane_index, display));
        self.answer.clone().map(OpenedObject::Path)
    }
}

pub struct CountingRefresh {
    pub runs: AtomicUsize,
}

impl PostRefreshAction for CountingRefresh {
    fn run(&self) {
        self.runs.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockResolver {
    pub editor: Option<Arc<MockEditor>>,
    pub app_config: Option<Arc<MockAppConfig>>,
    pub openers: Vec<Arc<dyn LegacyOpener>>,
    pub post_refresh: Vec<Arc<dyn PostRefreshAction>>,
}

impl PluginResolver for MockResolver {
    fn editor(&self) -> Option<Arc<dyn LegacyEditor>> {
        self.editor
            .as_ref()
            .map(|editor| Arc::clone(editor) as Arc<dyn LegacyEditor>)
    }

    fn app_configuration(&self) -> Option<Arc<dyn AppConfiguration>> {
        self.app_config
            .as_ref()
            .map(|config| Arc::clone(config) as Arc<dyn AppConfiguration>)
    }

    fn post_refresh_actions(&self) -> Vec<Arc<dyn PostRefreshAction>> {
        self.post_refresh.clone()
    }

    fn openers(&self) -> Vec<Arc<dyn LegacyOpener>> {
        self.openers.clone()
    }
}

// =============================================================================
// Fixture
// =============================================================================

pub struct Fixture {
    pub service: Arc<MockService>,
    pub runtime: Arc<MockRuntime>,
    pub groups: Arc<ThreadGroupRegistry>,
    pub trackers: Arc<OutputTrackerRegistry>,
    pub hooks: Arc<BridgeHooks>,
}

/// A fully wired dispatcher with `installed()` already run.
pub fn fixture(resolver: Option<MockResolver>) -> Fixture {
    fixture_with_config(resolver, BridgeConfig::default())
}

pub fn fixture_with_config(resolver: Option<MockResolver>, config: BridgeConfig) -> Fixture {
    let service = MockService::new();
    let runtime = MockRuntime::new();
    let groups = Arc::new(ThreadGroupRegistry::new(None));
    let trackers = Arc::new(OutputTrackerRegistry::new(Arc::clone(&groups)));
    let hooks = Arc::new(BridgeHooks::new(
        Arc::clone(&service) as Arc<dyn LegacyService>,
        Arc::clone(&runtime) as Arc<dyn LegacyRuntime>,
        Arc::clone(&trackers),
        resolver.map(|r| Arc::new(r) as Arc<dyn PluginResolver>),
        config,
    ));
    use lumen_legacy_api::LegacyHooks;
    hooks.installed();
    Fixture {
        service,
        runtime,
        groups,
        trackers,
        hooks,
    }
}
