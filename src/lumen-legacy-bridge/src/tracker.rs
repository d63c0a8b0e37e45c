//! Per-thread-group tracking of images a legacy command created or closed.
//!
//! Each legacy invocation gets a pair of identity sets: images it produced
//! and images whose windows it closed. The pair is keyed by the invocation's
//! thread group so that concurrent legacy commands never see each other's
//! side effects. Threads outside any group get a shared null tracker, so
//! callers never need to null-check.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lumen_legacy_api::ImageHandle;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::thread_group::{GroupId, ThreadGroupRegistry};

/// Bookkeeping of images produced or closed during one legacy invocation.
pub trait OutputTracker: Send + Sync {
    fn add_output(&self, image: &ImageHandle);

    fn remove_output(&self, image: &ImageHandle);

    fn contains_output(&self, image: &ImageHandle) -> bool;

    fn clear_outputs(&self);

    /// Snapshot of the output set, in no particular order.
    fn outputs(&self) -> Vec<ImageHandle>;

    fn add_closed(&self, image: &ImageHandle);

    fn remove_closed(&self, image: &ImageHandle);

    fn contains_closed(&self, image: &ImageHandle) -> bool;

    fn clear_closed(&self);

    /// Snapshot of the closed set, in no particular order.
    fn closed(&self) -> Vec<ImageHandle>;
}

/// Tracker for one legacy thread group.
///
/// The two sets are independently locked so threads of the same group can
/// mutate them concurrently.
#[derive(Default)]
pub struct SessionOutputTracker {
    outputs: Mutex<HashSet<ImageHandle>>,
    closed: Mutex<HashSet<ImageHandle>>,
}

impl SessionOutputTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputTracker for SessionOutputTracker {
    fn add_output(&self, image: &ImageHandle) {
        self.outputs.lock().insert(image.clone());
    }

    fn remove_output(&self, image: &ImageHandle) {
        self.outputs.lock().remove(image);
    }

    fn contains_output(&self, image: &ImageHandle) -> bool {
        self.outputs.lock().contains(image)
    }

    fn clear_outputs(&self) {
        self.outputs.lock().clear();
    }

    fn outputs(&self) -> Vec<ImageHandle> {
        self.outputs.lock().iter().cloned().collect()
    }

    fn add_closed(&self, image: &ImageHandle) {
        self.closed.lock().insert(image.clone());
    }

    fn remove_closed(&self, image: &ImageHandle) {
        self.closed.lock().remove(image);
    }

    fn contains_closed(&self, image: &ImageHandle) -> bool {
        self.closed.lock().contains(image)
    }

    fn clear_closed(&self) {
        self.closed.lock().clear();
    }

    fn closed(&self) -> Vec<ImageHandle> {
        self.closed.lock().iter().cloned().collect()
    }
}

/// Tracker used when no legacy thread group is active.
pub struct NullOutputTracker;

impl OutputTracker for NullOutputTracker {
    fn add_output(&self, _image: &ImageHandle) {}

    fn remove_output(&self, _image: &ImageHandle) {}

    fn contains_output(&self, _image: &ImageHandle) -> bool {
        false
    }

    fn clear_outputs(&self) {}

    fn outputs(&self) -> Vec<ImageHandle> {
        Vec::new()
    }

    fn add_closed(&self, _image: &ImageHandle) {}

    fn remove_closed(&self, _image: &ImageHandle) {}

    fn contains_closed(&self, _image: &ImageHandle) -> bool {
        false
    }

    fn clear_closed(&self) {}

    fn closed(&self) -> Vec<ImageHandle> {
        Vec::new()
    }
}

static NULL_TRACKER: Lazy<Arc<NullOutputTracker>> = Lazy::new(|| Arc::new(NullOutputTracker));

/// Registry of output trackers keyed by legacy thread group.
///
/// Lookup-or-create holds the single registry lock; the returned tracker's
/// own mutation is guarded by its per-set locks. Trackers are never evicted
/// automatically — growth is bounded by the number of distinct groups ever
/// seen — but [`OutputTrackerRegistry::release_group`] lets a command runner
/// retire a finished group.
pub struct OutputTrackerRegistry {
    groups: Arc<ThreadGroupRegistry>,
    trackers: Mutex<HashMap<GroupId, Arc<SessionOutputTracker>>>,
}

impl OutputTrackerRegistry {
    pub fn new(groups: Arc<ThreadGroupRegistry>) -> Self {
        Self {
            groups,
            trackers: Mutex::new(HashMap::new()),
        }
    }

    /// The thread-group registry this tracker registry consults.
    pub fn thread_groups(&self) -> &Arc<ThreadGroupRegistry> {
        &self.groups
    }

    /// Tracker for the calling thread's group, creating it on first access;
    /// the shared null tracker when the thread belongs to no group.
    pub fn tracker_for_current(&self) -> Arc<dyn OutputTracker> {
        match self.groups.current_group() {
            Some(group) => {
                let mut trackers = self.trackers.lock();
                Arc::clone(trackers.entry(group).or_default()) as Arc<dyn OutputTracker>
            }
            None => Arc::clone(&*NULL_TRACKER) as Arc<dyn OutputTracker>,
        }
    }

    /// Drop the tracker of a retired group. Unknown groups are ignored.
    pub fn release_group(&self, group: GroupId) {
        self.trackers.lock().remove(&group);
    }

    pub fn add_output(&self, image: &ImageHandle) {
        self.tracker_for_current().add_output(image);
    }

    pub fn remove_output(&self, image: &ImageHandle) {
        self.tracker_for_current().remove_output(image);
    }

    pub fn contains_output(&self, image: &ImageHandle) -> bool {
        self.tracker_for_current().contains_output(image)
    }

    pub fn clear_outputs(&self) {
        self.tracker_for_current().clear_outputs();
    }

    pub fn outputs(&self) -> Vec<ImageHandle> {
        self.tracker_for_current().outputs()
    }

    pub fn add_closed(&self, image: &ImageHandle) {
        self.tracker_for_current().add_closed(image);
    }

    pub fn remove_closed(&self, image: &ImageHandle) {
        self.tracker_for_current().remove_closed(image);
    }

    pub fn contains_closed(&self, image: &ImageHandle) -> bool {
        self.tracker_for_current().contains_closed(image)
    }

    pub fn clear_closed(&self) {
        self.tracker_for_current().clear_closed();
    }

    pub fn closed(&self) -> Vec<ImageHandle> {
        self.tracker_for_current().closed()
    }
}
