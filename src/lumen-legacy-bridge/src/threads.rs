//! Default thread service: parent tracking plus the deferred task queue.

use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use dashmap::DashMap;
use lumen_legacy_api::ThreadService;
use parking_lot::Mutex;

type Task = Box<dyn FnOnce() + Send>;

/// Thread service backed by a single consumer thread.
///
/// [`BridgeThreadService::spawn_tracked`] records the parent link consulted
/// by ancestry walks. Queued tasks run on the consumer thread strictly after
/// `queue` returns, which is what lets window disposal happen outside the
/// window-manager lock.
pub struct BridgeThreadService {
    parents: Arc<DashMap<ThreadId, ThreadId>>,
    sender: Mutex<Option<flume::Sender<Task>>>,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

impl BridgeThreadService {
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded::<Task>();
        let consumer = thread::Builder::new()
            .name("lumen-event-queue".into())
            .spawn(move || {
                for task in receiver.iter() {
                    task();
                }
            })
            .expect("failed to spawn the event queue thread");
        Self {
            parents: Arc::new(DashMap::new()),
            sender: Mutex::new(Some(sender)),
            consumer: Mutex::new(Some(consumer)),
        }
    }

    /// Spawn a thread whose parent link points at the calling thread.
    pub fn spawn_tracked<F, T>(&self, f: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let parent = thread::current().id();
        let parents = Arc::clone(&self.parents);
        thread::spawn(move || {
            parents.insert(thread::current().id(), parent);
            f()
        })
    }

    /// Stop accepting tasks, run what is already queued, and join the
    /// consumer. Tasks queued afterwards are dropped.
    pub fn shutdown(&self) {
        drop(self.sender.lock().take());
        if let Some(consumer) = self.consumer.lock().take() {
            let _ = consumer.join();
        }
    }
}

impl Default for BridgeThreadService {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadService for BridgeThreadService {
    fn parent_of(&self, thread: ThreadId) -> Option<ThreadId> {
        self.parents.get(&thread).map(|parent| *parent)
    }

    fn queue(&self, task: Task) {
        if let Some(sender) = self.sender.lock().as_ref() {
            let _ = sender.send(task);
        }
    }
}
