//! Thread ancestry and the deferred task queue.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread::ThreadId;

/// Thread bookkeeping on the modern side.
///
/// The queue contract matters for deadlock avoidance: enqueued tasks run on
/// a single consumer thread after the current call stack returns, never
/// inline on the calling thread.
pub trait ThreadService: Send + Sync {
    /// The recorded parent of `thread`, if the service knows one.
    fn parent_of(&self, thread: ThreadId) -> Option<ThreadId>;

    /// Enqueue a task on the event queue.
    fn queue(&self, task: Box<dyn FnOnce() + Send>);
}

/// Lazy, finite, non-restartable walk over the calling thread's ancestors,
/// nearest first.
///
/// Terminates at the first ancestor already seen (cycle guard) or when no
/// further parent is known.
pub struct ThreadAncestors {
    service: Arc<dyn ThreadService>,
    next: Option<ThreadId>,
    seen: HashSet<ThreadId>,
}

impl ThreadAncestors {
    /// Ancestors of the calling thread.
    pub fn of_current(service: Arc<dyn ThreadService>) -> Self {
        let current = std::thread::current().id();
        let mut seen = HashSet::new();
        seen.insert(current);
        let next = service.parent_of(current).filter(|p| seen.insert(*p));
        Self { service, next, seen }
    }
}

impl Iterator for ThreadAncestors {
    type Item = ThreadId;

    fn next(&mut self) -> Option<ThreadId> {
        let current = self.next.take()?;
        self.next = self
            .service
            .parent_of(current)
            .filter(|p| self.seen.insert(*p));
        Some(current)
    }
}
