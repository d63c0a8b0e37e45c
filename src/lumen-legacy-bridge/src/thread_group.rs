//! Explicit thread-group bookkeeping for legacy invocations.
//!
//! The legacy runtime groups every thread spawned while executing one
//! command; the modern side needs to answer "which invocation does the
//! calling thread belong to?" without ambient globals. The registry binds
//! threads to groups explicitly and resolves unbound threads through
//! recorded thread ancestry.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;

use dashmap::DashMap;
use lumen_legacy_api::ThreadService;

/// Identifier of one legacy invocation's thread group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(u64);

impl GroupId {
    /// Allocate a fresh group id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Maps threads to the legacy thread group that owns them.
pub struct ThreadGroupRegistry {
    bindings: DashMap<ThreadId, GroupId>,
    threads: Option<Arc<dyn ThreadService>>,
}

impl ThreadGroupRegistry {
    pub fn new(threads: Option<Arc<dyn ThreadService>>) -> Self {
        Self {
            bindings: DashMap::new(),
            threads,
        }
    }

    /// Bind the calling thread to `group` until the guard drops.
    ///
    /// Nested invocations stack: dropping the guard restores whatever group
    /// the thread was bound to before.
    pub fn enter(&self, group: GroupId) -> GroupGuard<'_> {
        let thread = std::thread::current().id();
        let previous = self.bindings.insert(thread, group);
        GroupGuard {
            registry: self,
            thread,
            previous,
        }
    }

    /// The group owning `thread`: its direct binding, or the nearest bound
    /// ancestor when the thread service can walk parents.
    pub fn group_of(&self, thread: ThreadId) -> Option<GroupId> {
        if let Some(group) = self.bindings.get(&thread) {
            return Some(*group);
        }
        let threads = self.threads.as_ref()?;
        let mut seen = HashSet::new();
        seen.insert(thread);
        let mut next = threads.parent_of(thread);
        while let Some(ancestor) = next {
            if !seen.insert(ancestor) {
                break;
            }
            if let Some(group) = self.bindings.get(&ancestor) {
                return Some(*group);
            }
            next = threads.parent_of(ancestor);
        }
        None
    }

    /// The group owning the calling thread, if any.
    pub fn current_group(&self) -> Option<GroupId> {
        self.group_of(std::thread::current().id())
    }
}

/// Reverts a thread's group binding when dropped.
///
/// Must be dropped on the thread that created it.
pub struct GroupGuard<'a> {
    registry: &'a ThreadGroupRegistry,
    thread: ThreadId,
    previous: Option<GroupId>,
}

impl Drop for GroupGuard<'_> {
    fn drop(&mut self) {
        match self.previous {
            Some(previous) => {
                self.registry.bindings.insert(self.thread, previous);
            }
            None => {
                self.registry.bindings.remove(&self.thread);
            }
        }
    }
}
