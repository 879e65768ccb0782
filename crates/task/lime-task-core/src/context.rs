//! Execution context handed to a step-sequence on every resume, plus the
//! ambient "current task" lookup.

use std::any::Any;
use std::cell::Cell;

use crate::ids::TaskId;
use crate::sequence::StepSequence;

thread_local! {
    static CURRENT: Cell<Option<TaskId>> = const { Cell::new(None) };
}

/// The task being resumed on this thread, if any.
pub fn current_task() -> Option<TaskId> {
    CURRENT.with(|c| c.get())
}

/// Marks a task as current and restores the previous one on drop, so
/// reentrant advances (a sequence driving its own task list) unwind cleanly.
pub(crate) struct CurrentTaskGuard {
    saved: Option<TaskId>,
}

impl CurrentTaskGuard {
    pub(crate) fn enter(task: TaskId) -> Self {
        let saved = CURRENT.with(|c| c.replace(Some(task)));
        Self { saved }
    }
}

impl Drop for CurrentTaskGuard {
    fn drop(&mut self) {
        CURRENT.with(|c| c.set(self.saved));
    }
}

/// What a watcher wants done with its task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WatchVerdict {
    Keep,
    Dispose,
}

/// Invoked on every task update before any other work.
pub type Watcher = Box<dyn FnMut() -> WatchVerdict>;

pub(crate) struct PendingTask {
    pub(crate) sequence: Box<dyn StepSequence>,
    pub(crate) tag: Option<Box<dyn Any>>,
}

pub struct TaskContext<'a> {
    task: TaskId,
    delta: f32,
    depth: usize,
    tag: Option<&'a dyn Any>,
    watcher: &'a mut Option<Watcher>,
    spawned: &'a mut Vec<PendingTask>,
    cancelled: bool,
}

impl<'a> TaskContext<'a> {
    pub(crate) fn new(
        task: TaskId,
        delta: f32,
        depth: usize,
        tag: Option<&'a dyn Any>,
        watcher: &'a mut Option<Watcher>,
        spawned: &'a mut Vec<PendingTask>,
    ) -> Self {
        Self {
            task,
            delta,
            depth,
            tag,
            watcher,
            spawned,
            cancelled: false,
        }
    }

    #[inline]
    pub fn task_id(&self) -> TaskId {
        self.task
    }

    /// Delta of the tick being processed, including resumes that run
    /// synchronously after a nested sequence was pushed or popped.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of sequences on the task's stack, including the current one.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn tag<T: Any>(&self) -> Option<&T> {
        self.tag.and_then(|t| t.downcast_ref::<T>())
    }

    pub fn set_watcher(&mut self, watcher: impl FnMut() -> WatchVerdict + 'static) {
        *self.watcher = Some(Box::new(watcher));
    }

    pub fn clear_watcher(&mut self) {
        *self.watcher = None;
    }

    /// Dispose of the current task as soon as `predicate` holds, checked at
    /// the start of every update.
    pub fn kill_me_if(&mut self, mut predicate: impl FnMut() -> bool + 'static) {
        self.set_watcher(move || {
            if predicate() {
                WatchVerdict::Dispose
            } else {
                WatchVerdict::Keep
            }
        });
    }

    /// Queue a new task on the owning list. It is advanced in this same tick,
    /// after the current task.
    pub fn spawn(&mut self, sequence: impl StepSequence + 'static) {
        self.spawned.push(PendingTask {
            sequence: Box::new(sequence),
            tag: None,
        });
    }

    pub fn spawn_tagged<T: Any>(&mut self, sequence: impl StepSequence + 'static, tag: T) {
        self.spawned.push(PendingTask {
            sequence: Box::new(sequence),
            tag: Some(Box::new(tag)),
        });
    }

    /// Dispose of the current task once this resume returns. Whatever the
    /// sequence yields is discarded.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[inline]
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
