//! TaskList: the scheduler that owns tasks and advances them once per tick.

use std::any::Any;
use std::fmt;

use crate::config::SchedulerConfig;
use crate::error::TaskResult;
use crate::ids::TaskId;
use crate::observer::{NoopObserver, TaskObserver};
use crate::sequence::StepSequence;
use crate::task::Task;

/// Tasks resume in insertion order. Completed tasks are disposed and removed
/// in the tick they complete.
#[derive(Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    cfg: SchedulerConfig,
    observer: Option<Box<dyn TaskObserver>>,
    delta: f32,
    total_ticks: u64,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: SchedulerConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    pub fn set_observer(&mut self, observer: impl TaskObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn spawn(&mut self, sequence: impl StepSequence + 'static) -> TaskId {
        self.push(Box::new(sequence), None)
    }

    pub fn spawn_tagged<T: Any>(&mut self, sequence: impl StepSequence + 'static, tag: T) -> TaskId {
        self.push(Box::new(sequence), Some(Box::new(tag)))
    }

    fn push(&mut self, sequence: Box<dyn StepSequence>, tag: Option<Box<dyn Any>>) -> TaskId {
        let task = Task::from_boxed(sequence, tag, &self.cfg);
        let id = task.id();
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.task_spawned(id, task.current_sequence().unwrap_or_default());
        }
        self.tasks.push(task);
        id
    }

    /// Advance every task once. An invalid yield terminates the offending
    /// task and is returned immediately; tasks after it are not advanced
    /// this tick.
    pub fn advance(&mut self, delta: f32) -> TaskResult<()> {
        self.delta = delta;
        self.total_ticks += 1;
        let mut noop = NoopObserver;
        let mut i = 0;
        while i < self.tasks.len() {
            let observer: &mut dyn TaskObserver = match self.observer.as_deref_mut() {
                Some(o) => o,
                None => &mut noop,
            };
            let result = self.tasks[i].advance_observed(delta, observer);
            for pending in self.tasks[i].take_spawned() {
                self.push(pending.sequence, pending.tag);
            }
            if let Err(err) = result {
                let task = self.tasks.remove(i);
                log::error!("{} ({}) terminated: {err}", task.id(), task);
                self.finish(task);
                return Err(err);
            }
            if self.tasks[i].is_completed() {
                let task = self.tasks.remove(i);
                self.finish(task);
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    fn finish(&mut self, mut task: Task) {
        task.dispose();
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.task_removed(task.id());
        }
    }

    /// Dispose and remove a task. Returns false if no such task is queued.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        match self.tasks.iter().position(|t| t.id() == id) {
            Some(idx) => {
                let task = self.tasks.remove(idx);
                self.finish(task);
                true
            }
            None => false,
        }
    }

    /// Dispose every task whose tag equals `tag`; returns how many were removed.
    pub fn cancel_by_tag<T: Any + PartialEq>(&mut self, tag: &T) -> usize {
        let mut removed = 0;
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].tag::<T>() == Some(tag) {
                let task = self.tasks.remove(i);
                self.finish(task);
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Dispose every task.
    pub fn stop(&mut self) {
        for task in std::mem::take(&mut self.tasks) {
            self.finish(task);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id() == id)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Delta of the most recent tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    #[inline]
    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }
}

impl fmt::Debug for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskList")
            .field("tasks", &self.tasks)
            .field("cfg", &self.cfg)
            .field("delta", &self.delta)
            .field("total_ticks", &self.total_ticks)
            .finish_non_exhaustive()
    }
}
