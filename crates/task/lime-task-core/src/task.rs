//! A single cooperative task: a LIFO stack of step-sequences plus its wait state.

use std::any::Any;
use std::fmt;

use crate::config::SchedulerConfig;
use crate::context::{CurrentTaskGuard, PendingTask, TaskContext, WatchVerdict, Watcher};
use crate::error::{TaskError, TaskResult};
use crate::ids::TaskId;
use crate::observer::{NoopObserver, TaskObserver};
use crate::sequence::{StepSequence, Yield};
use crate::wait::WaitCondition;

/// A task is completed exactly when its stack is empty; completion is terminal.
pub struct Task {
    id: TaskId,
    tag: Option<Box<dyn Any>>,
    stack: Vec<Box<dyn StepSequence>>,
    wait_time: f32,
    wait_condition: Option<WaitCondition>,
    watcher: Option<Watcher>,
    spawned: Vec<PendingTask>,
    skip_frame_on_completion: bool,
    tick_delta: f32,
}

impl Task {
    /// Wrap a sequence. Nothing runs until the first [`Task::advance`].
    pub fn new(sequence: impl StepSequence + 'static) -> Self {
        Self::from_boxed(Box::new(sequence), None, &SchedulerConfig::default())
    }

    pub fn with_tag<T: Any>(sequence: impl StepSequence + 'static, tag: T) -> Self {
        Self::from_boxed(
            Box::new(sequence),
            Some(Box::new(tag)),
            &SchedulerConfig::default(),
        )
    }

    pub fn with_config(sequence: impl StepSequence + 'static, cfg: &SchedulerConfig) -> Self {
        Self::from_boxed(Box::new(sequence), None, cfg)
    }

    pub(crate) fn from_boxed(
        sequence: Box<dyn StepSequence>,
        tag: Option<Box<dyn Any>>,
        cfg: &SchedulerConfig,
    ) -> Self {
        Self {
            id: TaskId::fresh(),
            tag,
            stack: vec![sequence],
            wait_time: 0.0,
            wait_condition: None,
            watcher: None,
            spawned: Vec::new(),
            skip_frame_on_completion: cfg.skip_frame_on_task_completion,
            tick_delta: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of sequences currently stacked.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Remaining numeric wait in seconds (may be slightly negative once expired).
    #[inline]
    pub fn wait_time(&self) -> f32 {
        self.wait_time
    }

    pub fn is_waiting(&self) -> bool {
        self.wait_time > 0.0 || self.wait_condition.is_some()
    }

    /// Type name of the innermost running sequence.
    pub fn current_sequence(&self) -> Option<&str> {
        self.stack.last().map(|s| s.name())
    }

    pub fn tag<T: Any>(&self) -> Option<&T> {
        self.tag.as_deref().and_then(|t| t.downcast_ref::<T>())
    }

    pub fn set_tag<T: Any>(&mut self, tag: T) {
        self.tag = Some(Box::new(tag));
    }

    pub fn set_watcher(&mut self, watcher: impl FnMut() -> WatchVerdict + 'static) {
        self.watcher = Some(Box::new(watcher));
    }

    pub fn clear_watcher(&mut self) {
        self.watcher = None;
    }

    pub fn advance(&mut self, delta: f32) -> TaskResult<()> {
        self.advance_observed(delta, &mut NoopObserver)
    }

    /// Resume at most one yield point of the innermost sequence.
    pub fn advance_observed(&mut self, delta: f32, observer: &mut dyn TaskObserver) -> TaskResult<()> {
        if self.is_completed() {
            return Ok(());
        }
        let _current = CurrentTaskGuard::enter(self.id);
        self.tick_delta = delta;
        self.step(delta, observer)
    }

    /// One pass of the update algorithm. Synchronous re-entries after a push
    /// or pop run with a zero `delta` and keep the tick's `tick_delta`.
    fn step(&mut self, delta: f32, observer: &mut dyn TaskObserver) -> TaskResult<()> {
        if self.is_completed() {
            return Ok(());
        }

        if let Some(watcher) = self.watcher.as_mut() {
            if watcher() == WatchVerdict::Dispose {
                log::debug!("{} disposed by its watcher", self.id);
                self.dispose();
                return Ok(());
            }
        }
        observer.task_advanced(self.id, self.top_name());

        if self.wait_time > 0.0 {
            self.wait_time -= delta;
            return Ok(());
        }
        if let Some(condition) = self.wait_condition.as_mut() {
            if condition.tick(delta) {
                return Ok(());
            }
            self.wait_condition = None;
        }
        self.resume_top(observer)
    }

    fn resume_top(&mut self, observer: &mut dyn TaskObserver) -> TaskResult<()> {
        let depth = self.stack.len();
        let Some(top) = self.stack.last_mut() else {
            return Ok(());
        };
        let mut ctx = TaskContext::new(
            self.id,
            self.tick_delta,
            depth,
            self.tag.as_deref(),
            &mut self.watcher,
            &mut self.spawned,
        );
        let yielded = top.resume(&mut ctx);
        if ctx.is_cancelled() {
            log::debug!("{} cancelled itself", self.id);
            self.dispose();
            return Ok(());
        }

        match yielded {
            Some(value) => self.handle_yield(value, observer),
            None => {
                self.stack.pop();
                if !self.skip_frame_on_completion && !self.is_completed() {
                    return self.step(0.0, observer);
                }
                Ok(())
            }
        }
    }

    fn handle_yield(&mut self, value: Yield, observer: &mut dyn TaskObserver) -> TaskResult<()> {
        match value {
            Yield::NextTick => self.wait_time = 0.0,
            Yield::Wait(seconds) => {
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(TaskError::InvalidYield {
                        sequence: self.top_name().to_string(),
                        reason: format!("wait of {seconds} seconds"),
                    });
                }
                self.wait_time = seconds;
            }
            Yield::Nested(sequence) => {
                self.stack.push(sequence);
                return self.step(0.0, observer);
            }
            Yield::Condition(condition) => self.wait_condition = Some(condition),
            Yield::Animation(probe) => {
                self.wait_condition = Some(WaitCondition::wait_for_animation(probe));
            }
        }
        Ok(())
    }

    /// Drain the stack innermost-first, disposing every sequence, and clear
    /// all wait state. Idempotent.
    pub fn dispose(&mut self) {
        while let Some(mut sequence) = self.stack.pop() {
            sequence.dispose();
        }
        self.wait_time = 0.0;
        self.wait_condition = None;
        self.watcher = None;
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<PendingTask> {
        std::mem::take(&mut self.spawned)
    }

    fn top_name(&self) -> &str {
        self.current_sequence().unwrap_or("Completed")
    }
}

impl Drop for Task {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.top_name())
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("depth", &self.stack.len())
            .field("current", &self.current_sequence())
            .field("wait_time", &self.wait_time)
            .field("wait_condition", &self.wait_condition)
            .finish_non_exhaustive()
    }
}
