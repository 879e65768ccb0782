//! Wait conditions consulted once per scheduler tick.

use std::fmt;
use std::rc::Rc;

/// Anything that can report whether its animations are still playing.
///
/// Node trees implement this so a step-sequence can yield a node and sleep
/// until it stops.
pub trait RunningProbe {
    fn is_running(&self) -> bool;
}

impl<T: RunningProbe + ?Sized> RunningProbe for Rc<T> {
    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}

/// A predicate re-evaluated once per tick while a task is suspended on it.
/// Returning `true` keeps the task waiting.
pub trait WaitPredicate {
    fn evaluate(&mut self, total_time: f32) -> bool;
}

struct WhilePredicate<F>(F);

impl<F: FnMut() -> bool> WaitPredicate for WhilePredicate<F> {
    fn evaluate(&mut self, _total_time: f32) -> bool {
        (self.0)()
    }
}

struct TimedPredicate<F>(F);

impl<F: FnMut(f32) -> bool> WaitPredicate for TimedPredicate<F> {
    fn evaluate(&mut self, total_time: f32) -> bool {
        (self.0)(total_time)
    }
}

struct AnimationPredicate(Rc<dyn RunningProbe>);

impl WaitPredicate for AnimationPredicate {
    fn evaluate(&mut self, _total_time: f32) -> bool {
        self.0.is_running()
    }
}

/// An installed wait: a predicate plus the time waited since installation.
pub struct WaitCondition {
    predicate: Box<dyn WaitPredicate>,
    total_time: f32,
}

impl WaitCondition {
    pub fn new(predicate: impl WaitPredicate + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
            total_time: 0.0,
        }
    }

    /// Wait while `predicate` returns true.
    pub fn wait_while(predicate: impl FnMut() -> bool + 'static) -> Self {
        Self::new(WhilePredicate(predicate))
    }

    /// Wait while `predicate(total_time)` returns true, where `total_time` is
    /// the time accumulated since the condition was installed.
    pub fn wait_while_timed(predicate: impl FnMut(f32) -> bool + 'static) -> Self {
        Self::new(TimedPredicate(predicate))
    }

    /// Wait until the probed node reports that nothing is running.
    pub fn wait_for_animation(probe: Rc<dyn RunningProbe>) -> Self {
        Self::new(AnimationPredicate(probe))
    }

    #[inline]
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Accumulates `delta` and reports whether the owner must keep waiting.
    pub(crate) fn tick(&mut self, delta: f32) -> bool {
        self.total_time += delta;
        self.predicate.evaluate(self.total_time)
    }
}

impl fmt::Debug for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitCondition")
            .field("total_time", &self.total_time)
            .finish_non_exhaustive()
    }
}
