//! Step-sequences: resumable units of work and the values they yield.

use std::fmt;
use std::rc::Rc;

use crate::context::TaskContext;
use crate::wait::{RunningProbe, WaitCondition};

/// How a suspended sequence wants to be resumed.
pub enum Yield {
    /// Resume again on the next tick.
    NextTick,
    /// Sleep for the given number of seconds. Must be finite and non-negative.
    Wait(f32),
    /// Push a nested sequence and run it right away, within the same tick.
    Nested(Box<dyn StepSequence>),
    /// Sleep while the condition holds.
    Condition(WaitCondition),
    /// Sleep until the node's animations stop running.
    Animation(Rc<dyn RunningProbe>),
}

impl Yield {
    pub fn nested(sequence: impl StepSequence + 'static) -> Self {
        Yield::Nested(Box::new(sequence))
    }

    pub fn wait_while(predicate: impl FnMut() -> bool + 'static) -> Self {
        Yield::Condition(WaitCondition::wait_while(predicate))
    }

    pub fn animation(probe: impl RunningProbe + 'static) -> Self {
        Yield::Animation(Rc::new(probe))
    }
}

impl fmt::Debug for Yield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Yield::NextTick => f.write_str("NextTick"),
            Yield::Wait(s) => f.debug_tuple("Wait").field(s).finish(),
            Yield::Nested(seq) => f.debug_tuple("Nested").field(&seq.name()).finish(),
            Yield::Condition(c) => f.debug_tuple("Condition").field(c).finish(),
            Yield::Animation(_) => f.write_str("Animation"),
        }
    }
}

/// A resumable unit of work. Each call to [`StepSequence::resume`] runs up to
/// the next suspension point; `None` means the sequence has finished.
pub trait StepSequence {
    fn resume(&mut self, ctx: &mut TaskContext<'_>) -> Option<Yield>;

    /// Releases whatever an unfinished sequence holds. Called when the owning
    /// task is disposed; never called for a sequence that ran to completion.
    fn dispose(&mut self) {}

    /// Used in error reports and profiles.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<S: StepSequence + ?Sized> StepSequence for Box<S> {
    fn resume(&mut self, ctx: &mut TaskContext<'_>) -> Option<Yield> {
        (**self).resume(ctx)
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Closure-backed sequence; the closure is the state machine.
pub struct FnSequence<F> {
    f: F,
    name: Option<&'static str>,
    on_dispose: Option<Box<dyn FnMut()>>,
}

pub fn from_fn<F>(f: F) -> FnSequence<F>
where
    F: FnMut(&mut TaskContext<'_>) -> Option<Yield>,
{
    FnSequence {
        f,
        name: None,
        on_dispose: None,
    }
}

impl<F> FnSequence<F> {
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn on_dispose(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_dispose = Some(Box::new(hook));
        self
    }
}

impl<F> StepSequence for FnSequence<F>
where
    F: FnMut(&mut TaskContext<'_>) -> Option<Yield>,
{
    fn resume(&mut self, ctx: &mut TaskContext<'_>) -> Option<Yield> {
        (self.f)(ctx)
    }

    fn dispose(&mut self) {
        if let Some(hook) = self.on_dispose.as_mut() {
            hook();
        }
    }

    fn name(&self) -> &str {
        self.name.unwrap_or_else(|| std::any::type_name::<F>())
    }
}

/// Sequence that replays a fixed list (or any iterator) of yields.
pub struct IterSequence<I> {
    iter: I,
}

pub fn from_iter<I>(iter: I) -> IterSequence<I::IntoIter>
where
    I: IntoIterator<Item = Yield>,
{
    IterSequence {
        iter: iter.into_iter(),
    }
}

impl<I: Iterator<Item = Yield>> StepSequence for IterSequence<I> {
    fn resume(&mut self, _ctx: &mut TaskContext<'_>) -> Option<Yield> {
        self.iter.next()
    }
}

/// Sleeps once for a fixed time.
#[derive(Debug, Clone, Copy)]
pub struct Sleep {
    seconds: f32,
    slept: bool,
}

pub fn wait(seconds: f32) -> Sleep {
    Sleep {
        seconds,
        slept: false,
    }
}

impl StepSequence for Sleep {
    fn resume(&mut self, _ctx: &mut TaskContext<'_>) -> Option<Yield> {
        if self.slept {
            return None;
        }
        self.slept = true;
        Some(Yield::Wait(self.seconds))
    }
}

/// Suspends while a predicate holds, then finishes.
pub struct WaitWhile<P> {
    predicate: Option<P>,
}

pub fn wait_while<P>(predicate: P) -> WaitWhile<P>
where
    P: FnMut() -> bool + 'static,
{
    WaitWhile {
        predicate: Some(predicate),
    }
}

impl<P> StepSequence for WaitWhile<P>
where
    P: FnMut() -> bool + 'static,
{
    fn resume(&mut self, _ctx: &mut TaskContext<'_>) -> Option<Yield> {
        self.predicate
            .take()
            .map(|p| Yield::Condition(WaitCondition::wait_while(p)))
    }
}

/// Runs an action once the given time has passed.
pub struct Delay<A> {
    seconds: f32,
    action: Option<A>,
    slept: bool,
}

pub fn delay<A: FnOnce()>(seconds: f32, action: A) -> Delay<A> {
    Delay {
        seconds,
        action: Some(action),
        slept: false,
    }
}

impl<A: FnOnce()> StepSequence for Delay<A> {
    fn resume(&mut self, _ctx: &mut TaskContext<'_>) -> Option<Yield> {
        if !self.slept {
            self.slept = true;
            return Some(Yield::Wait(self.seconds));
        }
        if let Some(action) = self.action.take() {
            action();
        }
        None
    }

    fn dispose(&mut self) {
        self.action = None;
    }
}
