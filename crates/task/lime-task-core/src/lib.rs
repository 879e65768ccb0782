//! Lime Task Core (engine-agnostic)
//!
//! Cooperative tasks built from stacks of resumable step-sequences. A host
//! drives a [`TaskList`] once per frame with the frame delta; every live task
//! resumes at most one yield point of its innermost sequence, honouring numeric
//! waits and [`WaitCondition`]s. Nested sequences run synchronously in the tick
//! they were yielded, so nesting never adds frame latency.

pub mod async_work;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod list;
pub mod motion;
pub mod observer;
pub mod sequence;
pub mod task;
pub mod wait;

// Re-exports for consumers (drivers and scripts)
pub use async_work::{execute_async, ExecuteAsync};
pub use config::SchedulerConfig;
pub use context::{current_task, TaskContext, WatchVerdict, Watcher};
pub use error::{TaskError, TaskResult};
pub use ids::TaskId;
pub use list::TaskList;
pub use motion::{animate, Animate, Motion, MotionCurve};
pub use observer::{NoopObserver, ProfileEntry, TaskObserver, TaskProfiler};
pub use sequence::{delay, from_fn, from_iter, wait, wait_while, StepSequence, Yield};
pub use task::Task;
pub use wait::{RunningProbe, WaitCondition, WaitPredicate};
