//! Off-thread work awaited from a task.

use std::thread::{self, JoinHandle};

use crate::context::TaskContext;
use crate::sequence::{StepSequence, Yield};

/// Starts `work` on a worker thread at the first resume and yields
/// [`Yield::NextTick`] until it has finished. A panicking worker counts as
/// finished.
pub struct ExecuteAsync {
    work: Option<Box<dyn FnOnce() + Send>>,
    handle: Option<JoinHandle<()>>,
}

pub fn execute_async(work: impl FnOnce() + Send + 'static) -> ExecuteAsync {
    ExecuteAsync {
        work: Some(Box::new(work)),
        handle: None,
    }
}

impl StepSequence for ExecuteAsync {
    fn resume(&mut self, _ctx: &mut TaskContext<'_>) -> Option<Yield> {
        if let Some(work) = self.work.take() {
            self.handle = Some(thread::spawn(work));
        }
        if self.handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return Some(Yield::NextTick);
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("async task work panicked");
            }
        }
        None
    }

    // A running worker is detached, not interrupted.
    fn dispose(&mut self) {
        self.work = None;
        self.handle = None;
    }

    fn name(&self) -> &str {
        "ExecuteAsync"
    }
}
