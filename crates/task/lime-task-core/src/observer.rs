//! Optional instrumentation hooks for task lists.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use hashbrown::HashMap;
use serde::Serialize;

use crate::ids::TaskId;

/// Receives scheduling events. All hooks default to no-ops.
pub trait TaskObserver {
    fn task_spawned(&mut self, _task: TaskId, _sequence: &str) {}
    /// Called once per update of a task, nested zero-delta resumes included.
    fn task_advanced(&mut self, _task: TaskId, _sequence: &str) {}
    fn task_removed(&mut self, _task: TaskId) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TaskObserver for NoopObserver {}

/// Lets a caller keep a handle on an observer that a list owns.
impl<T: TaskObserver + ?Sized> TaskObserver for Rc<RefCell<T>> {
    fn task_spawned(&mut self, task: TaskId, sequence: &str) {
        self.borrow_mut().task_spawned(task, sequence);
    }

    fn task_advanced(&mut self, task: TaskId, sequence: &str) {
        self.borrow_mut().task_advanced(task, sequence);
    }

    fn task_removed(&mut self, task: TaskId) {
        self.borrow_mut().task_removed(task);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileEntry {
    pub call_count: u64,
    pub task_count: u64,
}

/// Counts updates per step-sequence type.
#[derive(Debug, Default)]
pub struct TaskProfiler {
    total_updates: u64,
    entries: HashMap<String, ProfileEntry>,
}

impl TaskProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn total_updates(&self) -> u64 {
        self.total_updates
    }

    pub fn entry(&self, sequence: &str) -> Option<ProfileEntry> {
        self.entries.get(sequence).copied()
    }

    pub fn reset(&mut self) {
        self.total_updates = 0;
        self.entries.clear();
    }

    /// Write a table of entries, busiest sequence first.
    pub fn dump(&self, writer: &mut dyn io::Write) -> io::Result<()> {
        let mut rows: Vec<(&String, &ProfileEntry)> = self.entries.iter().collect();
        rows.sort_by(|a, b| b.1.call_count.cmp(&a.1.call_count).then_with(|| a.0.cmp(b.0)));
        writeln!(writer, "Call count\tTask count\tSequence")?;
        writeln!(writer, "{}", "=".repeat(72))?;
        for (name, entry) in rows {
            writeln!(
                writer,
                "{:>10}\t{:>10}\t{}",
                entry.call_count, entry.task_count, name
            )?;
        }
        writeln!(writer, "Total task updates: {}", self.total_updates)
    }
}

impl TaskObserver for TaskProfiler {
    fn task_spawned(&mut self, _task: TaskId, sequence: &str) {
        self.entries.entry_ref(sequence).or_default().task_count += 1;
    }

    fn task_advanced(&mut self, _task: TaskId, sequence: &str) {
        self.total_updates += 1;
        self.entries.entry_ref(sequence).or_default().call_count += 1;
    }
}
