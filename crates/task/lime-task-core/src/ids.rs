//! Task identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TaskId(pub u64);

static NEXT_TASK: AtomicU64 = AtomicU64::new(0);

impl TaskId {
    /// Allocates a process-wide unique id, so ambient lookups stay
    /// unambiguous across independent task lists.
    #[inline]
    pub fn fresh() -> Self {
        TaskId(NEXT_TASK.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_monotonic() {
        let a = TaskId::fresh();
        let b = TaskId::fresh();
        assert!(b > a);
        assert_eq!(format!("{}", TaskId(7)), "task#7");
    }
}
