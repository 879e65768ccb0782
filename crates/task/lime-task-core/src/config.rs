//! Scheduler configuration.

use serde::{Deserialize, Serialize};

/// Per-scheduler policy flags. Tasks copy them when they are spawned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// When set, a nested sequence that finishes costs one extra tick before
    /// its parent is resumed. When clear (the default) the parent resumes
    /// immediately with a zero delta.
    #[serde(default)]
    pub skip_frame_on_task_completion: bool,
}

impl SchedulerConfig {
    pub fn skipping_frames() -> Self {
        Self {
            skip_frame_on_task_completion: true,
        }
    }
}
