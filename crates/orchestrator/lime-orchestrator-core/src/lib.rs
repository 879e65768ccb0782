//! lime-orchestrator
//!
//! The frame driver: owns named task lists and an optional animated scene,
//! clamps the incoming delta and steps both exactly once per tick in the
//! configured order. Editor-side scrubbing goes through [`Orchestrator::scrub_to`].

pub mod diagnostics;
pub mod scheduler;

use std::cell::{Ref, RefCell};
use std::io;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use lime_animation::{AnimationPositioner, NodeRef, PositionerConfig, ScrubOutcome};
use lime_task::{SchedulerConfig, StepSequence, TaskId, TaskList, TaskProfiler};

pub use crate::diagnostics::DiagnosticsCfg;
pub use crate::scheduler::Schedule;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Upper bound for a single tick's delta, in seconds.
    pub max_delta: f32,
    pub schedule: Schedule,
    /// Applied to every task list the driver creates.
    pub scheduler: SchedulerConfig,
    pub positioner: PositionerConfig,
    pub diagnostics: DiagnosticsCfg,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_delta: 0.1,
            schedule: Schedule::default(),
            scheduler: SchedulerConfig::default(),
            positioner: PositionerConfig::default(),
            diagnostics: DiagnosticsCfg::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickFrame {
    pub epoch: u64,
    /// The clamped delta actually applied.
    pub dt: f32,
    pub live_tasks: usize,
    /// Live tasks per list, in list creation order.
    pub task_counts: IndexMap<String, usize>,
    /// Triggers fired by the scene this tick, as `{ "node", "trigger" }` objects.
    pub events: Vec<serde_json::Value>,
}

#[derive(Debug)]
pub struct Orchestrator {
    pub config: DriverConfig,
    pub epoch: u64,
    /// Task lists keyed by name, advanced in insertion order.
    pub lists: IndexMap<String, TaskList>,
    pub scene: Option<NodeRef>,
    pub positioner: AnimationPositioner,
    profiler: Option<Rc<RefCell<TaskProfiler>>>,
}

impl Orchestrator {
    pub fn new(config: DriverConfig) -> Self {
        let profiler = config
            .diagnostics
            .profile_tasks
            .then(|| Rc::new(RefCell::new(TaskProfiler::new())));
        Self {
            positioner: AnimationPositioner::new(config.positioner.clone()),
            config,
            epoch: 0,
            lists: IndexMap::new(),
            scene: None,
            profiler,
        }
    }

    /// Attach the scene root updated every tick and targeted by scrubbing.
    pub fn with_scene(mut self, root: NodeRef) -> Self {
        self.scene = Some(root);
        self
    }

    /// The named task list, created on first use.
    pub fn task_list(&mut self, name: &str) -> &mut TaskList {
        let scheduler = self.config.scheduler;
        let profiler = &self.profiler;
        self.lists.entry(name.to_string()).or_insert_with(|| {
            let mut list = TaskList::with_config(scheduler);
            if let Some(profiler) = profiler {
                list.set_observer(Rc::clone(profiler));
            }
            list
        })
    }

    pub fn spawn(&mut self, list: &str, sequence: impl StepSequence + 'static) -> TaskId {
        self.task_list(list).spawn(sequence)
    }

    pub fn live_tasks(&self) -> usize {
        self.lists.values().map(TaskList::len).sum()
    }

    /// Advance everything by `dt` seconds, clamped into `[0, max_delta]`.
    pub fn step(&mut self, dt: f32) -> Result<TickFrame> {
        let dt = self.clamp_delta(dt);
        self.epoch = self.epoch.wrapping_add(1);

        let frame = match self.config.schedule {
            Schedule::TasksFirst => crate::scheduler::run_tasks_first(self, dt)?,
            Schedule::SceneFirst => crate::scheduler::run_scene_first(self, dt)?,
        };

        if self.config.diagnostics.enabled {
            log::debug!(
                "epoch {} dt {:.4}: {} live tasks, {} scene events",
                frame.epoch,
                frame.dt,
                frame.live_tasks,
                frame.events.len()
            );
        }
        Ok(frame)
    }

    /// Position `animation_id` on the scene root at `frame`.
    pub fn scrub_to(&mut self, animation_id: &str, frame: i32, animation_mode: bool) -> Result<ScrubOutcome> {
        let root = self
            .scene
            .as_ref()
            .ok_or_else(|| anyhow!("cannot scrub '{animation_id}': no scene attached"))?;
        self.positioner
            .set_animation_frame(root, animation_id, frame, animation_mode)
            .with_context(|| format!("scrubbing '{animation_id}' to frame {frame}"))
    }

    pub fn profiler(&self) -> Option<Ref<'_, TaskProfiler>> {
        self.profiler.as_ref().map(|p| p.borrow())
    }

    pub fn dump_profile(&self, writer: &mut dyn io::Write) -> Result<()> {
        let profiler = self
            .profiler()
            .ok_or_else(|| anyhow!("task profiling is disabled"))?;
        profiler.dump(writer).context("writing task profile")?;
        Ok(())
    }

    fn clamp_delta(&self, dt: f32) -> f32 {
        if !dt.is_finite() {
            log::warn!("non-finite tick delta {dt} treated as zero");
            return 0.0;
        }
        dt.clamp(0.0, self.config.max_delta.max(0.0))
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}
