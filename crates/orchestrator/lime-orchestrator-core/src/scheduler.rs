use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use lime_animation::AdvanceContext;

/// Order in which the driver advances its task lists and the scene each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schedule {
    /// Tasks -> scene: tasks observe the scene as it was at the end of the last tick.
    #[default]
    TasksFirst,
    /// Scene -> tasks: tasks observe this tick's animation state.
    SceneFirst,
}

/// Run a tasks-first tick:
///   Task lists (insertion order) -> scene update -> frame
pub fn run_tasks_first(orchestrator: &mut crate::Orchestrator, dt: f32) -> Result<crate::TickFrame> {
    advance_tasks(orchestrator, dt)?;
    let events = advance_scene(orchestrator, dt);
    Ok(collect_frame(orchestrator, dt, events))
}

/// Run a scene-first tick:
///   Scene update -> task lists (insertion order) -> frame
pub fn run_scene_first(orchestrator: &mut crate::Orchestrator, dt: f32) -> Result<crate::TickFrame> {
    let events = advance_scene(orchestrator, dt);
    advance_tasks(orchestrator, dt)?;
    Ok(collect_frame(orchestrator, dt, events))
}

fn advance_tasks(orchestrator: &mut crate::Orchestrator, dt: f32) -> Result<()> {
    let epoch = orchestrator.epoch;
    for (name, list) in orchestrator.lists.iter_mut() {
        list.advance(dt)
            .with_context(|| format!("task list '{name}' failed at epoch {epoch}"))?;
    }
    Ok(())
}

/// Updates the scene and drains the triggers it fired as JSON events.
fn advance_scene(orchestrator: &crate::Orchestrator, dt: f32) -> Vec<JsonValue> {
    let mut events = Vec::new();
    let Some(root) = &orchestrator.scene else {
        return events;
    };
    let ctx = AdvanceContext {
        record_triggers: true,
        ..AdvanceContext::default()
    };
    root.advance_animations_recursive(f64::from(dt), &ctx);
    for node in root.subtree() {
        let id = node.id();
        for trigger in node.borrow_mut().take_fired_triggers() {
            events.push(json!({ "node": &id, "trigger": trigger }));
        }
    }
    events
}

fn collect_frame(orchestrator: &crate::Orchestrator, dt: f32, events: Vec<JsonValue>) -> crate::TickFrame {
    let task_counts = orchestrator
        .lists
        .iter()
        .map(|(name, list)| (name.clone(), list.len()))
        .collect();
    crate::TickFrame {
        epoch: orchestrator.epoch,
        dt,
        live_tasks: orchestrator.live_tasks(),
        task_counts,
        events,
    }
}
