use std::cell::RefCell;
use std::rc::Rc;

use lime_animation::{Animation, Node, NodeRef, Scene, ScrubOutcome};
use lime_orchestrator::{DiagnosticsCfg, DriverConfig, Orchestrator, Schedule};
use lime_task::{from_fn, wait, TaskError, Yield};
use lime_test_fixtures::{drivers, scenes};

fn running_node() -> NodeRef {
    NodeRef::new(Node::new("root").with_animation(Animation::new("").running(true)))
}

fn sampled_time_on_first_tick(schedule: Schedule) -> f64 {
    let root = running_node();
    let mut orch = Orchestrator::new(DriverConfig {
        schedule,
        ..DriverConfig::default()
    })
    .with_scene(root.clone());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    orch.spawn(
        "main",
        from_fn(move |_ctx| {
            sink.borrow_mut().push(root.animation_time("").unwrap());
            Some(Yield::NextTick)
        }),
    );
    orch.step(0.05).expect("step ok");
    let first = seen.borrow()[0];
    first
}

#[test]
fn schedule_controls_what_tasks_observe() {
    assert_eq!(sampled_time_on_first_tick(Schedule::TasksFirst), 0.0);
    assert!(sampled_time_on_first_tick(Schedule::SceneFirst) > 0.0);
}

#[test]
fn delta_is_clamped() {
    let mut orch = Orchestrator::default();
    assert_eq!(orch.step(1.0).unwrap().dt, 0.1);
    assert_eq!(orch.step(-1.0).unwrap().dt, 0.0);
    assert_eq!(orch.step(f32::NAN).unwrap().dt, 0.0);
    assert_eq!(orch.step(0.02).unwrap().dt, 0.02);
    assert_eq!(orch.epoch, 4);
}

#[test]
fn task_lists_report_in_creation_order() {
    let mut orch = Orchestrator::default();
    orch.spawn("ui", wait(1.0));
    orch.spawn("game", wait(1.0));
    orch.spawn("game", wait(1.0));

    let frame = orch.step(0.016).unwrap();
    let names: Vec<&str> = frame.task_counts.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["ui", "game"]);
    assert_eq!(frame.task_counts["game"], 2);
    assert_eq!(frame.live_tasks, 3);
}

#[test]
fn failing_task_surfaces_with_list_context() {
    let mut orch = Orchestrator::default();
    orch.spawn("main", from_fn(|_ctx| Some(Yield::Wait(-1.0))));

    let err = orch.step(0.016).unwrap_err();
    assert!(err.to_string().contains("task list 'main'"));
    assert!(matches!(
        err.downcast_ref::<TaskError>(),
        Some(TaskError::InvalidYield { .. })
    ));
    assert_eq!(orch.live_tasks(), 0);
}

#[test]
fn scene_triggers_become_frame_events() {
    let scene = Scene::from_json(&scenes::json("basic-tree").unwrap()).unwrap();
    let mut orch = Orchestrator::default().with_scene(scene.root.clone());

    let mut events = Vec::new();
    for _ in 0..30 {
        events.extend(orch.step(1.0 / 30.0).unwrap().events);
    }
    let hits: Vec<_> = events
        .iter()
        .filter(|e| e["node"] == "root" && e["trigger"] == "hit")
        .collect();
    assert_eq!(hits.len(), 1);
    assert!(events.iter().any(|e| e["trigger"] == "grip"));
}

#[test]
fn scrubbing_does_not_leak_triggers_into_the_next_tick() {
    let scene = Scene::from_json(&scenes::json("basic-tree").unwrap()).unwrap();
    let mut orch = Orchestrator::default().with_scene(scene.root.clone());

    orch.scrub_to("", 15, true).unwrap();
    let frame = orch.step(0.0).unwrap();
    assert!(frame.events.is_empty(), "unexpected events {:?}", frame.events);
}

#[test]
fn scrubbing_requires_a_scene() {
    let mut orch = Orchestrator::default();
    let err = orch.scrub_to("", 10, true).unwrap_err();
    assert!(err.to_string().contains("no scene attached"));
}

#[test]
fn scrubbing_uses_configured_cache() {
    let config: DriverConfig = drivers::load("default").unwrap();
    assert!(config.positioner.cache_animation_states);

    let scene = Scene::from_json(&scenes::json("emitter-tree").unwrap()).unwrap();
    let mut orch = Orchestrator::new(config).with_scene(scene.root.clone());

    assert_eq!(orch.scrub_to("", 10, true).unwrap(), ScrubOutcome::CacheCreated);
    assert_eq!(
        orch.scrub_to("", 12, true).unwrap(),
        ScrubOutcome::Incremental { cached_frame: 10 }
    );
    let err = orch.scrub_to("missing", 3, true).unwrap_err();
    assert!(err.to_string().contains("scrubbing 'missing'"));
}

#[test]
fn scene_first_fixture_parses() {
    let config: DriverConfig = drivers::load("scene-first").unwrap();
    assert_eq!(config.schedule, Schedule::SceneFirst);
    assert_eq!(config.max_delta, 0.05);
    assert!(!config.positioner.cache_animation_states);
}

#[test]
fn profiler_counts_task_updates() {
    let mut orch = Orchestrator::new(DriverConfig {
        diagnostics: DiagnosticsCfg {
            enabled: false,
            profile_tasks: true,
        },
        ..DriverConfig::default()
    });
    orch.spawn("main", wait(0.05));
    for _ in 0..3 {
        orch.step(0.02).unwrap();
    }
    assert!(orch.profiler().unwrap().total_updates() >= 3);

    let mut out: Vec<u8> = Vec::new();
    orch.dump_profile(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Total task updates"));

    assert!(Orchestrator::default().dump_profile(&mut Vec::<u8>::new()).is_err());
}
