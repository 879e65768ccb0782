use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lime_task::{from_fn, wait, TaskList, TaskProfiler, Yield};

const DT: f32 = 1.0 / 60.0;

#[test]
fn tasks_resume_in_insertion_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut list = TaskList::new();
    for idx in 0..3 {
        let log = log.clone();
        list.spawn(from_fn(move |_ctx| {
            log.borrow_mut().push(idx);
            Some(Yield::NextTick)
        }));
    }
    list.advance(DT).unwrap();
    list.advance(DT).unwrap();
    assert_eq!(*log.borrow(), vec![0, 1, 2, 0, 1, 2]);
    assert_eq!(list.len(), 3);
}

#[test]
fn completed_tasks_are_removed_in_the_same_tick() {
    let mut list = TaskList::new();
    let id = list.spawn(from_fn(|_ctx| None));
    assert!(list.contains(id));
    list.advance(DT).unwrap();
    assert!(!list.contains(id));
    assert!(list.is_empty());
}

#[test]
fn spawned_tasks_run_in_the_spawning_tick() {
    let ran = Rc::new(Cell::new(false));
    let r = ran.clone();
    let mut spawned = false;
    let mut list = TaskList::new();
    list.spawn(from_fn(move |ctx| {
        if !spawned {
            spawned = true;
            let r = r.clone();
            ctx.spawn(from_fn(move |_ctx| {
                r.set(true);
                None
            }));
        }
        Some(Yield::NextTick)
    }));
    list.advance(DT).unwrap();
    assert!(ran.get());
    assert_eq!(list.len(), 1);
}

#[test]
fn cancel_disposes_and_removes() {
    let disposed = Rc::new(Cell::new(0));
    let d = disposed.clone();
    let mut list = TaskList::new();
    let id = list.spawn(
        from_fn(|_ctx| Some(Yield::NextTick)).on_dispose(move || d.set(d.get() + 1)),
    );
    list.advance(DT).unwrap();
    assert!(list.cancel(id));
    assert_eq!(disposed.get(), 1);
    assert!(!list.cancel(id));
    assert!(list.is_empty());
}

#[test]
fn cancel_by_tag_only_touches_matching_tasks() {
    let mut list = TaskList::new();
    list.spawn_tagged(wait(5.0), "ui");
    list.spawn_tagged(wait(5.0), "ui");
    let game = list.spawn_tagged(wait(5.0), "game");
    list.spawn(wait(5.0));
    list.advance(DT).unwrap();

    assert_eq!(list.cancel_by_tag(&"ui"), 2);
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(game).and_then(|t| t.tag::<&str>()), Some(&"game"));
}

#[test]
fn stop_disposes_everything() {
    let disposed = Rc::new(Cell::new(0));
    let mut list = TaskList::new();
    for _ in 0..4 {
        let d = disposed.clone();
        list.spawn(from_fn(|_ctx| Some(Yield::Wait(1.0))).on_dispose(move || d.set(d.get() + 1)));
    }
    list.advance(DT).unwrap();
    list.stop();
    assert!(list.is_empty());
    assert_eq!(disposed.get(), 4);
}

#[test]
fn invalid_yield_terminates_only_the_offending_task() {
    let runs = Rc::new(RefCell::new(Vec::new()));
    let mut list = TaskList::new();
    for name in ["before", "bad", "after"] {
        let runs = runs.clone();
        list.spawn(from_fn(move |_ctx| {
            runs.borrow_mut().push(name);
            if name == "bad" {
                Some(Yield::Wait(-0.5))
            } else {
                Some(Yield::NextTick)
            }
        }));
    }

    assert!(list.advance(DT).is_err());
    assert_eq!(*runs.borrow(), vec!["before", "bad"]);
    assert_eq!(list.len(), 2);

    list.advance(DT).unwrap();
    assert_eq!(*runs.borrow(), vec!["before", "bad", "before", "after"]);
}

#[test]
fn profiler_counts_updates_per_sequence() {
    let profiler = Rc::new(RefCell::new(TaskProfiler::new()));
    let mut list = TaskList::new();
    list.set_observer(profiler.clone());

    let mut remaining = 3;
    list.spawn(
        from_fn(move |_ctx| {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            Some(Yield::NextTick)
        })
        .named("Blinker"),
    );
    for _ in 0..4 {
        list.advance(DT).unwrap();
    }
    assert!(list.is_empty());

    let profiler = profiler.borrow();
    let entry = profiler.entry("Blinker").expect("profile entry");
    assert_eq!(entry.call_count, 4);
    assert_eq!(entry.task_count, 1);
    assert_eq!(profiler.total_updates(), 4);

    let mut out: Vec<u8> = Vec::new();
    profiler.dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Blinker"));
    assert!(text.contains("Total task updates: 4"));
}

#[test]
fn list_tracks_delta_and_ticks() {
    let mut list = TaskList::new();
    list.advance(0.02).unwrap();
    list.advance(0.03).unwrap();
    assert_eq!(list.delta(), 0.03);
    assert_eq!(list.total_ticks(), 2);
}
