use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lime_task::{animate, execute_async, Motion, TaskList};

#[test]
fn linear_motion_through_a_task() {
    let values = Rc::new(RefCell::new(Vec::new()));
    let v = values.clone();
    let mut list = TaskList::new();
    list.spawn(animate(Motion::linear(1.0, 0.0, 10.0), move |x| v.borrow_mut().push(x)));

    for _ in 0..5 {
        list.advance(0.25).unwrap();
    }
    assert_eq!(*values.borrow(), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    assert_eq!(list.len(), 1);

    list.advance(0.25).unwrap();
    assert!(list.is_empty());
}

#[test]
fn sin_motion_is_monotonic_and_lands_on_target() {
    let mut m = Motion::sin(1.0, 2.0, 4.0);
    let mut last = f32::MIN;
    let mut out = Vec::new();
    while let Some(x) = m.next_value(0.1) {
        assert!(x >= last, "{x} < {last}");
        last = x;
        out.push(x);
    }
    assert_eq!(out.first().copied(), Some(2.0));
    assert_eq!(out.last().copied(), Some(4.0));
    assert!(m.is_finished());
}

#[test]
fn sqrt_motion_front_loads_progress() {
    let mut lin = Motion::linear(1.0, 0.0, 1.0);
    let mut sq = Motion::sqrt(1.0, 0.0, 1.0);
    lin.next_value(0.25);
    sq.next_value(0.25);
    let a = lin.next_value(0.25).unwrap();
    let b = sq.next_value(0.25).unwrap();
    assert!(b > a);
    assert!((b - 0.5).abs() < 1e-6);
}

#[test]
fn execute_async_finishes_after_the_work() {
    let done = Arc::new(AtomicBool::new(false));
    let d = done.clone();
    let mut list = TaskList::new();
    list.spawn(execute_async(move || {
        std::thread::sleep(Duration::from_millis(5));
        d.store(true, Ordering::SeqCst);
    }));

    let mut ticks = 0;
    while !list.is_empty() {
        list.advance(1.0 / 60.0).unwrap();
        std::thread::sleep(Duration::from_millis(1));
        ticks += 1;
        assert!(ticks < 10_000, "async work never completed");
    }
    assert!(done.load(Ordering::SeqCst));
}
