use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lime_task::{from_fn, StepSequence, TaskList, Yield};

fn ticker() -> impl StepSequence {
    from_fn(|_ctx| Some(Yield::NextTick))
}

fn nested_ticker(depth: usize) -> Box<dyn StepSequence> {
    let mut child = (depth > 0).then(|| nested_ticker(depth - 1));
    Box::new(from_fn(move |_ctx| {
        Some(child.take().map(Yield::Nested).unwrap_or(Yield::NextTick))
    }))
}

fn bench_task_advance(c: &mut Criterion) {
    c.bench_function("advance_1000_flat_tasks", |b| {
        let mut list = TaskList::new();
        for _ in 0..1000 {
            list.spawn(ticker());
        }
        b.iter(|| list.advance(black_box(1.0 / 60.0)).unwrap())
    });

    c.bench_function("advance_100_tasks_nested_8_deep", |b| {
        let mut list = TaskList::new();
        for _ in 0..100 {
            list.spawn(nested_ticker(8));
        }
        b.iter(|| list.advance(black_box(1.0 / 60.0)).unwrap())
    });
}

criterion_group!(benches, bench_task_advance);
criterion_main!(benches);
