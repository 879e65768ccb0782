use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lime_animation::{Animation, Node, NodeRef};
use lime_orchestrator::Orchestrator;
use lime_task::{from_fn, Yield};

fn bench_tick(c: &mut Criterion) {
    let root = NodeRef::new(Node::new("root").with_animation(Animation::new("").running(true)));
    for i in 0..32 {
        root.add_child(NodeRef::new(
            Node::new(format!("child{i}")).with_animation(Animation::new("").running(true)),
        ));
    }
    let mut orch = Orchestrator::default().with_scene(root);
    for _ in 0..256 {
        orch.spawn("main", from_fn(|_ctx| Some(Yield::NextTick)));
    }

    c.bench_function("orchestrator_tick", |b| {
        b.iter(|| orch.step(black_box(1.0 / 60.0)).unwrap())
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
