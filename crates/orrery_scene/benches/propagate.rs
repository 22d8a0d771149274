use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orrery_core::Mat4;
use orrery_scene::{Node, SceneGraph};

/// Sun plus carrier/body pairs, the shape the orrery builds
fn solar_system(bodies: usize) -> SceneGraph {
    let mut graph = SceneGraph::new();
    let root = graph.spawn(Node::new().with_name("solar_system"));
    for i in 0..bodies {
        let carrier = graph
            .spawn_under(root, Node::new().with_local(Mat4::translation(i as f32, 0.0, 0.0)))
            .unwrap();
        graph
            .spawn_under(carrier, Node::new().with_local(Mat4::uniform_scale(0.25)))
            .unwrap();
    }
    graph
}

/// A single chain, worst case for depth
fn chain(depth: usize) -> SceneGraph {
    let mut graph = SceneGraph::new();
    let mut parent = graph.spawn(Node::new());
    for _ in 0..depth {
        parent = graph
            .spawn_under(parent, Node::new().with_local(Mat4::rotation_y(0.01)))
            .unwrap();
    }
    graph
}

fn bench_propagate(c: &mut Criterion) {
    let mut wide = solar_system(12);
    c.bench_function("propagate_solar_system_12", |b| {
        b.iter(|| black_box(wide.propagate_all(None)))
    });

    let mut large = solar_system(1000);
    c.bench_function("propagate_wide_1000", |b| {
        b.iter(|| black_box(large.propagate_all(None)))
    });

    let mut deep = chain(1000);
    c.bench_function("propagate_chain_1000", |b| {
        b.iter(|| black_box(deep.propagate_all(None)))
    });
}

criterion_group!(benches, bench_propagate);
criterion_main!(benches);
