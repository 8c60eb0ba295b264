use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scenery_animation_core::{
    AnimationClip, AnimationHost, BindingDesc, CurveSet, Engine, Keyframe, NodeId, NodePath,
    PropertyKind, Value, WrapMode,
};

struct NullHost;

impl AnimationHost for NullHost {
    fn resolve(&self, root: NodeId, _path: &NodePath) -> Option<NodeId> {
        Some(root)
    }

    fn apply(&mut self, _target: NodeId, _property: PropertyKind, value: &Value) -> bool {
        black_box(value);
        true
    }
}

fn busy_clip(name: &str) -> AnimationClip {
    let keys = |a: f32, b: f32| {
        (0..=8)
            .map(|i| {
                let t = i as f32 / 8.0;
                Keyframe::new(t * 2.0, Value::f(a + (b - a) * t)).with_easing("sineInOut")
            })
            .collect::<Vec<_>>()
    };
    AnimationClip::new(name, 2.0, WrapMode::PingPong).with_curves(
        CurveSet::at(NodePath::root())
            .with_track(PropertyKind::Opacity, keys(0.0, 255.0))
            .with_track(PropertyKind::Rotation, keys(0.0, 360.0))
            .with_track(PropertyKind::ScaleX, keys(1.0, 2.0))
            .with_track(
                PropertyKind::Position,
                vec![
                    Keyframe::new(0.0, Value::vec2(0.0, 0.0)).with_bezier([0.42, 0.0, 0.58, 1.0]),
                    Keyframe::new(2.0, Value::vec2(100.0, 50.0)),
                ],
            ),
    )
}

fn bench_tick(c: &mut Criterion) {
    let mut eng = Engine::default();
    for i in 0..64u32 {
        let node = NodeId::new(i, 0);
        eng.add_binding(BindingDesc::new(node, vec![busy_clip("busy")]));
        eng.start(node, "busy", None);
    }
    let mut host = NullHost;
    c.bench_function("tick_64_instances", |b| {
        b.iter(|| {
            eng.update(black_box(1.0 / 60.0), &mut host);
        })
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
