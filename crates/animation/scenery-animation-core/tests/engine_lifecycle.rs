use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use scenery_animation_core::{
    AnimationClip, AnimationHost, BindingDesc, CoreEvent, CurveSet, Engine, Keyframe, NodeId,
    NodePath, PlaybackCommand, PropertyKind, Value, WrapMode,
};

/// Flat host: paths are looked up verbatim below each root.
#[derive(Default)]
struct MockHost {
    children: HashMap<(NodeId, String), NodeId>,
    applied: Vec<(NodeId, PropertyKind, Value)>,
}

impl MockHost {
    fn last(&self, node: NodeId, prop: PropertyKind) -> Option<&Value> {
        self.applied
            .iter()
            .rev()
            .find(|(n, p, _)| *n == node && *p == prop)
            .map(|(_, _, v)| v)
    }
}

impl AnimationHost for MockHost {
    fn resolve(&self, root: NodeId, path: &NodePath) -> Option<NodeId> {
        if path.is_root() {
            return Some(root);
        }
        self.children.get(&(root, path.to_string())).copied()
    }

    fn apply(&mut self, target: NodeId, property: PropertyKind, value: &Value) -> bool {
        self.applied.push((target, property, value.clone()));
        true
    }
}

const ROOT: NodeId = NodeId::new(0, 0);

fn fade_clip(name: &str, wrap: WrapMode) -> AnimationClip {
    AnimationClip::new(name, 1.0, wrap).with_curves(CurveSet::at(NodePath::root()).with_track(
        PropertyKind::Opacity,
        vec![
            Keyframe::new(0.0, Value::f(0.0)),
            Keyframe::new(1.0, Value::f(100.0)),
        ],
    ))
}

fn opacity(host: &MockHost) -> f32 {
    host.last(ROOT, PropertyKind::Opacity)
        .and_then(Value::as_float)
        .expect("opacity applied")
}

fn engine_with(clips: Vec<AnimationClip>) -> Engine {
    let mut eng = Engine::default();
    eng.add_binding(BindingDesc::new(ROOT, clips));
    eng
}

#[test]
fn first_tick_samples_zero_then_advances() {
    let mut eng = engine_with(vec![fade_clip("fade", WrapMode::Loop)]);
    let mut host = MockHost::default();
    eng.start(ROOT, "fade", None).expect("clip exists");

    eng.update(0.5, &mut host);
    assert_eq!(opacity(&host), 0.0);
    eng.update(0.5, &mut host);
    assert!((opacity(&host) - 50.0).abs() < 1e-3);
}

#[test]
fn once_clip_completes_with_final_frame_and_callback() {
    let mut eng = engine_with(vec![fade_clip("fade", WrapMode::Once)]);
    let mut host = MockHost::default();
    let fired = Rc::new(Cell::new(0));
    let f = fired.clone();
    let id = eng
        .start(ROOT, "fade", Some(Box::new(move || f.set(f.get() + 1))))
        .unwrap();

    eng.update(0.0, &mut host);
    eng.update(0.7, &mut host);
    assert_eq!(fired.get(), 0);
    let out = eng.update(0.7, &mut host);
    assert!(out.events.iter().any(|e| matches!(
        e,
        CoreEvent::PlaybackEnded { instance, .. } if *instance == id
    )));
    assert_eq!(opacity(&host), 100.0);
    assert_eq!(fired.get(), 1);
    assert!(eng.instance(id).is_none());

    // Nothing left to drive.
    let before = host.applied.len();
    eng.update(0.5, &mut host);
    assert_eq!(host.applied.len(), before);
    assert_eq!(fired.get(), 1);
}

#[test]
fn looping_clip_never_completes() {
    let mut eng = engine_with(vec![fade_clip("fade", WrapMode::Loop)]);
    let mut host = MockHost::default();
    eng.start(ROOT, "fade", None);
    for _ in 0..50 {
        eng.update(0.3, &mut host);
    }
    assert!(eng.is_playing(ROOT, "fade"));
}

#[test]
fn stop_respects_callback_flag() {
    let mut eng = engine_with(vec![fade_clip("fade", WrapMode::Loop)]);
    let fired = Rc::new(Cell::new(0));

    let f = fired.clone();
    eng.start(ROOT, "fade", Some(Box::new(move || f.set(f.get() + 1))));
    assert!(eng.stop(ROOT, "fade", false));
    assert_eq!(fired.get(), 0);

    let f = fired.clone();
    eng.start(ROOT, "fade", Some(Box::new(move || f.set(f.get() + 1))));
    assert!(eng.stop(ROOT, "fade", true));
    assert_eq!(fired.get(), 1);

    assert!(!eng.stop(ROOT, "fade", true));
}

#[test]
fn unknown_clip_is_a_no_op() {
    let mut eng = engine_with(vec![fade_clip("fade", WrapMode::Loop)]);
    assert!(eng.start(ROOT, "missing", None).is_none());
    assert!(eng.start(NodeId::new(9, 0), "fade", None).is_none());
    assert!(eng.instances().is_empty());
}

#[test]
fn pause_freezes_time_until_resume() {
    let mut eng = engine_with(vec![fade_clip("fade", WrapMode::Loop)]);
    let mut host = MockHost::default();
    eng.start(ROOT, "fade", None);
    eng.update(0.0, &mut host);
    eng.update(0.25, &mut host);

    assert!(eng.pause(ROOT, "fade"));
    let applied = host.applied.len();
    eng.update(0.5, &mut host);
    assert_eq!(host.applied.len(), applied);

    assert!(eng.resume(ROOT, "fade"));
    eng.update(0.25, &mut host);
    assert!((opacity(&host) - 50.0).abs() < 1e-3);
}

#[test]
fn play_on_load_starts_default_clip_and_can_be_stopped() {
    let mut eng = Engine::default();
    let mut desc = BindingDesc::new(
        ROOT,
        vec![
            fade_clip("idle", WrapMode::Loop),
            fade_clip("wave", WrapMode::Loop),
        ],
    );
    desc.default_clip = Some("wave".into());
    desc.play_on_load = true;
    eng.add_binding(desc);

    eng.play_on_load();
    assert!(eng.is_playing(ROOT, "wave"));
    assert!(!eng.is_playing(ROOT, "idle"));

    eng.start(ROOT, "idle", None);
    eng.stop_play_on_load_clips();
    assert!(!eng.is_playing(ROOT, "wave"));
    assert!(eng.is_playing(ROOT, "idle"));
}

#[test]
fn prefab_bindings_are_removed_separately() {
    let scene_node = NodeId::new(1, 0);
    let prefab_node = NodeId::new(2, 0);
    let mut eng = Engine::default();
    eng.add_binding(BindingDesc::new(
        scene_node,
        vec![fade_clip("a", WrapMode::Loop)],
    ));
    let mut prefab = BindingDesc::new(prefab_node, vec![fade_clip("b", WrapMode::Loop)]);
    prefab.attached_to_scene = false;
    eng.add_binding(prefab);

    eng.start(prefab_node, "b", None);
    eng.remove_prefab_bindings();
    assert!(eng.instances().is_empty());
    assert!(eng.find_clip("b").is_none());
    assert!(eng.find_clip("a").is_some());

    eng.remove_scene_bindings();
    assert!(eng.bindings().is_empty());
}

#[test]
fn curve_sets_resolve_their_own_targets() {
    let arm = NodeId::new(3, 0);
    let mut host = MockHost::default();
    host.children.insert((ROOT, "Body/Arm".into()), arm);

    let clip = AnimationClip::new("reach", 1.0, WrapMode::Loop)
        .with_curves(CurveSet::at(NodePath::parse("Body/Arm").unwrap()).with_track(
            PropertyKind::Rotation,
            vec![Keyframe::new(0.0, Value::f(30.0))],
        ))
        .with_curves(CurveSet::at(NodePath::parse("Body/Leg").unwrap()).with_track(
            PropertyKind::Rotation,
            vec![Keyframe::new(0.0, Value::f(45.0))],
        ));
    let mut eng = engine_with(vec![clip]);
    eng.start(ROOT, "reach", None);
    let out = eng.update(0.0, &mut host);

    assert_eq!(out.changes.len(), 1);
    assert_eq!(out.changes[0].target, arm);
    assert_eq!(host.last(arm, PropertyKind::Rotation), Some(&Value::f(30.0)));
}

#[test]
fn properties_apply_in_declaration_order() {
    let clip = AnimationClip::new("mix", 1.0, WrapMode::Loop).with_curves(
        CurveSet::at(NodePath::root())
            .with_track(PropertyKind::SpriteFrame, vec![Keyframe::new(0.0, Value::Text("f".into()))])
            .with_track(PropertyKind::Opacity, vec![Keyframe::new(0.0, Value::f(1.0))])
            .with_track(PropertyKind::Position, vec![Keyframe::new(0.0, Value::vec2(1.0, 2.0))]),
    );
    let mut eng = engine_with(vec![clip]);
    let mut host = MockHost::default();
    eng.start(ROOT, "mix", None);
    eng.update(0.0, &mut host);

    let order: Vec<PropertyKind> = host.applied.iter().map(|(_, p, _)| *p).collect();
    assert_eq!(
        order,
        vec![
            PropertyKind::Position,
            PropertyKind::Opacity,
            PropertyKind::SpriteFrame
        ]
    );
}

#[test]
fn control_events_surface_on_next_update() {
    let mut eng = engine_with(vec![fade_clip("fade", WrapMode::Loop)]);
    let mut host = MockHost::default();
    eng.apply(PlaybackCommand::Start {
        target: ROOT,
        clip: "fade".into(),
    });
    let out = eng.update(0.0, &mut host);
    assert!(matches!(out.events[0], CoreEvent::PlaybackStarted { .. }));
    let out = eng.update(0.1, &mut host);
    assert!(out.events.is_empty());
}

#[test]
fn duplicate_starts_run_side_by_side() {
    let mut eng = engine_with(vec![fade_clip("fade", WrapMode::Loop)]);
    eng.start(ROOT, "fade", None);
    eng.start(ROOT, "fade", None);
    assert_eq!(eng.instances().len(), 2);
    eng.stop(ROOT, "fade", false);
    assert_eq!(eng.instances().len(), 1);
}
