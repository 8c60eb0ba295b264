use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;
use scenery_api_core::{NodePath, Vec2};
use scenery_runtime::{Runtime, RuntimeConfig};
use scenery_scene_core::{DecodeSettings, NodeKind};
use scenery_test_fixtures as fixtures;

fn path(s: &str) -> NodePath {
    s.parse().expect("valid path")
}

fn loaded_hud() -> Runtime {
    let mut rt = Runtime::default();
    rt.load_scene(fixtures::bytes("hud").expect("fixture"))
        .expect("scene loads");
    rt
}

#[test]
fn scene_load_aligns_binds_and_plays() {
    let mut rt = loaded_hud();
    let root = rt.scene_root().expect("scene root");
    assert_eq!(rt.tree.len(), 7);
    assert_eq!(
        rt.scene().and_then(|s| s.policy),
        Some(scenery_scene_core::ResolutionPolicy::FixedHeight)
    );

    let banner = rt.tree.find_path(root, &path("banner")).expect("banner");
    assert_relative_eq!(rt.tree.get(banner).unwrap().common.size.width, 768.0, epsilon = 1e-3);

    assert_eq!(rt.engine.bindings().len(), 1);
    assert_eq!(rt.engine.instances().len(), 1);

    let first = rt.tick(0.5).expect("tick ok");
    assert!(first
        .events
        .iter()
        .any(|e| e.get("PlaybackStarted").is_some()));
    let blinker = rt.tree.find_path(root, &path("blinker")).expect("blinker");
    // The first tick samples frame zero.
    assert_eq!(rt.tree.get(blinker).unwrap().common.opacity, 255);

    rt.tick(0.5).expect("tick ok");
    assert_eq!(rt.tree.get(blinker).unwrap().common.opacity, 128);
}

#[test]
fn dirty_layouts_settle_on_the_first_tick() {
    let mut rt = loaded_hud();
    let root = rt.scene_root().unwrap();
    let row = rt.tree.find_path(root, &path("row")).expect("row");

    let frame = rt.tick(0.016).expect("tick ok");
    assert_eq!(frame.layouts_run, 1);
    assert_relative_eq!(rt.tree.get(row).unwrap().common.size.width, 80.0, epsilon = 1e-4);

    assert_eq!(rt.tick(0.016).expect("tick ok").layouts_run, 0);
    assert!(rt.mark_layout_dirty(row));
    assert!(!rt.mark_layout_dirty(root));
    assert_eq!(rt.tick(0.016).expect("tick ok").layouts_run, 1);
}

#[test]
fn auto_play_can_be_disabled() {
    let config = RuntimeConfig {
        auto_play_on_load: false,
        ..RuntimeConfig::default()
    };
    let mut rt = Runtime::new(DecodeSettings::default(), config);
    rt.load_scene(fixtures::bytes("hud").unwrap()).unwrap();
    assert_eq!(rt.engine.bindings().len(), 1);
    assert!(rt.engine.instances().is_empty());
}

#[test]
fn failed_load_keeps_the_current_scene() {
    let mut rt = loaded_hud();
    let root = rt.scene_root();
    let nodes = rt.tree.len();

    let err = rt
        .load_scene(fixtures::bytes("broken_tilemap").unwrap())
        .unwrap_err();
    assert!(format!("{err:#}").contains("tmx_filename"));
    assert_eq!(rt.scene_root(), root);
    assert_eq!(rt.tree.len(), nodes);
    assert_eq!(rt.engine.bindings().len(), 1);

    let err = rt
        .load_scene(fixtures::bytes("button_prefab").unwrap())
        .unwrap_err();
    assert!(err.to_string().contains("found a prefab"));
    assert_eq!(rt.tree.len(), nodes);
}

#[test]
fn reloading_replaces_the_previous_scene() {
    let mut rt = loaded_hud();
    let old = rt.scene_root().unwrap();
    let new = rt.load_scene(fixtures::bytes("hud").unwrap()).unwrap();
    assert!(rt.tree.get(old).is_none());
    assert!(rt.tree.get(new).is_some());
    assert_eq!(rt.tree.len(), 7);
    assert_eq!(rt.engine.bindings().len(), 1);
}

#[test]
fn prefab_content_is_detached_and_idle() {
    let mut rt = loaded_hud();
    let content = rt
        .load_prefab(fixtures::bytes("button_prefab").unwrap())
        .expect("prefab loads");

    // Wrapper gone, button plus its caption added.
    assert_eq!(rt.tree.len(), 9);
    assert_eq!(rt.tree.parent(content), None);
    let node = rt.tree.get(content).unwrap();
    assert_eq!(node.name(), "ok");
    assert!(matches!(&node.kind, NodeKind::Button(b) if b.title.is_some()));

    assert_eq!(rt.engine.bindings().len(), 2);
    assert!(!rt.engine.bindings()[1].attached_to_scene);
    // Only the scene's blinker is playing.
    assert_eq!(rt.engine.instances().len(), 1);
}

#[test]
fn attached_prefab_follows_its_parent_frame() {
    let mut rt = loaded_hud();
    let root = rt.scene_root().unwrap();
    let banner = rt.tree.find_path(root, &path("banner")).unwrap();
    let content = rt
        .load_prefab(fixtures::bytes("button_prefab").unwrap())
        .unwrap();

    assert!(rt.attach(banner, content));
    let common = &rt.tree.get(content).unwrap().common;
    assert_eq!(common.authoring_position, Vec2::new(5.0, 5.0));
    assert_relative_eq!(common.position.x, 5.0 + 384.0, epsilon = 1e-3);
    assert_relative_eq!(common.position.y, 5.0 + 20.0, epsilon = 1e-3);
    assert_eq!(rt.tree.find_path(root, &path("banner/ok")), Some(content));
}

#[test]
fn playback_controls_route_to_the_engine() {
    let mut rt = loaded_hud();
    let content = rt
        .load_prefab(fixtures::bytes("button_prefab").unwrap())
        .unwrap();
    let ended = Rc::new(Cell::new(false));
    let flag = ended.clone();

    assert!(rt
        .start_animation(content, "pulse", Some(Box::new(move || flag.set(true))))
        .is_some());
    assert!(rt.start_animation(content, "missing", None).is_none());
    assert!(rt.pause_animation(content, "pulse"));
    assert!(!rt.pause_animation(content, "pulse"));
    assert!(rt.resume_animation(content, "pulse"));

    rt.tick(0.0).unwrap();
    rt.tick(0.25).unwrap();
    assert_relative_eq!(rt.tree.get(content).unwrap().common.scale.x, 1.1, epsilon = 1e-4);

    assert!(rt.stop_animation(content, "pulse"));
    assert!(ended.get());
}

#[test]
fn removing_a_node_drops_its_bindings() {
    let mut rt = loaded_hud();
    let content = rt
        .load_prefab(fixtures::bytes("button_prefab").unwrap())
        .unwrap();
    assert_eq!(rt.remove(content).len(), 2);
    assert_eq!(rt.engine.bindings().len(), 1);
    assert_eq!(rt.tree.len(), 7);
}

#[test]
fn force_align_reaches_once_only_anchors() {
    let mut rt = loaded_hud();
    let root = rt.scene_root().unwrap();
    assert_eq!(rt.force_align(root), 1);
    let banner = rt.tree.find_path(root, &path("banner")).unwrap();
    assert_eq!(rt.force_align(banner), 1);
    let row = rt.tree.find_path(root, &path("row")).unwrap();
    assert_eq!(rt.force_align(row), 0);
}
