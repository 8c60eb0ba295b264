use std::time::Instant;

use anyhow::Result;
use hashbrown::HashMap;
use serde_json::Value as JsonValue;

use scenery_scene_core::{update_dirty_layouts, SceneHost};

fn elapsed_ms(since: Instant) -> f32 {
    since.elapsed().as_secs_f32() * 1000.0
}

/// Run one frame in the fixed order:
///   Animations -> dirty layouts -> continuous anchors -> frame
pub fn run_tick(runtime: &mut crate::Runtime, dt: f32) -> Result<crate::TickFrame> {
    let timed = runtime.config.diagnostics.enabled;
    let mut timings = HashMap::new();
    let frame_start = Instant::now();

    // Animations phase
    let phase = Instant::now();
    let mut host = SceneHost::new(&mut runtime.tree, &runtime.frames);
    let outputs = runtime.engine.update(dt, &mut host);
    let changes = outputs.changes.len();
    let mut events: Vec<JsonValue> = Vec::with_capacity(outputs.events.len());
    for event in &outputs.events {
        events.push(serde_json::to_value(event)?);
    }
    if timed {
        timings.insert("animations_ms".to_string(), elapsed_ms(phase));
    }

    // Layout phase: containers dirtied by the animation pass settle before anchors read them
    let phase = Instant::now();
    let layouts_run = update_dirty_layouts(&mut runtime.tree);
    if timed {
        timings.insert("layouts_ms".to_string(), elapsed_ms(phase));
    }

    // Anchor phase
    let phase = Instant::now();
    runtime.anchors.align_continuous(&mut runtime.tree);
    if timed {
        timings.insert("anchors_ms".to_string(), elapsed_ms(phase));
        timings.insert("total_ms".to_string(), elapsed_ms(frame_start));
        log::debug!(
            "tick {}: {changes} changes, {} events, {layouts_run} layouts",
            runtime.epoch,
            events.len()
        );
    }

    Ok(crate::TickFrame {
        epoch: runtime.epoch,
        dt,
        changes,
        layouts_run,
        timings_ms: timings,
        events,
    })
}
