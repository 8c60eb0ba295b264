//! scenery-runtime
//!
//! Owns one [`SceneTree`] together with the animation engine, anchor manager and the
//! decode collaborators, and drives them once per rendered frame through
//! [`Runtime::tick`].

pub mod diagnostics;
pub mod scheduler;

use anyhow::{anyhow, bail, Context, Result};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use scenery_animation_core::{Config as AnimationConfig, EndCallback, Engine, InstanceId, PlaybackCommand};
use scenery_api_core::NodeId;
use scenery_scene_core::{
    apply_position_diff, decode, shift_origin, AnchorManager, ColliderSet, DecodeContext,
    DecodedDocument, DecodeSettings, DocumentHeader, FrameTable, PlainTextParser,
    ResolutionPolicy, RichTextParser, SceneTree,
};

pub use crate::diagnostics::DiagnosticsCfg;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickFrame {
    pub epoch: u64,
    pub dt: f32,
    /// Property values the animation pass applied.
    pub changes: usize,
    /// Containers recomputed after the animation pass.
    pub layouts_run: usize,
    pub timings_ms: HashMap<String, f32>,
    /// Playback events in emission order, as JSON.
    pub events: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub diagnostics: DiagnosticsCfg,
    /// Start play-on-load clips when a scene is loaded. Prefabs never auto-play.
    pub auto_play_on_load: bool,
    pub animation: AnimationConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            diagnostics: DiagnosticsCfg::default(),
            auto_play_on_load: true,
            animation: AnimationConfig::default(),
        }
    }
}

/// What the runtime remembers about the current scene document.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub root: NodeId,
    pub header: DocumentHeader,
    pub policy: Option<ResolutionPolicy>,
}

pub struct Runtime {
    pub tree: SceneTree,
    pub engine: Engine,
    pub anchors: AnchorManager,
    /// Sprite frames registered by every document loaded so far.
    pub frames: FrameTable,
    pub collisions: ColliderSet,
    pub settings: DecodeSettings,
    pub config: RuntimeConfig,
    pub epoch: u64,
    scene: Option<LoadedScene>,
    rich_text: Box<dyn RichTextParser>,
}

impl Runtime {
    pub fn new(settings: DecodeSettings, config: RuntimeConfig) -> Self {
        Self {
            tree: SceneTree::new(),
            engine: Engine::new(config.animation.clone()),
            anchors: AnchorManager::new(settings.visible_origin, settings.visible_size),
            frames: FrameTable::new(),
            collisions: ColliderSet::default(),
            settings,
            config,
            epoch: 0,
            scene: None,
            rich_text: Box::new(PlainTextParser),
        }
    }

    /// Replace the markup parser used for rich text nodes.
    pub fn with_rich_text(mut self, parser: Box<dyn RichTextParser>) -> Self {
        self.rich_text = parser;
        self
    }

    pub fn scene(&self) -> Option<&LoadedScene> {
        self.scene.as_ref()
    }

    pub fn scene_root(&self) -> Option<NodeId> {
        self.scene.as_ref().map(|s| s.root)
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<DecodedDocument> {
        let mut ctx = DecodeContext::new(
            &self.settings,
            &mut self.frames,
            &mut self.collisions,
            self.rich_text.as_ref(),
        );
        Ok(decode(bytes, &mut ctx, &mut self.tree)?)
    }

    /// Decode a scene document and make it the current scene.
    ///
    /// The previous scene and every animation binding are discarded once the new
    /// document has decoded; a failed decode leaves the runtime as it was.
    pub fn load_scene(&mut self, bytes: &[u8]) -> Result<NodeId> {
        let out = self.decode(bytes).context("decoding scene")?;
        if out.is_prefab {
            self.tree.remove(out.root);
            bail!("expected a scene document, found a prefab");
        }
        if let Some(previous) = self.scene.take() {
            self.tree.remove(previous.root);
        }
        self.engine.remove_all();

        apply_position_diff(&mut self.tree, out.root, out.position_diff);
        for binding in out.bindings {
            self.engine.add_binding(binding);
        }
        if self.config.auto_play_on_load {
            self.engine.play_on_load();
        }
        self.anchors.register_all(out.anchors);
        self.anchors.align_all(&mut self.tree);
        shift_origin(&mut self.tree, out.root);

        log::debug!("scene loaded as {}", out.root);
        self.scene = Some(LoadedScene {
            root: out.root,
            header: out.header,
            policy: out.policy,
        });
        Ok(out.root)
    }

    /// Decode a prefab document and return its content node, detached.
    ///
    /// The wrapper node is dropped. Clips are bound but never auto-played; attach
    /// the result with [`Runtime::attach`].
    pub fn load_prefab(&mut self, bytes: &[u8]) -> Result<NodeId> {
        let out = self.decode(bytes).context("decoding prefab")?;
        if !out.is_prefab {
            self.tree.remove(out.root);
            bail!("expected a prefab document, found a scene");
        }

        apply_position_diff(&mut self.tree, out.root, out.position_diff);
        for binding in out.bindings {
            self.engine.add_binding(binding);
        }
        self.anchors.register_all(out.anchors);
        self.anchors.align_new(&mut self.tree);
        shift_origin(&mut self.tree, out.root);

        let content = self
            .tree
            .children(out.root)
            .first()
            .copied()
            .ok_or_else(|| anyhow!("prefab {} has no content", out.root))?;
        self.tree.detach(content);
        self.remove(out.root);
        log::debug!("prefab loaded as {content}");
        Ok(content)
    }

    /// Attach `child` under `parent` and settle its geometry in the new frame.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.tree.attach(parent, child) {
            return false;
        }
        shift_origin(&mut self.tree, child);
        self.anchors.force_align(&mut self.tree, child);
        true
    }

    /// Remove `id` with its subtree and drop the animation bindings they owned.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        let removed = self.tree.remove(id);
        for node in &removed {
            self.engine.remove_target(*node);
        }
        if self.scene_root() == Some(id) {
            self.scene = None;
        }
        removed
    }

    /// Advance the runtime by `dt` seconds and return the frame summary.
    pub fn tick(&mut self, dt: f32) -> Result<TickFrame> {
        // advance epoch first to mark this frame
        self.epoch = self.epoch.wrapping_add(1);
        crate::scheduler::run_tick(self, dt)
    }

    pub fn start_animation(
        &mut self,
        target: NodeId,
        clip: &str,
        on_end: Option<EndCallback>,
    ) -> Option<InstanceId> {
        self.engine.start(target, clip, on_end)
    }

    /// Stop a running clip; its end callback runs.
    pub fn stop_animation(&mut self, target: NodeId, clip: &str) -> bool {
        self.engine.stop(target, clip, true)
    }

    pub fn pause_animation(&mut self, target: NodeId, clip: &str) -> bool {
        self.engine.pause(target, clip)
    }

    pub fn resume_animation(&mut self, target: NodeId, clip: &str) -> bool {
        self.engine.resume(target, clip)
    }

    /// Queue-friendly form of the playback calls above.
    pub fn apply(&mut self, cmd: PlaybackCommand) {
        self.engine.apply(cmd);
    }

    /// Schedule `container` for recomputation on the next tick.
    pub fn mark_layout_dirty(&mut self, container: NodeId) -> bool {
        self.tree.mark_layout_dirty(container)
    }

    /// Re-align every anchor below `container` now, once-only anchors included.
    pub fn force_align(&mut self, container: NodeId) -> usize {
        self.anchors.force_align(&mut self.tree, container)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(DecodeSettings::default(), RuntimeConfig::default())
    }
}
