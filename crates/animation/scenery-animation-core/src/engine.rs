//! Engine: clip ownership, bindings, playback instances and the per-tick update.
//!
//! Methods:
//! - add_binding, play_on_load, start/stop/pause/resume, update (sample → apply)
//! - binding removal by scene/prefab/target, clip lookup by name

use crate::binding::{AnimationBinding, AnimationHost};
use crate::config::Config;
use crate::data::AnimationClip;
use crate::ids::{BindingId, ClipId, IdSeq, InstanceId};
use crate::inputs::PlaybackCommand;
use crate::outputs::{Change, CoreEvent, Outputs};
use crate::player::{EndCallback, PlaybackState, PlayerInstance};
use crate::sampling::{sample_track, time_fold};
use scenery_api_core::NodeId;

/// Clips owned by the engine, keyed by id.
#[derive(Default, Debug)]
struct ClipLib {
    items: Vec<(ClipId, AnimationClip)>,
}

impl ClipLib {
    fn insert(&mut self, id: ClipId, clip: AnimationClip) {
        self.items.push((id, clip));
    }
    fn get(&self, id: ClipId) -> Option<&AnimationClip> {
        self.items
            .iter()
            .find_map(|(c, d)| if *c == id { Some(d) } else { None })
    }
    fn retain(&mut self, keep: impl Fn(ClipId) -> bool) {
        self.items.retain(|(id, _)| keep(*id));
    }
}

/// Everything needed to register the clips owned by one node.
#[derive(Clone, Debug)]
pub struct BindingDesc {
    pub target: NodeId,
    pub clips: Vec<AnimationClip>,
    /// Name of the clip started by play-on-load.
    pub default_clip: Option<String>,
    pub play_on_load: bool,
    pub attached_to_scene: bool,
}

impl BindingDesc {
    pub fn new(target: NodeId, clips: Vec<AnimationClip>) -> Self {
        Self {
            target,
            clips,
            default_clip: None,
            play_on_load: false,
            attached_to_scene: true,
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    cfg: Config,
    clip_ids: IdSeq<ClipId>,
    binding_ids: IdSeq<BindingId>,
    instance_ids: IdSeq<InstanceId>,
    clips: ClipLib,
    bindings: Vec<AnimationBinding>,
    instances: Vec<PlayerInstance>,
    outputs: Outputs,
    /// Events raised since the last update; published by the next one.
    pending: Vec<CoreEvent>,
    events_dropped: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    pub fn new(cfg: Config) -> Self {
        Self {
            clip_ids: IdSeq::default(),
            binding_ids: IdSeq::default(),
            instance_ids: IdSeq::default(),
            clips: ClipLib::default(),
            bindings: Vec::new(),
            instances: Vec::with_capacity(cfg.instances_capacity),
            outputs: Outputs::with_capacity(cfg.changes_capacity),
            pending: Vec::new(),
            events_dropped: false,
            cfg,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Register the clips of one node. Duplicate registrations are kept as-is.
    pub fn add_binding(&mut self, desc: BindingDesc) -> BindingId {
        let id = self.binding_ids.next_id();
        let mut clip_ids = Vec::with_capacity(desc.clips.len());
        let mut default_clip = None;
        for clip in desc.clips {
            if let Err(err) = clip.validate() {
                log::warn!("binding {}: {err}", desc.target);
            }
            let clip_id = self.clip_ids.next_id();
            if desc.default_clip.as_deref() == Some(clip.name.as_str()) && default_clip.is_none() {
                default_clip = Some(clip_id);
            }
            self.clips.insert(clip_id, clip);
            clip_ids.push(clip_id);
        }
        if let (Some(name), None) = (desc.default_clip.as_deref(), default_clip) {
            log::warn!("binding {}: default clip '{name}' not among its clips", desc.target);
        }
        self.bindings.push(AnimationBinding {
            id,
            target: desc.target,
            clips: clip_ids,
            default_clip,
            play_on_load: desc.play_on_load,
            attached_to_scene: desc.attached_to_scene,
        });
        id
    }

    pub fn bindings(&self) -> &[AnimationBinding] {
        &self.bindings
    }

    pub fn instances(&self) -> &[PlayerInstance] {
        &self.instances
    }

    pub fn instance(&self, id: InstanceId) -> Option<&PlayerInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub fn is_playing(&self, target: NodeId, clip_name: &str) -> bool {
        self.instances
            .iter()
            .any(|i| i.matches(target, clip_name) && i.state == PlaybackState::Running)
    }

    /// First clip with `name` across all bindings.
    pub fn find_clip(&self, name: &str) -> Option<&AnimationClip> {
        self.bindings
            .iter()
            .flat_map(|b| b.clips.iter())
            .filter_map(|id| self.clips.get(*id))
            .find(|clip| clip.name == name)
    }

    /// Clip `name` among the clips of the first binding for `target`.
    pub fn clip_for(&self, target: NodeId, name: &str) -> Option<(ClipId, &AnimationClip)> {
        let Some(binding) = self.bindings.iter().find(|b| b.target == target) else {
            log::warn!("no animation binding for target {target}");
            return None;
        };
        let found = binding
            .clips
            .iter()
            .filter_map(|id| self.clips.get(*id).map(|c| (*id, c)))
            .find(|(_, clip)| clip.name == name);
        if found.is_none() {
            log::warn!("no clip named '{name}' for target {target}");
        }
        found
    }

    /// Start every binding's default clip that is flagged play-on-load.
    pub fn play_on_load(&mut self) {
        let starts = self.play_on_load_candidates(None);
        for (target, clip) in starts {
            self.spawn(target, clip, None, true);
        }
    }

    /// Same as [`Engine::play_on_load`], restricted to one target.
    pub fn play_on_load_for(&mut self, target: NodeId) {
        let starts = self.play_on_load_candidates(Some(target));
        for (target, clip) in starts {
            self.spawn(target, clip, None, true);
        }
    }

    fn play_on_load_candidates(&self, only: Option<NodeId>) -> Vec<(NodeId, ClipId)> {
        self.bindings
            .iter()
            .filter(|b| b.play_on_load && only.map_or(true, |t| t == b.target))
            .filter_map(|b| b.default_clip.map(|c| (b.target, c)))
            .collect()
    }

    /// Start clip `name` on `target`. Unknown clips are a logged no-op.
    pub fn start(
        &mut self,
        target: NodeId,
        name: &str,
        on_end: Option<EndCallback>,
    ) -> Option<InstanceId> {
        let (clip_id, _) = self.clip_for(target, name)?;
        Some(self.spawn(target, clip_id, on_end, false))
    }

    fn spawn(
        &mut self,
        target: NodeId,
        clip_id: ClipId,
        on_end: Option<EndCallback>,
        from_play_on_load: bool,
    ) -> InstanceId {
        let id = self.instance_ids.next_id();
        let name = self
            .clips
            .get(clip_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        log::debug!("start {id}: clip '{name}' on {target}");
        let mut inst = PlayerInstance::new(id, target, clip_id, name.clone());
        inst.from_play_on_load = from_play_on_load;
        inst.on_end = on_end;
        self.instances.push(inst);
        self.emit(CoreEvent::PlaybackStarted {
            instance: id,
            target,
            clip: name,
        });
        id
    }

    /// Stop the first live instance of `name` on `target`.
    pub fn stop(&mut self, target: NodeId, name: &str, invoke_callback: bool) -> bool {
        let Some(pos) = self.instances.iter().position(|i| i.matches(target, name)) else {
            return false;
        };
        let mut inst = self.instances.remove(pos);
        inst.state = PlaybackState::Stopped;
        log::debug!("stop {}: clip '{}' on {target}", inst.id, inst.clip_name);
        self.emit(CoreEvent::PlaybackStopped {
            instance: inst.id,
            clip: inst.clip_name.clone(),
        });
        if let Some(cb) = inst.on_end.take() {
            if invoke_callback {
                cb();
            }
        }
        true
    }

    pub fn pause(&mut self, target: NodeId, name: &str) -> bool {
        let Some(inst) = self
            .instances
            .iter_mut()
            .find(|i| i.matches(target, name) && i.state == PlaybackState::Running)
        else {
            return false;
        };
        inst.state = PlaybackState::Paused;
        let id = inst.id;
        self.emit(CoreEvent::PlaybackPaused { instance: id });
        true
    }

    pub fn resume(&mut self, target: NodeId, name: &str) -> bool {
        let Some(inst) = self
            .instances
            .iter_mut()
            .find(|i| i.matches(target, name) && i.state == PlaybackState::Paused)
        else {
            return false;
        };
        inst.state = PlaybackState::Running;
        let id = inst.id;
        self.emit(CoreEvent::PlaybackResumed { instance: id });
        true
    }

    /// Stop every instance started by play-on-load, invoking no callbacks.
    pub fn stop_play_on_load_clips(&mut self) {
        let stops: Vec<(NodeId, String)> = self
            .instances
            .iter()
            .filter(|i| i.from_play_on_load && i.state.is_live())
            .map(|i| (i.target, i.clip_name.clone()))
            .collect();
        for (target, name) in stops {
            self.stop(target, &name, false);
        }
    }

    pub fn apply(&mut self, cmd: PlaybackCommand) {
        match cmd {
            PlaybackCommand::Start { target, clip } => {
                self.start(target, &clip, None);
            }
            PlaybackCommand::Stop {
                target,
                clip,
                invoke_callback,
            } => {
                self.stop(target, &clip, invoke_callback);
            }
            PlaybackCommand::Pause { target, clip } => {
                self.pause(target, &clip);
            }
            PlaybackCommand::Resume { target, clip } => {
                self.resume(target, &clip);
            }
            PlaybackCommand::StopPlayOnLoad => self.stop_play_on_load_clips(),
        }
    }

    /// Discard every binding, clip and instance. No callbacks run.
    pub fn remove_all(&mut self) {
        self.remove_bindings_where(|_| true);
    }

    pub fn remove_scene_bindings(&mut self) {
        self.remove_bindings_where(|b| b.attached_to_scene);
    }

    pub fn remove_prefab_bindings(&mut self) {
        self.remove_bindings_where(|b| !b.attached_to_scene);
    }

    /// Drop bindings owned by a node that is going away.
    pub fn remove_target(&mut self, target: NodeId) {
        self.remove_bindings_where(|b| b.target == target);
    }

    fn remove_bindings_where(&mut self, doomed: impl Fn(&AnimationBinding) -> bool) {
        let mut dropped: Vec<ClipId> = Vec::new();
        self.bindings.retain(|b| {
            if doomed(b) {
                dropped.extend(b.clips.iter().copied());
                false
            } else {
                true
            }
        });
        if dropped.is_empty() {
            return;
        }
        self.clips.retain(|id| !dropped.contains(&id));
        self.instances.retain(|i| !dropped.contains(&i.clip));
    }

    fn emit(&mut self, event: CoreEvent) {
        if self.pending.len() >= self.cfg.max_events_per_tick {
            if !self.events_dropped {
                log::warn!(
                    "event limit {} reached; dropping further events this tick",
                    self.cfg.max_events_per_tick
                );
                self.events_dropped = true;
            }
            return;
        }
        self.pending.push(event);
    }

    /// Outputs produced by the last update.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Advance every running instance by `dt` seconds and apply sampled values to `host`.
    ///
    /// Events raised by control calls since the previous update are reported
    /// together with this tick's events.
    pub fn update(&mut self, dt: f32, host: &mut dyn AnimationHost) -> &Outputs {
        self.outputs.clear();
        let mut finished: Vec<EndCallback> = Vec::new();
        let mut ended: Vec<CoreEvent> = Vec::new();

        let Self {
            cfg,
            clips,
            instances,
            outputs,
            ..
        } = self;

        for inst in instances.iter_mut() {
            if inst.state != PlaybackState::Running {
                continue;
            }
            let Some(clip) = clips.get(inst.clip) else {
                inst.state = PlaybackState::Stopped;
                continue;
            };

            inst.advance(dt, clip.speed);
            let done = clip.wrap_mode.stops_at_end() && inst.elapsed >= clip.duration;
            if done {
                inst.elapsed = clip.duration;
            }

            let t = time_fold(inst.elapsed, clip.duration, clip.wrap_mode);
            for set in &clip.curves {
                let Some(node) = host.resolve(inst.target, &set.path) else {
                    log::debug!("{}: path '{}' resolves to nothing", inst.id, set.path);
                    continue;
                };
                for (property, keys) in &set.tracks {
                    let Some(value) = sample_track(keys, t) else {
                        continue;
                    };
                    if host.apply(node, *property, &value) && cfg.record_changes {
                        outputs.push_change(Change {
                            instance: inst.id,
                            target: node,
                            property: *property,
                            value,
                        });
                    }
                }
            }

            if done {
                inst.state = PlaybackState::Completed;
                log::debug!("complete {}: clip '{}'", inst.id, inst.clip_name);
                ended.push(CoreEvent::PlaybackEnded {
                    instance: inst.id,
                    clip: inst.clip_name.clone(),
                    animation_time: inst.elapsed,
                });
                if let Some(cb) = inst.on_end.take() {
                    finished.push(cb);
                }
            }
        }

        self.instances.retain(|i| i.state.is_live());
        for event in ended {
            self.emit(event);
        }
        self.outputs.events = std::mem::take(&mut self.pending);
        self.events_dropped = false;
        for cb in finished {
            cb();
        }
        &self.outputs
    }
}
