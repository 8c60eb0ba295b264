//! Scenery Animation Core (engine-agnostic)
//!
//! Clip data model, easing/Bézier evaluation, wrap-mode time folding, and a playback
//! engine that drives clip instances against any host implementing [`AnimationHost`].

pub mod binding;
pub mod config;
pub mod data;
pub mod easing;
pub mod engine;
pub mod error;
pub mod ids;
pub mod inputs;
pub mod interp;
pub mod outputs;
pub mod player;
pub mod sampling;
pub mod stored_clip;

pub use binding::{AnimationBinding, AnimationHost};
pub use config::Config;
pub use data::{AnimationClip, CurveSet, Keyframe, PropertyKind, WrapMode};
pub use easing::{ease_by_name, Easing};
pub use engine::{BindingDesc, Engine};
pub use error::ClipError;
pub use ids::{BindingId, ClipId, IdSeq, InstanceId};
pub use inputs::PlaybackCommand;
pub use outputs::{Change, CoreEvent, Outputs};
pub use player::{EndCallback, PlaybackState, PlayerInstance};
pub use sampling::{sample_track, time_fold};
pub use scenery_api_core::{NodeId, NodePath, Value, ValueKind};
pub use stored_clip::parse_clip_json;
