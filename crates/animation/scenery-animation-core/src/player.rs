//! A running clip instance.

use std::fmt;

use crate::ids::{ClipId, InstanceId};
use scenery_api_core::NodeId;

/// Invoked once when an instance completes, or when it is stopped with callbacks enabled.
pub type EndCallback = Box<dyn FnOnce()>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Paused,
    Stopped,
    Completed,
}

impl PlaybackState {
    #[inline]
    pub fn is_live(self) -> bool {
        matches!(self, PlaybackState::Running | PlaybackState::Paused)
    }
}

pub struct PlayerInstance {
    pub id: InstanceId,
    pub target: NodeId,
    pub clip: ClipId,
    pub clip_name: String,
    /// Unfolded playback time in seconds, already scaled by clip speed.
    pub elapsed: f32,
    pub state: PlaybackState,
    pub from_play_on_load: bool,
    /// The first tick samples at time zero without advancing.
    pub first_frame_played: bool,
    pub on_end: Option<EndCallback>,
}

impl PlayerInstance {
    pub fn new(id: InstanceId, target: NodeId, clip: ClipId, clip_name: String) -> Self {
        Self {
            id,
            target,
            clip,
            clip_name,
            elapsed: 0.0,
            state: PlaybackState::Running,
            from_play_on_load: false,
            first_frame_played: false,
            on_end: None,
        }
    }

    #[inline]
    pub fn matches(&self, target: NodeId, clip_name: &str) -> bool {
        self.target == target && self.clip_name == clip_name && self.state.is_live()
    }

    /// Advance by `dt` seconds at `speed`; the very first call only arms the instance.
    pub fn advance(&mut self, dt: f32, speed: f32) {
        if self.first_frame_played {
            self.elapsed += dt * speed;
        } else {
            self.first_frame_played = true;
        }
    }
}

impl fmt::Debug for PlayerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerInstance")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("clip", &self.clip_name)
            .field("elapsed", &self.elapsed)
            .field("state", &self.state)
            .field("from_play_on_load", &self.from_play_on_load)
            .field("has_on_end", &self.on_end.is_some())
            .finish()
    }
}
