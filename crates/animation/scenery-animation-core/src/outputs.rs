//! Output contracts from the animation engine.
//!
//! Changes record what was applied to the host this tick; events carry the
//! playback lifecycle. Both are cleared at the start of every update.

use serde::{Deserialize, Serialize};

use crate::data::PropertyKind;
use crate::ids::InstanceId;
use scenery_api_core::{NodeId, Value};

/// One property value applied to a node this tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Change {
    pub instance: InstanceId,
    pub target: NodeId,
    pub property: PropertyKind,
    pub value: Value,
}

/// Discrete playback signals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    PlaybackStarted {
        instance: InstanceId,
        target: NodeId,
        clip: String,
    },
    PlaybackPaused {
        instance: InstanceId,
    },
    PlaybackResumed {
        instance: InstanceId,
    },
    PlaybackStopped {
        instance: InstanceId,
        clip: String,
    },
    PlaybackEnded {
        instance: InstanceId,
        clip: String,
        animation_time: f32,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    pub fn with_capacity(changes: usize) -> Self {
        Self {
            changes: Vec::with_capacity(changes),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
