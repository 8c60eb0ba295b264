//! Clip data model: named bundles of per-property keyframe tracks.
//!
//! A clip holds one or more [`CurveSet`]s. Each set targets a node by path relative
//! to the binding's root and carries one ordered keyframe track per property.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ClipError;
use scenery_api_core::{NodePath, Value, ValueKind};

/// Playback wrap policy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapMode {
    #[default]
    Once,
    Loop,
    PingPong,
    Reverse,
    LoopReverse,
    PingPongReverse,
}

impl WrapMode {
    /// Non-looping modes complete once elapsed reaches the clip duration.
    #[inline]
    pub fn stops_at_end(self) -> bool {
        matches!(self, WrapMode::Once | WrapMode::Reverse)
    }
}

/// Animatable property. Declaration order is application order within one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PropertyKind {
    Position,
    Color,
    ScaleX,
    ScaleY,
    Rotation,
    SkewX,
    SkewY,
    Opacity,
    AnchorX,
    AnchorY,
    PositionX,
    PositionY,
    Active,
    Width,
    Height,
    SpriteFrame,
}

impl PropertyKind {
    /// Value kind stored in keyframes for this property.
    pub fn value_kind(self) -> ValueKind {
        match self {
            PropertyKind::Position => ValueKind::Vec2,
            PropertyKind::Color => ValueKind::ColorRgb,
            PropertyKind::Active => ValueKind::Bool,
            PropertyKind::SpriteFrame => ValueKind::Text,
            _ => ValueKind::Float,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    /// Time in seconds from clip start.
    pub frame: f32,
    pub value: Value,
    /// Named easing applied to the segment leaving this keyframe.
    #[serde(default)]
    pub curve_type: Option<String>,
    /// Bézier control points `[x1, y1, x2, y2]` applied after the easing.
    #[serde(default)]
    pub curve_data: Vec<f32>,
}

impl Keyframe {
    pub fn new(frame: f32, value: Value) -> Self {
        Self {
            frame,
            value,
            curve_type: None,
            curve_data: Vec::new(),
        }
    }

    pub fn with_easing(mut self, name: impl Into<String>) -> Self {
        self.curve_type = Some(name.into());
        self
    }

    pub fn with_bezier(mut self, ctrl: [f32; 4]) -> Self {
        self.curve_data = ctrl.to_vec();
        self
    }
}

/// Tracks for one target path.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CurveSet {
    #[serde(default)]
    pub path: NodePath,
    #[serde(default)]
    pub tracks: BTreeMap<PropertyKind, Vec<Keyframe>>,
}

impl CurveSet {
    pub fn at(path: NodePath) -> Self {
        Self {
            path,
            tracks: BTreeMap::new(),
        }
    }

    pub fn with_track(mut self, property: PropertyKind, keys: Vec<Keyframe>) -> Self {
        self.tracks.insert(property, keys);
        self
    }

    pub fn keyframe_count(&self) -> usize {
        self.tracks.values().map(Vec::len).sum()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds.
    pub duration: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Authoring sample rate (frames per second); informational.
    #[serde(default = "default_sample")]
    pub sample: u32,
    #[serde(default)]
    pub wrap_mode: WrapMode,
    #[serde(default)]
    pub curves: Vec<CurveSet>,
}

fn default_speed() -> f32 {
    1.0
}

fn default_sample() -> u32 {
    60
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, duration: f32, wrap_mode: WrapMode) -> Self {
        Self {
            name: name.into(),
            duration,
            speed: 1.0,
            sample: default_sample(),
            wrap_mode,
            curves: Vec::new(),
        }
    }

    pub fn with_curves(mut self, set: CurveSet) -> Self {
        self.curves.push(set);
        self
    }

    /// Validate ordering and value-kind invariants.
    pub fn validate(&self) -> Result<(), ClipError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ClipError::InvalidDuration {
                clip: self.name.clone(),
                duration: self.duration,
            });
        }
        for set in &self.curves {
            for (property, keys) in &set.tracks {
                let mut last = f32::NEG_INFINITY;
                for key in keys {
                    if !key.frame.is_finite() || key.frame < last {
                        return Err(ClipError::UnorderedKeyframes {
                            clip: self.name.clone(),
                            path: set.path.to_string(),
                            property: *property,
                        });
                    }
                    last = key.frame;

                    let expected = property.value_kind();
                    let found = key.value.kind();
                    // Active tracks may be authored as 0/1 numbers.
                    let numeric_flag =
                        expected == ValueKind::Bool && found == ValueKind::Float;
                    if found != expected && !numeric_flag {
                        return Err(ClipError::ValueKindMismatch {
                            clip: self.name.clone(),
                            property: *property,
                            expected,
                            found,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn keyframe_count(&self) -> usize {
        self.curves.iter().map(CurveSet::keyframe_count).sum()
    }
}
