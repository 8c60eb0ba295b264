//! Value: the sampled result of one animated property.
//! All numeric payloads use f32; colors keep the 0..=255 channel range.

use serde::{Deserialize, Serialize};

/// Coarse kind of a [`Value`], handy for dispatch without matching payloads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Float,
    Bool,
    Vec2,
    ColorRgb,
    Text,
}

impl ValueKind {
    /// Kinds that blend between keyframes. Everything else is held (step).
    #[inline]
    pub fn interpolates(self) -> bool {
        matches!(self, ValueKind::Float | ValueKind::Vec2 | ValueKind::ColorRgb)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// Boolean (step)
    Bool(bool),

    /// 2D vector
    Vec2([f32; 2]),

    /// RGB color, channels in 0..=255
    ColorRgb([f32; 3]),

    /// Text / frame name; step-only for interpolation
    Text(String),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::ColorRgb(_) => ValueKind::ColorRgb,
            Value::Text(_) => ValueKind::Text,
        }
    }

    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn vec2(x: f32, y: f32) -> Self {
        Value::Vec2([x, y])
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Value::ColorRgb([r, g, b])
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            // Authoring data stores "active" tracks as 0/1 numbers.
            Value::Float(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        match self {
            Value::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_rgb(&self) -> Option<[f32; 3]> {
        match self {
            Value::ColorRgb(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
