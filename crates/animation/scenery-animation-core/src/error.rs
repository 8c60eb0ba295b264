use thiserror::Error;

use crate::data::PropertyKind;
use scenery_api_core::ValueKind;

/// Problems found while validating or loading a clip.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("clip '{clip}': duration must be finite and >= 0, got {duration}")]
    InvalidDuration { clip: String, duration: f32 },

    #[error("clip '{clip}': keyframes for {property:?} on '{path}' must be non-decreasing")]
    UnorderedKeyframes {
        clip: String,
        path: String,
        property: PropertyKind,
    },

    #[error("clip '{clip}': {property:?} expects {expected:?} values, found {found:?}")]
    ValueKindMismatch {
        clip: String,
        property: PropertyKind,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("clip '{clip}': unknown property '{property}'")]
    UnknownProperty { clip: String, property: String },

    #[error("clip '{clip}': value at frame {frame} does not fit {property:?}")]
    BadValue {
        clip: String,
        property: PropertyKind,
        frame: f32,
    },

    #[error("clip json parse error: {0}")]
    Json(#[from] serde_json::Error),
}
