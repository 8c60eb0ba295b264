use serde::Deserialize;
use std::collections::BTreeMap;

use crate::data::{AnimationClip, CurveSet, Keyframe, PropertyKind, WrapMode};
use crate::error::ClipError;
use scenery_api_core::{NodePath, Value};

/// Parse an authoring-style JSON clip into an [`AnimationClip`] and validate it.
///
/// Shape:
/// ```json
/// { "name": "blink", "duration": 1.0, "wrapMode": "Loop",
///   "curves": [ { "path": "Eye", "props": {
///       "opacity": [ { "frame": 0, "value": 255, "curve": "quadIn" },
///                    { "frame": 1, "value": 0 } ] } } ] }
/// ```
/// Property names are camelCase (`position`, `scaleX`, `spriteFrame`, ...). Values are
/// plain JSON: numbers, booleans, strings, `[x, y]` for position and `[r, g, b]` or
/// `{ "r", "g", "b" }` for color.
pub fn parse_clip_json(s: &str) -> Result<AnimationClip, ClipError> {
    let stored: StoredClip = serde_json::from_str(s)?;

    let mut curves = Vec::with_capacity(stored.curves.len());
    for sc in stored.curves {
        let mut set = CurveSet::at(sc.path);
        for (name, raw_keys) in sc.props {
            let property = property_from_name(&name).ok_or_else(|| ClipError::UnknownProperty {
                clip: stored.name.clone(),
                property: name.clone(),
            })?;
            let mut keys = Vec::with_capacity(raw_keys.len());
            for rk in raw_keys {
                let value = to_value(property, rk.value).ok_or_else(|| ClipError::BadValue {
                    clip: stored.name.clone(),
                    property,
                    frame: rk.frame,
                })?;
                keys.push(Keyframe {
                    frame: rk.frame,
                    value,
                    curve_type: rk.curve,
                    curve_data: rk.curve_data,
                });
            }
            set.tracks.insert(property, keys);
        }
        curves.push(set);
    }

    let clip = AnimationClip {
        name: stored.name,
        duration: stored.duration,
        speed: stored.speed,
        sample: stored.sample,
        wrap_mode: stored.wrap_mode,
        curves,
    };
    clip.validate()?;
    Ok(clip)
}

fn property_from_name(name: &str) -> Option<PropertyKind> {
    Some(match name {
        "position" => PropertyKind::Position,
        "color" => PropertyKind::Color,
        "scaleX" => PropertyKind::ScaleX,
        "scaleY" => PropertyKind::ScaleY,
        "rotation" => PropertyKind::Rotation,
        "skewX" => PropertyKind::SkewX,
        "skewY" => PropertyKind::SkewY,
        "opacity" => PropertyKind::Opacity,
        "anchorX" => PropertyKind::AnchorX,
        "anchorY" => PropertyKind::AnchorY,
        "positionX" | "x" => PropertyKind::PositionX,
        "positionY" | "y" => PropertyKind::PositionY,
        "active" => PropertyKind::Active,
        "width" => PropertyKind::Width,
        "height" => PropertyKind::Height,
        "spriteFrame" => PropertyKind::SpriteFrame,
        _ => return None,
    })
}

fn to_value(property: PropertyKind, raw: RawValue) -> Option<Value> {
    match (property, raw) {
        (PropertyKind::Position, RawValue::List(v)) if v.len() == 2 => {
            Some(Value::vec2(v[0] as f32, v[1] as f32))
        }
        (PropertyKind::Position, RawValue::Vec2 { x, y }) => Some(Value::vec2(x as f32, y as f32)),
        (PropertyKind::Color, RawValue::List(v)) if v.len() >= 3 => {
            Some(Value::rgb(v[0] as f32, v[1] as f32, v[2] as f32))
        }
        (PropertyKind::Color, RawValue::Rgb { r, g, b }) => {
            Some(Value::rgb(r as f32, g as f32, b as f32))
        }
        (PropertyKind::Active, RawValue::Bool(b)) => Some(Value::Bool(b)),
        (PropertyKind::Active, RawValue::Number(n)) => Some(Value::Bool(n != 0.0)),
        (PropertyKind::SpriteFrame, RawValue::Text(s)) => Some(Value::Text(s)),
        (
            PropertyKind::Position
            | PropertyKind::Color
            | PropertyKind::Active
            | PropertyKind::SpriteFrame,
            _,
        ) => None,
        (_, RawValue::Number(n)) => Some(Value::f(n as f32)),
        _ => None,
    }
}

/* ---------- JSON shapes ---------- */

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredClip {
    name: String,
    duration: f32,
    #[serde(default = "one")]
    speed: f32,
    #[serde(default = "sixty")]
    sample: u32,
    #[serde(default)]
    wrap_mode: WrapMode,
    #[serde(default)]
    curves: Vec<StoredCurves>,
}

fn one() -> f32 {
    1.0
}

fn sixty() -> u32 {
    60
}

#[derive(Debug, Deserialize)]
struct StoredCurves {
    #[serde(default)]
    path: NodePath,
    #[serde(default)]
    props: BTreeMap<String, Vec<StoredKey>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredKey {
    frame: f32,
    value: RawValue,
    #[serde(default)]
    curve: Option<String>,
    #[serde(default)]
    curve_data: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<f64>),
    Vec2 { x: f64, y: f64 },
    Rgb { r: f64, g: f64, b: f64 },
}
