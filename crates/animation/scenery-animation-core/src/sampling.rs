//! Time folding and keyframe track sampling.
//!
//! Model:
//! - Elapsed playback time is folded into `[0, duration]` according to the clip's
//!   [`WrapMode`]. Only elapsed exactly equal to the duration keeps the endpoint, so a
//!   completed non-looping clip lands on its last keyframe. Later whole rounds fold to 0.
//! - Reversal parity comes from `floor(elapsed / duration)`.
//! - A track holds keyframes in non-decreasing time order. Before the first key the
//!   first value is held; at or after the last key the last value is held.
//! - Inside a segment the ratio is eased by the left key's named easing, then by its
//!   Bézier control points, then values are blended (Bool/Text hold left).

use crate::data::{Keyframe, WrapMode};
use crate::easing::ease_by_name;
use crate::interp::functions::{bezier_ease_t, linear_value, step_value};
use scenery_api_core::Value;

/// Map elapsed seconds onto clip-local time in `[0, duration]`.
pub fn time_fold(elapsed: f32, duration: f32, wrap: WrapMode) -> f32 {
    if duration <= 0.0 || !duration.is_finite() {
        return 0.0;
    }
    let elapsed = elapsed.max(0.0);
    let round = (elapsed / duration).floor();
    let t = if elapsed == duration {
        duration
    } else {
        (elapsed % duration).clamp(0.0, duration)
    };
    let odd = (round as u64) % 2 == 1;

    let reversed = match wrap {
        WrapMode::Once | WrapMode::Loop => false,
        WrapMode::Reverse | WrapMode::LoopReverse => true,
        WrapMode::PingPong => odd,
        WrapMode::PingPongReverse => !odd,
    };
    if reversed {
        duration - t
    } else {
        t
    }
}

/// Segment ratio after easing and Bézier remapping.
fn eased_ratio(left: &Keyframe, ratio: f32) -> f32 {
    let mut r = ratio;
    if let Some(name) = left.curve_type.as_deref() {
        r = ease_by_name(name, r);
    }
    if let [x1, y1, x2, y2] = left.curve_data[..] {
        r = bezier_ease_t(r, x1, y1, x2, y2);
    }
    r
}

/// Sample a keyframe track at clip-local time `t`. Returns `None` for an empty track.
pub fn sample_track(keys: &[Keyframe], t: f32) -> Option<Value> {
    let first = keys.first()?;
    let last = keys.last()?;
    if t < first.frame {
        return Some(first.value.clone());
    }
    if t >= last.frame {
        return Some(last.value.clone());
    }

    // Last key at or before t; with repeated start frames the later one wins.
    let k = keys
        .iter()
        .rposition(|key| key.frame <= t)
        .unwrap_or(0);
    let left = &keys[k];
    let right = match keys.get(k + 1) {
        Some(right) => right,
        None => return Some(left.value.clone()),
    };

    if !left.value.kind().interpolates() {
        return Some(step_value(&left.value));
    }

    let span = right.frame - left.frame;
    let ratio = if span > 0.0 {
        ((t - left.frame) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let r = eased_ratio(left, ratio);
    log::trace!("sample t={t} seg={k} ratio={ratio} eased={r}");
    Some(linear_value(&left.value, &right.value, r))
}
