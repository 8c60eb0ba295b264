//! Named easing curves.
//!
//! Every curve maps a segment ratio in `[0, 1]` to an eased ratio. Most curves
//! satisfy `f(0) = 0` and `f(1) = 1`; `constant` always returns 0 (hold left).

use std::f32::consts::PI;

/// Shape of a curve family.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Quad,
    Cubic,
    Quart,
    Quint,
    Sine,
    Expo,
    Circ,
    Elastic,
    Back,
    Bounce,
}

/// Which half of a family to use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    In,
    Out,
    InOut,
    /// Out on the first half, In on the second.
    OutIn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    Constant,
    Smooth,
    Fade,
    Curve(Family, Phase),
}

impl Easing {
    /// Parse an authored easing name such as `quadIn` or `bounceOutIn`.
    pub fn from_name(name: &str) -> Option<Easing> {
        match name {
            "linear" => return Some(Easing::Linear),
            "constant" => return Some(Easing::Constant),
            "smooth" => return Some(Easing::Smooth),
            "fade" => return Some(Easing::Fade),
            _ => {}
        }
        // Longest suffixes first: "InOut" also ends with "Out".
        let (stem, phase) = if let Some(stem) = name.strip_suffix("InOut") {
            (stem, Phase::InOut)
        } else if let Some(stem) = name.strip_suffix("OutIn") {
            (stem, Phase::OutIn)
        } else if let Some(stem) = name.strip_suffix("In") {
            (stem, Phase::In)
        } else if let Some(stem) = name.strip_suffix("Out") {
            (stem, Phase::Out)
        } else {
            return None;
        };
        let family = match stem {
            "quad" => Family::Quad,
            "cubic" => Family::Cubic,
            "quart" => Family::Quart,
            "quint" => Family::Quint,
            "sine" => Family::Sine,
            "expo" => Family::Expo,
            "circ" => Family::Circ,
            "elastic" => Family::Elastic,
            "back" => Family::Back,
            "bounce" => Family::Bounce,
            _ => return None,
        };
        Some(Easing::Curve(family, phase))
    }

    pub fn apply(self, k: f32) -> f32 {
        match self {
            Easing::Linear => k,
            Easing::Constant => 0.0,
            Easing::Smooth => smooth(k),
            Easing::Fade => fade(k),
            Easing::Curve(family, Phase::In) => ease_in(family, k),
            Easing::Curve(family, Phase::Out) => ease_out(family, k),
            Easing::Curve(family, Phase::InOut) => ease_in_out(family, k),
            Easing::Curve(family, Phase::OutIn) => {
                if k < 0.5 {
                    ease_out(family, k * 2.0) / 2.0
                } else {
                    ease_in(family, 2.0 * k - 1.0) / 2.0 + 0.5
                }
            }
        }
    }
}

/// Ease `k` by name. Unknown names fall back to linear with a warning.
pub fn ease_by_name(name: &str, k: f32) -> f32 {
    match Easing::from_name(name) {
        Some(easing) => easing.apply(k),
        None => {
            log::warn!("unknown easing '{name}', using linear");
            k
        }
    }
}

const BACK_S: f32 = 1.70158;
const ELASTIC_P: f32 = 0.4;
const ELASTIC_S: f32 = ELASTIC_P / 4.0;

fn smooth(k: f32) -> f32 {
    if k <= 0.0 {
        0.0
    } else if k >= 1.0 {
        1.0
    } else {
        k * k * (3.0 - 2.0 * k)
    }
}

fn fade(k: f32) -> f32 {
    if k <= 0.0 {
        0.0
    } else if k >= 1.0 {
        1.0
    } else {
        k * k * k * (k * (k * 6.0 - 15.0) + 10.0)
    }
}

fn bounce_out(k: f32) -> f32 {
    if k < 1.0 / 2.75 {
        7.5625 * k * k
    } else if k < 2.0 / 2.75 {
        let k = k - 1.5 / 2.75;
        7.5625 * k * k + 0.75
    } else if k < 2.5 / 2.75 {
        let k = k - 2.25 / 2.75;
        7.5625 * k * k + 0.9375
    } else {
        let k = k - 2.625 / 2.75;
        7.5625 * k * k + 0.984375
    }
}

fn ease_in(family: Family, k: f32) -> f32 {
    match family {
        Family::Quad => k * k,
        Family::Cubic => k * k * k,
        Family::Quart => k * k * k * k,
        Family::Quint => k * k * k * k * k,
        Family::Sine => 1.0 - (k * PI / 2.0).cos(),
        Family::Expo => {
            if k == 0.0 {
                0.0
            } else {
                1024f32.powf(k - 1.0)
            }
        }
        Family::Circ => 1.0 - (1.0 - k * k).sqrt(),
        Family::Elastic => {
            if k == 0.0 || k == 1.0 {
                return k;
            }
            -(2f32.powf(10.0 * (k - 1.0)) * ((k - 1.0 - ELASTIC_S) * (2.0 * PI) / ELASTIC_P).sin())
        }
        Family::Back => k * k * ((BACK_S + 1.0) * k - BACK_S),
        Family::Bounce => 1.0 - bounce_out(1.0 - k),
    }
}

fn ease_out(family: Family, k: f32) -> f32 {
    match family {
        Family::Quad => k * (2.0 - k),
        Family::Cubic => {
            let k = k - 1.0;
            k * k * k + 1.0
        }
        Family::Quart => {
            let k = k - 1.0;
            1.0 - k * k * k * k
        }
        Family::Quint => {
            let k = k - 1.0;
            k * k * k * k * k + 1.0
        }
        Family::Sine => (k * PI / 2.0).sin(),
        Family::Expo => {
            if k == 1.0 {
                1.0
            } else {
                1.0 - 2f32.powf(-10.0 * k)
            }
        }
        Family::Circ => {
            let k = k - 1.0;
            (1.0 - k * k).sqrt()
        }
        Family::Elastic => {
            if k == 0.0 || k == 1.0 {
                return k;
            }
            2f32.powf(-10.0 * k) * ((k - ELASTIC_S) * (2.0 * PI) / ELASTIC_P).sin() + 1.0
        }
        Family::Back => {
            let k = k - 1.0;
            k * k * ((BACK_S + 1.0) * k + BACK_S) + 1.0
        }
        Family::Bounce => bounce_out(k),
    }
}

fn ease_in_out(family: Family, k: f32) -> f32 {
    match family {
        Family::Sine => 0.5 * (1.0 - (PI * k).cos()),
        Family::Expo => {
            if k == 0.0 || k == 1.0 {
                return k;
            }
            let k = k * 2.0;
            if k < 1.0 {
                0.5 * 1024f32.powf(k - 1.0)
            } else {
                0.5 * (2.0 - 2f32.powf(-10.0 * (k - 1.0)))
            }
        }
        Family::Elastic => {
            if k == 0.0 || k == 1.0 {
                return k;
            }
            let k = k * 2.0;
            let wave = ((k - 1.0 - ELASTIC_S) * (2.0 * PI) / ELASTIC_P).sin();
            if k < 1.0 {
                -0.5 * 2f32.powf(10.0 * (k - 1.0)) * wave
            } else {
                2f32.powf(-10.0 * (k - 1.0)) * wave * 0.5 + 1.0
            }
        }
        Family::Back => {
            let s = BACK_S * 1.525;
            let k = k * 2.0;
            if k < 1.0 {
                0.5 * (k * k * ((s + 1.0) * k - s))
            } else {
                let k = k - 2.0;
                0.5 * (k * k * ((s + 1.0) * k + s) + 2.0)
            }
        }
        Family::Bounce => {
            if k < 0.5 {
                ease_in(Family::Bounce, k * 2.0) * 0.5
            } else {
                ease_out(Family::Bounce, k * 2.0 - 1.0) * 0.5 + 0.5
            }
        }
        // Polynomial and circular families share the mirrored-halves form.
        _ => {
            if k < 0.5 {
                ease_in(family, k * 2.0) / 2.0
            } else {
                ease_out(family, k * 2.0 - 1.0) / 2.0 + 0.5
            }
        }
    }
}
