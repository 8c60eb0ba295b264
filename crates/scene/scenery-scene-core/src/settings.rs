//! Per-decode settings. These replace any process-wide reader state: every decode
//! gets its own copy through [`crate::DecodeContext`].

use serde::{Deserialize, Serialize};

use scenery_api_core::{Size, Vec2};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeSettings {
    /// Multiplier applied to sprite rects authored at another density.
    pub sprite_rect_scale: f32,
    /// Prefix joined onto relative asset paths.
    pub sprite_base_path: String,
    /// Ordered (prefix, replacement) pairs applied to asset paths. First match wins.
    pub path_replacements: Vec<(String, String)>,
    /// Viewport used by anchors on root-level nodes.
    pub visible_origin: Vec2,
    pub visible_size: Size,
    /// Real design resolution of the host. Defaults to the document's own when unset.
    pub frame_size: Option<Size>,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            sprite_rect_scale: 1.0,
            sprite_base_path: String::new(),
            path_replacements: Vec::new(),
            visible_origin: Vec2::ZERO,
            visible_size: Size::new(960.0, 640.0),
            frame_size: None,
        }
    }
}

impl DecodeSettings {
    /// Rewrite an asset path: replacement prefixes first, then the base path.
    pub fn resolve_path(&self, path: &str) -> String {
        let replaced = self
            .path_replacements
            .iter()
            .find_map(|(from, to)| {
                path.strip_prefix(from.as_str())
                    .map(|rest| format!("{to}{rest}"))
            })
            .unwrap_or_else(|| path.to_string());
        if self.sprite_base_path.is_empty() || replaced.starts_with('/') {
            replaced
        } else {
            format!("{}/{}", self.sprite_base_path.trim_end_matches('/'), replaced)
        }
    }

    /// Offset that centers a design of `design` size inside the host frame.
    pub fn position_diff(&self, design: Option<Size>) -> Vec2 {
        match (design, self.frame_size) {
            (Some(design), Some(frame)) => Vec2::new(
                (frame.width - design.width) / 2.0,
                (frame.height - design.height) / 2.0,
            ),
            _ => Vec2::ZERO,
        }
    }
}

/// How the host should map the design resolution onto its screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPolicy {
    ShowAll,
    FixedHeight,
    FixedWidth,
    NoBorder,
}

impl ResolutionPolicy {
    pub fn select(fit_width: bool, fit_height: bool, has_design: bool) -> Option<Self> {
        match (fit_width, fit_height) {
            (true, true) => Some(ResolutionPolicy::ShowAll),
            (false, true) => Some(ResolutionPolicy::FixedHeight),
            (true, false) => Some(ResolutionPolicy::FixedWidth),
            (false, false) if has_design => Some(ResolutionPolicy::NoBorder),
            (false, false) => None,
        }
    }
}
