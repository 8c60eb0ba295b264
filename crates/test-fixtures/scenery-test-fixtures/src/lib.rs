use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;

use scenery_scene_core::Document;

static SAMPLES: Lazy<BTreeMap<&'static str, Vec<u8>>> = Lazy::new(|| {
    [
        ("hud", samples::hud()),
        ("button_prefab", samples::button_prefab()),
        ("broken_tilemap", samples::broken_tilemap()),
    ]
    .into_iter()
    .map(|(name, doc)| {
        let bytes = doc.to_bytes().expect("sample documents should serialize");
        (name, bytes)
    })
    .collect()
});

/// Names of every encoded sample.
pub fn keys() -> Vec<&'static str> {
    SAMPLES.keys().copied().collect()
}

/// Encoded buffer of sample `name`.
pub fn bytes(name: &str) -> Result<&'static [u8]> {
    SAMPLES
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| anyhow!("unknown sample fixture '{name}'"))
}

/// Sample `name` decoded back into its document form.
pub fn document(name: &str) -> Result<Document> {
    let raw = bytes(name)?;
    Document::from_bytes(raw).with_context(|| format!("failed to parse sample fixture {name}"))
}

pub mod builders {
    use scenery_animation_core::WrapMode;
    use scenery_api_core::{Size, Vec2};
    use scenery_layout_core::{LayoutConfig, ResizeMode};
    use scenery_scene_core::document::{
        AnimProps, AnimationRef, ClipRecord, CurveRecord, Key, LayoutRecord,
    };
    use scenery_scene_core::{AnyNode, Document, NodeRecord, NodeTree};

    pub fn record(name: &str, position: Vec2, size: Size) -> NodeRecord {
        NodeRecord {
            position: Some(position),
            content_size: Some(size),
            ..NodeRecord::named(name)
        }
    }

    pub fn scene(children: Vec<NodeTree>) -> Document {
        Document::new(NodeTree::with_children(
            AnyNode::Scene(NodeRecord::named("scene")),
            children,
        ))
    }

    pub fn prefab(children: Vec<NodeTree>) -> Document {
        Document::new(NodeTree::with_children(
            AnyNode::Prefab(NodeRecord::named("prefab")),
            children,
        ))
    }

    /// Opacity 255 -> 0 over `duration` seconds.
    pub fn fade_clip(name: &str, duration: f32, wrap_mode: WrapMode) -> ClipRecord {
        ClipRecord {
            name: name.into(),
            duration,
            speed: 1.0,
            sample: 60,
            wrap_mode,
            curves: vec![CurveRecord {
                path: None,
                props: AnimProps {
                    opacity: vec![Key::new(0.0, 255.0), Key::new(duration, 0.0)],
                    ..AnimProps::default()
                },
            }],
        }
    }

    /// Authoring-space position from `from` to `to`, optionally on a child path.
    pub fn slide_clip(name: &str, path: Option<&str>, from: Vec2, to: Vec2, duration: f32) -> ClipRecord {
        ClipRecord {
            name: name.into(),
            duration,
            speed: 1.0,
            sample: 60,
            wrap_mode: WrapMode::Once,
            curves: vec![CurveRecord {
                path: path.map(str::to_string),
                props: AnimProps {
                    position: vec![Key::new(0.0, from), Key::new(duration, to)],
                    ..AnimProps::default()
                },
            }],
        }
    }

    /// Attach `clips` to `rec`; the first clip is the default.
    pub fn animated(mut rec: NodeRecord, clips: Vec<ClipRecord>, play_on_load: bool) -> NodeRecord {
        rec.anim = Some(AnimationRef {
            play_on_load,
            default_clip: clips.first().map(|c| c.name.clone()),
            clips,
        });
        rec
    }

    /// A horizontal container that sizes itself to `count` square children.
    pub fn row(name: &str, count: usize, child: f32, spacing: f32) -> NodeTree {
        let children = (0..count)
            .map(|i| {
                NodeTree::leaf(AnyNode::Node(record(
                    &format!("{name}_{i}"),
                    Vec2::ZERO,
                    Size::new(child, child),
                )))
            })
            .collect();
        NodeTree::with_children(
            AnyNode::Layout(LayoutRecord {
                node: record(name, Vec2::new(100.0, 100.0), Size::new(0.0, child)),
                layout: LayoutConfig {
                    resize: ResizeMode::Container,
                    spacing_x: spacing,
                    ..LayoutConfig::horizontal()
                },
            }),
            children,
        )
    }
}

pub mod samples {
    use super::builders::*;
    use scenery_animation_core::WrapMode;
    use scenery_api_core::{Size, Vec2};
    use scenery_layout_core::{AlignFlags, WidgetAnchor};
    use scenery_scene_core::document::{
        AnimProps, ButtonRecord, ClipRecord, CurveRecord, Key, LabelRecord, TileMapRecord,
    };
    use scenery_scene_core::{AnyNode, Document, NodeRecord, NodeTree};

    /// A stretched banner, a self-sizing row and a looping blinker that plays on load.
    pub fn hud() -> Document {
        let mut banner = record("banner", Vec2::ZERO, Size::new(10.0, 40.0));
        banner.widget = Some(WidgetAnchor {
            flags: AlignFlags::TOP | AlignFlags::LEFT | AlignFlags::RIGHT,
            left: 0.1,
            right: 0.1,
            top: 10.0,
            absolute_top: true,
            ..WidgetAnchor::default()
        });
        let blinker = animated(
            record("blinker", Vec2::new(480.0, 320.0), Size::new(16.0, 16.0)),
            vec![fade_clip("blink", 1.0, WrapMode::Loop)],
            true,
        );
        let mut doc = scene(vec![
            NodeTree::leaf(AnyNode::Node(banner)),
            row("row", 3, 20.0, 10.0),
            NodeTree::leaf(AnyNode::Node(blinker)),
        ]);
        doc.design_resolution = Some(Size::new(960.0, 640.0));
        doc.fit_height = true;
        doc
    }

    /// A button with a caption and a pulse clip flagged play-on-load.
    pub fn button_prefab() -> Document {
        let pulse = ClipRecord {
            curves: vec![CurveRecord {
                path: None,
                props: AnimProps {
                    scale_x: vec![Key::new(0.0, 1.0), Key::new(0.5, 1.2)],
                    ..AnimProps::default()
                },
            }],
            ..fade_clip("pulse", 0.5, WrapMode::PingPong)
        };
        let ok = animated(
            record("ok", Vec2::new(5.0, 5.0), Size::new(100.0, 40.0)),
            vec![pulse],
            true,
        );
        prefab(vec![NodeTree::with_children(
            AnyNode::Button(ButtonRecord::new(ok, None)),
            vec![NodeTree::leaf(AnyNode::Label(LabelRecord::new(
                NodeRecord::named("caption"),
                "OK",
            )))],
        )])
    }

    /// A tile map without its map file.
    pub fn broken_tilemap() -> Document {
        scene(vec![NodeTree::leaf(AnyNode::TileMap(TileMapRecord {
            node: NodeRecord::named("map"),
            tmx_filename: None,
            desired_content_size: None,
        }))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sample_parses() {
        for name in keys() {
            document(name).unwrap();
        }
    }

    #[test]
    fn unknown_sample_is_an_error() {
        let err = bytes("nope").unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
