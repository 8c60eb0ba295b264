//! Collaborator seams: sprite frame lookup, collider construction and rich-text
//! parsing. The decoder only talks to these traits; the stock implementations here
//! are plain in-memory stores good enough for tooling and tests.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::settings::DecodeSettings;
use scenery_api_core::{Color3, NodeId, Rect, Size, Vec2};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub name: String,
    /// Texture path after path rewriting.
    pub texture: String,
    pub rect: Rect,
    pub offset: Vec2,
    pub rotated: bool,
    pub original_size: Size,
    /// Nine-slice insets, when authored.
    pub centre_rect: Option<Rect>,
}

pub trait SpriteFrameResolver {
    fn register(&mut self, frame: SpriteFrame);
    fn frame(&self, name: &str) -> Option<&SpriteFrame>;
}

/// Name-keyed frame store.
#[derive(Clone, Debug, Default)]
pub struct FrameTable {
    frames: HashMap<String, SpriteFrame>,
}

impl FrameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = SpriteFrame> + '_ {
        self.frames.drain().map(|(_, f)| f)
    }
}

impl SpriteFrameResolver for FrameTable {
    fn register(&mut self, frame: SpriteFrame) {
        self.frames.insert(frame.name.clone(), frame);
    }

    fn frame(&self, name: &str) -> Option<&SpriteFrame> {
        self.frames.get(name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Circle { radius: f32 },
    Box { size: Size },
    Polygon { points: Vec<Vec2> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderDesc {
    pub offset: Vec2,
    pub shape: ColliderShape,
}

pub trait CollisionBuilder {
    /// Which groups collide with which, row per group.
    fn set_matrix(&mut self, matrix: Vec<Vec<bool>>);
    fn add_collider(&mut self, node: NodeId, group: i32, collider: ColliderDesc);
}

/// Collects collider descriptors without simulating anything.
#[derive(Clone, Debug, Default)]
pub struct ColliderSet {
    pub matrix: Vec<Vec<bool>>,
    pub colliders: Vec<(NodeId, i32, ColliderDesc)>,
}

impl CollisionBuilder for ColliderSet {
    fn set_matrix(&mut self, matrix: Vec<Vec<bool>>) {
        self.matrix = matrix;
    }

    fn add_collider(&mut self, node: NodeId, group: i32, collider: ColliderDesc) {
        self.colliders.push((node, group, collider));
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RichRun {
    pub text: String,
    pub color: Option<Color3>,
    pub size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextLayout {
    pub runs: Vec<RichRun>,
    /// Measured width of the widest line.
    pub width: f32,
}

pub trait RichTextParser {
    fn parse(&self, markup: &str, font_size: f32, max_width: f32) -> RichTextLayout;
}

/// Drops all markup and measures with a fixed advance of half the font size.
#[derive(Copy, Clone, Debug, Default)]
pub struct PlainTextParser;

impl RichTextParser for PlainTextParser {
    fn parse(&self, markup: &str, font_size: f32, max_width: f32) -> RichTextLayout {
        let mut text = String::with_capacity(markup.len());
        let mut in_tag = false;
        for ch in markup.chars() {
            match ch {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                c if !in_tag => text.push(c),
                _ => {}
            }
        }
        let widest = text
            .lines()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let mut width = widest as f32 * font_size * 0.5;
        if max_width > 0.0 {
            width = width.min(max_width);
        }
        RichTextLayout {
            runs: vec![RichRun {
                text,
                ..RichRun::default()
            }],
            width,
        }
    }
}

/// Everything one decode needs from outside the document.
pub struct DecodeContext<'a> {
    pub settings: &'a DecodeSettings,
    pub frames: &'a mut dyn SpriteFrameResolver,
    pub collisions: &'a mut dyn CollisionBuilder,
    pub rich_text: &'a dyn RichTextParser,
}

impl<'a> DecodeContext<'a> {
    pub fn new(
        settings: &'a DecodeSettings,
        frames: &'a mut dyn SpriteFrameResolver,
        collisions: &'a mut dyn CollisionBuilder,
        rich_text: &'a dyn RichTextParser,
    ) -> Self {
        Self {
            settings,
            frames,
            collisions,
            rich_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_parser_strips_tags() {
        let out = PlainTextParser.parse("<b>hi</b> <color=#ff0000>there</color>", 20.0, 0.0);
        assert_eq!(out.runs[0].text, "hi there");
        assert_eq!(out.width, 80.0);
        let capped = PlainTextParser.parse("<b>hi</b> there", 20.0, 30.0);
        assert_eq!(capped.width, 30.0);
    }
}
