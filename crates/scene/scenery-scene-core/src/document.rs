//! Binary document schema.
//!
//! A document is a header plus one tree of tagged node records, encoded with bincode.
//! Keyframe tracks are typed per property so the encoding never needs
//! self-describing values. Optional fields are `Option`s; absent means "not configured".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::node::{
    FillType, FontType, HorizontalAlign, InputFlag, InputMode, MaskType, Overflow,
    PageDirection, ReturnType, SizeMode, SpriteType, Transition, VerticalAlign,
};
use scenery_animation_core::{Keyframe, PropertyKind, WrapMode};
use scenery_api_core::{Color3, Color4, Rect, Size, Value, Vec2};
use scenery_layout_core::{LayoutConfig, ScrollDirection, WidgetAnchor};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: String,
    pub design_resolution: Option<Size>,
    pub fit_width: bool,
    pub fit_height: bool,
    pub sprite_frames: Vec<SpriteFrameRecord>,
    pub collision_matrix: Vec<Vec<bool>>,
    pub root: NodeTree,
}

impl Document {
    pub fn new(root: NodeTree) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            design_resolution: None,
            fit_width: false,
            fit_height: false,
            sprite_frames: Vec::new(),
            collision_matrix: Vec::new(),
            root,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn split(self) -> (DocumentHeader, NodeTree) {
        let header = DocumentHeader {
            version: self.version,
            design_resolution: self.design_resolution,
            fit_width: self.fit_width,
            fit_height: self.fit_height,
            sprite_frames: self.sprite_frames,
            collision_matrix: self.collision_matrix,
        };
        (header, self.root)
    }

    pub fn from_parts(header: DocumentHeader, root: NodeTree) -> Self {
        Self {
            version: header.version,
            design_resolution: header.design_resolution,
            fit_width: header.fit_width,
            fit_height: header.fit_height,
            sprite_frames: header.sprite_frames,
            collision_matrix: header.collision_matrix,
            root,
        }
    }
}

/// Everything in a document except the node tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub version: String,
    pub design_resolution: Option<Size>,
    pub fit_width: bool,
    pub fit_height: bool,
    pub sprite_frames: Vec<SpriteFrameRecord>,
    pub collision_matrix: Vec<Vec<bool>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrameRecord {
    pub name: String,
    pub texture_path: String,
    pub rect: Rect,
    pub offset: Vec2,
    pub rotated: bool,
    pub original_size: Size,
    pub centre_rect: Option<Rect>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTree {
    pub object: AnyNode,
    pub children: Vec<NodeTree>,
}

impl NodeTree {
    pub fn leaf(object: AnyNode) -> Self {
        Self {
            object,
            children: Vec::new(),
        }
    }

    pub fn with_children(object: AnyNode, children: Vec<NodeTree>) -> Self {
        Self { object, children }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AnyNode {
    Scene(NodeRecord),
    Prefab(NodeRecord),
    Node(NodeRecord),
    Label(LabelRecord),
    Sprite(SpriteRecord),
    TileMap(TileMapRecord),
    Particle(ParticleRecord),
    Layout(LayoutRecord),
    RichText(RichTextRecord),
    ScrollView(ScrollViewRecord),
    ProgressBar(ProgressBarRecord),
    Button(ButtonRecord),
    EditBox(EditBoxRecord),
    Slider(SliderRecord),
    Toggle(ToggleRecord),
    ToggleGroup(ToggleGroupRecord),
    PageView(PageViewRecord),
    Mask(MaskRecord),
    MotionStreak(MotionStreakRecord),
    VideoPlayer(VideoPlayerRecord),
    WebView(WebViewRecord),
}

impl AnyNode {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AnyNode::Scene(_) => "scene",
            AnyNode::Prefab(_) => "prefab",
            AnyNode::Node(_) => "node",
            AnyNode::Label(_) => "label",
            AnyNode::Sprite(_) => "sprite",
            AnyNode::TileMap(_) => "tilemap",
            AnyNode::Particle(_) => "particle",
            AnyNode::Layout(_) => "layout",
            AnyNode::RichText(_) => "richtext",
            AnyNode::ScrollView(_) => "scrollview",
            AnyNode::ProgressBar(_) => "progressbar",
            AnyNode::Button(_) => "button",
            AnyNode::EditBox(_) => "editbox",
            AnyNode::Slider(_) => "slider",
            AnyNode::Toggle(_) => "toggle",
            AnyNode::ToggleGroup(_) => "togglegroup",
            AnyNode::PageView(_) => "pageview",
            AnyNode::Mask(_) => "mask",
            AnyNode::MotionStreak(_) => "motionstreak",
            AnyNode::VideoPlayer(_) => "videoplayer",
            AnyNode::WebView(_) => "webview",
        }
    }
}

/// Fields common to every node record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: Option<String>,
    pub tag: i32,
    pub local_z_order: i32,
    pub global_z_order: f32,
    pub position: Option<Vec2>,
    pub rotation_skew_x: f32,
    pub rotation_skew_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub skew_x: f32,
    pub skew_y: f32,
    pub anchor_point: Option<Vec2>,
    pub content_size: Option<Size>,
    pub color: Option<Color3>,
    pub opacity: u8,
    pub cascade_opacity_enabled: bool,
    pub opacity_modify_rgb: bool,
    pub enabled: bool,
    pub group_index: i32,
    pub anim: Option<AnimationRef>,
    pub colliders: Vec<ColliderRecord>,
    pub widget: Option<WidgetAnchor>,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            name: None,
            tag: 0,
            local_z_order: 0,
            global_z_order: 0.0,
            position: None,
            rotation_skew_x: 0.0,
            rotation_skew_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            skew_x: 0.0,
            skew_y: 0.0,
            anchor_point: None,
            content_size: None,
            color: None,
            opacity: 255,
            cascade_opacity_enabled: true,
            opacity_modify_rgb: false,
            enabled: true,
            group_index: 0,
            anim: None,
            colliders: Vec::new(),
            widget: None,
        }
    }
}

impl NodeRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ColliderKind {
    Circle,
    Box,
    Polygon,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderRecord {
    pub kind: ColliderKind,
    pub offset: Vec2,
    pub radius: f32,
    pub size: Option<Size>,
    pub points: Vec<Vec2>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationRef {
    pub play_on_load: bool,
    pub default_clip: Option<String>,
    pub clips: Vec<ClipRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub name: String,
    pub duration: f32,
    pub speed: f32,
    pub sample: u32,
    pub wrap_mode: WrapMode,
    pub curves: Vec<CurveRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    /// Target below the owning node; `None` targets the owner itself.
    pub path: Option<String>,
    pub props: AnimProps,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Key<T> {
    pub frame: f32,
    pub value: T,
    pub curve_type: Option<String>,
    pub curve_data: Vec<f32>,
}

impl<T> Key<T> {
    pub fn new(frame: f32, value: T) -> Self {
        Self {
            frame,
            value,
            curve_type: None,
            curve_data: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimProps {
    pub position: Vec<Key<Vec2>>,
    pub position_x: Vec<Key<f32>>,
    pub position_y: Vec<Key<f32>>,
    pub rotation: Vec<Key<f32>>,
    pub skew_x: Vec<Key<f32>>,
    pub skew_y: Vec<Key<f32>>,
    pub scale_x: Vec<Key<f32>>,
    pub scale_y: Vec<Key<f32>>,
    pub color: Vec<Key<Color3>>,
    pub opacity: Vec<Key<f32>>,
    pub anchor_x: Vec<Key<f32>>,
    pub anchor_y: Vec<Key<f32>>,
    pub active: Vec<Key<bool>>,
    pub width: Vec<Key<f32>>,
    pub height: Vec<Key<f32>>,
    pub sprite_frame: Vec<Key<String>>,
}

fn to_track<T>(keys: &[Key<T>], value: impl Fn(&T) -> Value) -> Vec<Keyframe> {
    keys.iter()
        .map(|k| Keyframe {
            frame: k.frame,
            value: value(&k.value),
            curve_type: k.curve_type.clone(),
            curve_data: k.curve_data.clone(),
        })
        .collect()
}

fn from_track<T>(keys: Option<&Vec<Keyframe>>, value: impl Fn(&Value) -> Option<T>) -> Vec<Key<T>> {
    keys.map(|keys| {
        keys.iter()
            .filter_map(|k| {
                Some(Key {
                    frame: k.frame,
                    value: value(&k.value)?,
                    curve_type: k.curve_type.clone(),
                    curve_data: k.curve_data.clone(),
                })
            })
            .collect()
    })
    .unwrap_or_default()
}

impl AnimProps {
    /// Non-empty tracks keyed by property.
    pub fn to_tracks(&self) -> BTreeMap<PropertyKind, Vec<Keyframe>> {
        let float = |v: &f32| Value::Float(*v);
        let candidates = [
            (PropertyKind::Position, to_track(&self.position, |v| Value::vec2(v.x, v.y))),
            (PropertyKind::PositionX, to_track(&self.position_x, float)),
            (PropertyKind::PositionY, to_track(&self.position_y, float)),
            (PropertyKind::Rotation, to_track(&self.rotation, float)),
            (PropertyKind::SkewX, to_track(&self.skew_x, float)),
            (PropertyKind::SkewY, to_track(&self.skew_y, float)),
            (PropertyKind::ScaleX, to_track(&self.scale_x, float)),
            (PropertyKind::ScaleY, to_track(&self.scale_y, float)),
            (
                PropertyKind::Color,
                to_track(&self.color, |c| Value::ColorRgb(c.channels())),
            ),
            (PropertyKind::Opacity, to_track(&self.opacity, float)),
            (PropertyKind::AnchorX, to_track(&self.anchor_x, float)),
            (PropertyKind::AnchorY, to_track(&self.anchor_y, float)),
            (PropertyKind::Active, to_track(&self.active, |b| Value::Bool(*b))),
            (PropertyKind::Width, to_track(&self.width, float)),
            (PropertyKind::Height, to_track(&self.height, float)),
            (
                PropertyKind::SpriteFrame,
                to_track(&self.sprite_frame, |s| Value::Text(s.clone())),
            ),
        ];
        candidates
            .into_iter()
            .filter(|(_, keys)| !keys.is_empty())
            .collect()
    }

    pub fn from_tracks(tracks: &BTreeMap<PropertyKind, Vec<Keyframe>>) -> Self {
        let float = |v: &Value| v.as_float();
        let get = |p: PropertyKind| tracks.get(&p);
        Self {
            position: from_track(get(PropertyKind::Position), |v| v.as_vec2().map(Vec2::from)),
            position_x: from_track(get(PropertyKind::PositionX), float),
            position_y: from_track(get(PropertyKind::PositionY), float),
            rotation: from_track(get(PropertyKind::Rotation), float),
            skew_x: from_track(get(PropertyKind::SkewX), float),
            skew_y: from_track(get(PropertyKind::SkewY), float),
            scale_x: from_track(get(PropertyKind::ScaleX), float),
            scale_y: from_track(get(PropertyKind::ScaleY), float),
            color: from_track(get(PropertyKind::Color), |v| {
                v.as_rgb().map(Color3::from_channels)
            }),
            opacity: from_track(get(PropertyKind::Opacity), float),
            anchor_x: from_track(get(PropertyKind::AnchorX), float),
            anchor_y: from_track(get(PropertyKind::AnchorY), float),
            active: from_track(get(PropertyKind::Active), Value::as_bool),
            width: from_track(get(PropertyKind::Width), float),
            height: from_track(get(PropertyKind::Height), float),
            sprite_frame: from_track(get(PropertyKind::SpriteFrame), |v| {
                v.as_text().map(str::to_string)
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutlineRecord {
    pub color: Color3,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShadowRecord {
    pub color: Color4,
    pub offset: Vec2,
    pub blur: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub node: NodeRecord,
    pub text: String,
    pub font_name: Option<String>,
    pub font_size: f32,
    pub font_type: FontType,
    pub line_height: f32,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub overflow: Overflow,
    pub enable_wrap: bool,
    pub outline: Option<OutlineRecord>,
    pub shadow: Option<ShadowRecord>,
}

impl LabelRecord {
    pub fn new(node: NodeRecord, text: impl Into<String>) -> Self {
        Self {
            node,
            text: text.into(),
            font_name: None,
            font_size: 20.0,
            font_type: FontType::System,
            line_height: 20.0,
            horizontal_align: HorizontalAlign::Left,
            vertical_align: VerticalAlign::Top,
            overflow: Overflow::None,
            enable_wrap: false,
            outline: None,
            shadow: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillRecord {
    pub fill_type: FillType,
    pub center: Vec2,
    pub start: f32,
    pub range: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteRecord {
    pub node: NodeRecord,
    pub sprite_frame_name: Option<String>,
    pub sprite_type: SpriteType,
    pub size_mode: SizeMode,
    pub trim_enabled: bool,
    pub fill: Option<FillRecord>,
}

impl SpriteRecord {
    pub fn new(node: NodeRecord, frame: Option<&str>) -> Self {
        Self {
            node,
            sprite_frame_name: frame.map(str::to_string),
            sprite_type: SpriteType::Simple,
            size_mode: SizeMode::Custom,
            trim_enabled: false,
            fill: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileMapRecord {
    pub node: NodeRecord,
    pub tmx_filename: Option<String>,
    pub desired_content_size: Option<Size>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub node: NodeRecord,
    pub particle_filename: Option<String>,
    pub texture_path: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutRecord {
    pub node: NodeRecord,
    pub layout: LayoutConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RichTextRecord {
    pub node: NodeRecord,
    pub text: Option<String>,
    pub font_size: f32,
    pub font_filename: Option<String>,
    pub max_width: f32,
    pub line_height: f32,
    pub horizontal_align: HorizontalAlign,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollViewRecord {
    pub node: NodeRecord,
    pub background_image: Option<String>,
    pub background_image_scale9: bool,
    pub background_image_color: Color3,
    pub direction: ScrollDirection,
    pub bounce_enabled: bool,
    pub inner_container_size: Size,
    pub recycle_elements: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressBarRecord {
    pub node: NodeRecord,
    pub bar_sprite_frame_name: Option<String>,
    pub bar_sliced: bool,
    pub bar_content_size: Size,
    pub percent: f32,
    pub reverse: bool,
    pub background_sprite_frame_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonRecord {
    pub node: NodeRecord,
    pub sprite_frame_name: Option<String>,
    pub pressed_sprite_frame_name: Option<String>,
    pub disabled_sprite_frame_name: Option<String>,
    pub transition: Transition,
    pub duration: f32,
    pub zoom_scale: f32,
    pub normal_color: Color3,
    pub pressed_color: Color3,
    pub hover_color: Color3,
    pub disabled_color: Color3,
    pub enabled: bool,
    pub ignore_content_adapt_with_size: bool,
}

impl ButtonRecord {
    pub fn new(node: NodeRecord, frame: Option<&str>) -> Self {
        Self {
            node,
            sprite_frame_name: frame.map(str::to_string),
            pressed_sprite_frame_name: None,
            disabled_sprite_frame_name: None,
            transition: Transition::None,
            duration: 0.1,
            zoom_scale: 1.2,
            normal_color: Color3::WHITE,
            pressed_color: Color3::WHITE,
            hover_color: Color3::WHITE,
            disabled_color: Color3::WHITE,
            enabled: true,
            ignore_content_adapt_with_size: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditBoxRecord {
    pub node: NodeRecord,
    pub background_image: Option<String>,
    pub return_type: ReturnType,
    pub input_flag: InputFlag,
    pub input_mode: InputMode,
    pub font_size: f32,
    pub font_color: Color3,
    pub placeholder: String,
    pub placeholder_font_size: f32,
    pub placeholder_font_color: Color3,
    pub max_length: i32,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderRecord {
    pub node: NodeRecord,
    pub percent: f32,
    pub bar_texture: Option<String>,
    pub ball_normal: Option<String>,
    pub ball_pressed: Option<String>,
    pub ball_disabled: Option<String>,
    pub bar_size: Size,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToggleRecord {
    pub node: NodeRecord,
    pub is_checked: bool,
    pub interactable: bool,
    pub enable_auto_gray_effect: bool,
    pub zoom_scale: f32,
    pub background_sprite_frame_name: Option<String>,
    pub checkmark_sprite_frame_name: Option<String>,
}

impl ToggleRecord {
    pub fn new(node: NodeRecord, checked: bool) -> Self {
        Self {
            node,
            is_checked: checked,
            interactable: true,
            enable_auto_gray_effect: false,
            zoom_scale: 1.0,
            background_sprite_frame_name: None,
            checkmark_sprite_frame_name: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToggleGroupRecord {
    pub node: NodeRecord,
    pub allow_switch_off: bool,
    pub toggles: Vec<ToggleRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageIndicatorRecord {
    pub position: Vec2,
    pub spacing: f32,
    pub cell_size: Size,
    pub color: Color3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageViewRecord {
    pub node: NodeRecord,
    pub direction: PageDirection,
    pub inertia: bool,
    pub bounce_enabled: bool,
    pub indicator: Option<PageIndicatorRecord>,
    pub background: Option<String>,
    pub pages: Vec<SpriteRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaskRecord {
    pub node: NodeRecord,
    pub mask_type: MaskType,
    pub inverted: bool,
    pub segments: i32,
    pub alpha_threshold: f32,
    pub sprite_frame_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionStreakRecord {
    pub node: NodeRecord,
    pub time_to_fade: f32,
    pub min_seg: f32,
    pub stroke_width: f32,
    pub color: Color3,
    pub texture_path: Option<String>,
    pub fast_mode: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoPlayerRecord {
    pub node: NodeRecord,
    pub url: Option<String>,
    pub is_local: bool,
    pub full_screen_enabled: bool,
    pub keep_aspect_ratio_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebViewRecord {
    pub node: NodeRecord,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_props_become_tracks() {
        let props = AnimProps {
            opacity: vec![Key::new(0.0, 0.0), Key::new(1.0, 255.0)],
            active: vec![Key::new(0.5, false)],
            ..AnimProps::default()
        };
        let tracks = props.to_tracks();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[&PropertyKind::Opacity][1].value, Value::f(255.0));
        assert_eq!(tracks[&PropertyKind::Active][0].value, Value::Bool(false));
        assert_eq!(AnimProps::from_tracks(&tracks), props);
    }

    #[test]
    fn document_survives_bincode() {
        let mut label = LabelRecord::new(NodeRecord::named("title"), "hello");
        label.outline = Some(OutlineRecord {
            color: Color3::new(1, 2, 3),
            width: 2.0,
        });
        let doc = Document::new(NodeTree::with_children(
            AnyNode::Scene(NodeRecord::default()),
            vec![NodeTree::leaf(AnyNode::Label(label))],
        ));
        let bytes = doc.to_bytes().expect("serialize");
        assert_eq!(Document::from_bytes(&bytes).expect("deserialize"), doc);
    }
}
