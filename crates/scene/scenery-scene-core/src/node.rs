//! Node model: one common record plus a closed set of kinds, each carrying only
//! the fields that kind needs.

use serde::{Deserialize, Serialize};

use crate::collab::{RichRun, SpriteFrame};
use scenery_api_core::{Color3, Color4, NodeId, Rect, Size, Vec2};
use scenery_layout_core::{LayoutNode, ScrollDirection, WidgetAnchor};

/// Fields shared by every node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeCommon {
    pub name: String,
    pub tag: i32,
    pub local_z: i32,
    pub global_z: f32,
    /// Runtime position, relative to the parent's bottom-left corner once shifted.
    pub position: Vec2,
    /// Position as authored, relative to the parent's anchor point.
    pub authoring_position: Vec2,
    pub rotation_skew: Vec2,
    pub scale: Vec2,
    pub skew: Vec2,
    pub anchor: Vec2,
    pub size: Size,
    pub color: Color3,
    pub opacity: u8,
    pub cascade_opacity: bool,
    pub opacity_modify_rgb: bool,
    pub visible: bool,
    pub group_index: i32,
    pub widget: Option<WidgetAnchor>,
    /// Built from a field of the parent's record rather than from the child list.
    pub embedded: bool,
}

impl Default for NodeCommon {
    fn default() -> Self {
        Self {
            name: String::new(),
            tag: 0,
            local_z: 0,
            global_z: 0.0,
            position: Vec2::ZERO,
            authoring_position: Vec2::ZERO,
            rotation_skew: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            skew: Vec2::ZERO,
            anchor: Vec2::new(0.5, 0.5),
            size: Size::ZERO,
            color: Color3::WHITE,
            opacity: 255,
            cascade_opacity: true,
            opacity_modify_rgb: false,
            visible: true,
            group_index: 0,
            widget: None,
            embedded: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub common: NodeCommon,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(common: NodeCommon, kind: NodeKind) -> Self {
        Self {
            common,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    pub fn as_layout(&self) -> Option<&LayoutBox> {
        match &self.kind {
            NodeKind::Layout(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_layout_mut(&mut self) -> Option<&mut LayoutBox> {
        match &mut self.kind {
            NodeKind::Layout(l) => Some(l),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Scene,
    /// Wrapper node of a prefab document.
    PrefabRoot,
    Plain,
    Label(Label),
    Sprite(Sprite),
    TileMap(TileMap),
    Particle(Particle),
    Layout(LayoutBox),
    RichText(RichText),
    ScrollView(ScrollView),
    ProgressBar(ProgressBar),
    Button(Button),
    EditBox(EditBox),
    Slider(Slider),
    Toggle(Toggle),
    ToggleGroup(ToggleGroup),
    PageView(PageView),
    Mask(Mask),
    MotionStreak(MotionStreak),
    VideoPlayer(VideoPlayer),
    WebView(WebView),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Scene => "scene",
            NodeKind::PrefabRoot => "prefab",
            NodeKind::Plain => "node",
            NodeKind::Label(_) => "label",
            NodeKind::Sprite(_) => "sprite",
            NodeKind::TileMap(_) => "tilemap",
            NodeKind::Particle(_) => "particle",
            NodeKind::Layout(_) => "layout",
            NodeKind::RichText(_) => "richtext",
            NodeKind::ScrollView(_) => "scrollview",
            NodeKind::ProgressBar(_) => "progressbar",
            NodeKind::Button(_) => "button",
            NodeKind::EditBox(_) => "editbox",
            NodeKind::Slider(_) => "slider",
            NodeKind::Toggle(_) => "toggle",
            NodeKind::ToggleGroup(_) => "togglegroup",
            NodeKind::PageView(_) => "pageview",
            NodeKind::Mask(_) => "mask",
            NodeKind::MotionStreak(_) => "motionstreak",
            NodeKind::VideoPlayer(_) => "videoplayer",
            NodeKind::WebView(_) => "webview",
        }
    }
}

/// Where a sprite's pixels come from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SpriteSource {
    #[default]
    Unset,
    Frame(SpriteFrame),
    /// Raw texture path, used when no frame of that name is registered.
    Texture(String),
}

impl SpriteSource {
    pub fn is_set(&self) -> bool {
        !matches!(self, SpriteSource::Unset)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontType {
    #[default]
    System,
    Ttf,
    Bmfont,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overflow {
    #[default]
    None,
    Clamp,
    Shrink,
    ResizeHeight,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub color: Color3,
    pub width: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color4,
    pub offset: Vec2,
    pub blur: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub font_name: Option<String>,
    pub font_size: f32,
    pub font_type: FontType,
    pub line_height: f32,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    pub overflow: Overflow,
    pub wrap: bool,
    pub outline: Option<Outline>,
    pub shadow: Option<Shadow>,
    /// Separate glyph color used while an outline or shadow is active.
    pub text_color: Option<Color4>,
}

impl Label {
    pub fn has_effect(&self) -> bool {
        self.outline.is_some() || self.shadow.is_some()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteType {
    #[default]
    Simple,
    Sliced,
    Tiled,
    Filled,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeMode {
    #[default]
    Custom,
    Trimmed,
    Raw,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillType {
    #[default]
    Horizontal,
    Vertical,
    Radial,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub fill_type: FillType,
    pub center: Vec2,
    pub start: f32,
    pub range: f32,
    /// `range` as a percentage.
    pub percentage: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub frame_name: Option<String>,
    pub source: SpriteSource,
    pub sprite_type: SpriteType,
    pub size_mode: SizeMode,
    pub trim: bool,
    pub fill: Option<Fill>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    pub tmx_file: String,
    pub desired_size: Option<Size>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub plist_file: String,
    pub texture: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    pub layout: LayoutNode,
    /// Scroll view this container lives in, if any.
    pub scroll_view: Option<NodeId>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub markup: String,
    pub font_size: f32,
    pub font_file: Option<String>,
    pub max_width: f32,
    pub line_height: f32,
    pub horizontal_align: HorizontalAlign,
    pub runs: Vec<RichRun>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub image: String,
    pub scale9: bool,
    pub color: Color3,
}

/// Last scroll movement along the scroll axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollMotion {
    #[default]
    Still,
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollView {
    pub direction: ScrollDirection,
    pub bounce: bool,
    pub recycle_elements: bool,
    pub inner_size: Size,
    pub inner_position: Vec2,
    pub motion: ScrollMotion,
    pub background: Option<Background>,
}

impl ScrollView {
    /// Visible window in inner-container space.
    pub fn container_bounds(&self, view_size: Size) -> Rect {
        let shift = Vec2::new(
            self.inner_size.width - view_size.width,
            self.inner_size.height - view_size.height,
        );
        let origin = self.inner_position + shift;
        Rect::new(origin.x, origin.y, view_size.width, view_size.height)
    }

    /// Move the inner container and record the direction of travel.
    pub fn scroll_to(&mut self, position: Vec2) {
        let dy = position.y - self.inner_position.y;
        self.motion = if dy > 0.0 {
            ScrollMotion::Up
        } else if dy < 0.0 {
            ScrollMotion::Down
        } else {
            ScrollMotion::Still
        };
        self.inner_position = position;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressBar {
    pub bar: SpriteSource,
    pub bar_frame_name: Option<String>,
    pub bar_size: Size,
    pub sliced: bool,
    pub percent: f32,
    pub reverse: bool,
    pub background: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    #[default]
    None,
    Color,
    Sprite,
    Scale,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ButtonColors {
    pub normal: Color3,
    pub pressed: Color3,
    pub hover: Color3,
    pub disabled: Color3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub normal: SpriteSource,
    pub pressed: SpriteSource,
    pub disabled: SpriteSource,
    pub frame_names: [Option<String>; 3],
    pub transition: Transition,
    pub duration: f32,
    pub zoom_scale: f32,
    pub colors: ButtonColors,
    pub interactable: bool,
    pub ignore_content_adapt: bool,
    /// Caption label, kept out of the structural child list.
    pub title: Option<NodeId>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnType {
    #[default]
    Default,
    Done,
    Send,
    Search,
    Go,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFlag {
    Password,
    Sensitive,
    InitialCapsWord,
    InitialCapsSentence,
    InitialCapsAll,
    #[default]
    Default,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Any,
    EmailAddress,
    Numeric,
    PhoneNumber,
    Url,
    Decimal,
    SingleLine,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditBox {
    pub background: Option<String>,
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
pub struct Slider {
    pub percent: f32,
    pub bar_texture: Option<String>,
    pub ball_normal: Option<String>,
    pub ball_pressed: Option<String>,
    pub ball_disabled: Option<String>,
    pub bar_size: Size,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Toggle {
    pub checked: bool,
    pub interactable: bool,
    pub auto_gray: bool,
    pub zoom_scale: f32,
    pub background: Option<String>,
    pub checkmark: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToggleGroup {
    pub allow_switch_off: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageDirection {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageIndicator {
    pub position: Vec2,
    pub spacing: f32,
    pub cell_size: Size,
    pub color: Color3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageView {
    pub direction: PageDirection,
    pub inertia: bool,
    pub bounce: bool,
    pub indicator: Option<PageIndicator>,
    pub background: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskType {
    #[default]
    Rect,
    Ellipse,
    ImageStencil,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub mask_type: MaskType,
    pub inverted: bool,
    pub segments: i32,
    pub alpha_threshold: f32,
    pub frame_name: Option<String>,
    pub stencil: SpriteSource,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionStreak {
    pub fade_time: f32,
    pub min_segment: f32,
    pub stroke_width: f32,
    pub color: Color3,
    pub texture: Option<String>,
    pub fast_mode: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoPlayer {
    pub url: Option<String>,
    pub is_local: bool,
    pub full_screen: bool,
    pub keep_aspect: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebView {
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_bounds_shift_by_excess_inner_size() {
        let sv = ScrollView {
            direction: ScrollDirection::Vertical,
            bounce: false,
            recycle_elements: true,
            inner_size: Size::new(100.0, 400.0),
            inner_position: Vec2::new(0.0, -300.0),
            motion: ScrollMotion::Still,
            background: None,
        };
        let bounds = sv.container_bounds(Size::new(100.0, 100.0));
        assert_eq!(bounds, Rect::new(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn scroll_records_direction() {
        let mut sv = ScrollView {
            direction: ScrollDirection::Vertical,
            bounce: false,
            recycle_elements: true,
            inner_size: Size::new(100.0, 400.0),
            inner_position: Vec2::ZERO,
            motion: ScrollMotion::Still,
            background: None,
        };
        sv.scroll_to(Vec2::new(0.0, 20.0));
        assert_eq!(sv.motion, ScrollMotion::Up);
        sv.scroll_to(Vec2::new(0.0, 5.0));
        assert_eq!(sv.motion, ScrollMotion::Down);
    }
}
