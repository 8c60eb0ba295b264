//! Document decoder: buffer in, node tree plus everything the runtime registers out.
//!
//! Decoding stages all collaborator writes (sprite frames, collision data) and only
//! commits them once the whole tree has been built, so a failed decode leaves the
//! collaborators and the caller untouched.

use crate::collab::{
    ColliderDesc, ColliderShape, DecodeContext, FrameTable, RichTextParser, SpriteFrame,
    SpriteFrameResolver,
};
use crate::document::*;
use crate::error::{DecodeError, LookupMiss};
use crate::node::*;
use crate::settings::{DecodeSettings, ResolutionPolicy};
use crate::tree::SceneTree;
use scenery_animation_core::{AnimationClip, BindingDesc, CurveSet};
use scenery_api_core::{NodeId, NodePath, Size, Vec2};
use scenery_layout_core::LayoutNode;

/// Deepest node level a document may nest to; the root is level 0.
pub const MAX_NODE_DEPTH: usize = 128;

/// Result of one successful decode. The nodes themselves live in the caller's tree.
#[derive(Debug)]
pub struct DecodedDocument {
    /// The scene or prefab wrapper node, detached.
    pub root: NodeId,
    pub is_prefab: bool,
    pub header: DocumentHeader,
    /// Clip bindings in document order, ready for the animation engine.
    pub bindings: Vec<BindingDesc>,
    /// Nodes carrying a widget anchor, in document order.
    pub anchors: Vec<NodeId>,
    pub layouts: Vec<NodeId>,
    pub policy: Option<ResolutionPolicy>,
    pub position_diff: Vec2,
}

/// Decode `buffer` into `tree`. On error every node inserted so far is removed again.
pub fn decode(
    buffer: &[u8],
    ctx: &mut DecodeContext<'_>,
    tree: &mut SceneTree,
) -> Result<DecodedDocument, DecodeError> {
    let doc = Document::from_bytes(buffer)?;
    decode_document(doc, ctx, tree)
}

pub fn decode_document(
    doc: Document,
    ctx: &mut DecodeContext<'_>,
    tree: &mut SceneTree,
) -> Result<DecodedDocument, DecodeError> {
    let (header, root_tree) = doc.split();
    let is_prefab = match &root_tree.object {
        AnyNode::Scene(_) => false,
        AnyNode::Prefab(_) => true,
        other => {
            return Err(DecodeError::UnexpectedRoot {
                found: other.kind_name(),
            })
        }
    };
    if is_prefab && root_tree.children.is_empty() {
        return Err(DecodeError::EmptyPrefab);
    }

    let mut staged = FrameTable::new();
    for rec in &header.sprite_frames {
        staged.register(frame_from_record(rec, ctx.settings));
    }

    let mut builder = Builder {
        settings: ctx.settings,
        remote: &*ctx.frames,
        staged: &staged,
        rich_text: ctx.rich_text,
        attached_to_scene: !is_prefab,
        tree,
        inserted: Vec::new(),
        bindings: Vec::new(),
        colliders: Vec::new(),
        anchors: Vec::new(),
        layouts: Vec::new(),
    };
    let root = match builder.build(&root_tree, 0) {
        Ok(root) => root,
        Err(err) => {
            for id in builder.inserted.drain(..).rev() {
                builder.tree.remove(id);
            }
            return Err(err);
        }
    };
    let node_count = builder.inserted.len();
    let Builder {
        bindings,
        colliders,
        anchors,
        layouts,
        ..
    } = builder;

    for frame in staged.drain() {
        ctx.frames.register(frame);
    }
    if !header.collision_matrix.is_empty() {
        ctx.collisions.set_matrix(header.collision_matrix.clone());
    }
    for (node, group, collider) in colliders {
        ctx.collisions.add_collider(node, group, collider);
    }

    let policy = ResolutionPolicy::select(
        header.fit_width,
        header.fit_height,
        header.design_resolution.is_some(),
    );
    let position_diff = ctx.settings.position_diff(header.design_resolution);
    log::debug!(
        "decoded {} '{}': {} nodes, {} bindings, {} layouts, {} anchors",
        if is_prefab { "prefab" } else { "scene" },
        header.version,
        node_count,
        bindings.len(),
        layouts.len(),
        anchors.len()
    );

    Ok(DecodedDocument {
        root,
        is_prefab,
        header,
        bindings,
        anchors,
        layouts,
        policy,
        position_diff,
    })
}

fn frame_from_record(rec: &SpriteFrameRecord, settings: &DecodeSettings) -> SpriteFrame {
    SpriteFrame {
        name: rec.name.clone(),
        texture: settings.resolve_path(&rec.texture_path),
        rect: rec.rect.scaled(settings.sprite_rect_scale),
        offset: rec.offset,
        rotated: rec.rotated,
        original_size: rec.original_size,
        centre_rect: rec.centre_rect,
    }
}

struct Builder<'b> {
    settings: &'b DecodeSettings,
    remote: &'b dyn SpriteFrameResolver,
    staged: &'b FrameTable,
    rich_text: &'b dyn RichTextParser,
    attached_to_scene: bool,
    tree: &'b mut SceneTree,
    inserted: Vec<NodeId>,
    bindings: Vec<BindingDesc>,
    colliders: Vec<(NodeId, i32, ColliderDesc)>,
    anchors: Vec<NodeId>,
    layouts: Vec<NodeId>,
}

impl<'b> Builder<'b> {
    fn build(&mut self, item: &NodeTree, depth: usize) -> Result<NodeId, DecodeError> {
        if depth > MAX_NODE_DEPTH {
            return Err(DecodeError::TooDeep {
                limit: MAX_NODE_DEPTH,
            });
        }
        let node = self.instantiate(&item.object)?;
        let id = self.tree.insert(node);
        self.inserted.push(id);
        self.register_meta(id, &item.object);

        for object in embedded_children(&item.object) {
            let child = self.build(&NodeTree::leaf(object), depth + 1)?;
            if let Some(node) = self.tree.get_mut(child) {
                node.common.embedded = true;
            }
            self.tree.attach_no_dirty(id, child);
        }
        for child_tree in &item.children {
            let child = self.build(child_tree, depth + 1)?;
            self.adopt(id, child);
        }
        self.tree.mark_layout_dirty(id);
        Ok(id)
    }

    /// Attach a decoded child, honoring button captions and scroll-view content.
    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        let child_is_label = matches!(
            self.tree.get(child).map(|n| &n.kind),
            Some(NodeKind::Label(_))
        );
        let child_is_layout = matches!(
            self.tree.get(child).map(|n| &n.kind),
            Some(NodeKind::Layout(_))
        );
        match self.tree.get_mut(parent).map(|n| &mut n.kind) {
            Some(NodeKind::Button(button)) if child_is_label && button.title.is_none() => {
                button.title = Some(child);
                self.tree.adopt_hidden(parent, child);
                return;
            }
            Some(NodeKind::ScrollView(_)) if child_is_layout => {
                if let Some(layout) = self.tree.get_mut(child).and_then(Node::as_layout_mut) {
                    layout.scroll_view = Some(parent);
                }
            }
            _ => {}
        }
        self.tree.attach_no_dirty(parent, child);
    }

    fn register_meta(&mut self, id: NodeId, object: &AnyNode) {
        let rec = record_of(object);
        if let Some(anim) = &rec.anim {
            let binding = self.binding(id, anim);
            self.bindings.push(binding);
        }
        for collider in &rec.colliders {
            self.colliders
                .push((id, rec.group_index, collider_desc(collider, rec.content_size)));
        }
        if rec.widget.is_some() && !matches!(object, AnyNode::MotionStreak(_)) {
            self.anchors.push(id);
        }
        if matches!(object, AnyNode::Layout(_)) {
            self.layouts.push(id);
        }
    }

    fn binding(&self, target: NodeId, anim: &AnimationRef) -> BindingDesc {
        let clips = anim.clips.iter().map(|c| clip_from_record(target, c)).collect();
        BindingDesc {
            target,
            clips,
            default_clip: anim.default_clip.clone(),
            play_on_load: anim.play_on_load,
            attached_to_scene: self.attached_to_scene,
        }
    }

    fn frame(&self, name: &str) -> Option<&SpriteFrame> {
        self.staged.frame(name).or_else(|| self.remote.frame(name))
    }

    fn sprite_source(&self, name: Option<&str>) -> SpriteSource {
        let Some(name) = name else {
            return SpriteSource::Unset;
        };
        match self.frame(name) {
            Some(frame) => SpriteSource::Frame(frame.clone()),
            None => {
                log::warn!("{}", LookupMiss::SpriteFrame(name.to_string()));
                SpriteSource::Unset
            }
        }
    }

    fn path(&self, path: &Option<String>) -> Option<String> {
        path.as_deref().map(|p| self.settings.resolve_path(p))
    }

    fn instantiate(&self, object: &AnyNode) -> Result<Node, DecodeError> {
        let node = match object {
            AnyNode::Scene(rec) => Node::new(common(rec), NodeKind::Scene),
            AnyNode::Prefab(rec) => Node::new(common(rec), NodeKind::PrefabRoot),
            AnyNode::Node(rec) => Node::new(common(rec), NodeKind::Plain),
            AnyNode::Label(rec) => label(rec),
            AnyNode::Sprite(rec) => self.sprite(rec),
            AnyNode::TileMap(rec) => self.tile_map(rec)?,
            AnyNode::Particle(rec) => {
                let plist = rec.particle_filename.as_deref().ok_or(DecodeError::MissingField {
                    kind: "particle",
                    field: "particle_filename",
                })?;
                Node::new(
                    common(&rec.node),
                    NodeKind::Particle(Particle {
                        plist_file: self.settings.resolve_path(plist),
                        texture: self.path(&rec.texture_path),
                    }),
                )
            }
            AnyNode::Layout(rec) => Node::new(
                common(&rec.node),
                NodeKind::Layout(LayoutBox {
                    layout: LayoutNode::new(rec.layout.clone()),
                    scroll_view: None,
                }),
            ),
            AnyNode::RichText(rec) => self.rich_text(rec),
            AnyNode::ScrollView(rec) => Node::new(
                common(&rec.node),
                NodeKind::ScrollView(ScrollView {
                    direction: rec.direction,
                    bounce: rec.bounce_enabled,
                    recycle_elements: rec.recycle_elements,
                    inner_size: rec.inner_container_size,
                    inner_position: Vec2::ZERO,
                    motion: ScrollMotion::Still,
                    background: rec.background_image.as_deref().map(|image| Background {
                        image: self.settings.resolve_path(image),
                        scale9: rec.background_image_scale9,
                        color: rec.background_image_color,
                    }),
                }),
            ),
            AnyNode::ProgressBar(rec) => Node::new(
                common(&rec.node),
                NodeKind::ProgressBar(ProgressBar {
                    bar: self.sprite_source(rec.bar_sprite_frame_name.as_deref()),
                    bar_frame_name: rec.bar_sprite_frame_name.clone(),
                    bar_size: rec.bar_content_size,
                    sliced: rec.bar_sliced,
                    percent: rec.percent,
                    reverse: rec.reverse,
                    background: rec.background_sprite_frame_name.clone(),
                }),
            ),
            AnyNode::Button(rec) => self.button(rec),
            AnyNode::EditBox(rec) => Node::new(
                common(&rec.node),
                NodeKind::EditBox(EditBox {
                    background: self.path(&rec.background_image),
                    return_type: rec.return_type,
                    input_flag: rec.input_flag,
                    input_mode: rec.input_mode,
                    font_size: rec.font_size,
                    font_color: rec.font_color,
                    placeholder: rec.placeholder.clone(),
                    placeholder_font_size: rec.placeholder_font_size,
                    placeholder_font_color: rec.placeholder_font_color,
                    max_length: rec.max_length,
                    text: rec.text.clone(),
                }),
            ),
            AnyNode::Slider(rec) => Node::new(
                common(&rec.node),
                NodeKind::Slider(Slider {
                    percent: rec.percent,
                    bar_texture: self.path(&rec.bar_texture),
                    ball_normal: self.path(&rec.ball_normal),
                    ball_pressed: self.path(&rec.ball_pressed),
                    ball_disabled: self.path(&rec.ball_disabled),
                    bar_size: rec.bar_size,
                }),
            ),
            AnyNode::Toggle(rec) => Node::new(common(&rec.node), NodeKind::Toggle(toggle(rec))),
            AnyNode::ToggleGroup(rec) => Node::new(
                common(&rec.node),
                NodeKind::ToggleGroup(ToggleGroup {
                    allow_switch_off: rec.allow_switch_off,
                }),
            ),
            AnyNode::PageView(rec) => Node::new(
                common(&rec.node),
                NodeKind::PageView(PageView {
                    direction: rec.direction,
                    inertia: rec.inertia,
                    bounce: rec.bounce_enabled,
                    indicator: rec.indicator.as_ref().map(|i| PageIndicator {
                        position: i.position,
                        spacing: i.spacing,
                        cell_size: i.cell_size,
                        color: i.color,
                    }),
                    background: rec.background.clone(),
                }),
            ),
            AnyNode::Mask(rec) => {
                if rec.mask_type == MaskType::ImageStencil && rec.sprite_frame_name.is_none() {
                    return Err(DecodeError::MissingField {
                        kind: "mask",
                        field: "sprite_frame_name",
                    });
                }
                Node::new(
                    common(&rec.node),
                    NodeKind::Mask(Mask {
                        mask_type: rec.mask_type,
                        inverted: rec.inverted,
                        segments: rec.segments,
                        alpha_threshold: rec.alpha_threshold,
                        frame_name: rec.sprite_frame_name.clone(),
                        stencil: self.sprite_source(rec.sprite_frame_name.as_deref()),
                    }),
                )
            }
            AnyNode::MotionStreak(rec) => {
                let mut common = common(&rec.node);
                common.opacity = 255;
                common.widget = None;
                Node::new(
                    common,
                    NodeKind::MotionStreak(MotionStreak {
                        fade_time: rec.time_to_fade,
                        min_segment: rec.min_seg,
                        stroke_width: rec.stroke_width,
                        color: rec.color,
                        texture: self.path(&rec.texture_path),
                        fast_mode: rec.fast_mode,
                    }),
                )
            }
            AnyNode::VideoPlayer(rec) => Node::new(
                common(&rec.node),
                NodeKind::VideoPlayer(VideoPlayer {
                    url: rec.url.clone(),
                    is_local: rec.is_local,
                    full_screen: rec.full_screen_enabled,
                    keep_aspect: rec.keep_aspect_ratio_enabled,
                }),
            ),
            AnyNode::WebView(rec) => Node::new(
                common(&rec.node),
                NodeKind::WebView(WebView {
                    url: rec.url.clone(),
                }),
            ),
        };
        Ok(node)
    }

    fn sprite(&self, rec: &SpriteRecord) -> Node {
        let fill = match (rec.sprite_type, &rec.fill) {
            (SpriteType::Filled, Some(f)) => Some(Fill {
                fill_type: f.fill_type,
                center: f.center,
                start: f.start,
                range: f.range,
                percentage: f.range * 100.0,
            }),
            _ => None,
        };
        Node::new(
            common(&rec.node),
            NodeKind::Sprite(Sprite {
                frame_name: rec.sprite_frame_name.clone(),
                source: self.sprite_source(rec.sprite_frame_name.as_deref()),
                sprite_type: rec.sprite_type,
                size_mode: rec.size_mode,
                trim: rec.trim_enabled,
                fill,
            }),
        )
    }

    fn tile_map(&self, rec: &TileMapRecord) -> Result<Node, DecodeError> {
        let tmx = rec.tmx_filename.as_deref().ok_or(DecodeError::MissingField {
            kind: "tilemap",
            field: "tmx_filename",
        })?;
        let mut common = common(&rec.node);
        if let Some(desired) = rec.desired_content_size {
            let current = common.size;
            if current.width > 0.0 {
                common.scale.x *= desired.width / current.width;
            }
            if current.height > 0.0 {
                common.scale.y *= desired.height / current.height;
            }
        }
        Ok(Node::new(
            common,
            NodeKind::TileMap(TileMap {
                tmx_file: self.settings.resolve_path(tmx),
                desired_size: rec.desired_content_size,
            }),
        ))
    }

    fn rich_text(&self, rec: &RichTextRecord) -> Node {
        let markup = rec.text.clone().unwrap_or_default();
        let parsed = self.rich_text.parse(&markup, rec.font_size, rec.max_width);
        let mut common = common(&rec.node);
        common.size.width = if rec.max_width > 0.0 {
            rec.max_width
        } else {
            parsed.width.max(common.size.width)
        };
        Node::new(
            common,
            NodeKind::RichText(RichText {
                markup,
                font_size: rec.font_size,
                font_file: self.path(&rec.font_filename),
                max_width: rec.max_width,
                line_height: rec.line_height,
                horizontal_align: rec.horizontal_align,
                runs: parsed.runs,
            }),
        )
    }

    fn button(&self, rec: &ButtonRecord) -> Node {
        let normal = rec.sprite_frame_name.as_deref();
        let pressed = rec.pressed_sprite_frame_name.as_deref().or(normal);
        let disabled = rec.disabled_sprite_frame_name.as_deref().or(normal);
        Node::new(
            common(&rec.node),
            NodeKind::Button(Button {
                normal: self.sprite_source(normal),
                pressed: self.sprite_source(pressed),
                disabled: self.sprite_source(disabled),
                frame_names: [
                    rec.sprite_frame_name.clone(),
                    rec.pressed_sprite_frame_name.clone(),
                    rec.disabled_sprite_frame_name.clone(),
                ],
                transition: rec.transition,
                duration: rec.duration,
                zoom_scale: rec.zoom_scale,
                colors: ButtonColors {
                    normal: rec.normal_color,
                    pressed: rec.pressed_color,
                    hover: rec.hover_color,
                    disabled: rec.disabled_color,
                },
                interactable: rec.enabled,
                ignore_content_adapt: rec.ignore_content_adapt_with_size,
                title: None,
            }),
        )
    }
}

/// Shared transform and paint fields.
fn common(rec: &NodeRecord) -> NodeCommon {
    let position = rec.position.unwrap_or(Vec2::ZERO);
    NodeCommon {
        name: rec.name.clone().unwrap_or_default(),
        tag: rec.tag,
        local_z: rec.local_z_order,
        global_z: rec.global_z_order,
        position,
        authoring_position: position,
        rotation_skew: Vec2::new(rec.rotation_skew_x, rec.rotation_skew_y),
        scale: Vec2::new(rec.scale_x, rec.scale_y),
        skew: Vec2::new(rec.skew_x, rec.skew_y),
        anchor: rec.anchor_point.unwrap_or(Vec2::new(0.5, 0.5)),
        size: rec.content_size.unwrap_or(Size::ZERO),
        color: rec.color.unwrap_or_default(),
        opacity: rec.opacity,
        cascade_opacity: rec.cascade_opacity_enabled,
        opacity_modify_rgb: rec.opacity_modify_rgb,
        visible: rec.enabled,
        group_index: rec.group_index,
        widget: rec.widget.clone(),
        embedded: false,
    }
}

fn label(rec: &LabelRecord) -> Node {
    let mut common = common(&rec.node);
    let mut label = Label {
        text: rec.text.clone(),
        font_name: rec.font_name.clone(),
        font_size: rec.font_size,
        font_type: rec.font_type,
        line_height: rec.line_height,
        horizontal_align: rec.horizontal_align,
        vertical_align: rec.vertical_align,
        overflow: rec.overflow,
        wrap: rec.enable_wrap,
        outline: rec.outline.as_ref().map(|o| Outline {
            color: o.color,
            width: o.width,
        }),
        shadow: rec.shadow.as_ref().map(|s| Shadow {
            color: s.color,
            offset: s.offset,
            blur: s.blur,
        }),
        text_color: None,
    };
    // Effects tint the glyphs through the text color; the node paint stays neutral.
    if label.has_effect() {
        label.text_color = Some(common.color.with_alpha(common.opacity));
        common.color = scenery_api_core::Color3::WHITE;
        common.opacity = 255;
    }
    Node::new(common, NodeKind::Label(label))
}

fn toggle(rec: &ToggleRecord) -> Toggle {
    Toggle {
        checked: rec.is_checked && (rec.interactable || !rec.enable_auto_gray_effect),
        interactable: rec.interactable,
        auto_gray: rec.enable_auto_gray_effect,
        zoom_scale: rec.zoom_scale,
        background: rec.background_sprite_frame_name.clone(),
        checkmark: rec.checkmark_sprite_frame_name.clone(),
    }
}

fn collider_desc(rec: &ColliderRecord, content: Option<Size>) -> ColliderDesc {
    let shape = match rec.kind {
        ColliderKind::Circle => ColliderShape::Circle { radius: rec.radius },
        ColliderKind::Box => ColliderShape::Box {
            size: rec.size.or(content).unwrap_or(Size::ZERO),
        },
        ColliderKind::Polygon => ColliderShape::Polygon {
            points: rec.points.clone(),
        },
    };
    ColliderDesc {
        offset: rec.offset,
        shape,
    }
}

fn clip_from_record(target: NodeId, rec: &ClipRecord) -> AnimationClip {
    let curves = rec
        .curves
        .iter()
        .filter_map(|curve| {
            let path = match NodePath::parse(curve.path.as_deref().unwrap_or("")) {
                Ok(path) => path,
                Err(err) => {
                    log::warn!("clip '{}' on {target}: {err}", rec.name);
                    return None;
                }
            };
            Some(CurveSet {
                path,
                tracks: curve.props.to_tracks(),
            })
        })
        .collect();
    AnimationClip {
        name: rec.name.clone(),
        duration: rec.duration,
        speed: rec.speed,
        sample: rec.sample,
        wrap_mode: rec.wrap_mode,
        curves,
    }
}

pub(crate) fn record_of(object: &AnyNode) -> &NodeRecord {
    match object {
        AnyNode::Scene(rec) | AnyNode::Prefab(rec) | AnyNode::Node(rec) => rec,
        AnyNode::Label(r) => &r.node,
        AnyNode::Sprite(r) => &r.node,
        AnyNode::TileMap(r) => &r.node,
        AnyNode::Particle(r) => &r.node,
        AnyNode::Layout(r) => &r.node,
        AnyNode::RichText(r) => &r.node,
        AnyNode::ScrollView(r) => &r.node,
        AnyNode::ProgressBar(r) => &r.node,
        AnyNode::Button(r) => &r.node,
        AnyNode::EditBox(r) => &r.node,
        AnyNode::Slider(r) => &r.node,
        AnyNode::Toggle(r) => &r.node,
        AnyNode::ToggleGroup(r) => &r.node,
        AnyNode::PageView(r) => &r.node,
        AnyNode::Mask(r) => &r.node,
        AnyNode::MotionStreak(r) => &r.node,
        AnyNode::VideoPlayer(r) => &r.node,
        AnyNode::WebView(r) => &r.node,
    }
}

/// Children stored inside the parent's record rather than in the tree.
fn embedded_children(object: &AnyNode) -> Vec<AnyNode> {
    match object {
        AnyNode::ToggleGroup(g) => g.toggles.iter().cloned().map(AnyNode::Toggle).collect(),
        AnyNode::PageView(p) => p.pages.iter().cloned().map(AnyNode::Sprite).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{ColliderSet, PlainTextParser};
    use scenery_api_core::{Color3, Rect};

    struct Fixture {
        settings: DecodeSettings,
        frames: FrameTable,
        collisions: ColliderSet,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                settings: DecodeSettings::default(),
                frames: FrameTable::new(),
                collisions: ColliderSet::default(),
            }
        }

        fn decode(&mut self, doc: Document) -> Result<(SceneTree, DecodedDocument), DecodeError> {
            let parser = PlainTextParser;
            let mut ctx =
                DecodeContext::new(&self.settings, &mut self.frames, &mut self.collisions, &parser);
            let mut tree = SceneTree::new();
            let out = decode(&doc.to_bytes().expect("serialize"), &mut ctx, &mut tree)?;
            Ok((tree, out))
        }
    }

    fn scene(children: Vec<NodeTree>) -> Document {
        Document::new(NodeTree::with_children(
            AnyNode::Scene(NodeRecord::named("scene")),
            children,
        ))
    }

    fn frame_record(name: &str) -> SpriteFrameRecord {
        SpriteFrameRecord {
            name: name.into(),
            texture_path: format!("{name}.png"),
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            offset: Vec2::ZERO,
            rotated: false,
            original_size: Size::new(10.0, 10.0),
            centre_rect: None,
        }
    }

    #[test]
    fn rejects_non_scene_root() {
        let doc = Document::new(NodeTree::leaf(AnyNode::Node(NodeRecord::default())));
        let err = Fixture::new().decode(doc).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedRoot { found: "node" }));
    }

    #[test]
    fn truncated_buffer_is_malformed() {
        let bytes = scene(vec![]).to_bytes().unwrap();
        let mut fx = Fixture::new();
        let parser = PlainTextParser;
        let mut ctx = DecodeContext::new(&fx.settings, &mut fx.frames, &mut fx.collisions, &parser);
        let mut tree = SceneTree::new();
        let err = decode(&bytes[..bytes.len() / 2], &mut ctx, &mut tree).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn missing_tmx_is_fatal_and_commits_nothing() {
        let mut doc = scene(vec![NodeTree::leaf(AnyNode::TileMap(TileMapRecord {
            node: NodeRecord::named("map"),
            tmx_filename: None,
            desired_content_size: None,
        }))]);
        doc.sprite_frames.push(frame_record("hero"));
        doc.collision_matrix = vec![vec![true]];
        let mut fx = Fixture::new();
        let parser = PlainTextParser;
        let mut ctx = DecodeContext::new(&fx.settings, &mut fx.frames, &mut fx.collisions, &parser);
        let mut tree = SceneTree::new();
        let err = decode(&doc.to_bytes().unwrap(), &mut ctx, &mut tree).unwrap_err();
        assert!(tree.is_empty());
        assert!(matches!(
            err,
            DecodeError::MissingField {
                kind: "tilemap",
                field: "tmx_filename"
            }
        ));
        assert!(fx.frames.is_empty());
        assert!(fx.collisions.matrix.is_empty());
    }

    #[test]
    fn overly_deep_hierarchy_is_rejected_and_rolled_back() {
        let mut chain = NodeTree::leaf(AnyNode::Node(NodeRecord::named("leaf")));
        // Leaf ends up exactly at the deepest allowed level.
        for _ in 1..MAX_NODE_DEPTH {
            chain = NodeTree::with_children(AnyNode::Node(NodeRecord::named("n")), vec![chain]);
        }
        let mut fx = Fixture::new();
        let (tree, _) = fx.decode(scene(vec![chain.clone()])).expect("at the limit");
        assert_eq!(tree.len(), MAX_NODE_DEPTH + 1);

        let deeper = NodeTree::with_children(AnyNode::Node(NodeRecord::named("n")), vec![chain]);
        let parser = PlainTextParser;
        let mut ctx = DecodeContext::new(&fx.settings, &mut fx.frames, &mut fx.collisions, &parser);
        let mut tree = SceneTree::new();
        let bytes = scene(vec![deeper]).to_bytes().unwrap();
        let err = decode(&bytes, &mut ctx, &mut tree).unwrap_err();
        assert!(matches!(err, DecodeError::TooDeep { limit: MAX_NODE_DEPTH }));
        assert!(tree.is_empty());
    }

    #[test]
    fn missing_sprite_frame_is_tolerated() {
        let doc = scene(vec![NodeTree::leaf(AnyNode::Sprite(SpriteRecord::new(
            NodeRecord::named("s"),
            Some("nowhere"),
        )))]);
        let (tree, out) = Fixture::new().decode(doc).unwrap();
        let sprite = tree.children(out.root)[0];
        match &tree.get(sprite).unwrap().kind {
            NodeKind::Sprite(s) => {
                assert_eq!(s.source, SpriteSource::Unset);
                assert_eq!(s.frame_name.as_deref(), Some("nowhere"));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn document_frames_resolve_and_register() {
        let mut doc = scene(vec![NodeTree::leaf(AnyNode::Sprite(SpriteRecord::new(
            NodeRecord::named("s"),
            Some("hero"),
        )))]);
        doc.sprite_frames.push(frame_record("hero"));
        let mut fx = Fixture::new();
        fx.settings.sprite_rect_scale = 2.0;
        let (tree, out) = fx.decode(doc).unwrap();
        let sprite = tree.children(out.root)[0];
        match &tree.get(sprite).unwrap().kind {
            NodeKind::Sprite(s) => match &s.source {
                SpriteSource::Frame(f) => assert_eq!(f.rect.size, Size::new(20.0, 20.0)),
                other => panic!("unexpected source {other:?}"),
            },
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(fx.frames.len(), 1);
    }

    #[test]
    fn button_takes_first_label_as_title() {
        let button = NodeTree::with_children(
            AnyNode::Button(ButtonRecord::new(NodeRecord::named("ok"), None)),
            vec![
                NodeTree::leaf(AnyNode::Label(LabelRecord::new(NodeRecord::named("caption"), "OK"))),
                NodeTree::leaf(AnyNode::Label(LabelRecord::new(NodeRecord::named("badge"), "!"))),
            ],
        );
        let (tree, out) = Fixture::new().decode(scene(vec![button])).unwrap();
        let button = tree.children(out.root)[0];
        let children = tree.children(button);
        assert_eq!(children.len(), 1);
        assert_eq!(tree.get(children[0]).unwrap().name(), "badge");
        match &tree.get(button).unwrap().kind {
            NodeKind::Button(b) => {
                let title = b.title.expect("title");
                assert_eq!(tree.get(title).unwrap().name(), "caption");
                assert_eq!(tree.parent(title), Some(button));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn layout_children_are_attached_then_marked_dirty_once() {
        let layout = NodeTree::with_children(
            AnyNode::Layout(LayoutRecord {
                node: NodeRecord::named("row"),
                layout: scenery_layout_core::LayoutConfig::horizontal(),
            }),
            vec![
                NodeTree::leaf(AnyNode::Node(NodeRecord::named("a"))),
                NodeTree::leaf(AnyNode::Node(NodeRecord::named("b"))),
            ],
        );
        let view = NodeTree::with_children(
            AnyNode::ScrollView(ScrollViewRecord {
                node: NodeRecord::named("view"),
                background_image: None,
                background_image_scale9: false,
                background_image_color: Color3::WHITE,
                direction: scenery_layout_core::ScrollDirection::Vertical,
                bounce_enabled: true,
                inner_container_size: Size::new(100.0, 400.0),
                recycle_elements: true,
            }),
            vec![layout],
        );
        let (tree, out) = Fixture::new().decode(scene(vec![view])).unwrap();
        assert_eq!(out.layouts.len(), 1);
        let row = out.layouts[0];
        let node = tree.get(row).unwrap();
        assert_eq!(node.children().len(), 2);
        let layout = node.as_layout().unwrap();
        assert!(layout.layout.is_dirty());
        assert_eq!(layout.scroll_view, tree.parent(row));
    }

    #[test]
    fn label_effects_move_paint_into_text_color() {
        let mut rec = NodeRecord::named("l");
        rec.color = Some(Color3::new(10, 20, 30));
        rec.opacity = 128;
        let mut label = LabelRecord::new(rec, "hi");
        label.shadow = Some(ShadowRecord {
            color: Default::default(),
            offset: Vec2::new(2.0, -2.0),
            blur: 1,
        });
        let (tree, out) = Fixture::new()
            .decode(scene(vec![NodeTree::leaf(AnyNode::Label(label))]))
            .unwrap();
        let node = tree.get(tree.children(out.root)[0]).unwrap();
        assert_eq!(node.common.color, Color3::WHITE);
        assert_eq!(node.common.opacity, 255);
        match &node.kind {
            NodeKind::Label(l) => assert_eq!(l.text_color, Some(Color3::new(10, 20, 30).with_alpha(128))),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn embedded_toggles_become_children() {
        let mut locked = ToggleRecord::new(NodeRecord::named("locked"), true);
        locked.interactable = false;
        locked.enable_auto_gray_effect = true;
        let group = AnyNode::ToggleGroup(ToggleGroupRecord {
            node: NodeRecord::named("group"),
            allow_switch_off: false,
            toggles: vec![ToggleRecord::new(NodeRecord::named("on"), true), locked],
        });
        let (tree, out) = Fixture::new().decode(scene(vec![NodeTree::leaf(group)])).unwrap();
        let group = tree.children(out.root)[0];
        let checked: Vec<bool> = tree
            .children(group)
            .iter()
            .map(|id| {
                let node = tree.get(*id).unwrap();
                assert!(node.common.embedded);
                match &node.kind {
                    NodeKind::Toggle(t) => t.checked,
                    other => panic!("unexpected kind {other:?}"),
                }
            })
            .collect();
        assert_eq!(checked, vec![true, false]);
    }

    #[test]
    fn prefab_bindings_are_detached_from_scene() {
        let mut rec = NodeRecord::named("blink");
        rec.anim = Some(AnimationRef {
            play_on_load: true,
            default_clip: Some("fade".into()),
            clips: vec![ClipRecord {
                name: "fade".into(),
                duration: 1.0,
                speed: 1.0,
                sample: 60,
                wrap_mode: scenery_animation_core::WrapMode::Loop,
                curves: vec![CurveRecord {
                    path: None,
                    props: AnimProps {
                        opacity: vec![Key::new(0.0, 255.0), Key::new(1.0, 0.0)],
                        ..AnimProps::default()
                    },
                }],
            }],
        });
        let doc = Document::new(NodeTree::with_children(
            AnyNode::Prefab(NodeRecord::default()),
            vec![NodeTree::leaf(AnyNode::Node(rec))],
        ));
        let (_tree, out) = Fixture::new().decode(doc).unwrap();
        assert!(out.is_prefab);
        assert_eq!(out.bindings.len(), 1);
        assert!(!out.bindings[0].attached_to_scene);
        assert_eq!(out.bindings[0].clips[0].curves[0].path, NodePath::root());
    }

    #[test]
    fn empty_prefab_is_rejected() {
        let doc = Document::new(NodeTree::leaf(AnyNode::Prefab(NodeRecord::default())));
        assert!(matches!(
            Fixture::new().decode(doc),
            Err(DecodeError::EmptyPrefab)
        ));
    }
}
