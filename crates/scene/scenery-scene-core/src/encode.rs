//! Re-serialize a decoded tree into the document schema.
//!
//! Animation and collider metadata live in their own registries after decoding and
//! are not written back.

use crate::document::*;
use crate::error::EncodeError;
use crate::node::*;
use crate::tree::SceneTree;
use scenery_api_core::NodeId;

pub fn encode(tree: &SceneTree, root: NodeId, header: &DocumentHeader) -> Result<Vec<u8>, EncodeError> {
    let doc = to_document(tree, root, header)?;
    Ok(doc.to_bytes()?)
}

pub fn to_document(
    tree: &SceneTree,
    root: NodeId,
    header: &DocumentHeader,
) -> Result<Document, EncodeError> {
    Ok(Document::from_parts(header.clone(), node_tree(tree, root)?))
}

fn node_tree(tree: &SceneTree, id: NodeId) -> Result<NodeTree, EncodeError> {
    let node = tree.get(id).ok_or(EncodeError::UnknownNode(id))?;
    let mut embedded = Vec::new();
    let mut children = Vec::new();
    if let NodeKind::Button(Button { title: Some(title), .. }) = &node.kind {
        children.push(node_tree(tree, *title)?);
    }
    for child in node.children() {
        let child_node = tree.get(*child).ok_or(EncodeError::UnknownNode(*child))?;
        if child_node.common.embedded {
            embedded.push(record(child_node, Vec::new()));
        } else {
            children.push(node_tree(tree, *child)?);
        }
    }
    Ok(NodeTree::with_children(record(node, embedded), children))
}

fn node_record(common: &NodeCommon) -> NodeRecord {
    NodeRecord {
        name: Some(common.name.clone()),
        tag: common.tag,
        local_z_order: common.local_z,
        global_z_order: common.global_z,
        position: Some(common.authoring_position),
        rotation_skew_x: common.rotation_skew.x,
        rotation_skew_y: common.rotation_skew.y,
        scale_x: common.scale.x,
        scale_y: common.scale.y,
        skew_x: common.skew.x,
        skew_y: common.skew.y,
        anchor_point: Some(common.anchor),
        content_size: Some(common.size),
        color: Some(common.color),
        opacity: common.opacity,
        cascade_opacity_enabled: common.cascade_opacity,
        opacity_modify_rgb: common.opacity_modify_rgb,
        enabled: common.visible,
        group_index: common.group_index,
        anim: None,
        colliders: Vec::new(),
        widget: common.widget.clone(),
    }
}

fn sprite_record(node: &NodeRecord, sprite: &Sprite) -> SpriteRecord {
    SpriteRecord {
        node: node.clone(),
        sprite_frame_name: sprite.frame_name.clone(),
        sprite_type: sprite.sprite_type,
        size_mode: sprite.size_mode,
        trim_enabled: sprite.trim,
        fill: sprite.fill.map(|f| FillRecord {
            fill_type: f.fill_type,
            center: f.center,
            start: f.start,
            range: f.range,
        }),
    }
}

fn toggle_record(node: NodeRecord, toggle: &Toggle) -> ToggleRecord {
    ToggleRecord {
        node,
        is_checked: toggle.checked,
        interactable: toggle.interactable,
        enable_auto_gray_effect: toggle.auto_gray,
        zoom_scale: toggle.zoom_scale,
        background_sprite_frame_name: toggle.background.clone(),
        checkmark_sprite_frame_name: toggle.checkmark.clone(),
    }
}

/// `embedded` holds the records of children folded into this node's own record.
fn record(node: &Node, embedded: Vec<AnyNode>) -> AnyNode {
    let mut rec = node_record(&node.common);
    match &node.kind {
        NodeKind::Scene => AnyNode::Scene(rec),
        NodeKind::PrefabRoot => AnyNode::Prefab(rec),
        NodeKind::Plain => AnyNode::Node(rec),
        NodeKind::Label(l) => {
            if let Some(text) = l.text_color {
                rec.color = Some(text.rgb());
                rec.opacity = text.a;
            }
            AnyNode::Label(LabelRecord {
                node: rec,
                text: l.text.clone(),
                font_name: l.font_name.clone(),
                font_size: l.font_size,
                font_type: l.font_type,
                line_height: l.line_height,
                horizontal_align: l.horizontal_align,
                vertical_align: l.vertical_align,
                overflow: l.overflow,
                enable_wrap: l.wrap,
                outline: l.outline.map(|o| OutlineRecord {
                    color: o.color,
                    width: o.width,
                }),
                shadow: l.shadow.map(|s| ShadowRecord {
                    color: s.color,
                    offset: s.offset,
                    blur: s.blur,
                }),
            })
        }
        NodeKind::Sprite(s) => AnyNode::Sprite(sprite_record(&rec, s)),
        NodeKind::TileMap(t) => AnyNode::TileMap(TileMapRecord {
            node: rec,
            tmx_filename: Some(t.tmx_file.clone()),
            desired_content_size: t.desired_size,
        }),
        NodeKind::Particle(p) => AnyNode::Particle(ParticleRecord {
            node: rec,
            particle_filename: Some(p.plist_file.clone()),
            texture_path: p.texture.clone(),
        }),
        NodeKind::Layout(l) => AnyNode::Layout(LayoutRecord {
            node: rec,
            layout: l.layout.config.clone(),
        }),
        NodeKind::RichText(r) => AnyNode::RichText(RichTextRecord {
            node: rec,
            text: Some(r.markup.clone()),
            font_size: r.font_size,
            font_filename: r.font_file.clone(),
            max_width: r.max_width,
            line_height: r.line_height,
            horizontal_align: r.horizontal_align,
        }),
        NodeKind::ScrollView(s) => AnyNode::ScrollView(ScrollViewRecord {
            node: rec,
            background_image: s.background.as_ref().map(|b| b.image.clone()),
            background_image_scale9: s.background.as_ref().is_some_and(|b| b.scale9),
            background_image_color: s
                .background
                .as_ref()
                .map(|b| b.color)
                .unwrap_or_default(),
            direction: s.direction,
            bounce_enabled: s.bounce,
            inner_container_size: s.inner_size,
            recycle_elements: s.recycle_elements,
        }),
        NodeKind::ProgressBar(p) => AnyNode::ProgressBar(ProgressBarRecord {
            node: rec,
            bar_sprite_frame_name: p.bar_frame_name.clone(),
            bar_sliced: p.sliced,
            bar_content_size: p.bar_size,
            percent: p.percent,
            reverse: p.reverse,
            background_sprite_frame_name: p.background.clone(),
        }),
        NodeKind::Button(b) => {
            let [normal, pressed, disabled] = b.frame_names.clone();
            AnyNode::Button(ButtonRecord {
                node: rec,
                sprite_frame_name: normal,
                pressed_sprite_frame_name: pressed,
                disabled_sprite_frame_name: disabled,
                transition: b.transition,
                duration: b.duration,
                zoom_scale: b.zoom_scale,
                normal_color: b.colors.normal,
                pressed_color: b.colors.pressed,
                hover_color: b.colors.hover,
                disabled_color: b.colors.disabled,
                enabled: b.interactable,
                ignore_content_adapt_with_size: b.ignore_content_adapt,
            })
        }
        NodeKind::EditBox(e) => AnyNode::EditBox(EditBoxRecord {
            node: rec,
            background_image: e.background.clone(),
            return_type: e.return_type,
            input_flag: e.input_flag,
            input_mode: e.input_mode,
            font_size: e.font_size,
            font_color: e.font_color,
            placeholder: e.placeholder.clone(),
            placeholder_font_size: e.placeholder_font_size,
            placeholder_font_color: e.placeholder_font_color,
            max_length: e.max_length,
            text: e.text.clone(),
        }),
        NodeKind::Slider(s) => AnyNode::Slider(SliderRecord {
            node: rec,
            percent: s.percent,
            bar_texture: s.bar_texture.clone(),
            ball_normal: s.ball_normal.clone(),
            ball_pressed: s.ball_pressed.clone(),
            ball_disabled: s.ball_disabled.clone(),
            bar_size: s.bar_size,
        }),
        NodeKind::Toggle(t) => AnyNode::Toggle(toggle_record(rec, t)),
        NodeKind::ToggleGroup(g) => AnyNode::ToggleGroup(ToggleGroupRecord {
            node: rec,
            allow_switch_off: g.allow_switch_off,
            toggles: embedded
                .into_iter()
                .filter_map(|e| match e {
                    AnyNode::Toggle(t) => Some(t),
                    _ => None,
                })
                .collect(),
        }),
        NodeKind::PageView(p) => AnyNode::PageView(PageViewRecord {
            node: rec,
            direction: p.direction,
            inertia: p.inertia,
            bounce_enabled: p.bounce,
            indicator: p.indicator.as_ref().map(|i| PageIndicatorRecord {
                position: i.position,
                spacing: i.spacing,
                cell_size: i.cell_size,
                color: i.color,
            }),
            background: p.background.clone(),
            pages: embedded
                .into_iter()
                .filter_map(|e| match e {
                    AnyNode::Sprite(s) => Some(s),
                    _ => None,
                })
                .collect(),
        }),
        NodeKind::Mask(m) => AnyNode::Mask(MaskRecord {
            node: rec,
            mask_type: m.mask_type,
            inverted: m.inverted,
            segments: m.segments,
            alpha_threshold: m.alpha_threshold,
            sprite_frame_name: m.frame_name.clone(),
        }),
        NodeKind::MotionStreak(m) => AnyNode::MotionStreak(MotionStreakRecord {
            node: rec,
            time_to_fade: m.fade_time,
            min_seg: m.min_segment,
            stroke_width: m.stroke_width,
            color: m.color,
            texture_path: m.texture.clone(),
            fast_mode: m.fast_mode,
        }),
        NodeKind::VideoPlayer(v) => AnyNode::VideoPlayer(VideoPlayerRecord {
            node: rec,
            url: v.url.clone(),
            is_local: v.is_local,
            full_screen_enabled: v.full_screen,
            keep_aspect_ratio_enabled: v.keep_aspect,
        }),
        NodeKind::WebView(w) => AnyNode::WebView(WebViewRecord {
            node: rec,
            url: w.url.clone(),
        }),
    }
}
