//! [`AnimationHost`] over a [`SceneTree`].

use crate::collab::SpriteFrameResolver;
use crate::node::{NodeKind, SpriteSource};
use crate::tree::SceneTree;
use scenery_animation_core::{AnimationHost, PropertyKind};
use scenery_api_core::{Color3, NodeId, NodePath, Value, Vec2};

pub struct SceneHost<'a> {
    tree: &'a mut SceneTree,
    frames: &'a dyn SpriteFrameResolver,
}

impl<'a> SceneHost<'a> {
    pub fn new(tree: &'a mut SceneTree, frames: &'a dyn SpriteFrameResolver) -> Self {
        Self { tree, frames }
    }

    /// Children's runtime positions depend on this node's anchor and size.
    fn refresh_children(&mut self, id: NodeId) {
        for child in self.tree.children(id).to_vec() {
            if let Some(p) = self.tree.get(child).map(|n| n.common.authoring_position) {
                self.tree.set_authoring_position(child, p);
            }
        }
    }

    fn sprite_source(&self, name: &str) -> SpriteSource {
        match self.frames.frame(name) {
            Some(frame) => SpriteSource::Frame(frame.clone()),
            None => SpriteSource::Texture(name.to_string()),
        }
    }

    fn set_opacity(&mut self, id: NodeId, opacity: u8) -> bool {
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        node.common.opacity = opacity;
        if let NodeKind::Label(label) = &mut node.kind {
            if let Some(text) = label.text_color.as_mut() {
                text.a = opacity;
                node.common.color = Color3::WHITE;
            }
        }
        true
    }

    fn set_color(&mut self, id: NodeId, color: Color3) -> bool {
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        match &mut node.kind {
            NodeKind::Label(label) if label.text_color.is_some() => {
                label.text_color = Some(color.with_alpha(node.common.opacity));
            }
            _ => node.common.color = color,
        }
        true
    }

    fn set_frame(&mut self, id: NodeId, name: &str) -> bool {
        let source = self.sprite_source(name);
        let Some(node) = self.tree.get_mut(id) else {
            return false;
        };
        match &mut node.kind {
            NodeKind::Sprite(sprite) => {
                sprite.frame_name = Some(name.to_string());
                sprite.source = source;
                true
            }
            NodeKind::Button(button) => {
                button.frame_names[0] = Some(name.to_string());
                button.normal = source;
                true
            }
            _ => false,
        }
    }

    fn with_common(&mut self, id: NodeId, f: impl FnOnce(&mut crate::node::NodeCommon)) -> bool {
        match self.tree.get_mut(id) {
            Some(node) => {
                f(&mut node.common);
                true
            }
            None => false,
        }
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl AnimationHost for SceneHost<'_> {
    fn resolve(&self, root: NodeId, path: &NodePath) -> Option<NodeId> {
        self.tree.find_path(root, path)
    }

    fn apply(&mut self, target: NodeId, property: PropertyKind, value: &Value) -> bool {
        let Some(authoring) = self.tree.get(target).map(|n| n.common.authoring_position) else {
            return false;
        };
        match property {
            PropertyKind::Position => match value.as_vec2() {
                Some(v) => {
                    self.tree.set_authoring_position(target, Vec2::from(v));
                    true
                }
                None => false,
            },
            PropertyKind::PositionX | PropertyKind::PositionY => {
                let Some(v) = value.as_float() else {
                    return false;
                };
                let pos = if property == PropertyKind::PositionX {
                    Vec2::new(v, authoring.y)
                } else {
                    Vec2::new(authoring.x, v)
                };
                self.tree.set_authoring_position(target, pos);
                true
            }
            PropertyKind::Color => match value.as_rgb() {
                Some(c) => self.set_color(target, Color3::from_channels(c)),
                None => false,
            },
            PropertyKind::Opacity => match value.as_float() {
                Some(v) => self.set_opacity(target, to_u8(v)),
                None => false,
            },
            PropertyKind::Rotation => match value.as_float() {
                // Authored rotation turns the opposite way.
                Some(v) => self.with_common(target, |c| c.rotation_skew = Vec2::new(-v, -v)),
                None => false,
            },
            PropertyKind::ScaleX => match value.as_float() {
                Some(v) => self.with_common(target, |c| c.scale.x = v),
                None => false,
            },
            PropertyKind::ScaleY => match value.as_float() {
                Some(v) => self.with_common(target, |c| c.scale.y = v),
                None => false,
            },
            PropertyKind::SkewX => match value.as_float() {
                Some(v) => self.with_common(target, |c| c.skew.x = v),
                None => false,
            },
            PropertyKind::SkewY => match value.as_float() {
                Some(v) => self.with_common(target, |c| c.skew.y = v),
                None => false,
            },
            PropertyKind::AnchorX | PropertyKind::AnchorY => {
                let Some(v) = value.as_float() else {
                    return false;
                };
                let x = property == PropertyKind::AnchorX;
                self.with_common(target, |c| {
                    if x {
                        c.anchor.x = v
                    } else {
                        c.anchor.y = v
                    }
                });
                self.refresh_children(target);
                true
            }
            PropertyKind::Width | PropertyKind::Height => {
                let Some(v) = value.as_float() else {
                    return false;
                };
                let Some(mut size) = self.tree.get(target).map(|n| n.common.size) else {
                    return false;
                };
                if property == PropertyKind::Width {
                    size.width = v;
                } else {
                    size.height = v;
                }
                self.tree.set_content_size(target, size);
                self.refresh_children(target);
                true
            }
            PropertyKind::Active => match value.as_bool() {
                Some(b) => {
                    self.tree.set_visible(target, b);
                    true
                }
                None => false,
            },
            PropertyKind::SpriteFrame => match value.as_text() {
                Some(name) => self.set_frame(target, name),
                None => false,
            },
        }
    }
}
