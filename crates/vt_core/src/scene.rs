//! Layer tree (scene graph).
//!
//! Layers live in an arena addressed by generational `LayerId`s, so a handle
//! kept by a test after its layers were disposed simply stops resolving.
//! Each layer maps local coordinates to its parent as
//! `translation + scale * (p - origin)`; children paint in ascending depth
//! order (stable for equal depths), which is also the reverse of hit-test order.
//!
//! `A` is the activation payload a layer can carry. When the pointer starts on
//! a layer with an action, the owner of the tree decides what it means.

use std::fmt::Write as _;
use std::sync::Arc;

use glam::{Affine2, Vec2};

use crate::assets::{Image, TextureConfig};
use crate::text::Label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    Group,
    /// Covers the whole view, ignoring the layer transform.
    ViewFill { color: [f32; 4] },
    Solid { size: Vec2, color: [f32; 4] },
    Image { image: Arc<Image>, config: TextureConfig },
    Label(Label),
}

impl LayerContent {
    /// Local bounds size, `None` for content without bounds of its own.
    pub fn local_size(&self, view: Vec2) -> Option<Vec2> {
        match self {
            Self::Group => None,
            Self::ViewFill { .. } => Some(view),
            Self::Solid { size, .. } => Some(*size),
            Self::Image { image, .. } => Some(image.size()),
            Self::Label(label) => Some(label.size),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::ViewFill { .. } => "ViewFill",
            Self::Solid { .. } => "Solid",
            Self::Image { .. } => "Image",
            Self::Label(_) => "Label",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Layer<A> {
    parent: Option<LayerId>,
    children: Vec<LayerId>,
    content: LayerContent,
    translation: Vec2,
    origin: Vec2,
    scale: f32,
    alpha: f32,
    depth: f32,
    visible: bool,
    action: Option<A>,
}

impl<A> Layer<A> {
    fn new(parent: Option<LayerId>, content: LayerContent) -> Self {
        Self {
            parent,
            children: Vec::new(),
            content,
            translation: Vec2::ZERO,
            origin: Vec2::ZERO,
            scale: 1.0,
            alpha: 1.0,
            depth: 0.0,
            visible: true,
            action: None,
        }
    }

    pub fn content(&self) -> &LayerContent {
        &self.content
    }

    pub fn set_content(&mut self, content: LayerContent) -> &mut Self {
        self.content = content;
        self
    }

    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn set_translation(&mut self, x: f32, y: f32) -> &mut Self {
        self.translation = Vec2::new(x, y);
        self
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, x: f32, y: f32) -> &mut Self {
        self.origin = Vec2::new(x, y);
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: f32) -> &mut Self {
        self.depth = depth;
        self
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }

    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    pub fn set_action(&mut self, action: Option<A>) -> &mut Self {
        self.action = action;
        self
    }

    pub fn parent(&self) -> Option<LayerId> {
        self.parent
    }

    pub fn children(&self) -> &[LayerId] {
        &self.children
    }

    fn local_transform(&self) -> Affine2 {
        Affine2::from_translation(self.translation)
            * Affine2::from_scale(Vec2::splat(self.scale))
            * Affine2::from_translation(-self.origin)
    }
}

/// One paintable layer, resolved to view space.
#[derive(Debug, Clone)]
pub struct DrawItem<'a> {
    pub layer: LayerId,
    pub content: &'a LayerContent,
    /// Top-left, top-right, bottom-right, bottom-left.
    pub corners: [Vec2; 4],
    pub transform: Affine2,
    pub alpha: f32,
}

impl DrawItem<'_> {
    /// Axis-aligned bounds of the corners as (min, max).
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let min = self.corners.iter().fold(Vec2::splat(f32::INFINITY), |a, c| a.min(*c));
        let max = self
            .corners
            .iter()
            .fold(Vec2::splat(f32::NEG_INFINITY), |a, c| a.max(*c));
        (min, max)
    }
}

struct Slot<A> {
    generation: u32,
    layer: Option<Layer<A>>,
}

pub struct LayerTree<A> {
    slots: Vec<Slot<A>>,
    free: Vec<u32>,
    root: LayerId,
}

impl<A: Clone> LayerTree<A> {
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: LayerId {
                index: 0,
                generation: 0,
            },
        };
        tree.root = tree.alloc(Layer::new(None, LayerContent::Group));
        tree
    }

    pub fn root(&self) -> LayerId {
        self.root
    }

    fn alloc(&mut self, layer: Layer<A>) -> LayerId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.layer = Some(layer);
            LayerId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                layer: Some(layer),
            });
            LayerId {
                index,
                generation: 0,
            }
        }
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer<A>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.layer.as_ref()
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer<A>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.layer.as_mut()
    }

    pub fn is_alive(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live layers, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.layer.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds `content` as the last child of `parent`. A stale parent falls back
    /// to the root so the new layer is never orphaned.
    pub fn add(&mut self, parent: LayerId, content: LayerContent) -> LayerId {
        let parent = if self.is_alive(parent) {
            parent
        } else {
            log::warn!("Adding layer under disposed parent {:?}, using root", parent);
            self.root
        };
        let id = self.alloc(Layer::new(Some(parent), content));
        if let Some(p) = self.layer_mut(parent) {
            p.children.push(id);
        }
        id
    }

    pub fn add_at(&mut self, parent: LayerId, content: LayerContent, x: f32, y: f32) -> LayerId {
        let id = self.add(parent, content);
        if let Some(layer) = self.layer_mut(id) {
            layer.set_translation(x, y);
        }
        id
    }

    /// Removes `id` and its whole subtree. Disposing the root only clears it.
    pub fn dispose(&mut self, id: LayerId) {
        if id == self.root {
            self.dispose_all(id);
            return;
        }
        let Some(parent) = self.get(id).map(|l| l.parent) else {
            return;
        };
        if let Some(parent) = parent.and_then(|p| self.layer_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
        self.free_subtree(id);
    }

    /// Disposes every child of `parent`, keeping `parent` itself.
    pub fn dispose_all(&mut self, parent: LayerId) {
        let children = match self.layer_mut(parent) {
            Some(layer) => std::mem::take(&mut layer.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    fn free_subtree(&mut self, id: LayerId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.index as usize) else {
                continue;
            };
            if slot.generation != current.generation {
                continue;
            }
            if let Some(layer) = slot.layer.take() {
                stack.extend(layer.children);
                self.free.push(current.index);
            }
        }
    }

    fn sorted_children(&self, layer: &Layer<A>) -> Vec<LayerId> {
        let mut children = layer.children.clone();
        children.sort_by(|a, b| {
            let da = self.get(*a).map_or(0.0, |l| l.depth);
            let db = self.get(*b).map_or(0.0, |l| l.depth);
            da.total_cmp(&db)
        });
        children
    }

    /// Every visible, paintable layer in paint order.
    pub fn flatten(&self, view: Vec2) -> Vec<DrawItem<'_>> {
        let mut out = Vec::new();
        self.flatten_into(self.root, Affine2::IDENTITY, 1.0, view, &mut out);
        out
    }

    fn flatten_into<'a>(
        &'a self,
        id: LayerId,
        parent_transform: Affine2,
        parent_alpha: f32,
        view: Vec2,
        out: &mut Vec<DrawItem<'a>>,
    ) {
        let Some(layer) = self.get(id) else {
            return;
        };
        if !layer.visible {
            return;
        }
        let transform = parent_transform * layer.local_transform();
        let alpha = parent_alpha * layer.alpha;

        match (&layer.content, layer.content.local_size(view)) {
            (LayerContent::ViewFill { .. }, _) => out.push(DrawItem {
                layer: id,
                content: &layer.content,
                corners: [
                    Vec2::ZERO,
                    Vec2::new(view.x, 0.0),
                    view,
                    Vec2::new(0.0, view.y),
                ],
                transform: Affine2::IDENTITY,
                alpha,
            }),
            (content, Some(size)) => out.push(DrawItem {
                layer: id,
                content,
                corners: [
                    transform.transform_point2(Vec2::ZERO),
                    transform.transform_point2(Vec2::new(size.x, 0.0)),
                    transform.transform_point2(size),
                    transform.transform_point2(Vec2::new(0.0, size.y)),
                ],
                transform,
                alpha,
            }),
            (_, None) => {}
        }

        for child in self.sorted_children(layer) {
            self.flatten_into(child, transform, alpha, view, out);
        }
    }

    /// Topmost visible layer with an action whose bounds contain `(x, y)`.
    pub fn hit_test(&self, x: f32, y: f32, view: Vec2) -> Option<(LayerId, A)> {
        let point = Vec2::new(x, y);
        for item in self.flatten(view).iter().rev() {
            let Some(action) = self.get(item.layer).and_then(|l| l.action.clone()) else {
                continue;
            };
            if item.transform.matrix2.determinant() == 0.0 {
                continue;
            }
            let Some(size) = item.content.local_size(view) else {
                continue;
            };
            let local = item.transform.inverse().transform_point2(point);
            if local.x >= 0.0 && local.y >= 0.0 && local.x < size.x && local.y < size.y {
                return Some((item.layer, action));
            }
        }
        None
    }

    /// Indented description of the tree, one layer per line.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_into(self.root, 0, &mut out);
        out
    }

    fn describe_into(&self, id: LayerId, indent: usize, out: &mut String) {
        let Some(layer) = self.get(id) else {
            return;
        };
        let _ = writeln!(
            out,
            "{:indent$}{} #{} pos=({:.1}, {:.1}) origin=({:.1}, {:.1}) scale={:.3} alpha={:.2} depth={} visible={}{}",
            "",
            layer.content.kind_name(),
            id.index,
            layer.translation.x,
            layer.translation.y,
            layer.origin.x,
            layer.origin.y,
            layer.scale,
            layer.alpha,
            layer.depth,
            layer.visible,
            if layer.action.is_some() { " interactive" } else { "" },
            indent = indent * 2,
        );
        for child in &layer.children {
            self.describe_into(*child, indent + 1, out);
        }
    }

    pub fn debug_print(&self) {
        for line in self.describe().lines() {
            log::info!("{line}");
        }
    }
}

impl<A: Clone> Default for LayerTree<A> {
    fn default() -> Self {
        Self::new()
    }
}
