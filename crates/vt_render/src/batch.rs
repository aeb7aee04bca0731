//! CPU-side quad batching for the flattened layer tree.
//!
//! Every paintable item becomes one quad. Consecutive quads that sample the
//! same texture with contiguous indices collapse into one draw call, so a
//! menu full of button backgrounds costs a single `draw_indexed`.

use std::sync::Arc;

use vt_core::assets::{Image, TextureConfig};
use vt_core::scene::{DrawItem, LayerContent};

use crate::vertex::SpriteVertex;

/// Key of the 1x1 white texture used for solid fills.
pub const WHITE_TEXTURE_KEY: &str = "__white";

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

/// An image a frame needs on the GPU, under the cache key it is drawn with.
pub struct TextureRequest<'a> {
    pub key: Arc<str>,
    pub image: &'a Arc<Image>,
    pub config: TextureConfig,
}

#[derive(Debug, Default)]
pub struct QuadBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl QuadBatch {
    pub fn build(items: &[DrawItem<'_>]) -> Self {
        let mut batch = Self::default();
        let white: Arc<str> = Arc::from(WHITE_TEXTURE_KEY);
        for item in items {
            match item.content {
                LayerContent::Group => {}
                LayerContent::ViewFill { color } | LayerContent::Solid { color, .. } => {
                    batch.add_quad(&item.corners, white.clone(), with_alpha(*color, item.alpha));
                }
                LayerContent::Image { image, config } => {
                    let key: Arc<str> = Arc::from(config.cache_key(image.key()));
                    batch.add_quad(&item.corners, key, [1.0, 1.0, 1.0, item.alpha]);
                }
                LayerContent::Label(label) => {
                    if let Some(background) = label.background {
                        batch.add_quad(
                            &item.corners,
                            white.clone(),
                            with_alpha(background, item.alpha),
                        );
                    }
                }
            }
        }
        batch
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Bind-group switches needed to issue the draw calls in order.
    pub fn texture_binds(&self) -> usize {
        let mut binds = 0usize;
        let mut current: Option<&str> = None;
        for draw in &self.draw_calls {
            let key: &str = &draw.texture_key;
            if current != Some(key) {
                current = Some(key);
                binds += 1;
            }
        }
        binds
    }

    fn add_quad(&mut self, corners: &[glam::Vec2; 4], texture_key: Arc<str>, color: [f32; 4]) {
        const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let base_index = self.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(UVS) {
            self.vertices.push(SpriteVertex {
                position: corner.to_array(),
                tex_coords: uv,
                color,
            });
        }

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        push_draw_call(&mut self.draw_calls, texture_key, draw_start, 6);
    }
}

fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

/// Distinct images referenced by `items`, in first-use order.
pub fn texture_requests<'a>(items: &[DrawItem<'a>]) -> Vec<TextureRequest<'a>> {
    let mut requests: Vec<TextureRequest<'a>> = Vec::new();
    for item in items {
        if let LayerContent::Image { image, config } = item.content {
            let key = config.cache_key(image.key());
            if requests.iter().any(|r| *r.key == *key) {
                continue;
            }
            requests.push(TextureRequest {
                key: Arc::from(key),
                image,
                config: *config,
            });
        }
    }
    requests
}
