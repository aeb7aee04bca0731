use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::Vec2;
use vt_core::scene::DrawItem;

use crate::batch::{texture_requests, DrawCall, QuadBatch, WHITE_TEXTURE_KEY};
use crate::camera::Camera2D;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::Texture;
use crate::vertex::SpriteVertex;

struct GpuTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// Counters from the last `prepare`, shown in the stats overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub quads: u32,
    pub textures: u32,
}

/// Streams a flattened layer tree into GPU buffers and draws it with the
/// sprite pipeline. Textures are created on first use and dropped once a
/// frame no longer references them.
pub struct SceneRenderer {
    pipeline: SpritePipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    textures: HashMap<Arc<str>, GpuTexture>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    stats: FrameStats,
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let pipeline = SpritePipeline::new(device, format);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<crate::camera::CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_bind_group = pipeline.create_camera_bind_group(device, &camera_buffer);

        let white = Texture::from_rgba8(device, queue, &[255, 255, 255, 255], 1, 1, "White");
        let white_bind_group = pipeline.create_texture_bind_group(device, &white);
        let mut textures = HashMap::new();
        textures.insert(
            Arc::from(WHITE_TEXTURE_KEY),
            GpuTexture {
                texture: white,
                bind_group: white_bind_group,
            },
        );

        let vertex_capacity = 256;
        let index_capacity = 384;
        Self {
            vertex_buffer: create_vertex_buffer(device, vertex_capacity),
            index_buffer: create_index_buffer(device, index_capacity),
            pipeline,
            camera_buffer,
            camera_bind_group,
            textures,
            vertex_capacity,
            index_capacity,
            draw_calls: Vec::new(),
            stats: FrameStats::default(),
        }
    }

    /// Uploads everything `draw` needs for this frame.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        items: &[DrawItem<'_>],
        view: Vec2,
    ) {
        let camera = Camera2D::new(view.x, view.y);
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.build_uniform()]),
        );

        let requests = texture_requests(items);
        let mut in_use: HashSet<Arc<str>> = HashSet::with_capacity(requests.len() + 1);
        in_use.insert(Arc::from(WHITE_TEXTURE_KEY));
        for request in requests {
            if !self.textures.contains_key(&request.key) {
                let texture = Texture::from_image(device, queue, request.image, &request.config);
                let bind_group = self.pipeline.create_texture_bind_group(device, &texture);
                log::debug!(
                    "Uploaded texture '{}' ({}x{}, {} mip levels)",
                    request.key,
                    texture.size.0,
                    texture.size.1,
                    texture.mip_level_count
                );
                self.textures.insert(
                    request.key.clone(),
                    GpuTexture {
                        texture,
                        bind_group,
                    },
                );
            }
            in_use.insert(request.key);
        }
        let before = self.textures.len();
        self.textures.retain(|key, _| in_use.contains(key));
        if self.textures.len() < before {
            log::debug!("Released {} unused textures", before - self.textures.len());
        }

        let batch = QuadBatch::build(items);
        self.ensure_capacity(device, batch.vertices.len(), batch.indices.len());
        if !batch.vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&batch.vertices));
        }
        if !batch.indices.is_empty() {
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&batch.indices));
        }

        self.stats = FrameStats {
            draw_calls: batch.draw_calls.len() as u32,
            texture_binds: batch.texture_binds() as u32,
            quads: batch.quad_count() as u32,
            textures: self.textures.len() as u32,
        };
        self.draw_calls = batch.draw_calls;
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.draw_calls.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        let mut last_bound: Option<&Arc<str>> = None;
        for draw in &self.draw_calls {
            let Some(texture) = self.textures.get(&draw.texture_key) else {
                continue;
            };
            if last_bound.is_none_or(|last| **last != *draw.texture_key) {
                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                last_bound = Some(&draw.texture_key);
            }
            render_pass.draw_indexed(
                draw.index_start..(draw.index_start + draw.index_count),
                0,
                0..1,
            );
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn estimate_memory_mb(&self) -> f32 {
        let mut bytes: u64 = self
            .textures
            .values()
            .map(|t| t.texture.byte_size())
            .sum();
        bytes += (self.vertex_capacity * std::mem::size_of::<SpriteVertex>()) as u64;
        bytes += (self.index_capacity * std::mem::size_of::<u32>()) as u64;
        bytes as f32 / (1024.0 * 1024.0)
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
