//! GPU textures built from CPU images.
//!
//! Mipmaps are generated on the CPU by repeated halving with a triangle
//! filter, then every level is uploaded with its own `write_texture` call.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use vt_core::assets::{Filter, Image, TextureConfig};

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
    pub mip_level_count: u32,
}

/// One mip level: width, height, tightly packed RGBA8 rows.
pub type MipLevel = (u32, u32, Vec<u8>);

impl Texture {
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &Image,
        config: &TextureConfig,
    ) -> Self {
        let levels = if config.mipmaps {
            mip_chain(image.width(), image.height(), image.rgba())
        } else {
            vec![(image.width(), image.height(), image.rgba().to_vec())]
        };
        Self::from_levels(device, queue, &levels, config, image.key())
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let levels = [(width, height, rgba.to_vec())];
        Self::from_levels(device, queue, &levels, &TextureConfig::DEFAULT, label)
    }

    fn from_levels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        levels: &[MipLevel],
        config: &TextureConfig,
        label: &str,
    ) -> Self {
        let (width, height) = levels.first().map_or((1, 1), |l| (l.0.max(1), l.1.max(1)));
        let mip_level_count = levels.len().max(1) as u32;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, (w, h, data)) in levels.iter().enumerate() {
            if *w == 0 || *h == 0 {
                continue;
            }
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(*h),
                },
                wgpu::Extent3d {
                    width: *w,
                    height: *h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampler_descriptor(config, label));

        Self {
            texture,
            view,
            sampler,
            size: (width, height),
            mip_level_count,
        }
    }

    pub fn byte_size(&self) -> u64 {
        let mut total = 0u64;
        let (mut w, mut h) = self.size;
        for _ in 0..self.mip_level_count {
            total += u64::from(w) * u64::from(h) * 4;
            w = (w / 2).max(1);
            h = (h / 2).max(1);
        }
        total
    }
}

fn filter_mode(filter: Filter) -> wgpu::FilterMode {
    match filter {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    }
}

fn address_mode(repeat: bool) -> wgpu::AddressMode {
    if repeat {
        wgpu::AddressMode::Repeat
    } else {
        wgpu::AddressMode::ClampToEdge
    }
}

pub fn sampler_descriptor<'a>(
    config: &TextureConfig,
    label: &'a str,
) -> wgpu::SamplerDescriptor<'a> {
    wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address_mode(config.repeat_x),
        address_mode_v: address_mode(config.repeat_y),
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter_mode(config.mag_filter),
        min_filter: filter_mode(config.min_filter),
        mipmap_filter: if config.mipmaps {
            filter_mode(config.min_filter)
        } else {
            wgpu::FilterMode::Nearest
        },
        ..Default::default()
    }
}

pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Full mip chain down to 1x1, level 0 first.
pub fn mip_chain(width: u32, height: u32, rgba: &[u8]) -> Vec<MipLevel> {
    let Some(base) = RgbaImage::from_raw(width, height, rgba.to_vec()) else {
        log::warn!("Mip chain source {width}x{height} has a bad buffer; skipping mipmaps");
        return vec![(width, height, rgba.to_vec())];
    };
    let count = mip_level_count(width, height);
    let mut levels = Vec::with_capacity(count as usize);
    levels.push((width, height, rgba.to_vec()));
    let mut current = base;
    for _ in 1..count {
        let w = (current.width() / 2).max(1);
        let h = (current.height() / 2).max(1);
        current = imageops::resize(&current, w, h, FilterType::Triangle);
        levels.push((w, h, current.as_raw().clone()));
    }
    levels
}
