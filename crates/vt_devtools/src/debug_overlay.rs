//! egui layer rendered on top of the sprite pass.
//!
//! It paints label text and borders for the scene every frame, the layer
//! bounds when debug rects are on, and a stats window toggled by F3.
//!
//! egui needs a `RenderPass<'static>` while `begin_render_pass` borrows the
//! encoder, so a frame goes through four phases:
//!
//!   1. `prepare()` -- run egui, produce tessellated primitives
//!   2. `upload()`  -- upload textures and buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a pass made with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use vt_core::scene::DrawItem;
use vt_core::time::TimeState;
use winit::window::Window;

use crate::scene_text::{debug_rects, label_borders, text_runs, Outline};
use crate::text_metrics::{label_font, warm_up, EguiMetrics};

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub draw_calls: u32,
    pub texture_binds: u32,
    pub quads: u32,
    pub textures: u32,
    pub layers: u32,
    /// Estimated GPU memory usage in megabytes
    pub memory_estimate_mb: f32,
    /// Name of the running test, or "Menu".
    pub current: String,
}

/// What the overlay needs from the harness for one frame.
pub struct OverlayFrame<'a> {
    pub items: &'a [DrawItem<'a>],
    pub debug_rects: bool,
    pub time: &'a TimeState,
    pub stats: OverlayStats,
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
    /// Font atlas from the warm-up pass, sent with the first frame.
    pending_textures: egui::TexturesDelta,
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);
        let pending_textures = warm_up(&egui_ctx);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
            pending_textures,
        }
    }

    /// Text metrics that agree with how labels are painted.
    pub fn text_metrics(&self) -> EguiMetrics {
        EguiMetrics::new(self.egui_ctx.clone())
    }

    /// Returns true when egui wants the event for itself.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        self.visible && response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Stats overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        frame: OverlayFrame<'_>,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let visible = self.visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            paint_scene(ctx, &frame);
            if visible {
                stats_window(ctx, &frame);
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let mut textures_delta = std::mem::take(&mut self.pending_textures);
        textures_delta.append(full_output.textures_delta);

        (primitives, textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn color32(c: [f32; 4]) -> egui::Color32 {
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(to_u8(c[0]), to_u8(c[1]), to_u8(c[2]), to_u8(c[3]))
}

fn stroke_outline(painter: &egui::Painter, outline: &Outline) {
    let rect = egui::Rect::from_min_max(
        egui::pos2(outline.min.x, outline.min.y),
        egui::pos2(outline.max.x, outline.max.y),
    );
    painter.rect_stroke(
        rect,
        0.0,
        egui::Stroke::new(1.0, color32(outline.color)),
        egui::StrokeKind::Inside,
    );
}

// Background layer so the stats window always stays on top.
fn paint_scene(ctx: &egui::Context, frame: &OverlayFrame<'_>) {
    let painter = ctx.layer_painter(egui::LayerId::background());
    for outline in label_borders(frame.items) {
        stroke_outline(&painter, &outline);
    }
    for run in text_runs(frame.items) {
        painter.text(
            egui::pos2(run.pos.x, run.pos.y),
            egui::Align2::LEFT_TOP,
            &run.text,
            label_font(run.font_size),
            color32(run.color),
        );
    }
    if frame.debug_rects {
        for outline in debug_rects(frame.items) {
            stroke_outline(&painter, &outline);
        }
    }
}

fn stats_window(ctx: &egui::Context, frame: &OverlayFrame<'_>) {
    let time = frame.time;
    let stats = &frame.stats;
    egui::Window::new("Stats")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.label(format!("Current: {}", stats.current));
            ui.label(format!("FPS: {:.1}", time.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
            ui.label(format!("Updates this frame: {}", time.steps_this_frame));
            ui.label(format!("Total updates: {}", time.fixed_step_count));
            ui.label(format!(
                "Frames: {} in {:.1} s",
                time.frame_count, time.real_time
            ));
            ui.separator();
            ui.label(format!("Layers: {}", stats.layers));
            ui.label(format!("Quads: {}", stats.quads));
            ui.label(format!("Draw calls: {}", stats.draw_calls));
            ui.label(format!("Texture binds: {}", stats.texture_binds));
            ui.label(format!("Textures: {}", stats.textures));
            ui.label(format!("Memory: {:.1} MB", stats.memory_estimate_mb));
            ui.label(format!(
                "Debug rects: {}",
                if frame.debug_rects { "on" } else { "off" }
            ));
        });
}
