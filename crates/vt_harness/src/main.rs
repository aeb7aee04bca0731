mod test;
mod tests;
mod tests_game;
mod ui;

use std::sync::Arc;

use glam::Vec2;
use vt_core::assets::Assets;
use vt_core::input::{InputState, Key, MouseBtn, Phase, TouchEvent};
use vt_core::time::TimeState;
use vt_devtools::{DebugOverlay, OverlayFrame, OverlayStats};
use vt_platform::config::{load_platform_config, LaunchOptions, PlatformConfig};
use vt_platform::window::{probe_caps, screen_size, set_fullscreen};
use vt_render::{GpuContext, SceneRenderer};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use test::PlatformRequest;
use tests_game::{DisplayInfo, TestsGame};
use ui::Ui;

const LABEL_FONT_SIZE: f32 = 16.0;

struct HarnessState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: SceneRenderer,
    debug_overlay: DebugOverlay,
    input: InputState,
    time: TimeState,
    update_rate_ms: u32,
    game: TestsGame,
}

impl HarnessState {
    fn new(window: Arc<Window>, config: &PlatformConfig, start_test: Option<usize>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let renderer = SceneRenderer::new(&gpu.device, &gpu.queue, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let caps = probe_caps(&window);
        log::info!(
            "Platform: fullscreen={} touch={}",
            caps.fullscreen,
            caps.touch
        );
        let info = DisplayInfo {
            renderer: gpu.renderer_info(),
            screen: screen_size(&window),
        };
        let mut game = TestsGame::new(
            tests::all(),
            Assets::new(&config.asset_root),
            Ui::new(debug_overlay.text_metrics(), LABEL_FONT_SIZE),
            caps,
            logical_view(&window),
            info,
        );
        game.start(start_test);

        Self {
            window,
            gpu,
            renderer,
            debug_overlay,
            input: InputState::new(),
            time: TimeState::with_update_rate(config.update_rate_ms),
            update_rate_ms: config.update_rate_ms,
            game,
        }
    }

    fn to_view(&self, x: f64, y: f64) -> (f32, f32) {
        let scale = self.window.scale_factor();
        ((x / scale) as f32, (y / scale) as f32)
    }

    fn apply_platform_requests(&mut self) {
        for request in self.game.take_platform_requests() {
            match request {
                PlatformRequest::Fullscreen(enabled) => set_fullscreen(&self.window, enabled),
            }
        }
    }

    fn render_frame(&mut self) {
        // Deferred menu switches run before anything else this frame.
        self.game.run_tasks();

        self.time.begin_frame();
        while self.time.should_step() {
            self.game.update(self.update_rate_ms);
        }

        let clock = self.time.paint_clock();
        self.game.paint(&clock);
        self.apply_platform_requests();

        let view = self.game.view();
        let items = self.game.tree().flatten(view);
        self.renderer
            .prepare(&self.gpu.device, &self.gpu.queue, &items, view);

        let Some((output, target)) = self.gpu.begin_frame() else {
            return;
        };

        let frame_stats = self.renderer.stats();
        let (egui_primitives, egui_textures_delta) = self.debug_overlay.prepare(
            &self.window,
            OverlayFrame {
                items: &items,
                debug_rects: self.game.debug_rects(),
                time: &self.time,
                stats: OverlayStats {
                    draw_calls: frame_stats.draw_calls,
                    texture_binds: frame_stats.texture_binds,
                    quads: frame_stats.quads,
                    textures: frame_stats.textures,
                    layers: self.game.tree().len() as u32,
                    memory_estimate_mb: self.renderer.estimate_memory_mb(),
                    current: self.game.current_name().to_string(),
                },
            },
        );

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            self.renderer.draw(&mut render_pass);
        }

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

fn logical_view(window: &Window) -> Vec2 {
    let size = window
        .inner_size()
        .to_logical::<f32>(window.scale_factor());
    Vec2::new(size.width, size.height)
}

struct App {
    config: PlatformConfig,
    options: LaunchOptions,
    state: Option<HarnessState>,
}

impl App {
    fn new(config: PlatformConfig, options: LaunchOptions) -> Self {
        Self {
            config,
            options,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = vt_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(HarnessState::new(
            window,
            &self.config,
            self.options.start_test,
        ));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.game.set_display_info(DisplayInfo {
                        renderer: state.gpu.renderer_info(),
                        screen: screen_size(&state.window),
                    });
                    state.game.resize(logical_view(&state.window));
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                state.input.set_shift(modifiers.state().shift_key());
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        let down = event.state == ElementState::Pressed;
                        let key_event = state.input.key(key, down);
                        if key == Key::F3 {
                            if down {
                                state.debug_overlay.toggle();
                            }
                        } else {
                            state.game.on_key(&key_event);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = state.to_view(position.x, position.y);
                state.input.mouse_position = (x, y);
                let left_held = state.input.is_mouse_held(MouseBtn::Left);
                if !egui_consumed {
                    state.game.on_mouse_move(x, y, left_held);
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } if !egui_consumed => {
                if let Some(btn) = map_mouse_button(button) {
                    let down = button_state == ElementState::Pressed;
                    if let Some(mouse_event) = state.input.mouse_button(btn, down) {
                        state.game.on_mouse_button(&mouse_event);
                    }
                }
            }

            WindowEvent::Touch(touch) if !egui_consumed => {
                let (x, y) = state.to_view(touch.location.x, touch.location.y);
                let phase = match touch.phase {
                    TouchPhase::Started => Phase::Start,
                    TouchPhase::Moved => Phase::Move,
                    TouchPhase::Ended => Phase::End,
                    TouchPhase::Cancelled => Phase::Cancel,
                };
                state.game.on_touches(&[TouchEvent {
                    phase,
                    id: touch.id,
                    x,
                    y,
                }]);
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                state.render_frame();
            }

            _ => {}
        }
    }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        MouseButton::Back => Some(MouseBtn::Back),
        _ => None,
    }
}

fn load_config(options: &LaunchOptions) -> PlatformConfig {
    let Some(path) = options.config_path.as_deref() else {
        return PlatformConfig::default();
    };
    match load_platform_config(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::error!("{e}; using defaults");
            PlatformConfig::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Visual test harness starting...");

    let options = LaunchOptions::parse(std::env::args().skip(1));
    let config = load_config(&options);

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, options);
    event_loop.run_app(&mut app).expect("Event loop error");
}
