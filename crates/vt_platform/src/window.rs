use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Fullscreen, Window, WindowAttributes};

use crate::config::PlatformConfig;

/// Capabilities tests can check in their `available` predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformCaps {
    pub fullscreen: bool,
    pub touch: bool,
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    Arc::new(window)
}

pub fn probe_caps(window: &Window) -> PlatformCaps {
    PlatformCaps {
        fullscreen: window.current_monitor().is_some(),
        touch: cfg!(any(target_os = "android", target_os = "ios")),
    }
}

/// Physical size of the monitor hosting `window`, if known.
pub fn screen_size(window: &Window) -> Option<(u32, u32)> {
    window.current_monitor().map(|m| {
        let size = m.size();
        (size.width, size.height)
    })
}

pub fn set_fullscreen(window: &Window, enabled: bool) {
    let mode = enabled.then(|| Fullscreen::Borderless(window.current_monitor()));
    window.set_fullscreen(mode);
    log::info!("Fullscreen: {}", if enabled { "ON" } else { "OFF" });
}
