pub mod debug_overlay;
pub mod scene_text;
pub mod text_metrics;

pub use debug_overlay::{DebugOverlay, OverlayFrame, OverlayStats};
pub use text_metrics::EguiMetrics;
