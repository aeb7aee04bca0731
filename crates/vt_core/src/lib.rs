//! Engine-independent building blocks for the visual test harness.

pub mod assets;
pub mod exec;
pub mod input;
pub mod layout;
pub mod router;
pub mod scene;
pub mod text;
pub mod time;
pub mod toggle;
