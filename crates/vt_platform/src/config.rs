//! Platform configuration and launch arguments.
//!
//! The configuration file is optional JSON; every field has a default so a
//! partial file only overrides what it names.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Fixed update step for tests, in milliseconds.
    pub update_rate_ms: u32,
    /// Directory image paths are resolved against.
    pub asset_root: PathBuf,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Visual Test Harness".to_string(),
            width: 800,
            height: 600,
            update_rate_ms: 25,
            asset_root: PathBuf::from("assets"),
        }
    }
}

pub fn load_platform_config(path: &Path) -> Result<PlatformConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: PlatformConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &PlatformConfig) -> Result<(), String> {
    if config.width == 0 || config.height == 0 {
        return Err(format!(
            "Config validation failed: window size {}x{} must be non-zero",
            config.width, config.height
        ));
    }
    if config.update_rate_ms == 0 {
        return Err("Config validation failed: update_rate_ms must be > 0".to_string());
    }
    Ok(())
}

/// What the process was asked to do at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Index from the first `test*` argument; `None` if that one is malformed.
    pub start_test: Option<usize>,
    pub config_path: Option<PathBuf>,
}

impl LaunchOptions {
    /// Parses process arguments (without the program name). Unrecognised
    /// arguments are logged and skipped.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut selector_seen = false;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            if arg == "--config" {
                match args.next() {
                    Some(path) => options.config_path = Some(PathBuf::from(path.as_ref())),
                    None => log::warn!("--config expects a path"),
                }
            } else if let Some(index) = arg.strip_prefix("test") {
                if selector_seen {
                    continue;
                }
                selector_seen = true;
                match index.parse::<usize>() {
                    Ok(index) => options.start_test = Some(index),
                    Err(_) => log::warn!("Ignoring malformed test selector '{arg}'"),
                }
            } else {
                log::warn!("Ignoring unknown argument '{arg}'");
            }
        }
        options
    }
}
