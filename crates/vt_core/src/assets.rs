//! Asynchronous image loading.
//!
//! `Assets::get_image` decodes on a background thread and hands back an
//! `ImageFuture`. Nothing blocks: the frame loop polls futures (usually through
//! `collect`) and builds layers once every requested image has arrived.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

use glam::Vec2;

/// CPU-side RGBA8 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    key: Arc<str>,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Image {
    pub fn solid(key: &str, width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            key: Arc::from(key),
            width,
            height,
            rgba,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Nearest,
    Linear,
}

/// How an image is turned into a GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureConfig {
    pub repeat_x: bool,
    pub repeat_y: bool,
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mipmaps: bool,
}

impl TextureConfig {
    pub const DEFAULT: TextureConfig = TextureConfig {
        repeat_x: false,
        repeat_y: false,
        min_filter: Filter::Linear,
        mag_filter: Filter::Linear,
        mipmaps: false,
    };

    pub const MIPMAPPED: TextureConfig = TextureConfig {
        repeat_x: false,
        repeat_y: false,
        min_filter: Filter::Linear,
        mag_filter: Filter::Linear,
        mipmaps: true,
    };

    /// Texture cache key: the same image under two configs is two textures.
    pub fn cache_key(&self, image_key: &str) -> String {
        let filter = |f: Filter| match f {
            Filter::Nearest => 'n',
            Filter::Linear => 'l',
        };
        format!(
            "{image_key}#{}{}{}{}{}",
            filter(self.min_filter),
            filter(self.mag_filter),
            if self.mipmaps { 'm' } else { '-' },
            if self.repeat_x { 'x' } else { '-' },
            if self.repeat_y { 'y' } else { '-' },
        )
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    Io { path: String, message: String },
    Decode { path: String, message: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "Failed to read image {path}: {message}"),
            Self::Decode { path, message } => {
                write!(f, "Failed to decode image {path}: {message}")
            }
        }
    }
}

impl std::error::Error for AssetError {}

pub type ImageResult = Result<Arc<Image>, AssetError>;

pub struct Assets {
    root: PathBuf,
}

impl Assets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Starts loading `path` (relative to the asset root) in the background.
    pub fn get_image(&self, path: &str) -> ImageFuture {
        let full_path = self.root.join(path);
        let key = path.to_string();
        let (tx, rx) = mpsc::channel();

        let thread_key = key.clone();
        let thread_path = full_path.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("asset-{key}"))
            .spawn(move || {
                let result = decode_file(&thread_key, &thread_path).map(Arc::new);
                // The receiver may be gone if the test was disposed meanwhile.
                let _ = tx.send(result);
            });

        match spawned {
            Ok(_) => ImageFuture::pending(key, rx),
            Err(err) => {
                log::warn!("Could not spawn loader for '{key}', decoding inline: {err}");
                ImageFuture::resolved(decode_file(&key, &full_path).map(Arc::new))
            }
        }
    }
}

fn decode_file(key: &str, path: &Path) -> Result<Image, AssetError> {
    let bytes = fs::read(path).map_err(|e| AssetError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| AssetError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Image {
        key: Arc::from(key),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Result of a background image load, observed by polling.
pub struct ImageFuture {
    key: String,
    rx: Option<Receiver<ImageResult>>,
    result: Option<ImageResult>,
}

impl ImageFuture {
    fn pending(key: String, rx: Receiver<ImageResult>) -> Self {
        Self {
            key,
            rx: Some(rx),
            result: None,
        }
    }

    pub fn resolved(result: ImageResult) -> Self {
        let key = match &result {
            Ok(image) => image.key().to_string(),
            Err(AssetError::Io { path, .. } | AssetError::Decode { path, .. }) => path.clone(),
        };
        Self {
            key,
            rx: None,
            result: Some(result),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the outcome once the load finished, `None` while still pending.
    pub fn poll(&mut self) -> Option<&ImageResult> {
        if self.result.is_none() {
            if let Some(rx) = &self.rx {
                match rx.try_recv() {
                    Ok(result) => self.result = Some(result),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        self.result = Some(Err(AssetError::Io {
                            path: self.key.clone(),
                            message: "loader thread exited without a result".to_string(),
                        }));
                    }
                }
            }
            if self.result.is_some() {
                self.rx = None;
            }
        }
        self.result.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectPoll {
    Pending,
    Ready(Vec<Arc<Image>>),
    Failed(AssetError),
}

/// Waits for a group of image futures: ready once all succeeded, failed as
/// soon as any one failed.
pub struct Collect {
    futures: Vec<ImageFuture>,
}

pub fn collect(futures: Vec<ImageFuture>) -> Collect {
    Collect { futures }
}

impl Collect {
    pub fn poll(&mut self) -> CollectPoll {
        let mut all_ready = true;
        for future in &mut self.futures {
            match future.poll() {
                Some(Err(err)) => return CollectPoll::Failed(err.clone()),
                Some(Ok(_)) => {}
                None => all_ready = false,
            }
        }
        if !all_ready {
            return CollectPoll::Pending;
        }
        let images = self
            .futures
            .iter_mut()
            .filter_map(|future| future.poll().and_then(|r| r.as_ref().ok()).cloned())
            .collect();
        CollectPoll::Ready(images)
    }
}
