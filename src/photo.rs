use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use crate::error::PhotoError;
use crate::http_client::http_client;
use crate::photo_cache::PhotoCache;

pub const DEFAULT_PHOTO_URL: &str =
    "https://www.basketball-reference.com/req/202106291/images/players/{player_id}.jpg";

/// Larger bodies are refused before they are read.
pub const MAX_PHOTO_BYTES: u64 = 4 * 1024 * 1024;

/// Drawn in place of the headshot whenever a photo cannot be produced.
pub const PLACEHOLDER_ART: &str = r#"
      .-----.
     /       \
    |  o   o  |
    |    ^    |
    |  \___/  |
     \       /
      '-----'
    ___|   |___
   /           \
  |   NO PHOTO  |
"#;

/// Anything that can turn a player id into encoded image bytes.
pub trait PhotoSource {
    fn fetch(&self, player_id: &str) -> Result<Vec<u8>, PhotoError>;
}

/// Never produces a photo. Used when running offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPhotos;

impl PhotoSource for NoPhotos {
    fn fetch(&self, player_id: &str) -> Result<Vec<u8>, PhotoError> {
        Err(PhotoError::Other(format!("photos disabled for {player_id}")))
    }
}

#[derive(Debug, Clone)]
pub struct HttpPhotoSource {
    url_template: String,
    cache: Option<PhotoCache>,
}

impl HttpPhotoSource {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: PhotoCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn url_for(&self, player_id: &str) -> Result<String, PhotoError> {
        validate_player_id(player_id)?;
        Ok(self.url_template.replace("{player_id}", player_id))
    }
}

impl PhotoSource for HttpPhotoSource {
    /// Only bytes that decode as an image are returned or cached.
    fn fetch(&self, player_id: &str) -> Result<Vec<u8>, PhotoError> {
        let url = self.url_for(player_id)?;
        if let Some(cache) = &self.cache {
            if let Some(bytes) = cache.get(player_id) {
                if image::load_from_memory(&bytes).is_ok() {
                    log::debug!("photo cache hit for {player_id}");
                    return Ok(bytes);
                }
                log::warn!("dropping unreadable cached photo for {player_id}");
                if let Err(err) = cache.remove(player_id) {
                    log::warn!("failed to evict cached photo for {player_id}: {err:#}");
                }
            }
        }

        let client = http_client().map_err(|e| PhotoError::Other(e.to_string()))?;
        let resp = client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PhotoError::Status(status));
        }
        if let Some(len) = resp.content_length() {
            if len > MAX_PHOTO_BYTES {
                return Err(PhotoError::TooLarge(len));
            }
        }
        let bytes = resp.bytes()?.to_vec();
        if bytes.len() as u64 > MAX_PHOTO_BYTES {
            return Err(PhotoError::TooLarge(bytes.len() as u64));
        }
        image::load_from_memory(&bytes)?;

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.put(player_id, &bytes) {
                log::warn!("failed to cache photo for {player_id}: {err:#}");
            }
        }
        Ok(bytes)
    }
}

/// Basketball-Reference style ids: non-empty ASCII letters and digits.
pub fn validate_player_id(player_id: &str) -> Result<(), PhotoError> {
    if player_id.is_empty() || !player_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(PhotoError::MalformedId(player_id.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub enum Photo {
    Fetched(DynamicImage),
    Placeholder,
}

impl Photo {
    /// Fetches and decodes a headshot. Every failure collapses to the
    /// placeholder; the cause is only logged.
    pub fn resolve(source: &dyn PhotoSource, player_id: &str) -> Self {
        let decoded = source
            .fetch(player_id)
            .and_then(|bytes| image::load_from_memory(&bytes).map_err(PhotoError::from));
        match decoded {
            Ok(img) => Photo::Fetched(img),
            Err(err) => {
                log::debug!("using placeholder photo for {player_id}: {err}");
                Photo::Placeholder
            }
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Photo::Placeholder)
    }

    /// Image scaled down to fit `max_w` x `max_h` pixels, preserving aspect.
    pub fn thumbnail(&self, max_w: u32, max_h: u32) -> Option<RgbaImage> {
        let Photo::Fetched(img) = self else {
            return None;
        };
        let (w, h) = scale_to_fit(img.width(), img.height(), max_w, max_h);
        if w == 0 || h == 0 {
            return None;
        }
        Some(imageops::resize(&img.to_rgba8(), w, h, FilterType::Triangle))
    }
}

/// Never upscales.
pub fn scale_to_fit(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 || max_w == 0 || max_h == 0 {
        return (0, 0);
    }
    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;
    let scale = scale_w.min(scale_h);

    let new_w = (src_w as f64 * scale).round() as u32;
    let new_h = (src_h as f64 * scale).round() as u32;
    (new_w.max(1), new_h.max(1))
}
