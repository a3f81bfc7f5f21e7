//! Thumbnail resolution for article cards.
//!
//! Every failure converges on the bundled default image; a result is only
//! ever handed back while the caller's cancellation token is still live.

use crate::news::http::{read_limited_bytes, BodyError};
use crate::util::caught_sync;
use image::imageops::FilterType;
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Default image shipped inside the binary.
pub const DEFAULT_IMAGE_BYTES: &[u8] = include_bytes!("../../assets/default.png");

const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Not an image content type: {0}")]
    ContentType(String),
    #[error("Response has no content type")]
    MissingContentType,
    #[error("Body error: {0}")]
    Body(#[from] BodyError),
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Box a thumbnail must fit inside, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBox {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for DisplayBox {
    fn default() -> Self {
        Self {
            max_width: 100,
            max_height: 70,
        }
    }
}

/// A decoded, scaled bitmap with tightly packed RGB8 or RGBA8 rows.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_alpha", &self.has_alpha)
            .field("pixels", &format_args!("[{} bytes]", self.pixels.len()))
            .finish()
    }
}

/// What a card ends up displaying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageHandle {
    /// The article's own image.
    Thumbnail(Thumbnail),
    /// The bundled default image, used for every failure and for articles without an image.
    Default(Thumbnail),
    /// The default image itself could not be read or decoded.
    Placeholder,
}

/// Compute floored dimensions that fit `width`×`height` inside `display_box`
/// with a uniform scale of `min(max_w / w, max_h / h)`.
///
/// Integer arithmetic keeps the limiting side exactly at the box edge. Small
/// images are scaled up, and neither side drops below 1.
pub fn fit_within(width: u32, height: u32, display_box: DisplayBox) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }
    let (w, h) = (u64::from(width), u64::from(height));
    let (max_w, max_h) = (
        u64::from(display_box.max_width),
        u64::from(display_box.max_height),
    );

    let (new_w, new_h) = if max_w * h <= max_h * w {
        (max_w, h * max_w / w)
    } else {
        (w * max_h / h, max_h)
    };

    (
        u32::try_from(new_w).unwrap_or(u32::MAX).max(1),
        u32::try_from(new_h).unwrap_or(u32::MAX).max(1),
    )
}

/// Decode encoded image bytes and scale them into `display_box`.
pub fn decode_thumbnail(bytes: &[u8], display_box: DisplayBox) -> Result<Thumbnail, ImageError> {
    let img = image::load_from_memory(bytes)?;
    let has_alpha = img.color().has_alpha();
    let (width, height) = fit_within(img.width(), img.height(), display_box);
    let scaled = img.resize_exact(width, height, FilterType::Triangle);

    let pixels = if has_alpha {
        scaled.to_rgba8().into_raw()
    } else {
        scaled.to_rgb8().into_raw()
    };

    Ok(Thumbnail {
        width,
        height,
        has_alpha,
        pixels,
    })
}

async fn decode_off_thread(bytes: Vec<u8>, display_box: DisplayBox) -> Result<Thumbnail, ImageError> {
    tokio::task::spawn_blocking(move || caught_sync(|| decode_thumbnail(&bytes, display_box)))
        .await
        .map_err(|e| ImageError::Task(e.to_string()))?
}

// ============================================================================
// ImageResolver
// ============================================================================

/// Resolves article image URLs into displayable thumbnails.
#[derive(Clone)]
pub struct ImageResolver {
    client: reqwest::Client,
    display_box: DisplayBox,
    /// Default image on disk; `None` uses [`DEFAULT_IMAGE_BYTES`].
    default_image: Option<PathBuf>,
}

impl ImageResolver {
    pub fn new(client: reqwest::Client, display_box: DisplayBox, default_image: Option<PathBuf>) -> Self {
        Self {
            client,
            display_box,
            default_image,
        }
    }

    /// Resolve one article image.
    ///
    /// Returns `None` if `cancel` fired at any point; the caller must then
    /// leave its view untouched. Otherwise always returns a handle: failures
    /// fall back to the default image without surfacing an error.
    pub async fn resolve(
        &self,
        image_url: Option<&str>,
        cancel: &CancellationToken,
    ) -> Option<ImageHandle> {
        if cancel.is_cancelled() {
            return None;
        }

        let Some(url) = image_url else {
            return self.default_image(cancel).await;
        };

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return None,
            result = self.fetch_thumbnail(url) => result,
        };

        match fetched {
            Ok(thumbnail) => {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(ImageHandle::Thumbnail(thumbnail))
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Image load failed, using default image");
                self.default_image(cancel).await
            }
        }
    }

    async fn fetch_thumbnail(&self, url: &str) -> Result<Thumbnail, ImageError> {
        let response = self.client.get(url).send().await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(ImageError::HttpStatus(response.status().as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .ok_or(ImageError::MissingContentType)?
            .to_str()
            .map_err(|_| ImageError::ContentType("<non-ascii>".to_string()))?
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(ImageError::ContentType(content_type));
        }

        let bytes = read_limited_bytes(response, MAX_IMAGE_SIZE).await?;
        decode_off_thread(bytes, self.display_box).await
    }

    /// Load and scale the default image, or `Placeholder` if that fails too.
    async fn default_image(&self, cancel: &CancellationToken) -> Option<ImageHandle> {
        let bytes = match &self.default_image {
            None => Ok(DEFAULT_IMAGE_BYTES.to_vec()),
            Some(path) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return None,
                    result = tokio::fs::read(path) => result,
                }
            }
        };

        if cancel.is_cancelled() {
            return None;
        }

        let handle = match bytes {
            Ok(bytes) => match decode_off_thread(bytes, self.display_box).await {
                Ok(thumbnail) => ImageHandle::Default(thumbnail),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to decode default image");
                    ImageHandle::Placeholder
                }
            },
            Err(e) => {
                tracing::error!(
                    path = ?self.default_image,
                    error = %e,
                    "Failed to read default image"
                );
                ImageHandle::Placeholder
            }
        };

        if cancel.is_cancelled() {
            return None;
        }
        Some(handle)
    }
}
