//! Profile picture ingestion.
//!
//! Uploaded images are shrunk to fit a 125px square (aspect ratio kept,
//! never upscaled) and written under a random hex name that keeps the
//! original extension. Superseded pictures are left on disk.

use std::io::Cursor;
use std::path::PathBuf;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use rand::RngCore;

use crate::config::{DEFAULT_PROFILE_IMAGE, PICTURE_TOKEN_BYTES, PROFILE_PICTURE_MAX_DIMENSION};
use crate::domain::UploadedImage;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Picture ingestion trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PictureService: Send + Sync {
    /// Resize and persist an upload, returning the stored file name.
    ///
    /// Fails with `InvalidImage` for undecodable data and with
    /// `StorageWrite` when the file cannot be written.
    async fn ingest(&self, image: UploadedImage) -> AppResult<String>;
}

/// Filesystem-backed picture store.
pub struct PictureStore {
    dir: PathBuf,
    max_dimension: u32,
}

impl PictureStore {
    /// Store pictures under `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_dimension: PROFILE_PICTURE_MAX_DIMENSION,
        }
    }

    /// Write the sentinel picture new accounts point at, unless present.
    pub async fn ensure_default_picture(&self) -> AppResult<()> {
        let path = self.dir.join(DEFAULT_PROFILE_IMAGE);
        if tokio::fs::try_exists(&path).await? {
            return Ok(());
        }

        let side = self.max_dimension;
        let encoded = tokio::task::spawn_blocking(move || {
            let placeholder = RgbImage::from_pixel(side, side, Rgb([200, 205, 215]));
            let mut out = Cursor::new(Vec::new());
            DynamicImage::ImageRgb8(placeholder)
                .write_to(&mut out, ImageFormat::Jpeg)
                .map(|_| out.into_inner())
                .map_err(|e| AppError::internal(format!("Placeholder encode failed: {}", e)))
        })
        .await
        .map_err(|e| AppError::internal(format!("Placeholder task failed: {}", e)))??;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, encoded).await?;
        tracing::info!(path = %path.display(), "Created default profile picture");
        Ok(())
    }
}

#[async_trait]
impl PictureService for PictureStore {
    async fn ingest(&self, image: UploadedImage) -> AppResult<String> {
        let extension = image
            .extension()
            .ok_or_else(|| AppError::invalid_image("file name has no extension"))?
            .to_string();
        let format = ImageFormat::from_extension(extension.to_ascii_lowercase())
            .ok_or_else(|| AppError::invalid_image(format!("unsupported extension .{}", extension)))?;

        let filename = random_filename(&extension);

        let max_dimension = self.max_dimension;
        let UploadedImage { bytes, .. } = image;
        let encoded = tokio::task::spawn_blocking(move || thumbnail(&bytes, format, max_dimension))
            .await
            .map_err(|e| AppError::internal(format!("Thumbnail task failed: {}", e)))??;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, encoded).await?;

        tracing::info!(file = %filename, "Stored profile picture");
        Ok(filename)
    }
}

/// `<32 hex chars>.<extension>`
fn random_filename(extension: &str) -> String {
    let mut token = [0u8; PICTURE_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut token);
    format!("{}.{}", hex::encode(token), extension)
}

/// Decode, shrink to fit `max_dimension`, and re-encode as `format`.
fn thumbnail(bytes: &[u8], format: ImageFormat, max_dimension: u32) -> AppResult<Vec<u8>> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| AppError::invalid_image(e.to_string()))?;

    let resized = if decoded.width() > max_dimension || decoded.height() > max_dimension {
        decoded.thumbnail(max_dimension, max_dimension)
    } else {
        decoded
    };

    // JPEG has no alpha channel
    let resized = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
        _ => resized,
    };

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, format)
        .map_err(|e| AppError::invalid_image(e.to_string()))?;
    Ok(out.into_inner())
}
