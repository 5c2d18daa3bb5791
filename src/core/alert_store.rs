// Local alert frame store - writes the triggering frame to disk as JPEG
// before it is handed to the upload sink

use crate::core::alert_sink::AlertResult;
use crate::models::capture::RawFrame;
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use std::path::{Path, PathBuf};

const JPEG_QUALITY: u8 = 90;

/// Filename key for an alert frame, e.g. `image_20250101_120000.jpg`
pub fn alert_key() -> String {
    format!("image_{}.jpg", Utc::now().format("%Y%m%d_%H%M%S"))
}

/// Encode a frame as JPEG (alpha dropped)
pub fn encode_jpeg(frame: &RawFrame) -> AlertResult<Vec<u8>> {
    let rgb = frame.to_rgb_bytes();

    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder.encode(&rgb, frame.width, frame.height, ExtendedColorType::Rgb8)?;

    Ok(bytes)
}

/// Directory of captured alert images
pub struct AlertStore {
    base_path: PathBuf,
}

impl AlertStore {
    /// Create the store, ensuring the output directory exists
    pub fn new(base_path: impl AsRef<Path>) -> AlertResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Write an encoded alert frame under the store directory
    pub async fn save(&self, key: &str, jpeg: &[u8]) -> AlertResult<PathBuf> {
        let path = self.base_path.join(key);
        tokio::fs::write(&path, jpeg).await?;

        println!("Saved {}", key);
        Ok(path)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
