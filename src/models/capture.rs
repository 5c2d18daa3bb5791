// Data structures for camera frames

/// A single frame handed to the gesture pipeline
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub timestamp: i64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

/// Pixel format of captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGBA8,
    BGRA8,
}

impl RawFrame {
    /// Decode an encoded image (JPEG/PNG as sent by the HTTP front end)
    /// into an RGBA frame, stamped with the current time.
    pub fn decode(bytes: &[u8]) -> CaptureResult<Self> {
        let img = image::load_from_memory(bytes)?;
        let rgba = img.to_rgba8();

        Ok(Self {
            timestamp: chrono::Utc::now().timestamp_millis(),
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
            format: PixelFormat::RGBA8,
        })
    }

    /// Frame data converted to tightly packed RGB bytes (alpha dropped)
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity((self.width * self.height * 3) as usize);
        for chunk in self.data.chunks_exact(4) {
            match self.format {
                PixelFormat::RGBA8 => {
                    rgb.push(chunk[0]);
                    rgb.push(chunk[1]);
                    rgb.push(chunk[2]);
                }
                PixelFormat::BGRA8 => {
                    rgb.push(chunk[2]);
                    rgb.push(chunk[1]);
                    rgb.push(chunk[0]);
                }
            }
        }
        rgb
    }
}

/// Error types for frame acquisition and decoding
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Image decode failed: {0}")]
    DecodeFailed(#[from] image::ImageError),

    #[error("Camera not available: {0}")]
    CameraUnavailable(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Frame source closed")]
    SourceClosed,
}

pub type CaptureResult<T> = Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_to_rgb() {
        let frame = RawFrame {
            timestamp: 0,
            width: 1,
            height: 1,
            data: vec![10, 20, 30, 255], // B G R A
            format: PixelFormat::BGRA8,
        };

        assert_eq!(frame.to_rgb_bytes(), vec![30, 20, 10]);
    }

    #[test]
    fn test_rgba_to_rgb() {
        let frame = RawFrame {
            timestamp: 0,
            width: 2,
            height: 1,
            data: vec![1, 2, 3, 255, 4, 5, 6, 255],
            format: PixelFormat::RGBA8,
        };

        assert_eq!(frame.to_rgb_bytes(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = RawFrame::decode(&[0u8; 16]);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_png_roundtrip() {
        // Encode a tiny PNG with the image crate, then decode it back
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("Failed to encode test PNG");

        let frame = RawFrame::decode(&bytes).expect("Failed to decode frame");
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.format, PixelFormat::RGBA8);
        assert_eq!(frame.data.len(), 4 * 2 * 4);
    }
}
