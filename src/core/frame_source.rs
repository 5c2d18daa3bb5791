// Frame source abstraction - the live-camera front end behind a trait
//
// Video capture itself is a collaborator, not part of this crate; the
// gesture service only needs a stream of frames it can drain.

use crate::models::capture::{CaptureResult, RawFrame};
use async_trait::async_trait;

/// A live stream of frames driving the gesture pipeline
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame, or None once the source is exhausted/closed
    async fn next_frame(&mut self) -> CaptureResult<Option<RawFrame>>;
}

/// Frame source backed by an in-memory queue, useful for tests and replay
pub struct QueuedFrameSource {
    frames: std::collections::VecDeque<RawFrame>,
}

impl QueuedFrameSource {
    pub fn new(frames: impl IntoIterator<Item = RawFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

#[async_trait]
impl FrameSource for QueuedFrameSource {
    async fn next_frame(&mut self) -> CaptureResult<Option<RawFrame>> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::capture::PixelFormat;

    #[tokio::test]
    async fn test_queued_source_drains() {
        let frame = RawFrame {
            timestamp: 1,
            width: 2,
            height: 2,
            data: vec![0u8; 16],
            format: PixelFormat::RGBA8,
        };

        let mut source = QueuedFrameSource::new([frame.clone(), frame]);
        assert!(source.next_frame().await.unwrap().is_some());
        assert!(source.next_frame().await.unwrap().is_some());
        assert!(source.next_frame().await.unwrap().is_none());
    }
}
