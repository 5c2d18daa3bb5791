// Gesture detection service - one pipeline behind both front ends
//
// frame -> hand landmark bridge -> per-hand tracker -> alert dispatch.
// The HTTP shell feeds encoded image bytes through process_image; the live
// shell drains a FrameSource through run. Both end up in process_frame.

use crate::core::alert_sink::{AlertResult, FrameSink, LocationSink};
use crate::core::alert_store::{alert_key, encode_jpeg, AlertStore};
use crate::core::config::Config;
use crate::core::frame_source::FrameSource;
use crate::core::gesture_tracker::GestureTracker;
use crate::models::capture::RawFrame;
use crate::models::hand::{FrameReport, GestureError, GestureResult};
use crate::platform::hands::HandLandmarkBridge;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct GestureService {
    session_id: Uuid,
    bridge: Arc<dyn HandLandmarkBridge>,
    tracker: GestureTracker,
    store: AlertStore,
    frame_sink: Option<Arc<dyn FrameSink>>,
    location_sink: Option<Arc<dyn LocationSink>>,
    alert_location: (f64, f64),
}

impl GestureService {
    /// Create the service around an already-initialized landmark bridge
    pub fn new(bridge: Arc<dyn HandLandmarkBridge>, config: &Config) -> GestureResult<Self> {
        config
            .validate()
            .map_err(|e| GestureError::InvalidConfig(e.to_string()))?;

        let store = AlertStore::new(&config.output_directory)
            .map_err(|e| GestureError::InvalidConfig(format!("Output directory: {}", e)))?;

        let session_id = Uuid::new_v4();
        println!("Started gesture session {}", session_id);

        Ok(Self {
            session_id,
            bridge,
            tracker: GestureTracker::with_reset_timeout(Duration::from_millis(
                config.reset_timeout_ms,
            )),
            store,
            frame_sink: None,
            location_sink: None,
            alert_location: (config.alert_latitude, config.alert_longitude),
        })
    }

    /// Attach the cloud collaborators called on gesture completion
    pub fn with_sinks(
        mut self,
        frame_sink: Option<Arc<dyn FrameSink>>,
        location_sink: Option<Arc<dyn LocationSink>>,
    ) -> Self {
        self.frame_sink = frame_sink;
        self.location_sink = location_sink;
        self
    }

    /// Process one decoded frame: observe every detected hand and dispatch
    /// an alert for each completed gesture. Sink failures are logged, not
    /// propagated - the frame report stays truthful about the gesture.
    pub async fn process_frame(&self, frame: &RawFrame) -> GestureResult<FrameReport> {
        let hands = self.bridge.detect_hands(frame)?;

        let mut report = FrameReport {
            hands_detected: !hands.is_empty(),
            gesture_completed: false,
        };

        for (hand_id, hand) in hands.iter().enumerate() {
            // Partial landmark sets classify as nothing and are skipped
            let tips = match hand.finger_tips() {
                Some(tips) => tips,
                None => continue,
            };

            let observation = self.tracker.observe(hand_id, &tips).await;
            if observation.gesture_completed {
                report.gesture_completed = true;
                if let Err(e) = self.dispatch_alert(frame).await {
                    eprintln!("Failed to dispatch alert for hand {}: {}", hand_id, e);
                }
            }
        }

        Ok(report)
    }

    /// Process an encoded image as posted by the HTTP front end
    pub async fn process_image(&self, bytes: &[u8]) -> GestureResult<FrameReport> {
        let frame = RawFrame::decode(bytes)?;
        self.process_frame(&frame).await
    }

    /// Drain a live frame source until it closes
    pub async fn run<S: FrameSource>(&self, source: &mut S) -> GestureResult<()> {
        while let Some(frame) = source.next_frame().await? {
            self.process_frame(&frame).await?;
        }
        Ok(())
    }

    /// End the session: drop all per-hand gesture state
    pub async fn end_session(&self) {
        self.tracker.clear().await;
        println!("Ended gesture session {}", self.session_id);
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub fn model_info(&self) -> String {
        self.bridge.model_info()
    }

    /// Save the triggering frame locally, then hand it to the cloud sinks
    async fn dispatch_alert(&self, frame: &RawFrame) -> AlertResult<PathBuf> {
        let key = alert_key();
        let jpeg = encode_jpeg(frame)?;

        let path = self.store.save(&key, &jpeg).await?;

        if let Some(sink) = &self.frame_sink {
            sink.put_frame(&key, &jpeg).await?;
        }

        if let Some(sink) = &self.location_sink {
            let (latitude, longitude) = self.alert_location;
            sink.set_location(latitude, longitude).await?;
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alert_sink::AlertError;
    use crate::core::frame_source::QueuedFrameSource;
    use crate::models::capture::PixelFormat;
    use crate::models::hand::{HandPose, HandsConfig, Keypoint, HAND_LANDMARK_COUNT};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Bridge that replays scripted per-frame hand sets
    struct ScriptedHands {
        frames: Mutex<VecDeque<Vec<HandPose>>>,
    }

    impl ScriptedHands {
        fn with_frames(frames: Vec<Vec<HandPose>>) -> Self {
            Self {
                frames: Mutex::new(frames.into()),
            }
        }
    }

    impl HandLandmarkBridge for ScriptedHands {
        fn new(_config: &HandsConfig) -> GestureResult<Self> {
            Ok(Self::with_frames(vec![]))
        }

        fn detect_hands(&self, _frame: &RawFrame) -> GestureResult<Vec<HandPose>> {
            Ok(self
                .frames
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn model_info(&self) -> String {
            "Scripted hands (test)".to_string()
        }
    }

    /// Location sink that records calls
    #[derive(Default)]
    struct RecordingLocationSink {
        calls: Mutex<Vec<(f64, f64)>>,
    }

    #[async_trait::async_trait]
    impl LocationSink for RecordingLocationSink {
        async fn set_location(&self, latitude: f64, longitude: f64) -> AlertResult<()> {
            self.calls.lock().unwrap().push((latitude, longitude));
            Ok(())
        }
    }

    /// Frame sink that always fails
    struct FailingFrameSink;

    #[async_trait::async_trait]
    impl FrameSink for FailingFrameSink {
        async fn put_frame(&self, _key: &str, _jpeg: &[u8]) -> AlertResult<()> {
            Err(AlertError::Rejected("offline".to_string()))
        }
    }

    fn hand_with_tips(thumb_y: f32, finger_y: f32) -> HandPose {
        let mut landmarks = vec![Keypoint::new(0.5, 0.5, 0.0); HAND_LANDMARK_COUNT];
        landmarks[4].y = thumb_y; // thumb tip
        for idx in [8, 12, 16, 20] {
            landmarks[idx].y = finger_y;
        }
        HandPose {
            landmarks,
            handedness: None,
            confidence: 0.9,
        }
    }

    fn closed_hand() -> HandPose {
        hand_with_tips(0.2, 0.6)
    }

    fn open_hand() -> HandPose {
        hand_with_tips(0.8, 0.4)
    }

    fn test_frame() -> RawFrame {
        RawFrame {
            timestamp: 0,
            width: 4,
            height: 4,
            data: vec![200u8; 4 * 4 * 4],
            format: PixelFormat::RGBA8,
        }
    }

    fn full_cycle_frames() -> Vec<Vec<HandPose>> {
        vec![
            vec![closed_hand()],
            vec![open_hand()],
            vec![closed_hand()],
            vec![open_hand()],
            vec![closed_hand()],
        ]
    }

    fn test_config(dir_name: &str) -> Config {
        let mut config = Config::default();
        config.output_directory = std::env::temp_dir().join(dir_name);
        config
    }

    #[tokio::test]
    async fn test_empty_frame_reports_no_hands() {
        let config = test_config("guardian_gesture_test_empty");
        let bridge = Arc::new(ScriptedHands::with_frames(vec![vec![]]));
        let service = GestureService::new(bridge, &config).expect("Failed to create service");

        let report = service.process_frame(&test_frame()).await.unwrap();
        assert!(!report.hands_detected);
        assert!(!report.gesture_completed);

        let _ = std::fs::remove_dir_all(&config.output_directory);
    }

    #[tokio::test]
    async fn test_full_cycle_completes_and_saves_frame() {
        let config = test_config("guardian_gesture_test_cycle");
        let _ = std::fs::remove_dir_all(&config.output_directory);

        let bridge = Arc::new(ScriptedHands::with_frames(full_cycle_frames()));
        let location_sink = Arc::new(RecordingLocationSink::default());
        let service = GestureService::new(bridge, &config)
            .expect("Failed to create service")
            .with_sinks(None, Some(location_sink.clone()));

        let frame = test_frame();
        let mut reports = Vec::new();
        for _ in 0..5 {
            reports.push(service.process_frame(&frame).await.unwrap());
        }

        assert!(reports.iter().all(|r| r.hands_detected));
        let completions: Vec<bool> = reports.iter().map(|r| r.gesture_completed).collect();
        assert_eq!(completions, vec![false, false, false, false, true]);

        // One alert frame landed in the output directory
        let saved: Vec<_> = std::fs::read_dir(&config.output_directory)
            .unwrap()
            .collect();
        assert_eq!(saved.len(), 1);

        // The fixed coordinate was recorded exactly once
        let calls = location_sink.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(22.294858, 73.362279)]);

        let _ = std::fs::remove_dir_all(&config.output_directory);
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_the_frame() {
        let config = test_config("guardian_gesture_test_failing_sink");
        let _ = std::fs::remove_dir_all(&config.output_directory);

        let bridge = Arc::new(ScriptedHands::with_frames(full_cycle_frames()));
        let service = GestureService::new(bridge, &config)
            .expect("Failed to create service")
            .with_sinks(Some(Arc::new(FailingFrameSink)), None);

        let frame = test_frame();
        let mut last = FrameReport::default();
        for _ in 0..5 {
            last = service.process_frame(&frame).await.unwrap();
        }

        // The gesture still reports completed; only the upload was lost
        assert!(last.gesture_completed);

        let _ = std::fs::remove_dir_all(&config.output_directory);
    }

    #[tokio::test]
    async fn test_partial_landmarks_are_skipped() {
        let config = test_config("guardian_gesture_test_partial");

        let stub_hand = HandPose {
            landmarks: vec![Keypoint::new(0.5, 0.5, 0.0); 5],
            handedness: None,
            confidence: 0.3,
        };
        let bridge = Arc::new(ScriptedHands::with_frames(vec![vec![stub_hand]]));
        let service = GestureService::new(bridge, &config).expect("Failed to create service");

        let report = service.process_frame(&test_frame()).await.unwrap();
        assert!(report.hands_detected);
        assert!(!report.gesture_completed);
        // The hand record was never created
        assert_eq!(service.tracker().tracked_hands().await, 0);

        let _ = std::fs::remove_dir_all(&config.output_directory);
    }

    #[tokio::test]
    async fn test_run_drains_frame_source() {
        let config = test_config("guardian_gesture_test_run");
        let _ = std::fs::remove_dir_all(&config.output_directory);

        let bridge = Arc::new(ScriptedHands::with_frames(full_cycle_frames()));
        let service = GestureService::new(bridge, &config).expect("Failed to create service");

        let mut source = QueuedFrameSource::new(std::iter::repeat(test_frame()).take(5));
        service.run(&mut source).await.expect("Run failed");

        // The completed cycle produced one saved alert frame
        let saved: Vec<_> = std::fs::read_dir(&config.output_directory)
            .unwrap()
            .collect();
        assert_eq!(saved.len(), 1);

        let _ = std::fs::remove_dir_all(&config.output_directory);
    }

    #[tokio::test]
    async fn test_process_image_decodes_and_reports() {
        let config = test_config("guardian_gesture_test_image");
        let bridge = Arc::new(ScriptedHands::with_frames(vec![vec![closed_hand()]]));
        let service = GestureService::new(bridge, &config).expect("Failed to create service");

        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();

        let report = service.process_image(&bytes).await.unwrap();
        assert!(report.hands_detected);
        assert!(!report.gesture_completed);

        // Garbage bytes surface as a capture error
        assert!(service.process_image(&[0u8; 8]).await.is_err());

        let _ = std::fs::remove_dir_all(&config.output_directory);
    }

    #[tokio::test]
    async fn test_end_session_clears_tracker() {
        let config = test_config("guardian_gesture_test_end");
        let bridge = Arc::new(ScriptedHands::with_frames(vec![vec![closed_hand()]]));
        let service = GestureService::new(bridge, &config).expect("Failed to create service");

        service.process_frame(&test_frame()).await.unwrap();
        assert_eq!(service.tracker().tracked_hands().await, 1);

        service.end_session().await;
        assert_eq!(service.tracker().tracked_hands().await, 0);

        let _ = std::fs::remove_dir_all(&config.output_directory);
    }
}
