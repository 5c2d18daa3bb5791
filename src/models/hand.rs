// Data models for hand landmark detection and gesture classification

use serde::{Deserialize, Serialize};

// ==============================================================================
// Hand Landmarks (21 keypoints per hand)
// ==============================================================================

/// One detected hand in a frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandPose {
    pub landmarks: Vec<Keypoint>, // 21 hand landmarks
    pub handedness: Option<Handedness>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

/// MediaPipe Hand Landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

pub const HAND_LANDMARK_COUNT: usize = 21;

/// A normalized image-space keypoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32, // Normalized [0, 1], left to right
    pub y: f32, // Normalized [0, 1], top to bottom (smaller = higher in frame)
    pub z: f32, // Depth relative to the wrist
}

impl Keypoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl HandPose {
    /// Vertical positions of the five fingertips, or None when the
    /// landmark set is incomplete (partial detection).
    pub fn finger_tips(&self) -> Option<FingerTips> {
        FingerTips::from_landmarks(&self.landmarks)
    }
}

// ==============================================================================
// Fingertips & Shape Classification
// ==============================================================================

/// Vertical fingertip positions for one hand in one frame.
/// The whole gesture classification is relational on these five values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerTips {
    pub thumb_y: f32,
    pub index_y: f32,
    pub middle_y: f32,
    pub ring_y: f32,
    pub pinky_y: f32,
}

/// Hand shape as seen by the gesture state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandShape {
    Closed,
    Open,
}

impl FingerTips {
    pub fn new(thumb_y: f32, index_y: f32, middle_y: f32, ring_y: f32, pinky_y: f32) -> Self {
        Self {
            thumb_y,
            index_y,
            middle_y,
            ring_y,
            pinky_y,
        }
    }

    /// Extract fingertip y-coordinates from a 21-landmark hand
    pub fn from_landmarks(landmarks: &[Keypoint]) -> Option<Self> {
        if landmarks.len() < HAND_LANDMARK_COUNT {
            return None;
        }

        Some(Self {
            thumb_y: landmarks[HandLandmark::ThumbTip as usize].y,
            index_y: landmarks[HandLandmark::IndexFingerTip as usize].y,
            middle_y: landmarks[HandLandmark::MiddleFingerTip as usize].y,
            ring_y: landmarks[HandLandmark::RingFingerTip as usize].y,
            pinky_y: landmarks[HandLandmark::PinkyTip as usize].y,
        })
    }

    /// Classify the hand shape. A closed fist raises the thumb tip above all
    /// four finger tips; an open hand drops it below all four. Ties or mixed
    /// orderings (partial occlusion) classify as neither.
    pub fn shape(&self) -> Option<HandShape> {
        let fingers = [self.index_y, self.middle_y, self.ring_y, self.pinky_y];

        if fingers.iter().all(|&y| self.thumb_y < y) {
            Some(HandShape::Closed)
        } else if fingers.iter().all(|&y| self.thumb_y > y) {
            Some(HandShape::Open)
        } else {
            None
        }
    }
}

// ==============================================================================
// Frame Report (caller-facing output)
// ==============================================================================

/// Per-frame result returned to the front ends; serialized as-is by the
/// HTTP shell's JSON response.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FrameReport {
    pub hands_detected: bool,
    pub gesture_completed: bool,
}

// ==============================================================================
// Detector Configuration
// ==============================================================================

/// Hand landmark model parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HandsConfig {
    pub static_image_mode: bool,
    pub max_hands: usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl Default for HandsConfig {
    fn default() -> Self {
        Self {
            static_image_mode: false,
            max_hands: 10,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Capture error: {0}")]
    Capture(#[from] crate::models::capture::CaptureError),
}

pub type GestureResult<T> = Result<T, GestureError>;
