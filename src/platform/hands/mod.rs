// Hand landmark detection platform integration
// Provides the MediaPipe bridge and backend selection

pub mod mediapipe_bridge;

pub use mediapipe_bridge::{DefaultHands, HandLandmarkBridge};
