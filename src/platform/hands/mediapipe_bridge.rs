// MediaPipe hand landmark bridge
// Abstraction over the external hand-landmark model; the gesture core only
// sees per-hand landmark sets in detection order, never the model itself.
// Can be implemented using PyO3 (Python MediaPipe) or any native backend.

use crate::models::capture::RawFrame;
use crate::models::hand::{GestureResult, HandPose, HandsConfig};

/// Hand landmark provider trait.
/// Hands are returned in detection order; the index of each entry is the
/// frame-local hand id the gesture tracker keys on. The model assigns no
/// persistent identity, so an index may refer to a different physical hand
/// from one frame to the next in multi-hand scenes.
pub trait HandLandmarkBridge: Send + Sync {
    /// Initialize the hand landmark model
    fn new(config: &HandsConfig) -> GestureResult<Self>
    where
        Self: Sized;

    /// Run inference on a frame, returning zero or more detected hands
    fn detect_hands(&self, frame: &RawFrame) -> GestureResult<Vec<HandPose>>;

    /// Check if the model is loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn model_info(&self) -> String;
}

// ==============================================================================
// PyO3 Implementation (Python MediaPipe)
// ==============================================================================

#[cfg(feature = "hands-pyo3")]
pub mod pyo3_backend {
    use super::*;
    use crate::models::hand::{GestureError, Handedness, Keypoint};
    use pyo3::prelude::*;
    use pyo3::types::{PyBytes, PyDict};
    use serde_json::Value;

    pub struct PyO3Hands {
        // Python inference module
        inference_module: PyObject,
        config: HandsConfig,
        initialized: bool,
    }

    impl HandLandmarkBridge for PyO3Hands {
        fn new(config: &HandsConfig) -> GestureResult<Self> {
            Python::with_gil(|py| {
                let sys = py
                    .import("sys")
                    .map_err(|e| GestureError::ModelLoadFailed(format!("Failed to import sys: {}", e)))?;

                let path_list = sys
                    .getattr("path")
                    .map_err(|e| GestureError::ModelLoadFailed(format!("Failed to get sys.path: {}", e)))?;

                let python_dir = std::env::current_dir().unwrap_or_default().join("python");

                path_list
                    .call_method1("insert", (0, python_dir.to_string_lossy().as_ref()))
                    .map_err(|e| {
                        GestureError::ModelLoadFailed(format!(
                            "Failed to add python dir to path: {}",
                            e
                        ))
                    })?;

                let inference_module = py.import("hand_inference").map_err(|e| {
                    GestureError::ModelLoadFailed(format!(
                        "Failed to import hand_inference: {}. Make sure Python dependencies are installed (pip install mediapipe)",
                        e
                    ))
                })?;

                println!(
                    "PyO3Hands initialized: max_hands={}, min_detection_confidence={}",
                    config.max_hands, config.min_detection_confidence
                );

                Ok(Self {
                    inference_module: inference_module.into(),
                    config: config.clone(),
                    initialized: true,
                })
            })
        }

        fn detect_hands(&self, frame: &RawFrame) -> GestureResult<Vec<HandPose>> {
            Python::with_gil(|py| {
                let module = self.inference_module.as_ref(py);

                let process_fn = module.getattr("process_image_bytes").map_err(|e| {
                    GestureError::InferenceFailed(format!("Failed to get process_image_bytes: {}", e))
                })?;

                let image_bytes = PyBytes::new(py, &frame.data);

                let kwargs = PyDict::new(py);
                kwargs
                    .set_item("image_bytes", image_bytes)
                    .map_err(|e| GestureError::InferenceFailed(format!("Failed to set image_bytes: {}", e)))?;
                kwargs
                    .set_item("width", frame.width)
                    .map_err(|e| GestureError::InferenceFailed(format!("Failed to set width: {}", e)))?;
                kwargs
                    .set_item("height", frame.height)
                    .map_err(|e| GestureError::InferenceFailed(format!("Failed to set height: {}", e)))?;
                kwargs
                    .set_item("max_hands", self.config.max_hands)
                    .map_err(|e| GestureError::InferenceFailed(format!("Failed to set max_hands: {}", e)))?;
                kwargs
                    .set_item("min_detection_confidence", self.config.min_detection_confidence)
                    .map_err(|e| {
                        GestureError::InferenceFailed(format!(
                            "Failed to set min_detection_confidence: {}",
                            e
                        ))
                    })?;
                kwargs
                    .set_item("min_tracking_confidence", self.config.min_tracking_confidence)
                    .map_err(|e| {
                        GestureError::InferenceFailed(format!(
                            "Failed to set min_tracking_confidence: {}",
                            e
                        ))
                    })?;

                let result_json = process_fn
                    .call((), Some(kwargs))
                    .map_err(|e| GestureError::InferenceFailed(format!("MediaPipe inference failed: {}", e)))?;

                let json_str: String = result_json
                    .extract()
                    .map_err(|e| GestureError::InferenceFailed(format!("Failed to extract JSON: {}", e)))?;

                let result: Value = serde_json::from_str(&json_str)
                    .map_err(|e| GestureError::InferenceFailed(format!("Failed to parse JSON: {}", e)))?;

                let hands = result
                    .get("hands")
                    .and_then(|h| h.as_array())
                    .map(|hands| {
                        hands
                            .iter()
                            .filter_map(|hand| Self::parse_hand(hand).ok())
                            .collect()
                    })
                    .unwrap_or_default();

                Ok(hands)
            })
        }

        fn is_initialized(&self) -> bool {
            self.initialized
        }

        fn model_info(&self) -> String {
            format!(
                "PyO3 MediaPipe Hands (Python backend) - max_hands: {}",
                self.config.max_hands
            )
        }
    }

    impl PyO3Hands {
        fn parse_hand(data: &Value) -> GestureResult<HandPose> {
            let keypoints = data
                .get("keypoints")
                .and_then(|k| k.as_array())
                .ok_or_else(|| GestureError::InferenceFailed("Missing hand keypoints".to_string()))?;

            let landmarks: Vec<Keypoint> = keypoints
                .iter()
                .map(|kp| Keypoint {
                    x: kp.get("x").and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
                    y: kp.get("y").and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
                    z: kp.get("z").and_then(|v| v.as_f64()).unwrap_or(0.0) as f32,
                })
                .collect();

            let handedness = data
                .get("hand_type")
                .and_then(|t| t.as_str())
                .map(|t| {
                    if t == "Left" {
                        Handedness::Left
                    } else {
                        Handedness::Right
                    }
                });

            let confidence = data
                .get("confidence")
                .and_then(|c| c.as_f64())
                .unwrap_or(0.0) as f32;

            Ok(HandPose {
                landmarks,
                handedness,
                confidence,
            })
        }
    }
}

// ==============================================================================
// Dummy Implementation (for compilation without ML features)
// ==============================================================================

#[cfg(not(feature = "hands-pyo3"))]
pub struct DummyHands {
    config: HandsConfig,
}

#[cfg(not(feature = "hands-pyo3"))]
impl HandLandmarkBridge for DummyHands {
    fn new(config: &HandsConfig) -> GestureResult<Self> {
        println!("Using dummy hand landmark implementation (no inference)");
        println!("Enable the 'hands-pyo3' feature for actual hand detection");
        Ok(Self {
            config: config.clone(),
        })
    }

    fn detect_hands(&self, _frame: &RawFrame) -> GestureResult<Vec<HandPose>> {
        Ok(vec![])
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn model_info(&self) -> String {
        format!(
            "Dummy hands (no ML inference - enable 'hands-pyo3' feature) - max_hands: {}",
            self.config.max_hands
        )
    }
}

// ==============================================================================
// Default Backend Selection
// ==============================================================================

#[cfg(feature = "hands-pyo3")]
pub type DefaultHands = pyo3_backend::PyO3Hands;

#[cfg(not(feature = "hands-pyo3"))]
pub type DefaultHands = DummyHands;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::capture::PixelFormat;

    #[test]
    fn test_default_backend_reports_no_hands_without_ml() {
        let bridge = DefaultHands::new(&HandsConfig::default()).expect("Failed to create bridge");

        #[cfg(not(feature = "hands-pyo3"))]
        {
            assert!(!bridge.is_initialized());

            let frame = RawFrame {
                timestamp: 0,
                width: 4,
                height: 4,
                data: vec![0u8; 4 * 4 * 4],
                format: PixelFormat::RGBA8,
            };
            let hands = bridge.detect_hands(&frame).expect("Inference failed");
            assert!(hands.is_empty());
        }

        let _ = bridge.model_info();
    }
}
