pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::gesture_service::GestureService;
pub use crate::core::gesture_tracker::{GestureState, GestureTracker, Observation};
pub use crate::models::hand::{FingerTips, FrameReport, HandShape};
