pub mod config;
pub mod frame_source;
pub mod gesture_service;
pub mod gesture_tracker;

// Alert delivery for completed gestures
pub mod alert_sink;
pub mod alert_store;
