use crate::models::hand::HandsConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Where completed-gesture frames are saved
    pub output_directory: PathBuf,
    /// Inactivity window before partial gesture progress is discarded
    pub reset_timeout_ms: u64,
    /// Fixed coordinate reported with every alert
    pub alert_latitude: f64,
    pub alert_longitude: f64,
    /// Maximum simultaneously tracked hands
    pub max_hands: usize,
    /// Minimum confidence for hand detection (0.0-1.0)
    pub min_detection_confidence: f32,
    /// Minimum confidence for hand tracking (0.0-1.0)
    pub min_tracking_confidence: f32,
    /// Firebase Storage bucket for alert frames (uploads disabled if unset)
    pub storage_bucket: Option<String>,
    /// Firebase Realtime Database URL for the location record
    pub database_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("captured_images"),
            reset_timeout_ms: 3000,
            alert_latitude: 22.294858,
            alert_longitude: 73.362279,
            max_hands: 10,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            storage_bucket: None,
            database_url: None,
        }
    }
}

impl Config {
    /// Load configuration from file, creating with defaults if it doesn't exist
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            // Create default config and save it
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.validate()?;

        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.reset_timeout_ms == 0 || self.reset_timeout_ms > 60_000 {
            return Err(format!(
                "Invalid reset timeout: {} ms. Must be between 1 and 60000",
                self.reset_timeout_ms
            )
            .into());
        }

        if self.max_hands == 0 || self.max_hands > 32 {
            return Err(format!(
                "Invalid max hands: {}. Must be between 1 and 32",
                self.max_hands
            )
            .into());
        }

        if !(0.0..=1.0).contains(&self.min_detection_confidence) {
            return Err(format!(
                "Invalid detection confidence: {}. Must be between 0.0 and 1.0",
                self.min_detection_confidence
            )
            .into());
        }

        if !(0.0..=1.0).contains(&self.min_tracking_confidence) {
            return Err(format!(
                "Invalid tracking confidence: {}. Must be between 0.0 and 1.0",
                self.min_tracking_confidence
            )
            .into());
        }

        if !(-90.0..=90.0).contains(&self.alert_latitude) {
            return Err(format!(
                "Invalid latitude: {}. Must be between -90 and 90",
                self.alert_latitude
            )
            .into());
        }

        if !(-180.0..=180.0).contains(&self.alert_longitude) {
            return Err(format!(
                "Invalid longitude: {}. Must be between -180 and 180",
                self.alert_longitude
            )
            .into());
        }

        Ok(())
    }

    /// Detector parameters derived from this configuration
    pub fn hands_config(&self) -> HandsConfig {
        HandsConfig {
            static_image_mode: false,
            max_hands: self.max_hands,
            min_detection_confidence: self.min_detection_confidence,
            min_tracking_confidence: self.min_tracking_confidence,
        }
    }

    /// Get the configuration file path
    fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| "Could not determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".guardian_gesture");
        path.push("config");
        path.push("settings.json");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output_directory, PathBuf::from("captured_images"));
        assert_eq!(config.reset_timeout_ms, 3000);
        assert_eq!(config.max_hands, 10);
        assert_eq!(config.min_detection_confidence, 0.5);
        assert_eq!(config.min_tracking_confidence, 0.5);
        assert_eq!(config.alert_latitude, 22.294858);
        assert_eq!(config.alert_longitude, 73.362279);
        assert!(config.storage_bucket.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.reset_timeout_ms = 0;
        assert!(config.validate().is_err());
        config.reset_timeout_ms = 3000;

        config.max_hands = 0;
        assert!(config.validate().is_err());
        config.max_hands = 100;
        assert!(config.validate().is_err());
        config.max_hands = 10;

        config.min_detection_confidence = 1.5;
        assert!(config.validate().is_err());
        config.min_detection_confidence = 0.5;

        config.alert_latitude = 120.0;
        assert!(config.validate().is_err());
        config.alert_latitude = 22.294858;

        config.alert_longitude = -200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_hands_config_derivation() {
        let mut config = Config::default();
        config.max_hands = 4;
        config.min_detection_confidence = 0.7;

        let hands = config.hands_config();
        assert_eq!(hands.max_hands, 4);
        assert_eq!(hands.min_detection_confidence, 0.7);
        assert!(!hands.static_image_mode);
    }
}
