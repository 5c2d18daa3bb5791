// Cloud collaborators for completed gestures - frame upload and location record
//
// The tracker only decides when to alert; these sinks own how the alert is
// delivered. The Firebase implementations talk to the Storage and Realtime
// Database REST endpoints.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Alert error: {0}")]
    Other(String),
}

pub type AlertResult<T> = Result<T, AlertError>;

/// Accepts a completed-gesture frame for persistence/upload
#[async_trait]
pub trait FrameSink: Send + Sync {
    async fn put_frame(&self, key: &str, jpeg: &[u8]) -> AlertResult<()>;
}

/// Records the alert coordinate alongside a completed gesture
#[async_trait]
pub trait LocationSink: Send + Sync {
    async fn set_location(&self, latitude: f64, longitude: f64) -> AlertResult<()>;
}

// ==============================================================================
// Firebase Storage (frame upload)
// ==============================================================================

/// Uploads alert frames to a Firebase Storage bucket under `images/`
pub struct FirebaseStorageSink {
    client: Client,
    bucket: String,
    folder: String,
}

impl FirebaseStorageSink {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            bucket: bucket.into(),
            folder: "images".to_string(),
        }
    }

    fn upload_url(&self, key: &str) -> String {
        // Object names are passed in the query string, slash percent-encoded
        format!(
            "https://firebasestorage.googleapis.com/v0/b/{}/o?name={}%2F{}",
            self.bucket, self.folder, key
        )
    }
}

#[async_trait]
impl FrameSink for FirebaseStorageSink {
    async fn put_frame(&self, key: &str, jpeg: &[u8]) -> AlertResult<()> {
        let response = self
            .client
            .post(self.upload_url(key))
            .header(CONTENT_TYPE, "image/jpeg")
            .body(jpeg.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AlertError::Rejected(format!(
                "Storage upload of {} failed with status {}",
                key,
                response.status()
            )));
        }

        println!("Image {} successfully uploaded to Firebase", key);
        Ok(())
    }
}

// ==============================================================================
// Firebase Realtime Database (location record)
// ==============================================================================

/// Writes the alert coordinate to a Realtime Database path
pub struct FirebaseDatabaseSink {
    client: Client,
    database_url: String,
    path: String,
}

impl FirebaseDatabaseSink {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            database_url: database_url.into(),
            path: "location".to_string(),
        }
    }

    fn location_url(&self) -> String {
        format!(
            "{}/{}.json",
            self.database_url.trim_end_matches('/'),
            self.path
        )
    }
}

#[async_trait]
impl LocationSink for FirebaseDatabaseSink {
    async fn set_location(&self, latitude: f64, longitude: f64) -> AlertResult<()> {
        let response = self
            .client
            .put(self.location_url())
            .json(&json!({
                "latitude": latitude,
                "longitude": longitude,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AlertError::Rejected(format!(
                "Location write failed with status {}",
                response.status()
            )));
        }

        println!(
            "Location {}, {} successfully sent to Firebase",
            latitude, longitude
        );
        Ok(())
    }
}
