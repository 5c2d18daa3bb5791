// Test alert frame encoding and local storage

use guardian_gesture::core::alert_store::{alert_key, encode_jpeg, AlertStore};
use guardian_gesture::models::capture::{PixelFormat, RawFrame};

#[tokio::main]
async fn main() {
    println!("=== Alert Store Test ===\n");

    // A solid gray frame stands in for a camera capture
    let frame = RawFrame {
        timestamp: chrono::Utc::now().timestamp_millis(),
        width: 320,
        height: 240,
        data: vec![128u8; 320 * 240 * 4],
        format: PixelFormat::RGBA8,
    };

    println!("Test 1: Encoding frame as JPEG...");
    match encode_jpeg(&frame) {
        Ok(jpeg) => {
            println!("✓ Encoded {} bytes", jpeg.len());

            println!("\nTest 2: Saving alert frame...");
            let dir = std::env::temp_dir().join("guardian_gesture_demo");
            match AlertStore::new(&dir) {
                Ok(store) => {
                    let key = alert_key();
                    match store.save(&key, &jpeg).await {
                        Ok(path) => println!("✓ Saved to {}", path.display()),
                        Err(e) => println!("✗ Failed to save: {}", e),
                    }
                }
                Err(e) => println!("✗ Failed to create store: {}", e),
            }
            let _ = std::fs::remove_dir_all(std::env::temp_dir().join("guardian_gesture_demo"));
        }
        Err(e) => println!("✗ Failed to encode: {}", e),
    }

    println!("\n=== Test Complete ===");
}
