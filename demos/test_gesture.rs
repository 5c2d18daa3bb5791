// Test the panic gesture state machine with a synthetic fingertip feed

use guardian_gesture::models::hand::FingerTips;
use guardian_gesture::{GestureState, GestureTracker};
use std::time::Duration;

#[tokio::main]
async fn main() {
    println!("=== Gesture Tracker Test ===\n");

    let tracker = GestureTracker::with_reset_timeout(Duration::from_millis(500));

    let closed = FingerTips::new(0.2, 0.6, 0.6, 0.6, 0.6);
    let open = FingerTips::new(0.8, 0.4, 0.4, 0.4, 0.4);

    // Test 1: full closed/open/closed/open/closed cycle
    println!("Test 1: Full gesture cycle...");
    let sequence = [
        ("closed", closed),
        ("open", open),
        ("closed", closed),
        ("open", open),
        ("closed", closed),
    ];

    for (label, tips) in &sequence {
        let observation = tracker.observe(0, tips).await;
        println!(
            "  {} -> state_changed: {}, gesture_completed: {}",
            label, observation.state_changed, observation.gesture_completed
        );
    }

    match tracker.snapshot(0).await {
        Some(snapshot) if snapshot.state == GestureState::Idle && snapshot.close_count == 0 => {
            println!("✓ Record reset to baseline after completion\n");
        }
        other => println!("✗ Unexpected record state: {:?}\n", other),
    }

    // Test 2: inactivity timeout
    println!("Test 2: Inactivity timeout...");
    tracker.observe(1, &closed).await;
    tokio::time::sleep(Duration::from_millis(800)).await;

    match tracker.snapshot(1).await {
        Some(snapshot) if snapshot.state == GestureState::Idle && snapshot.close_count == 0 => {
            println!("✓ Partial progress discarded after timeout\n");
        }
        other => println!("✗ Unexpected record state: {:?}\n", other),
    }

    // Test 3: ambiguous geometry never transitions
    println!("Test 3: Ambiguous geometry...");
    let ambiguous = FingerTips::new(0.5, 0.5, 0.6, 0.6, 0.6);
    let observation = tracker.observe(2, &ambiguous).await;
    if !observation.state_changed {
        println!("✓ Tie between thumb and index produced no transition\n");
    } else {
        println!("✗ Ambiguous geometry transitioned\n");
    }

    println!("=== Test Complete ===");
}
