// Per-hand panic gesture state machine with inactivity reset
//
// Tracks one record per hand id and watches each hand for the full
// closed -> open -> closed -> open -> closed fist sequence. Any transition
// re-arms a dead-man timer; 3 seconds of inactivity silently discards
// partial progress so a stale half-gesture cannot fire later.

use crate::models::hand::{FingerTips, HandShape};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Inactivity window after which a partially completed gesture is discarded
pub const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_secs(3);

/// Gesture progression for a single hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Closed,
    ClosedTwice,
}

/// Result of one observation of one hand
#[derive(Debug, Clone, Copy, Default)]
pub struct Observation {
    pub state_changed: bool,
    pub gesture_completed: bool,
}

/// Point-in-time view of one hand's record, for shells and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSnapshot {
    pub state: GestureState,
    pub close_count: u8,
}

struct HandGestureRecord {
    state: GestureState,
    close_count: u8,
    // Bumped on every arm/reset; a woken timer only applies if its epoch
    // is still current, so an aborted-but-already-awake timer is a no-op.
    epoch: u64,
    reset_task: Option<JoinHandle<()>>,
}

impl Default for HandGestureRecord {
    fn default() -> Self {
        Self {
            state: GestureState::Idle,
            close_count: 0,
            epoch: 0,
            reset_task: None,
        }
    }
}

type RecordTable = Arc<Mutex<HashMap<usize, HandGestureRecord>>>;

/// Tracks gesture progress for every hand visible in the session.
///
/// All record fields are read and written under a single table lock; the
/// timeout tasks sleep outside the lock and take it only to apply the reset.
pub struct GestureTracker {
    records: RecordTable,
    reset_timeout: Duration,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::with_reset_timeout(DEFAULT_RESET_TIMEOUT)
    }

    pub fn with_reset_timeout(reset_timeout: Duration) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            reset_timeout,
        }
    }

    /// Feed one observation of one hand into the state machine.
    ///
    /// Creates the record lazily on first sight. Ambiguous fingertip
    /// geometry (neither closed nor open) never transitions. Every
    /// transition re-arms the inactivity timer; the completing transition
    /// additionally reports `gesture_completed` and resets the record.
    pub async fn observe(&self, hand_id: usize, tips: &FingerTips) -> Observation {
        let mut table = self.records.lock().await;
        let record = table.entry(hand_id).or_default();

        let mut observation = Observation::default();

        match (record.state, tips.shape()) {
            (GestureState::Idle, Some(HandShape::Closed)) => {
                record.state = GestureState::Closed;
                record.close_count += 1;
                observation.state_changed = true;
                println!("Hand {} closed", hand_id);
            }
            (GestureState::Closed, Some(HandShape::Open)) => {
                // Only a second closure advances; a stray first-cycle open
                // regresses to Idle but keeps the close count so the next
                // closure counts as the second.
                record.state = if record.close_count == 2 {
                    GestureState::ClosedTwice
                } else {
                    GestureState::Idle
                };
                observation.state_changed = true;
                println!("Hand {} opened", hand_id);
            }
            (GestureState::ClosedTwice, Some(HandShape::Closed)) => {
                record.state = GestureState::Idle;
                record.close_count = 0;
                observation.state_changed = true;
                observation.gesture_completed = true;
                println!("Gesture completed for hand {}", hand_id);
            }
            _ => {}
        }

        if observation.state_changed {
            self.arm_reset(hand_id, record);
        }

        observation
    }

    /// Force a hand back to baseline, as the inactivity timer does
    pub async fn reset_hand(&self, hand_id: usize) {
        let mut table = self.records.lock().await;
        if let Some(record) = table.get_mut(&hand_id) {
            Self::apply_reset(record);
            println!("Gesture reset for hand {}", hand_id);
        }
    }

    /// Inspect a hand's current state
    pub async fn snapshot(&self, hand_id: usize) -> Option<RecordSnapshot> {
        let table = self.records.lock().await;
        table.get(&hand_id).map(|record| RecordSnapshot {
            state: record.state,
            close_count: record.close_count,
        })
    }

    /// Number of hands seen this session
    pub async fn tracked_hands(&self) -> usize {
        self.records.lock().await.len()
    }

    /// End the session: cancel all pending timers and drop all records
    pub async fn clear(&self) {
        let mut table = self.records.lock().await;
        for record in table.values_mut() {
            if let Some(task) = record.reset_task.take() {
                task.abort();
            }
        }
        table.clear();
    }

    /// Cancel any previous timer and schedule a fresh one. Runs under the
    /// table lock, so exactly one timer is ever armed per record.
    fn arm_reset(&self, hand_id: usize, record: &mut HandGestureRecord) {
        if let Some(task) = record.reset_task.take() {
            task.abort();
        }
        record.epoch += 1;

        let epoch = record.epoch;
        let records = Arc::clone(&self.records);
        let timeout = self.reset_timeout;

        record.reset_task = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;

            let mut table = records.lock().await;
            if let Some(record) = table.get_mut(&hand_id) {
                if record.epoch == epoch {
                    Self::apply_reset(record);
                    println!("Gesture reset due to timeout for hand {}", hand_id);
                }
            }
        }));
    }

    fn apply_reset(record: &mut HandGestureRecord) {
        record.state = GestureState::Idle;
        record.close_count = 0;
        record.epoch += 1;
        if let Some(task) = record.reset_task.take() {
            task.abort();
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}
