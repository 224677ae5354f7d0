//! Heuristic detection of synthetic shift-clicks.
//!
//! Some clients answer one shift-click on the result slot with a burst of
//! additional move-to-other-inventory clicks on other slots. A gesture of
//! that kind is flagged as synthetic when it targets a different slot than
//! the last manual gesture and arrives within a short window after it.
//!
//! This is best effort. Every gesture that is not flagged still goes
//! through the full validation pipeline.

use std::time::Duration;

use merchant_types::{Gesture, GestureKind};

/// Default synthetic-click detection window.
pub const DEFAULT_SYNTHETIC_WINDOW: Duration = Duration::from_millis(250);

/// Verdict of the classifier for one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A gesture the actor performed.
    Manual,
    /// A client-generated duplicate that must be skipped.
    Synthetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ManualGesture {
    timestamp_ms: u64,
    slot: i32,
}

/// Per-session classifier state: the last manual gesture seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputClassifier {
    window_ms: u64,
    last_manual: Option<ManualGesture>,
}

impl InputClassifier {
    /// Create a classifier with the given detection window.
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
            last_manual: None,
        }
    }

    /// Classify `gesture` and record it if it is manual.
    pub fn classify(&mut self, gesture: &Gesture) -> Classification {
        if self.is_synthetic(gesture) {
            return Classification::Synthetic;
        }
        self.last_manual = Some(ManualGesture {
            timestamp_ms: gesture.timestamp_ms,
            slot: gesture.slot,
        });
        Classification::Manual
    }

    fn is_synthetic(&self, gesture: &Gesture) -> bool {
        if gesture.kind != GestureKind::MoveToOtherInventory {
            return false;
        }
        let Some(last) = self.last_manual else {
            return false;
        };
        let elapsed = gesture.timestamp_ms.saturating_sub(last.timestamp_ms);
        gesture.slot != last.slot && elapsed < self.window_ms
    }
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SYNTHETIC_WINDOW)
    }
}
