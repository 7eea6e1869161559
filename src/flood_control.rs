//! # Flood Control Module
//!
//! Per-user minimum-interval throttling of menu navigation actions.
//!
//! Each user has at most one recorded timestamp: the last action that was
//! allowed. An action is allowed when the user has no record or the
//! configured interval has elapsed since the record; allowing it replaces
//! the record. Rejected actions leave the record untouched.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Per-user flood controller
///
/// # Memory
///
/// Records are never evicted; the map grows with the number of distinct
/// users seen during the process lifetime.
#[derive(Debug)]
pub struct FloodController {
    min_interval: Duration,
    last_action: Mutex<HashMap<u64, Instant>>,
}

impl FloodController {
    /// Create a controller enforcing `min_interval` between actions of a user
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_action: Mutex::new(HashMap::new()),
        }
    }

    /// Allow and record an action of `user_id`, or reject it.
    ///
    /// Returns `true` (and stores "now") when the user has no record or at
    /// least the minimum interval has passed; `false` otherwise.
    pub fn check_and_record(&self, user_id: u64) -> bool {
        let now = Instant::now();
        let mut last_action = self
            .last_action
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(last) = last_action.get(&user_id) {
            if now.saturating_duration_since(*last) < self.min_interval {
                return false;
            }
        }

        last_action.insert(user_id, now);
        true
    }

    /// The configured minimum interval
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of users with a recorded action
    pub fn tracked_users(&self) -> usize {
        self.last_action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
