//! Per-user settings, the third cached resource

use serde::{Deserialize, Serialize};

/// User settings as served by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Minutes east of UTC, sent along with event-window requests
    pub timezone_offset_minutes: i32,
    /// How often the embedding app should poll for authoritative task state
    pub poll_interval_secs: u64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            timezone_offset_minutes: 0,
            poll_interval_secs: crate::config::default_poll_interval_secs(),
        }
    }
}
