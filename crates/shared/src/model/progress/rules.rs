use chrono::TimeDelta;

use crate::model::constants::{
    DEFAULT_EMERGENCY_PASSCODE, DEFAULT_EMERGENCY_SECONDS, DEFAULT_PUSHUP_GOAL,
};

/// Deployment wide settings the progress operations work against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub goal: u32,
    pub emergency_duration: TimeDelta,
    /// Shared secret required to extend the emergency window
    pub passcode: String,
}

impl Rules {
    pub fn new<T: Into<String>>(goal: u32, emergency_seconds: u32, passcode: T) -> Self {
        Self {
            goal,
            emergency_duration: TimeDelta::seconds(i64::from(emergency_seconds)),
            passcode: passcode.into(),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(
            DEFAULT_PUSHUP_GOAL,
            DEFAULT_EMERGENCY_SECONDS,
            DEFAULT_EMERGENCY_PASSCODE,
        )
    }
}
