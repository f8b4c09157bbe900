use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{Rules, Status};

/// Who a [`ProgressState`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// The deployment wide record, used when nobody is logged in
    Shared,
    User(i64),
}

impl Owner {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Owner::Shared => None,
            Owner::User(id) => Some(*id),
        }
    }
}

impl From<Option<i64>> for Owner {
    fn from(user_id: Option<i64>) -> Self {
        user_id.map_or(Owner::Shared, Owner::User)
    }
}

/// Running pushup count and emergency countdown
///
/// The default is the zero-state: nothing done and an `emergency_until` of
/// the Unix epoch, which is never in the future.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub done: u32,
    pub emergency_until: DateTime<Utc>,
}

impl ProgressState {
    pub fn status(&self, now: DateTime<Utc>, goal: u32) -> Status {
        let emergency = now < self.emergency_until;
        let time_left = if emergency {
            // The difference is positive so truncating is the same as flooring
            u64::try_from((self.emergency_until - now).num_seconds()).unwrap_or(0)
        } else {
            0
        };

        Status {
            remaining: goal.saturating_sub(self.done),
            emergency,
            time_left,
        }
    }

    pub fn log(&mut self, amount: u32) {
        self.done = self.done.saturating_add(amount);
    }

    /// Replaces any running countdown with one ending `duration` from `now`
    pub fn start_emergency(&mut self, now: DateTime<Utc>, duration: TimeDelta) {
        self.emergency_until = now + duration;
    }

    /// Same as [`ProgressState::start_emergency`] if `code` matches the
    /// passcode. Returns false and leaves the state alone otherwise
    pub fn extend_emergency(&mut self, code: &str, rules: &Rules, now: DateTime<Utc>) -> bool {
        if code != rules.passcode {
            return false;
        }

        self.start_emergency(now, rules.emergency_duration);
        true
    }
}
