use serde::{Deserialize, Serialize};

/// Values derived from a [`ProgressState`](super::ProgressState) at a point
/// in time. Serialized as the `/status` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub remaining: u32,
    pub emergency: bool,
    /// Whole seconds until the emergency ends, 0 when there isn't one
    pub time_left: u64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_json_shape() {
        let status = Status { remaining: 30, emergency: true, time_left: 800 };
        let json = serde_json::to_value(status).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "remaining": 30, "emergency": true, "time_left": 800 })
        );
    }
}
