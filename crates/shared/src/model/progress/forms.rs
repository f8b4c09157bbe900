use serde::{Deserialize, Serialize};

/// `/log_pushups` form as submitted. The amount is kept as text so bad input
/// can be coerced rather than rejected, see [`LogPushups`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogPushupsForm {
    #[serde(default)]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogPushups {
    pub amount: u32,
}

impl From<LogPushupsForm> for LogPushups {
    fn from(form: LogPushupsForm) -> Self {
        // Missing, blank, non-numeric, negative and overflowing amounts are all
        // treated as 0
        let amount = form
            .amount
            .as_deref()
            .map(str::trim)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);

        Self { amount }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendEmergencyForm {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendEmergencyResponse {
    pub ok: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(amount: Option<&str>) -> u32 {
        LogPushups::from(LogPushupsForm { amount: amount.map(str::to_string) }).amount
    }

    #[test]
    fn test_valid_amounts() {
        assert_eq!(parse(Some("20")), 20);
        assert_eq!(parse(Some(" 35 ")), 35);
        assert_eq!(parse(Some("0")), 0);
    }

    #[test]
    fn test_malformed_amounts_become_zero() {
        assert_eq!(parse(None), 0);
        assert_eq!(parse(Some("")), 0);
        assert_eq!(parse(Some("   ")), 0);
        assert_eq!(parse(Some("ten")), 0);
        assert_eq!(parse(Some("2.5")), 0);
        assert_eq!(parse(Some("-5")), 0);
        assert_eq!(parse(Some("99999999999")), 0);
    }
}
