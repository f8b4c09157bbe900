pub const USERNAME_MIN_LENGTH: usize = 4;
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const DEFAULT_PUSHUP_GOAL: u32 = 50;
/// 15 minutes
pub const DEFAULT_EMERGENCY_SECONDS: u32 = 15 * 60;
pub const DEFAULT_EMERGENCY_PASSCODE: &str = "1234";
