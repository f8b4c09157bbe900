use std::path::PathBuf;

use clap::Parser;
use shared::model::{
    constants::{DEFAULT_EMERGENCY_PASSCODE, DEFAULT_EMERGENCY_SECONDS, DEFAULT_PUSHUP_GOAL},
    Rules,
};

#[derive(Debug, Clone, Parser)]
#[clap(name = "pushup server")]
pub struct Cli {
    #[clap(long, env, default_value = "assets")]
    pub assets_dir: PathBuf,
    #[clap(long, env, default_value = "pushups.sqlite")]
    pub sqlite_connection_string: String,
    #[clap(long, env, default_value = "8080")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    #[clap(long, env, default_value = "false")]
    pub secure_sessions: bool,
    #[arg(long, env, default_value = "30")]
    pub session_expiry_days: i64,

    /// Number of pushups to aim for
    #[arg(long, env, default_value_t = DEFAULT_PUSHUP_GOAL)]
    pub pushup_goal: u32,
    /// Length of an emergency window
    #[arg(long, env, default_value_t = DEFAULT_EMERGENCY_SECONDS)]
    pub emergency_seconds: u32,
    /// Passcode needed to extend an emergency window
    #[arg(long, env, default_value = DEFAULT_EMERGENCY_PASSCODE, hide_env_values = true)]
    pub emergency_passcode: String,

    /// Deletes the database before starting the main program for debug purposes
    #[arg(long, env, default_value = "false")]
    pub debug_delete_database: bool,
}

impl Cli {
    pub fn rules(&self) -> Rules {
        Rules::new(
            self.pushup_goal,
            self.emergency_seconds,
            self.emergency_passcode.clone(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["server"]);
        assert_eq!(cli.rules(), Rules::default());
        assert!(!cli.secure_sessions);
    }

    #[test]
    fn test_rules_from_args() {
        let cli = Cli::parse_from([
            "server",
            "--pushup-goal",
            "100",
            "--emergency-seconds",
            "60",
            "--emergency-passcode",
            "open sesame",
        ]);

        assert_eq!(cli.rules(), Rules::new(100, 60, "open sesame"));
    }
}
