use const_format::concatcp;
pub mod error;
pub mod response_errors;

pub const API_BASE_PATH: &str = "/api/";

/// Server rendered pages and the form endpoints that go with them
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Page {
    Index,
    Signup,
    Login,
    Logout,
    DeleteAccount,
}

impl Page {
    pub const fn path(&self) -> &str {
        use Page::*;
        match self {
            Index => "/",
            Signup => "/signup",
            Login => "/login",
            Logout => "/logout",
            DeleteAccount => "/account/delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Status,
    LogPushups,
    StartEmergency,
    ExtendEmergency,
    History,
    Ping,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Status => "/status",
            LogPushups => "/log_pushups",
            StartEmergency => "/start_emergency",
            ExtendEmergency => "/extend_emergency",
            History => "/history",
            Ping => concatcp!(API_BASE_PATH, "ping"),
        }
    }
}
