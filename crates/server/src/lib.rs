pub mod cli;
pub mod db;

mod session;
pub use session::*;

mod state;
pub use state::*;

pub mod pages;
pub mod password;
pub mod routes;

pub mod session_store;
