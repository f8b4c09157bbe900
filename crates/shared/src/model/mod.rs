mod user;
pub use user::*;

mod progress;
pub use progress::*;

mod pushup_log;
pub use pushup_log::*;

use crate::api::error::ValidationError;

pub mod constants;

pub trait ValidateModel {
    fn validate(&self) -> Result<(), ValidationError>;
}
