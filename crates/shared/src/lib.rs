pub mod api;
pub mod model;

mod utils;
pub use utils::*;
