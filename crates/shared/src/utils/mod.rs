mod logging;
pub use logging::*;

mod env;
pub use env::*;
