mod status;
pub use status::*;

mod log_pushups;
pub use log_pushups::*;

mod emergency;
pub use emergency::*;

mod history;
pub use history::*;
