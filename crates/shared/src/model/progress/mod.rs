mod state;
pub use state::*;

mod status;
pub use status::*;

mod rules;
pub use rules::*;

mod forms;
pub use forms::*;

mod store;
pub use store::*;
