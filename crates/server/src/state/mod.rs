mod state;
pub use state::*;

mod rules;
pub use rules::*;
