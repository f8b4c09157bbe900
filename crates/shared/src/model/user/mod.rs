mod user;
pub use user::*;

mod new;
pub use new::*;

mod signup;
pub use signup::*;

mod login;
pub use login::*;
