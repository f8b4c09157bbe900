//! Username and password accounts. The logged in user is kept in the
//! tower-sessions session, see [`crate::SessionValue`]

mod signup;
pub use signup::*;

mod login;
pub use login::*;

mod logout;
pub use logout::*;

mod delete_account;
pub use delete_account::*;
