pub mod env;
pub mod validator;

pub use env::*;
pub use validator::*;
