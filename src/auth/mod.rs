pub mod authorizor;
pub mod credentials;
pub mod token;

mod identity;

pub use identity::{Platform, Subject};
pub use token::Grant;
