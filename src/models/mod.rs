//! Domain models for login-gate

pub mod user;

pub use user::{Identity, NewUser, User, UserView};
