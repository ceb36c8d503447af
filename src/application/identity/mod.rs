//! Identity and profile management

pub mod service;

pub use service::{AuthResult, ProfileUpdate, UserService};
