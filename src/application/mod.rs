//! Application layer
//!
//! Business logic and use cases. HTTP handlers are thin wrappers over
//! the services defined here.

pub mod identity;

pub use identity::{AuthResult, ProfileUpdate, UserService};
