//! API DTOs

pub mod common;
pub mod user;

pub use common::ApiResponse;
pub use user::*;
