//! User aggregate
//!
//! Contains the User entity, DTOs, and repository interface.

pub mod model;
pub mod repository;

mod dto;

pub use dto::{CreateUserDto, UpdateUserDto};
pub use model::User;
pub use repository::UserRepositoryInterface;
