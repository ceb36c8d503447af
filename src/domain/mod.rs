//! Core domain types
//!
//! Entities, DTOs and the repository trait the application layer is
//! written against. Nothing in here knows about HTTP or SeaORM.

pub mod error;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use user::{CreateUserDto, UpdateUserDto, User, UserRepositoryInterface};
