//! # Account Service
//!
//! User-account REST service: registration, login, profile management,
//! visibility control and profile-image upload to object storage.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and traits
//! - **application**: Business logic and use cases
//! - **infrastructure**: External concerns (database, object storage)
//! - **auth**: JWT authentication and access-control middleware
//! - **api**: REST API with Swagger documentation

pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database helpers for easy access
pub use infrastructure::init_database;

// Re-export API router
pub use api::create_api_router;
