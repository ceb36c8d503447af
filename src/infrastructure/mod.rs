//! Infrastructure layer
//!
//! External concerns: SeaORM persistence and the object-storage media
//! backend. Everything here is constructed in `main` and injected.

pub mod database;
pub mod media;

pub use database::init_database;
pub use media::MediaStore;
