use async_trait::async_trait;

use super::{CreateUserDto, UpdateUserDto, User};
use crate::domain::DomainResult;

/// Credential store interface.
///
/// Implementations own timestamp maintenance: `created_at`/`updated_at`
/// are set on insert, `updated_at` is bumped on every update.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn update_user(&self, id: &str, changes: UpdateUserDto) -> DomainResult<Option<User>>;

    /// All users, any visibility
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    /// Users with `is_public == true` only
    async fn list_public_users(&self) -> DomainResult<Vec<User>>;
}
