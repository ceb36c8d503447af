//! Account API DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::AuthResult;
use crate::domain::User;

/// User API representation. The password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_public: bool,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            is_public: u.is_public,
            is_admin: u.is_admin,
            image_url: u.image_url,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Email address (unique, used as the login identifier)
    #[validate(email)]
    pub email: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

fn default_true() -> bool {
    true
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response. The token goes into the
/// `Authorization: Bearer <token>` header on subsequent requests.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserDto,
}

impl From<AuthResult> for LoginResponse {
    fn from(auth: AuthResult) -> Self {
        Self {
            token: auth.token,
            token_type: auth.token_type,
            expires_in: auth.expires_in,
            user: UserDto::from(auth.user),
        }
    }
}

/// Logout acknowledgment. Purely advisory: there is no server-side
/// token invalidation.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub description: String,
}

/// Allow-listed partial profile update. Fields left out (or null) stay
/// unchanged; the admin flag is deliberately not accepted here.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub is_public: Option<bool>,
}

/// Visibility toggle request
#[derive(Debug, Deserialize, ToSchema)]
pub struct VisibilityRequest {
    pub is_public: bool,
}

/// Image upload result
#[derive(Debug, Serialize, ToSchema)]
pub struct ImageUploadResponse {
    pub message: String,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_dto_omits_absent_image_url() {
        let dto = UserDto {
            id: "u1".into(),
            email: "a@x.com".into(),
            name: "A".into(),
            is_public: true,
            is_admin: false,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&dto).unwrap();
        assert!(value.get("image_url").is_none());
        // The DTO has no password field at all
        assert!(value.get("password_hash").is_none());
    }

    #[test]
    fn register_request_defaults_flags() {
        let raw = r#"{"email":"a@x.com","password":"password1","name":"A"}"#;
        let request: RegisterRequest = serde_json::from_str(raw).unwrap();
        assert!(!request.is_admin);
        assert!(request.is_public);
    }
}
