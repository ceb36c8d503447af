//! User account service — application-layer orchestration
//!
//! All identity and profile business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::info;

use crate::auth::jwt::{create_token, JwtConfig};
use crate::auth::password::{hash_password, verify_password};
use crate::domain::{
    CreateUserDto, DomainError, DomainResult, UpdateUserDto, User, UserRepositoryInterface,
};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Allow-listed profile changes. Only these fields are client-mutable
/// through the profile update operation; the admin flag is not among them.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_public: Option<bool>,
}

/// User service — orchestrates all identity / profile use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    jwt_config: JwtConfig,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>, jwt_config: JwtConfig) -> Self {
        Self { repo, jwt_config }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user. The admin and visibility flags are accepted
    /// at registration time only.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        is_admin: bool,
        is_public: bool,
    ) -> DomainResult<User> {
        validate_email(email)?;
        validate_password(password)?;
        validate_name(name)?;

        // Pre-check for a clean message; the unique constraint still
        // backstops concurrent registrations.
        if self.repo.get_user_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repo
            .create_user(CreateUserDto {
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                is_admin,
                is_public,
            })
            .await?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a bearer token.
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repo.get_user_by_email(email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Profile operations ──────────────────────────────────────

    pub async fn profile(&self, user_id: &str) -> DomainResult<User> {
        self.repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User '{}' not found", user_id)))
    }

    /// Apply an allow-listed partial update to the caller's own record.
    pub async fn update_profile(&self, user_id: &str, changes: ProfileUpdate) -> DomainResult<User> {
        if let Some(ref name) = changes.name {
            validate_name(name)?;
        }
        if let Some(ref password) = changes.password {
            validate_password(password)?;
        }
        if let Some(ref email) = changes.email {
            validate_email(email)?;
            // A changed email must stay unique across the store
            if let Some(existing) = self.repo.get_user_by_email(email).await? {
                if existing.id != user_id {
                    return Err(DomainError::Conflict("Email already registered".into()));
                }
            }
        }

        let password_hash = match changes.password {
            Some(ref password) => Some(
                hash_password(password)
                    .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?,
            ),
            None => None,
        };

        let dto = UpdateUserDto {
            email: changes.email,
            name: changes.name,
            password_hash,
            is_public: changes.is_public,
            image_url: None,
        };

        self.repo
            .update_user(user_id, dto)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User '{}' not found", user_id)))
    }

    /// Restricted single-field update of the visibility flag.
    pub async fn set_visibility(&self, user_id: &str, is_public: bool) -> DomainResult<User> {
        let dto = UpdateUserDto {
            is_public: Some(is_public),
            ..UpdateUserDto::default()
        };

        self.repo
            .update_user(user_id, dto)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User '{}' not found", user_id)))
    }

    /// Persist the object-storage URL of a freshly uploaded image.
    pub async fn set_image_url(&self, user_id: &str, url: &str) -> DomainResult<User> {
        let dto = UpdateUserDto {
            image_url: Some(url.to_string()),
            ..UpdateUserDto::default()
        };

        self.repo
            .update_user(user_id, dto)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User '{}' not found", user_id)))
    }

    // ── Listings ────────────────────────────────────────────────

    /// Every record, any visibility. Authorization happens at the route.
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repo.list_users().await
    }

    /// Public records only; open to unauthenticated callers.
    pub async fn list_public_users(&self) -> DomainResult<Vec<User>> {
        self.repo.list_public_users().await
    }
}

// ── Input validation ────────────────────────────────────────────

fn validate_email(email: &str) -> DomainResult<()> {
    if !email.contains('@') || email.len() > 255 {
        return Err(DomainError::Validation("Invalid email address".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.len() < 8 {
        return Err(DomainError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() || name.len() > 255 {
        return Err(DomainError::Validation("Name must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::auth::jwt::verify_token;

    /// In-memory credential store for service tests
    #[derive(Default)]
    struct InMemoryUserRepository {
        users: Mutex<HashMap<String, User>>,
    }

    #[async_trait]
    impl UserRepositoryInterface for InMemoryUserRepository {
        async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == dto.email) {
                return Err(DomainError::Conflict("Email already registered".into()));
            }

            let now = Utc::now();
            let user = User {
                id: uuid::Uuid::new_v4().to_string(),
                email: dto.email,
                password_hash: dto.password_hash,
                name: dto.name,
                is_public: dto.is_public,
                is_admin: dto.is_admin,
                image_url: None,
                created_at: now,
                updated_at: now,
            };
            users.insert(user.id.clone(), user.clone());
            Ok(user)
        }

        async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
            Ok(self.users.lock().unwrap().get(id).cloned())
        }

        async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn update_user(
            &self,
            id: &str,
            changes: UpdateUserDto,
        ) -> DomainResult<Option<User>> {
            let mut users = self.users.lock().unwrap();
            let Some(user) = users.get_mut(id) else {
                return Ok(None);
            };

            if let Some(email) = changes.email {
                user.email = email;
            }
            if let Some(name) = changes.name {
                user.name = name;
            }
            if let Some(password_hash) = changes.password_hash {
                user.password_hash = password_hash;
            }
            if let Some(is_public) = changes.is_public {
                user.is_public = is_public;
            }
            if let Some(image_url) = changes.image_url {
                user.image_url = Some(image_url);
            }
            user.updated_at = Utc::now();

            Ok(Some(user.clone()))
        }

        async fn list_users(&self) -> DomainResult<Vec<User>> {
            Ok(self.users.lock().unwrap().values().cloned().collect())
        }

        async fn list_public_users(&self) -> DomainResult<Vec<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| u.is_public)
                .cloned()
                .collect())
        }
    }

    fn service() -> UserService<InMemoryUserRepository> {
        let jwt_config = JwtConfig {
            secret: "service-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "account-service".to_string(),
        };
        UserService::new(Arc::new(InMemoryUserRepository::default()), jwt_config)
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let service = service();
        let user = service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();

        assert_ne!(user.password_hash, "password1");
        assert!(verify_password("password1", &user.password_hash).unwrap());
        assert!(!user.is_admin);
        assert!(user.is_public);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let service = service();
        service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();

        let err = service
            .register("a@x.com", "password2", "B", false, true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let service = service();

        let err = service
            .register("not-an-email", "password1", "A", false, true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .register("a@x.com", "short", "A", false, true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .register("a@x.com", "password1", "  ", false, true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn login_token_resolves_to_registered_user() {
        let service = service();
        let user = service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();

        let auth = service.login("a@x.com", "password1").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 3600);

        let jwt_config = JwtConfig {
            secret: "service-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "account-service".to_string(),
        };
        let claims = verify_token(&auth.token, &jwt_config).unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let service = service();
        service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();

        let err = service.login("a@x.com", "wrong-password").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        // Unknown email folds into the same failure
        let err = service.login("ghost@x.com", "password1").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn update_profile_cannot_touch_admin_flag_or_id() {
        let service = service();
        let user = service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();

        let updated = service
            .update_profile(
                &user.id,
                ProfileUpdate {
                    name: Some("Renamed".into()),
                    email: Some("renamed@x.com".into()),
                    password: Some("new-password".into()),
                    is_public: Some(false),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "renamed@x.com");
        assert!(!updated.is_public);
        assert!(!updated.is_admin);
        assert!(verify_password("new-password", &updated.password_hash).unwrap());
    }

    #[tokio::test]
    async fn update_profile_rejects_email_taken_by_another_user() {
        let service = service();
        service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();
        let other = service
            .register("b@x.com", "password1", "B", false, true)
            .await
            .unwrap();

        let err = service
            .update_profile(
                &other.id,
                ProfileUpdate {
                    email: Some("a@x.com".into()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Re-submitting your own current email is not a conflict
        let same = service
            .update_profile(
                &other.id,
                ProfileUpdate {
                    email: Some("b@x.com".into()),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.email, "b@x.com");
    }

    #[tokio::test]
    async fn set_visibility_changes_only_that_field_and_is_idempotent() {
        let service = service();
        let user = service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();

        let hidden = service.set_visibility(&user.id, false).await.unwrap();
        assert!(!hidden.is_public);
        assert_eq!(hidden.name, user.name);
        assert_eq!(hidden.email, user.email);
        assert_eq!(hidden.password_hash, user.password_hash);
        assert_eq!(hidden.image_url, user.image_url);

        // Setting the same value again is a state-wise no-op
        let again = service.set_visibility(&user.id, false).await.unwrap();
        assert!(!again.is_public);
        assert_eq!(again.name, hidden.name);
        assert_eq!(again.email, hidden.email);
        assert_eq!(again.password_hash, hidden.password_hash);
    }

    #[tokio::test]
    async fn public_listing_excludes_private_users() {
        let service = service();
        service
            .register("pub@x.com", "password1", "Pub", false, true)
            .await
            .unwrap();
        service
            .register("priv@x.com", "password1", "Priv", false, false)
            .await
            .unwrap();

        let public = service.list_public_users().await.unwrap();
        assert_eq!(public.len(), 1);
        assert!(public.iter().all(|u| u.is_public));

        // The admin listing sees everything
        let all = service.list_users().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn profile_returns_own_record_or_not_found() {
        let service = service();
        let user = service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();

        let fetched = service.profile(&user.id).await.unwrap();
        assert_eq!(fetched.email, "a@x.com");

        let err = service.profile("missing-id").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn set_image_url_persists_reference() {
        let service = service();
        let user = service
            .register("a@x.com", "password1", "A", false, true)
            .await
            .unwrap();

        let updated = service
            .set_image_url(&user.id, "http://cdn.test/media/uploads/1_avatar.png")
            .await
            .unwrap();
        assert_eq!(
            updated.image_url.as_deref(),
            Some("http://cdn.test/media/uploads/1_avatar.png")
        );
        assert_eq!(updated.name, user.name);
    }
}
