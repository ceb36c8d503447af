use chrono::{DateTime, Utc};

/// User model — the sole entity of the service.
///
/// `password_hash` only ever holds a bcrypt hash; the plaintext never
/// persists past registration or a password change.
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    /// Whether the user appears in the unauthenticated public listing
    pub is_public: bool,
    /// Grants access to the admin listing
    pub is_admin: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
