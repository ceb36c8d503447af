/// Fields required to persist a new user. The password arrives here
/// already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_public: bool,
}

/// Partial update applied to an existing user. `None` leaves a field
/// untouched; `id` and `created_at` are immutable by construction.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub is_public: Option<bool>,
    pub image_url: Option<String>,
}
