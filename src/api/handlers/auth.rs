//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Json};

use super::error_reply;
use crate::api::dto::{
    ApiResponse, LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, UserDto,
};
use crate::api::router::AppState;
use crate::api::validated_json::ValidatedJson;

/// Register a new account
///
/// The visibility and admin flags are only accepted here; they are not
/// client-mutable through the profile update.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation failure or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), (StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .user_service
        .register(
            &request.email,
            &request.password,
            &request.name,
            request.is_admin,
            request.is_public,
        )
        .await
        .map_err(error_reply)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

/// Log in with email and password
///
/// Returns a bearer token with a fixed one-hour lifetime. Unknown email
/// and wrong password are indistinguishable.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let auth = state
        .user_service
        .login(&request.email, &request.password)
        .await
        .map_err(error_reply)?;

    Ok(Json(ApiResponse::success(LoginResponse::from(auth))))
}

/// Log out
///
/// Stateless acknowledgment: no server-side invalidation occurs. The
/// token stays valid until its expiry; the client should discard it.
#[utoipa::path(
    post,
    path = "/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Acknowledged", body = ApiResponse<LogoutResponse>)
    )
)]
pub async fn logout() -> Json<ApiResponse<LogoutResponse>> {
    Json(ApiResponse::success(LogoutResponse {
        description: "Logged out; discard the bearer token on the client".to_string(),
    }))
}
