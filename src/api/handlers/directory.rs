//! Profile listing handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::error_reply;
use crate::api::dto::{ApiResponse, UserDto};
use crate::api::router::AppState;

/// Public profile listing
///
/// Open to unauthenticated callers; contains only records with
/// `is_public == true`.
#[utoipa::path(
    get,
    path = "/profiles",
    tag = "Directory",
    responses(
        (status = 200, description = "Public profiles", body = ApiResponse<Vec<UserDto>>),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_public_profiles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, (StatusCode, Json<ApiResponse<Vec<UserDto>>>)> {
    let users = state
        .user_service
        .list_public_users()
        .await
        .map_err(error_reply)?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// Admin profile listing
///
/// Every record, any visibility. Requires an authenticated admin; both
/// middleware stages run before this handler.
#[utoipa::path(
    get,
    path = "/admin/profiles",
    tag = "Directory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All profiles", body = ApiResponse<Vec<UserDto>>),
        (status = 401, description = "Authentication failed"),
        (status = 403, description = "Admin authorization required"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_all_profiles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, (StatusCode, Json<ApiResponse<Vec<UserDto>>>)> {
    let users = state.user_service.list_users().await.map_err(error_reply)?;

    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}
