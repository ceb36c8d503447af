//! Profile API handlers
//!
//! Self-service operations over the authenticated caller's own record.
//! Identity resolution happens in the auth middleware; these handlers
//! read the resolved user from request extensions.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use bytes::Bytes;

use super::{bad_request, error_reply, unauthenticated};
use crate::api::dto::{
    ApiResponse, ImageUploadResponse, UpdateProfileRequest, UserDto, VisibilityRequest,
};
use crate::api::router::AppState;
use crate::api::validated_json::ValidatedJson;
use crate::application::ProfileUpdate;
use crate::auth::middleware::AuthenticatedUser;

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's record", body = ApiResponse<UserDto>),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let Some(Extension(AuthenticatedUser(user))) = user else {
        return Err(unauthenticated());
    };

    let profile = state
        .user_service
        .profile(&user.id)
        .await
        .map_err(error_reply)?;

    Ok(Json(ApiResponse::success(UserDto::from(profile))))
}

/// Update the caller's profile
///
/// Accepts only the allow-listed fields: name, email, password and
/// visibility. Anything else on the record is immutable here.
#[utoipa::path(
    put,
    path = "/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated record", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let Some(Extension(AuthenticatedUser(user))) = user else {
        return Err(unauthenticated());
    };

    let changes = ProfileUpdate {
        name: request.name,
        email: request.email,
        password: request.password,
        is_public: request.is_public,
    };

    let updated = state
        .user_service
        .update_profile(&user.id, changes)
        .await
        .map_err(error_reply)?;

    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}

/// Toggle the caller's visibility in the public listing
#[utoipa::path(
    put,
    path = "/profile/visibility",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = VisibilityRequest,
    responses(
        (status = 200, description = "Updated record", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Authentication failed")
    )
)]
pub async fn set_visibility(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    Json(request): Json<VisibilityRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let Some(Extension(AuthenticatedUser(user))) = user else {
        return Err(unauthenticated());
    };

    let updated = state
        .user_service
        .set_visibility(&user.id, request.is_public)
        .await
        .map_err(error_reply)?;

    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}

/// Upload a profile image
///
/// Expects multipart form data with an "image" field. The bytes go to
/// object storage; the resulting URL is persisted on the caller's record.
#[utoipa::path(
    post,
    path = "/user/image",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<ImageUploadResponse>),
        (status = 400, description = "Missing or unreadable image field"),
        (status = 401, description = "Authentication failed"),
        (status = 500, description = "Object storage failure")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ImageUploadResponse>>, (StatusCode, Json<ApiResponse<ImageUploadResponse>>)>
{
    let Some(Extension(AuthenticatedUser(user))) = user else {
        return Err(unauthenticated());
    };

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("image") {
            let filename = field.file_name().unwrap_or("image").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("Failed to read upload: {}", e)))?;
            upload = Some((filename, data));
            break;
        }
    }

    let Some((filename, data)) = upload else {
        return Err(bad_request("Missing multipart field \"image\""));
    };
    if data.is_empty() {
        return Err(bad_request("Uploaded image is empty"));
    }

    let image_url = state
        .media
        .put_image(&filename, data)
        .await
        .map_err(error_reply)?;

    state
        .user_service
        .set_image_url(&user.id, &image_url)
        .await
        .map_err(error_reply)?;

    Ok(Json(ApiResponse::success(ImageUploadResponse {
        message: "Image uploaded".to_string(),
        image_url,
    })))
}
