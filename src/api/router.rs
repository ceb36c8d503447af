//! API Router with Swagger UI

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::{
    ApiResponse, ImageUploadResponse, LoginRequest, LoginResponse, LogoutResponse,
    RegisterRequest, UpdateProfileRequest, UserDto, VisibilityRequest,
};
use crate::api::handlers::{auth, directory, health, profile};
use crate::api::metrics::http_metrics_middleware;
use crate::application::UserService;
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::config::AppConfig;
use crate::infrastructure::database::repositories::UserRepository;
use crate::infrastructure::MediaStore;

/// Shared state for all account handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<UserRepository>>,
    pub media: Arc<MediaStore>,
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        // Profile
        profile::get_profile,
        profile::update_profile,
        profile::set_visibility,
        profile::upload_image,
        // Directory
        directory::list_public_profiles,
        directory::list_all_profiles,
    ),
    components(
        schemas(
            ApiResponse<UserDto>,
            ApiResponse<LoginResponse>,
            ApiResponse<LogoutResponse>,
            ApiResponse<ImageUploadResponse>,
            ApiResponse<Vec<UserDto>>,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            LogoutResponse,
            UpdateProfileRequest,
            VisibilityRequest,
            ImageUploadResponse,
            UserDto,
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check for availability monitoring."),
        (name = "Authentication", description = "Registration, login and logout. The login token is returned in the `token` field and presented as `Authorization: Bearer <token>`; it expires one hour after issuance."),
        (name = "Profile", description = "Self-service operations over the authenticated caller's own record: read, allow-listed partial update, visibility toggle and image upload."),
        (name = "Directory", description = "Profile listings. `/profiles` is public and filtered to visible records; `/admin/profiles` requires the admin flag and returns everything."),
    ),
    info(
        title = "Account Service API",
        version = "1.0.0",
        description = "REST API for user accounts: registration, login, profile management, \
visibility control and profile-image upload to object storage.

## Authentication

Obtain a token via `POST /login` and present it as `Authorization: Bearer <token>`. \
Tokens carry a fixed one-hour lifetime; logout is advisory only.

## Response format

Every REST response is wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}}
```

On failure:
```json
{\"success\": false, \"error\": \"message\"}
```",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    user_service: Arc<UserService<UserRepository>>,
    repo: Arc<UserRepository>,
    jwt_config: JwtConfig,
    media: Arc<MediaStore>,
    config: &AppConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    health::mark_started();

    let auth_state = AuthState {
        jwt_config,
        repo: repo as Arc<dyn crate::domain::UserRepositoryInterface>,
    };

    let state = AppState {
        user_service,
        media,
    };

    // ── Open routes ────────────────────────────────────────────
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profiles", get(directory::list_public_profiles));

    // ── Identity-gated routes ──────────────────────────────────
    let profile_routes = Router::new()
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/profile/visibility", put(profile::set_visibility))
        .route(
            "/user/image",
            post(profile::upload_image)
                .layer(DefaultBodyLimit::max(config.media.max_upload_bytes)),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // ── Admin routes: identity resolution, then role check ─────
    let admin_routes = Router::new()
        .route("/admin/profiles", get(directory::list_all_profiles))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route(
            "/metrics",
            get(move || async move { prometheus_handle.render() }),
        )
        .merge(public_routes)
        .merge(profile_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
