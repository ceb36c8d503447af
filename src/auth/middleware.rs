//! Authentication middleware for Axum
//!
//! Two independently composable layers: `auth_middleware` resolves the
//! caller's identity from a bearer token and loads the user record;
//! `admin_middleware` additionally requires the admin flag. Each stage is
//! terminal on failure.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::jwt::{verify_token, JwtConfig};
use crate::api::dto::ApiResponse;
use crate::domain::{User, UserRepositoryInterface};

/// Authentication state containing JWT config and the credential store
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub repo: Arc<dyn UserRepositoryInterface>,
}

/// The resolved caller, attached to request extensions by
/// `auth_middleware`. Carries the full record as loaded from the store.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub User);

/// Extract token from an `Authorization: Bearer <token>` header value
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Identity resolution middleware - requires a valid token.
///
/// Missing header, malformed token, failed verification and unknown user
/// all collapse into the same 401; the distinction is only logged.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(auth_header) = auth_header else {
        debug!("authentication rejected: missing Authorization header");
        return authentication_failed();
    };

    let Some(token) = extract_token(auth_header) else {
        debug!("authentication rejected: header is not a bearer token");
        return authentication_failed();
    };

    let claims = match verify_token(token, &auth_state.jwt_config) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("authentication rejected: {}", e);
            return authentication_failed();
        }
    };

    // Resolve the identity against the credential store
    match auth_state.repo.get_user_by_id(&claims.sub).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(AuthenticatedUser(user));
            next.run(request).await
        }
        Ok(None) => {
            debug!("authentication rejected: user {} not found", claims.sub);
            authentication_failed()
        }
        Err(e) => {
            debug!("authentication rejected: store lookup failed: {}", e);
            authentication_failed()
        }
    }
}

/// Role check middleware - must be layered after `auth_middleware`
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(AuthenticatedUser(user)) if user.is_admin => next.run(request).await,
        Some(_) => authorization_required(),
        None => authentication_failed(),
    }
}

fn authentication_failed() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error("Authentication failed")),
    )
        .into_response()
}

fn authorization_required() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ApiResponse::<()>::error("Admin authorization required")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::{from_fn, from_fn_with_state};
    use axum::routing::get;
    use axum::{Extension, Router};
    use chrono::Utc;

    use super::*;
    use crate::auth::jwt::create_token;
    use crate::domain::{CreateUserDto, DomainResult, UpdateUserDto};

    struct FixedUsers {
        users: HashMap<String, User>,
    }

    #[async_trait]
    impl UserRepositoryInterface for FixedUsers {
        async fn create_user(&self, _dto: CreateUserDto) -> DomainResult<User> {
            unimplemented!("read-only test repository")
        }

        async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
            Ok(self.users.get(id).cloned())
        }

        async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
            Ok(self.users.values().find(|u| u.email == email).cloned())
        }

        async fn update_user(
            &self,
            _id: &str,
            _changes: UpdateUserDto,
        ) -> DomainResult<Option<User>> {
            unimplemented!("read-only test repository")
        }

        async fn list_users(&self) -> DomainResult<Vec<User>> {
            Ok(self.users.values().cloned().collect())
        }

        async fn list_public_users(&self) -> DomainResult<Vec<User>> {
            Ok(self.users.values().filter(|u| u.is_public).cloned().collect())
        }
    }

    fn test_user(id: &str, is_admin: bool) -> User {
        User {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            password_hash: "$2b$12$fixed".to_string(),
            name: "Test".to_string(),
            is_public: true,
            is_admin,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "account-service".to_string(),
        }
    }

    async fn whoami(Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>) -> String {
        user.id
    }

    fn app(users: Vec<User>) -> Router {
        let state = AuthState {
            jwt_config: jwt_config(),
            repo: Arc::new(FixedUsers {
                users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            }),
        };
        Router::new()
            .route(
                "/me",
                get(whoami).layer(from_fn_with_state(state.clone(), auth_middleware)),
            )
            .route(
                "/admin",
                get(whoami)
                    .layer(from_fn(admin_middleware))
                    .layer(from_fn_with_state(state, auth_middleware)),
            )
    }

    async fn send(router: Router, req: Request<Body>) -> axum::http::Response<Body> {
        use tower::Service;
        let mut svc = router.into_service();
        svc.call(req).await.unwrap()
    }

    fn bearer(token: &str) -> Request<Body> {
        Request::builder()
            .uri("/me")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let token = create_token("u1", &jwt_config()).unwrap();
        let resp = send(app(vec![test_user("u1", false)]), bearer(&token)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let req = Request::builder().uri("/me").body(Body::empty()).unwrap();
        let resp = send(app(vec![test_user("u1", false)]), req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let resp = send(app(vec![test_user("u1", false)]), bearer("not-a-jwt")).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_rejected() {
        let token = create_token("ghost", &jwt_config()).unwrap();
        let resp = send(app(vec![test_user("u1", false)]), bearer(&token)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_admin_is_forbidden_on_admin_route() {
        let token = create_token("u1", &jwt_config()).unwrap();
        let req = Request::builder()
            .uri("/admin")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = send(app(vec![test_user("u1", false)]), req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_passes_both_stages() {
        let token = create_token("root", &jwt_config()).unwrap();
        let req = Request::builder()
            .uri("/admin")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = send(app(vec![test_user("root", true)]), req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn extract_token_requires_bearer_prefix() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("bearer abc"), None);
        assert_eq!(extract_token("Basic abc"), None);
    }
}
