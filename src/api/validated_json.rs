//! Validated JSON extractor for Axum
//!
//! `ValidatedJson<T>` works like `axum::Json<T>`, but additionally runs
//! `validator::Validate::validate()` on the deserialized value. Both a
//! malformed body and a failed field validation reply 400 in the standard
//! envelope, matching the service-wide validation-failure status.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::dto::ApiResponse;

/// An extractor that deserializes JSON and validates it.
pub struct ValidatedJson<T>(pub T);

/// Extraction failure: either the body never parsed, or a field failed
/// its constraints.
pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(ValidationErrors),
}

/// Flatten validator's per-field error map into "field: message" lines.
fn describe_errors(errors: &ValidationErrors) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors().iter() {
        for err in field_errors.iter() {
            match &err.message {
                Some(message) => lines.push(format!("{}: {}", field, message)),
                None => lines.push(format!("{}: {:?}", field, err.code)),
            }
        }
    }

    if lines.is_empty() {
        "Validation failed".to_string()
    } else {
        lines.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Json(rejection) => format!("Invalid JSON: {}", rejection),
            Self::Invalid(errors) => describe_errors(errors),
        };

        let body = Json(ApiResponse::<()>::error(message));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value.validate().map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use validator::Validate;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct SignupBody {
        #[validate(email)]
        email: String,
        #[validate(length(min = 8, message = "too short"))]
        password: String,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<SignupBody>) -> &'static str {
        "ok"
    }

    async fn send(body: Body) -> axum::http::Response<Body> {
        use tower::Service;
        let router = Router::new().route("/signup", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/signup")
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        router.into_service().call(req).await.unwrap()
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let resp = send(Body::from(
            r#"{"email":"a@x.com","password":"password1"}"#,
        ))
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_failure() {
        let resp = send(Body::from("{{{")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn field_violation_is_a_validation_failure() {
        let resp = send(Body::from(r#"{"email":"nope","password":"pw"}"#)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn describe_errors_includes_custom_messages() {
        let body = SignupBody {
            email: "nope".to_string(),
            password: "pw".to_string(),
        };
        let errors = body.validate().unwrap_err();
        let description = describe_errors(&errors);
        assert!(description.contains("password: too short"));
        assert!(description.contains("email"));
    }
}
