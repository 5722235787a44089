use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;

pub mod change_password;
pub mod find_id;
pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
pub mod reset_password;
pub mod withdraw;

/// Body of every credential failure, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Body of every token failure, whatever the cause.
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Never reveal which half of the credentials was wrong
            AuthError::UserNotFound(_) | AuthError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            AuthError::InvalidToken | AuthError::Expired | AuthError::AuthenticationRequired => {
                ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string())
            }
            AuthError::UserAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            AuthError::InvalidSubject(_)
            | AuthError::InvalidEmail(_)
            | AuthError::InvalidPhoneNumber(_)
            | AuthError::InvalidPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            AuthError::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "Store unavailable");
                ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let unknown = ApiError::from(AuthError::UserNotFound("nobody".to_string()));
        let wrong_password = ApiError::from(AuthError::InvalidCredentials);

        assert_eq!(unknown, wrong_password);
    }

    #[test]
    fn test_token_failures_hide_the_reason() {
        let expected = ApiError::Unauthorized(AUTHENTICATION_REQUIRED.to_string());

        assert_eq!(ApiError::from(AuthError::InvalidToken), expected);
        assert_eq!(ApiError::from(AuthError::Expired), expected);
        assert_eq!(ApiError::from(AuthError::AuthenticationRequired), expected);
    }

    #[test]
    fn test_store_failure_maps_to_service_unavailable() {
        let err = ApiError::from(AuthError::StoreUnavailable("pool timed out".to_string()));

        assert!(matches!(err, ApiError::ServiceUnavailable(ref msg) if !msg.contains("pool")));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
