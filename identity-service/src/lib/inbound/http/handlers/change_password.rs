use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::NewPassword;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

/// Change the caller's password; every session of the caller is invalidated.
pub async fn change_password(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Json(body): Json<ChangePasswordRequestBody>,
) -> Result<ApiSuccess<()>, ApiError> {
    let new_password = NewPassword::new(body.new_password).map_err(AuthError::from)?;

    state
        .auth_service
        .change_password(&principal.subject, &body.current_password, new_password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequestBody {
    current_password: String,
    new_password: String,
}
