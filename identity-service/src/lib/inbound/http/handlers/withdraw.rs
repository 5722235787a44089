use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn withdraw(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Json(body): Json<WithdrawRequestBody>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .withdraw(&principal.subject, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WithdrawRequestBody {
    password: String,
}
