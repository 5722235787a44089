use axum::extract::State;
use axum::http::StatusCode;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedPrincipal;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .invalidate_sessions(&principal.subject)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
