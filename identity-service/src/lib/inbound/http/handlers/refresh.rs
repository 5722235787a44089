use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Subject;
use crate::domain::auth::models::TokenPair;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token for a new pair.
///
/// The subject comes from the presented token's own verified claims; the
/// service then checks that the token is the subject's active one.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequestBody>,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let verified = state
        .tokens
        .validate(&body.refresh_token)
        .map_err(AuthError::from)?;
    let subject = Subject::new(verified.subject).map_err(|_| AuthError::InvalidToken)?;

    state
        .auth_service
        .refresh(&subject, &body.refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponseData {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in milliseconds
    pub expires_in: i64,
}

impl From<TokenPair> for RefreshResponseData {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in_ms,
        }
    }
}
