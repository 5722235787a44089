use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::PhoneNumber;
use crate::inbound::http::router::AppState;

/// Look up an account by phone number and name, revealing only a masked
/// subject.
pub async fn find_id(
    State(state): State<AppState>,
    Json(body): Json<FindIdRequest>,
) -> Result<ApiSuccess<FindIdResponseData>, ApiError> {
    let phone_number = PhoneNumber::new(body.phone_number)
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid phone number: {}", e)))?;

    state
        .auth_service
        .find_subject(&phone_number, &body.display_name)
        .await
        .map_err(ApiError::from)
        .map(|subject| {
            ApiSuccess::new(
                StatusCode::OK,
                FindIdResponseData {
                    masked_subject: subject.masked(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindIdRequest {
    phone_number: String,
    display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindIdResponseData {
    masked_subject: String,
}
