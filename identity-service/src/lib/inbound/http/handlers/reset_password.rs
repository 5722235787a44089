use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::PasswordPolicyError;
use crate::domain::auth::errors::PhoneNumberError;
use crate::domain::auth::errors::SubjectError;
use crate::domain::auth::models::NewPassword;
use crate::domain::auth::models::PhoneNumber;
use crate::domain::auth::models::ResetPasswordCommand;
use crate::domain::auth::models::Subject;
use crate::inbound::http::router::AppState;

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .reset_password(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    subject: String,
    phone_number: String,
    new_password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseResetPasswordRequestError {
    #[error("Invalid subject: {0}")]
    Subject(#[from] SubjectError),

    #[error("Invalid phone number: {0}")]
    PhoneNumber(#[from] PhoneNumberError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl ResetPasswordRequest {
    fn try_into_command(self) -> Result<ResetPasswordCommand, ParseResetPasswordRequestError> {
        Ok(ResetPasswordCommand {
            subject: Subject::new(self.subject)?,
            phone_number: PhoneNumber::new(self.phone_number)?,
            new_password: NewPassword::new(self.new_password)?,
        })
    }
}

impl From<ParseResetPasswordRequestError> for ApiError {
    fn from(err: ParseResetPasswordRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
