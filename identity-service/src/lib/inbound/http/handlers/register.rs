use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::PasswordPolicyError;
use crate::domain::auth::errors::PhoneNumberError;
use crate::domain::auth::errors::SubjectError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::NewPassword;
use crate::domain::auth::models::PhoneNumber;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Subject;
use crate::domain::auth::models::User;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::CREATED, user.into()))
}

/// HTTP request body for registering a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    subject: String,
    email: String,
    display_name: String,
    phone_number: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid subject: {0}")]
    Subject(#[from] SubjectError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid phone number: {0}")]
    PhoneNumber(#[from] PhoneNumberError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        Ok(RegisterCommand {
            subject: Subject::new(self.subject)?,
            email: EmailAddress::new(self.email)?,
            display_name: self.display_name,
            phone_number: PhoneNumber::new(self.phone_number)?,
            password: NewPassword::new(self.password)?,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponseData {
    pub subject: String,
    pub email: String,
    pub display_name: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for RegisterResponseData {
    fn from(user: &User) -> Self {
        Self {
            subject: user.subject.to_string(),
            email: user.email.as_str().to_string(),
            display_name: user.display_name.clone(),
            phone_number: user.phone_number.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}
