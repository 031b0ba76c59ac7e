//! Domain error taxonomy for the auth surface.
//!
//! Every failed operation maps to exactly one entry with a stable code
//! string, a human description, and an HTTP status. Infrastructure failures
//! ride in `Unexpected` and render as a single generic 500 so they stay
//! distinguishable from domain outcomes without leaking internals.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Wire shape for a failed operation.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    pub description: String,
}

#[derive(Debug)]
pub enum AuthError {
    /// Request shape or format failure, with the rule that was broken.
    Validation(String),
    UserNotFound,
    UserAlreadyMigrated,
    UserCreationFailed,
    UserUpdateFailed,
    InvalidCode,
    InvalidPin,
    EmailOrPhoneNotConfirmed,
    FailedToUpdatePin,
    FailedToUpdateAgreement,
    FailedToUpdateBiometricStatus,
    /// Infrastructure failure (store unreachable, hashing failure, ...).
    Unexpected(anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UserCreationFailed => StatusCode::BAD_REQUEST,
            Self::UserNotFound | Self::InvalidCode | Self::InvalidPin => StatusCode::UNAUTHORIZED,
            Self::UserAlreadyMigrated => StatusCode::CONFLICT,
            Self::EmailOrPhoneNotConfirmed => StatusCode::FORBIDDEN,
            Self::UserUpdateFailed
            | Self::FailedToUpdatePin
            | Self::FailedToUpdateAgreement
            | Self::FailedToUpdateBiometricStatus
            | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "User.InvalidRequest",
            Self::UserNotFound => "User.NotFound",
            Self::UserAlreadyMigrated => "User.AlreadyMigrated",
            Self::UserCreationFailed => "User.CreationFailed",
            Self::UserUpdateFailed => "User.UpdateFailed",
            Self::InvalidCode => "User.InvalidCode",
            Self::InvalidPin => "User.InvalidPIN",
            Self::EmailOrPhoneNotConfirmed => "User.EmailOrPhoneNotConfirmed",
            Self::FailedToUpdatePin => "User.FailedToUpdatePIN",
            Self::FailedToUpdateAgreement => "User.FailedToUpdateAgreement",
            Self::FailedToUpdateBiometricStatus => "User.FailedToUpdateBiometricStatus",
            Self::Unexpected(_) => "Server.Unexpected",
        }
    }

    fn description(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::UserNotFound => "User Id not found".to_string(),
            Self::UserAlreadyMigrated => {
                "User has already been migrated. Please log in using your PIN.".to_string()
            }
            Self::UserCreationFailed => "User creation failed".to_string(),
            Self::UserUpdateFailed => "Failed to update user information".to_string(),
            Self::InvalidCode => "Invalid code".to_string(),
            Self::InvalidPin => "Invalid PIN provided".to_string(),
            Self::EmailOrPhoneNotConfirmed => {
                "User email or phone number not confirmed".to_string()
            }
            Self::FailedToUpdatePin => "Failed to update PIN".to_string(),
            Self::FailedToUpdateAgreement => "Failed to update the agreement status".to_string(),
            Self::FailedToUpdateBiometricStatus => {
                "Failed to update biometric login status".to_string()
            }
            Self::Unexpected(_) => "Unexpected server error".to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Unexpected(err) = &self {
            error!("Unexpected failure: {err:?}");
        }

        let body = ErrorBody {
            code: self.code().to_string(),
            description: self.description(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unexpected(err)
    }
}
