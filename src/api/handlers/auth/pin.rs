//! PIN setup: the step that completes migration.

use axum::{extract::Extension, Json};
use sqlx::PgPool;
use tracing::{error, info, instrument};

use crate::api::handlers::{valid_ic_number, valid_pin};

use super::errors::{AuthError, ErrorBody};
use super::storage;
use super::types::{MessageResponse, SetPinRequest};
use super::utils::hash_pin;

/// Set the account PIN once both contact channels are confirmed.
///
/// Success stores the argon2 hash and flips the account to migrated in the
/// same statement.
#[utoipa::path(
    post,
    path = "/auth/set-pin",
    request_body = SetPinRequest,
    responses(
        (status = 200, description = "PIN set", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Account not found", body = ErrorBody),
        (status = 403, description = "Email or phone not confirmed", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, payload))]
pub async fn set_pin(
    pool: Extension<PgPool>,
    payload: Option<Json<SetPinRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::Validation("Missing payload".to_string()));
    };

    if !valid_ic_number(&request.ic_number) {
        return Err(AuthError::Validation(
            "IC Number must be numeric and exactly 12 digits.".to_string(),
        ));
    }

    if !valid_pin(request.pin) {
        return Err(AuthError::Validation(
            "PIN must be exactly 6 digits.".to_string(),
        ));
    }

    if request.pin != request.confirmed_pin {
        return Err(AuthError::Validation(
            "Confirmed PIN does not match the PIN.".to_string(),
        ));
    }

    let Some(account) = storage::find_account(&pool, &request.ic_number).await? else {
        error!(
            "Account with IC number {} not found.",
            request.ic_number
        );
        return Err(AuthError::UserNotFound);
    };

    if !account.contact_confirmed() {
        error!(
            "Cannot set PIN. Email or phone number not confirmed for account {}.",
            account.ic_number
        );
        return Err(AuthError::EmailOrPhoneNotConfirmed);
    }

    let pin_hash = hash_pin(request.pin)?;

    if !storage::set_pin_and_migrate(&pool, &account.ic_number, &pin_hash).await? {
        error!("Failed to update PIN for account {}.", account.ic_number);
        return Err(AuthError::FailedToUpdatePin);
    }

    info!("Successfully set PIN for account {}.", account.ic_number);
    Ok(Json(MessageResponse::new("PIN successfully set.")))
}

#[cfg(test)]
mod tests {
    use super::super::types::SetPinRequest;
    use super::set_pin;
    use anyhow::Result;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::Json;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn set_pin_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = set_pin(Extension(pool), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn set_pin_rejects_short_pin() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let request = SetPinRequest {
            ic_number: "900101105678".to_string(),
            pin: 1234,
            confirmed_pin: 1234,
        };
        let response = set_pin(Extension(pool), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn set_pin_rejects_mismatched_confirmation() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let request = SetPinRequest {
            ic_number: "900101105678".to_string(),
            pin: 123_456,
            confirmed_pin: 654_321,
        };
        let response = set_pin(Extension(pool), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
