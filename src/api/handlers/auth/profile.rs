//! Account preference updates: terms agreement and biometric login.

use axum::{
    extract::{Extension, Path},
    Json,
};
use sqlx::PgPool;
use tracing::{error, info, instrument};

use crate::api::handlers::valid_ic_number;

use super::errors::{AuthError, ErrorBody};
use super::storage;
use super::types::MessageResponse;

#[utoipa::path(
    patch,
    path = "/auth/agree-to-terms/{ic_number}",
    params(
        ("ic_number" = String, Path, description = "Account IC number")
    ),
    responses(
        (status = 200, description = "Agreement recorded", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Account not found", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(pool))]
pub async fn agree_to_terms(
    pool: Extension<PgPool>,
    Path(ic_number): Path<String>,
) -> Result<Json<MessageResponse>, AuthError> {
    if !valid_ic_number(&ic_number) {
        return Err(AuthError::Validation(
            "IC Number must be numeric and exactly 12 digits.".to_string(),
        ));
    }

    let Some(account) = storage::find_account(&pool, &ic_number).await? else {
        error!("Account with IC number {ic_number} not found.");
        return Err(AuthError::UserNotFound);
    };

    if !storage::set_terms_agreed(&pool, &account.ic_number).await? {
        error!(
            "Failed to update agreement for account {}.",
            account.ic_number
        );
        return Err(AuthError::FailedToUpdateAgreement);
    }

    info!(
        "Account {} agreed to terms and privacy policy.",
        account.ic_number
    );
    Ok(Json(MessageResponse::new(
        "Successfully agreed to terms and privacy policy.",
    )))
}

#[utoipa::path(
    patch,
    path = "/auth/enable-biometric/{ic_number}",
    params(
        ("ic_number" = String, Path, description = "Account IC number")
    ),
    responses(
        (status = 200, description = "Biometric login enabled", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Account not found", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(pool))]
pub async fn enable_biometric(
    pool: Extension<PgPool>,
    Path(ic_number): Path<String>,
) -> Result<Json<MessageResponse>, AuthError> {
    if !valid_ic_number(&ic_number) {
        return Err(AuthError::Validation(
            "IC Number must be numeric and exactly 12 digits.".to_string(),
        ));
    }

    let Some(account) = storage::find_account(&pool, &ic_number).await? else {
        error!("Account with IC number {ic_number} not found.");
        return Err(AuthError::UserNotFound);
    };

    if !storage::set_biometric_enabled(&pool, &account.ic_number).await? {
        error!(
            "Failed to update biometric login status for account {}.",
            account.ic_number
        );
        return Err(AuthError::FailedToUpdateBiometricStatus);
    }

    info!(
        "Successfully enabled biometric login for account {}.",
        account.ic_number
    );
    Ok(Json(MessageResponse::new("Biometric login enabled.")))
}
