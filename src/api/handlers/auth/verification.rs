//! Verification code issuance and confirmation endpoints.

use axum::{extract::Extension, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::api::handlers::{valid_code, valid_ic_number};

use super::codes::CodeGenerator;
use super::errors::{AuthError, ErrorBody};
use super::storage;
use super::types::{ConfirmVerificationRequest, MessageResponse, VerificationRequest};

/// Send (or resend) a verification code over the requested channel.
///
/// Issuing always overwrites the live code for (account, purpose), so any
/// previously sent code silently stops working.
#[utoipa::path(
    post,
    path = "/auth/send-verification-code",
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification code sent", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Account not found", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, generator, payload))]
pub async fn send_code(
    pool: Extension<PgPool>,
    generator: Extension<Arc<dyn CodeGenerator>>,
    payload: Option<Json<VerificationRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::Validation("Missing payload".to_string()));
    };

    if !valid_ic_number(&request.ic_number) {
        return Err(AuthError::Validation(
            "IC Number must be numeric and exactly 12 digits.".to_string(),
        ));
    }

    let Some(account) = storage::find_account(&pool, &request.ic_number).await? else {
        error!(
            "Account with IC number {} not found.",
            request.ic_number
        );
        return Err(AuthError::UserNotFound);
    };

    storage::issue_code(&pool, generator.as_ref(), &account, request.purpose).await?;

    Ok(Json(MessageResponse::new("Verification code sent.")))
}

/// Confirm a verification code and set the matching contact flag.
///
/// A wrong, expired, or already-used code all fail the same way; callers
/// cannot tell which it was.
#[utoipa::path(
    post,
    path = "/auth/confirm-verification-code",
    request_body = ConfirmVerificationRequest,
    responses(
        (status = 200, description = "Verification code confirmed", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Account not found or invalid code", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, payload))]
pub async fn confirm_code(
    pool: Extension<PgPool>,
    payload: Option<Json<ConfirmVerificationRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::Validation("Missing payload".to_string()));
    };

    if !valid_ic_number(&request.ic_number) {
        return Err(AuthError::Validation(
            "IC Number must be numeric and exactly 12 digits.".to_string(),
        ));
    }

    if !valid_code(request.code) {
        return Err(AuthError::Validation(
            "Code must be a 4-digit number.".to_string(),
        ));
    }

    let Some(account) = storage::find_account(&pool, &request.ic_number).await? else {
        error!(
            "Account with IC number {} not found.",
            request.ic_number
        );
        return Err(AuthError::UserNotFound);
    };

    if !storage::confirm_code(&pool, &account.ic_number, request.purpose, request.code).await? {
        warn!(
            "Invalid or expired verification code for account {}.",
            account.ic_number
        );
        return Err(AuthError::InvalidCode);
    }

    info!(
        "Verification code for account {} confirmed and marked as used.",
        account.ic_number
    );
    Ok(Json(MessageResponse::new("Verification code confirmed.")))
}

#[cfg(test)]
mod tests {
    use super::super::account::Purpose;
    use super::super::codes::{CodeGenerator, FixedCodeGenerator};
    use super::super::types::{ConfirmVerificationRequest, VerificationRequest};
    use super::{confirm_code, send_code};
    use anyhow::Result;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::Json;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    fn generator() -> Arc<dyn CodeGenerator> {
        Arc::new(FixedCodeGenerator(4321))
    }

    #[tokio::test]
    async fn send_code_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = send_code(Extension(pool), Extension(generator()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn send_code_rejects_bad_ic_number() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let request = VerificationRequest {
            ic_number: "abc".to_string(),
            purpose: Purpose::Sms,
        };
        let response = send_code(Extension(pool), Extension(generator()), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn confirm_code_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = confirm_code(Extension(pool), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn confirm_code_rejects_out_of_range_code() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let request = ConfirmVerificationRequest {
            ic_number: "900101105678".to_string(),
            code: 123,
            purpose: Purpose::Email,
        };
        let response = confirm_code(Extension(pool), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
