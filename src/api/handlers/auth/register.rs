//! Registration and the one-time migration entry point.

use axum::{extract::Extension, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::api::handlers::{valid_display_phone, valid_email, valid_full_name, valid_ic_number};

use super::account::{Account, AccountState, Purpose};
use super::codes::CodeGenerator;
use super::errors::{AuthError, ErrorBody};
use super::storage::{self, CreateOutcome};
use super::types::{MessageResponse, RegisterRequest};

/// Register a new account, or restart migration for an unmigrated one.
///
/// A missing account is created; an existing unmigrated account has its
/// details overwritten from the request; a migrated account is rejected.
/// Either success path ends with an SMS code issuance.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Verification code sent", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Account already migrated", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, generator, payload))]
pub async fn register(
    pool: Extension<PgPool>,
    generator: Extension<Arc<dyn CodeGenerator>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let Some(Json(request)) = payload else {
        return Err(AuthError::Validation("Missing payload".to_string()));
    };

    if !valid_ic_number(&request.ic_number) {
        return Err(AuthError::Validation(
            "IC Number must be numeric and exactly 12 digits.".to_string(),
        ));
    }

    let email = request.email.trim().to_lowercase();
    if !valid_email(&email) {
        return Err(AuthError::Validation("Email is not valid.".to_string()));
    }

    if !valid_full_name(&request.full_name) {
        return Err(AuthError::Validation(
            "Full name must be 10 to 50 letters and spaces.".to_string(),
        ));
    }

    if !valid_display_phone(&request.display_phone) {
        return Err(AuthError::Validation(
            "Mobile number must be in the format +60 XX XXX XXXX, with spaces.".to_string(),
        ));
    }

    let phone = request.phone();
    let account = storage::find_account(&pool, &request.ic_number).await?;

    match account {
        None => {
            info!(
                "Account with IC number {} does not exist. Proceeding with registration.",
                request.ic_number
            );
            let account = Account {
                ic_number: request.ic_number.clone(),
                email,
                full_name: request.full_name.clone(),
                display_phone: request.display_phone.clone(),
                phone,
                pin_hash: None,
                email_confirmed: false,
                phone_confirmed: false,
                has_agreed_to_terms: false,
                biometric_enabled: false,
                is_migrated: false,
            };

            if let CreateOutcome::Duplicate = storage::insert_account(&pool, &account).await? {
                error!(
                    "Account creation failed for {} - with IC number {}",
                    account.email, account.ic_number
                );
                return Err(AuthError::UserCreationFailed);
            }

            storage::issue_code(&pool, generator.as_ref(), &account, Purpose::Sms).await?;
            Ok(Json(MessageResponse::new("Verification code sent via SMS.")))
        }
        Some(existing) if existing.state() == AccountState::Migrated => {
            warn!(
                "Account with IC number {} has already been migrated.",
                request.ic_number
            );
            Err(AuthError::UserAlreadyMigrated)
        }
        Some(existing) => {
            warn!(
                "Account with IC number {} exists but is not migrated. Updating its details.",
                request.ic_number
            );
            let account = Account {
                email,
                full_name: request.full_name.clone(),
                display_phone: request.display_phone.clone(),
                phone,
                ..existing
            };

            if !storage::update_contact_details(&pool, &account).await? {
                error!(
                    "Failed to update account {} - with IC number {}",
                    account.email, account.ic_number
                );
                return Err(AuthError::UserUpdateFailed);
            }

            info!("Starting migration flow for account {}.", account.ic_number);
            storage::issue_code(&pool, generator.as_ref(), &account, Purpose::Sms).await?;
            Ok(Json(MessageResponse::new(
                "User is in migration flow. Verification code sent.",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::codes::{CodeGenerator, FixedCodeGenerator};
    use super::register;
    use anyhow::Result;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::Json;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    use super::super::types::RegisterRequest;

    fn generator() -> Arc<dyn CodeGenerator> {
        Arc::new(FixedCodeGenerator(4321))
    }

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "Alice@Example.com".to_string(),
            display_phone: "+60 12 345 6789".to_string(),
            full_name: "Alice Binti Ahmad".to_string(),
            ic_number: "900101105678".to_string(),
        }
    }

    #[tokio::test]
    async fn register_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = register(Extension(pool), Extension(generator()), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_short_ic_number() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let mut request = request();
        request.ic_number = "12345".to_string();
        let response = register(Extension(pool), Extension(generator()), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let mut request = request();
        request.email = "not-an-email".to_string();
        let response = register(Extension(pool), Extension(generator()), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_unformatted_phone() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let mut request = request();
        request.display_phone = "0123456789".to_string();
        let response = register(Extension(pool), Extension(generator()), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
