//! PIN login for migrated accounts.

use axum::{extract::Extension, Json};
use sqlx::PgPool;
use tracing::{error, info, instrument};
use ulid::Ulid;

use crate::api::handlers::{valid_ic_number, valid_pin};

use super::errors::{AuthError, ErrorBody};
use super::storage;
use super::types::{AuthResponse, LoginRequest};
use super::utils::verify_pin;

const ACCESS_TOKEN_TTL_SECONDS: u64 = 3600;
const REFRESH_TOKEN_TTL_SECONDS: u64 = 604_800;

/// Authenticate with IC number + PIN.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Account not found or invalid PIN", body = ErrorBody),
        (status = 403, description = "Email or phone not confirmed", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, payload))]
pub async fn login(
    pool: Extension<PgPool>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<AuthResponse>, AuthError> {
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

    let Some(account) = storage::find_account(&pool, &request.ic_number).await? else {
        error!(
            "Login failed: account with IC number {} not found.",
            request.ic_number
        );
        return Err(AuthError::UserNotFound);
    };

    if !account.contact_confirmed() {
        error!(
            "Login failed: email or phone number not confirmed for account {}.",
            account.ic_number
        );
        return Err(AuthError::EmailOrPhoneNotConfirmed);
    }

    let pin_matches = account
        .pin_hash
        .as_deref()
        .is_some_and(|pin_hash| verify_pin(request.pin, pin_hash));
    if !pin_matches {
        error!(
            "Login failed: incorrect PIN for account {}.",
            account.ic_number
        );
        return Err(AuthError::InvalidPin);
    }

    info!("Login successful for account {}.", account.ic_number);

    // Opaque placeholders; a real token service signs these.
    Ok(Json(AuthResponse {
        full_name: account.full_name,
        access_token: Ulid::new().to_string(),
        ic_number: account.ic_number,
        expires_in: ACCESS_TOKEN_TTL_SECONDS,
        refresh_token: Ulid::new().to_string(),
        refresh_expires_in: REFRESH_TOKEN_TTL_SECONDS,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::types::LoginRequest;
    use super::login;
    use anyhow::Result;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::Json;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn login_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = login(Extension(pool), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_bad_ic_number() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let request = LoginRequest {
            ic_number: "not-numeric".to_string(),
            pin: 123_456,
        };
        let response = login(Extension(pool), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_out_of_range_pin() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let request = LoginRequest {
            ic_number: "900101105678".to_string(),
            pin: 42,
        };
        let response = login(Extension(pool), Some(Json(request)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
