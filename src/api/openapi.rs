//! OpenAPI document for the service.

use utoipa::OpenApi;

use super::handlers::auth::account::Purpose;
use super::handlers::auth::errors::ErrorBody;
use super::handlers::auth::types::{
    AuthResponse, ConfirmVerificationRequest, LoginRequest, MessageResponse, RegisterRequest,
    SetPinRequest, VerificationRequest,
};
use super::handlers::health::Health;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::auth::register::register,
        crate::api::handlers::auth::profile::agree_to_terms,
        crate::api::handlers::auth::pin::set_pin,
        crate::api::handlers::auth::profile::enable_biometric,
        crate::api::handlers::auth::verification::send_code,
        crate::api::handlers::auth::verification::confirm_code,
        crate::api::handlers::auth::login::login,
        crate::api::handlers::health::health,
    ),
    components(schemas(
        Purpose,
        ErrorBody,
        RegisterRequest,
        SetPinRequest,
        LoginRequest,
        VerificationRequest,
        ConfirmVerificationRequest,
        MessageResponse,
        AuthResponse,
        Health,
    )),
    tags(
        (name = "auth", description = "Registration, verification, migration, and login"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
