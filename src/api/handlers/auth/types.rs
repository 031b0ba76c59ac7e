//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::account::Purpose;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub display_phone: String,
    pub full_name: String,
    pub ic_number: String,
}

impl RegisterRequest {
    /// Digits-only rendering of the display phone number.
    #[must_use]
    pub fn phone(&self) -> String {
        self.display_phone
            .chars()
            .filter(char::is_ascii_digit)
            .collect()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SetPinRequest {
    pub ic_number: String,
    pub pin: u32,
    pub confirmed_pin: u32,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub ic_number: String,
    pub pin: u32,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerificationRequest {
    pub ic_number: String,
    pub purpose: Purpose,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ConfirmVerificationRequest {
    pub ic_number: String,
    pub code: i32,
    pub purpose: Purpose,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login payload. Tokens are opaque placeholders until a real token service
/// signs them; expiries mirror the intended session windows.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub full_name: String,
    pub access_token: String,
    pub ic_number: String,
    pub expires_in: u64,
    pub refresh_token: String,
    pub refresh_expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn register_request_round_trips() -> Result<()> {
        let request = RegisterRequest {
            email: "Alice@Example.com".to_string(),
            display_phone: "+60 12 345 6789".to_string(),
            full_name: "Alice Binti Ahmad".to_string(),
            ic_number: "900101105678".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let ic_number = value
            .get("ic_number")
            .and_then(serde_json::Value::as_str)
            .context("missing ic_number")?;
        assert_eq!(ic_number, "900101105678");
        let decoded: RegisterRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.display_phone, "+60 12 345 6789");
        Ok(())
    }

    #[test]
    fn phone_strips_everything_but_digits() {
        let request = RegisterRequest {
            email: "alice@example.com".to_string(),
            display_phone: "+60 12 345 6789".to_string(),
            full_name: "Alice Binti Ahmad".to_string(),
            ic_number: "900101105678".to_string(),
        };
        assert_eq!(request.phone(), "60123456789");
    }

    #[test]
    fn phone_of_empty_display_is_empty() {
        let request = RegisterRequest {
            email: "alice@example.com".to_string(),
            display_phone: String::new(),
            full_name: "Alice Binti Ahmad".to_string(),
            ic_number: "900101105678".to_string(),
        };
        assert_eq!(request.phone(), "");
    }

    #[test]
    fn confirm_request_round_trips() -> Result<()> {
        let request = ConfirmVerificationRequest {
            ic_number: "900101105678".to_string(),
            code: 1234,
            purpose: Purpose::Sms,
        };
        let value = serde_json::to_value(&request)?;
        let decoded: ConfirmVerificationRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.code, 1234);
        assert_eq!(decoded.purpose, Purpose::Sms);
        Ok(())
    }

    #[test]
    fn verification_request_rejects_unknown_purpose() {
        let result = serde_json::from_str::<VerificationRequest>(
            r#"{"ic_number":"900101105678","purpose":"pigeon"}"#,
        );
        assert!(result.is_err());
    }
}
