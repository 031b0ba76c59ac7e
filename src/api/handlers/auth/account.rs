//! Account records and migration state.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Delivery channel for a verification code. Decides where the code is sent
/// and which contact flag a successful confirmation sets.
#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Email,
    Sms,
}

impl Purpose {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

/// A stored user account, keyed by IC number.
///
/// `pin_hash` is present only once a PIN has been set. `is_migrated` implies
/// a PIN hash exists and both contact flags were confirmed when it was set.
#[derive(Clone, Debug)]
pub struct Account {
    pub ic_number: String,
    pub email: String,
    pub full_name: String,
    pub display_phone: String,
    pub phone: String,
    pub pin_hash: Option<String>,
    pub email_confirmed: bool,
    pub phone_confirmed: bool,
    pub has_agreed_to_terms: bool,
    pub biometric_enabled: bool,
    pub is_migrated: bool,
}

impl Account {
    /// Both contact channels confirmed. Gates SetPin and Login.
    #[must_use]
    pub fn contact_confirmed(&self) -> bool {
        self.email_confirmed && self.phone_confirmed
    }

    /// Migration state of an existing account.
    #[must_use]
    pub fn state(&self) -> AccountState {
        if self.is_migrated {
            AccountState::Migrated
        } else {
            AccountState::Unmigrated
        }
    }
}

/// Migration state, derived from the stored flags rather than persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountState {
    /// No account row exists for the IC number.
    Unregistered,
    /// Account exists but has not completed migration.
    Unmigrated,
    /// Account has set a PIN and uses the PIN login flow.
    Migrated,
}

impl AccountState {
    #[must_use]
    pub fn of(account: Option<&Account>) -> Self {
        account.map_or(Self::Unregistered, Account::state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            ic_number: "900101105678".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice Binti Ahmad".to_string(),
            display_phone: "+60 12 345 6789".to_string(),
            phone: "60123456789".to_string(),
            pin_hash: None,
            email_confirmed: false,
            phone_confirmed: false,
            has_agreed_to_terms: false,
            biometric_enabled: false,
            is_migrated: false,
        }
    }

    #[test]
    fn state_of_absent_account_is_unregistered() {
        assert_eq!(AccountState::of(None), AccountState::Unregistered);
    }

    #[test]
    fn state_of_fresh_account_is_unmigrated() {
        let account = account();
        assert_eq!(AccountState::of(Some(&account)), AccountState::Unmigrated);
    }

    #[test]
    fn state_follows_migrated_flag() {
        let mut account = account();
        account.is_migrated = true;
        assert_eq!(account.state(), AccountState::Migrated);
    }

    #[test]
    fn contact_confirmed_requires_both_flags() {
        let mut account = account();
        assert!(!account.contact_confirmed());
        account.email_confirmed = true;
        assert!(!account.contact_confirmed());
        account.phone_confirmed = true;
        assert!(account.contact_confirmed());
    }

    #[test]
    fn purpose_serde_uses_lowercase() {
        assert_eq!(
            serde_json::to_string(&Purpose::Sms).ok().as_deref(),
            Some("\"sms\"")
        );
        assert_eq!(
            serde_json::from_str::<Purpose>("\"email\"").ok(),
            Some(Purpose::Email)
        );
        assert!(serde_json::from_str::<Purpose>("\"fax\"").is_err());
    }

    #[test]
    fn purpose_as_str_matches_storage_values() {
        assert_eq!(Purpose::Email.as_str(), "email");
        assert_eq!(Purpose::Sms.as_str(), "sms");
    }
}
