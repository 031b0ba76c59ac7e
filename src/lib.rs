//! # Daftar (User Migration & Registration)
//!
//! `daftar` registers legacy account holders and walks them through a
//! one-time migration: identity is proven with short-lived numeric codes
//! delivered over SMS or email, a 6-digit PIN is set once both contact
//! channels are confirmed, and from then on the account logs in with
//! IC number + PIN.
//!
//! ## Accounts
//!
//! Accounts are keyed by IC number (12 digits, immutable). An account that
//! exists but has not migrated may be re-registered in place; a migrated
//! account is locked to the PIN login flow.
//!
//! ## Verification codes
//!
//! Codes are 4-digit numbers valid for five minutes, with at most one live
//! code per (account, purpose). Requesting a new code overwrites the prior
//! one, and a confirmed code is soft-consumed so it can never be replayed.
//!
//! ## Notifications
//!
//! Code delivery goes through a database-backed outbox drained by a
//! background worker; request paths never wait on delivery.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        // Should be a hex string (full SHA-1 is 40 chars, but could be short)
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
