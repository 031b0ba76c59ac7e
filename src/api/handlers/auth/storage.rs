//! Database helpers for accounts and verification codes.
//!
//! Issue and Confirm each run as one transaction: issuing a code upserts the
//! (account, purpose) row and enqueues the outbound notification together;
//! confirming consumes the code row and sets the contact flag together.

use anyhow::{Context, Result};
use serde_json::json;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{info, Instrument};

use super::account::{Account, Purpose};
use super::codes::{CodeGenerator, CODE_TTL_SECONDS};
use super::utils::is_unique_violation;

/// Outcome when attempting to create a new account.
#[derive(Debug)]
pub(super) enum CreateOutcome {
    Created,
    Duplicate,
}

fn account_from_row(row: &PgRow) -> Account {
    Account {
        ic_number: row.get("ic_number"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        display_phone: row.get("display_phone"),
        phone: row.get("phone"),
        pin_hash: row.get("pin_hash"),
        email_confirmed: row.get("email_confirmed"),
        phone_confirmed: row.get("phone_confirmed"),
        has_agreed_to_terms: row.get("has_agreed_to_terms"),
        biometric_enabled: row.get("biometric_enabled"),
        is_migrated: row.get("is_migrated"),
    }
}

pub(super) async fn find_account(pool: &PgPool, ic_number: &str) -> Result<Option<Account>> {
    let query = r"
        SELECT ic_number, email, full_name, display_phone, phone, pin_hash,
               email_confirmed, phone_confirmed, has_agreed_to_terms,
               biometric_enabled, is_migrated
        FROM users
        WHERE ic_number = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(ic_number)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup account")?;

    Ok(row.map(|row| account_from_row(&row)))
}

pub(super) async fn insert_account(pool: &PgPool, account: &Account) -> Result<CreateOutcome> {
    let query = r"
        INSERT INTO users (ic_number, email, full_name, display_phone, phone)
        VALUES ($1, $2, $3, $4, $5)
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(&account.ic_number)
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(&account.display_phone)
        .bind(&account.phone)
        .execute(pool)
        .instrument(span)
        .await;

    match result {
        Ok(_) => Ok(CreateOutcome::Created),
        Err(err) if is_unique_violation(&err) => Ok(CreateOutcome::Duplicate),
        Err(err) => Err(err).context("failed to insert account"),
    }
}

/// Overwrite the mutable identity fields of an unmigrated account.
pub(super) async fn update_contact_details(pool: &PgPool, account: &Account) -> Result<bool> {
    let query = r"
        UPDATE users
        SET email = $2,
            full_name = $3,
            display_phone = $4,
            phone = $5,
            updated_at = NOW()
        WHERE ic_number = $1
          AND is_migrated = FALSE
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(&account.ic_number)
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(&account.display_phone)
        .bind(&account.phone)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update account details")?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn set_terms_agreed(pool: &PgPool, ic_number: &str) -> Result<bool> {
    let query = r"
        UPDATE users
        SET has_agreed_to_terms = TRUE,
            updated_at = NOW()
        WHERE ic_number = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(ic_number)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update terms agreement")?;

    Ok(result.rows_affected() > 0)
}

pub(super) async fn set_biometric_enabled(pool: &PgPool, ic_number: &str) -> Result<bool> {
    let query = r"
        UPDATE users
        SET biometric_enabled = TRUE,
            updated_at = NOW()
        WHERE ic_number = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(ic_number)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update biometric status")?;

    Ok(result.rows_affected() > 0)
}

/// Store the PIN hash and flip the account to migrated in one statement.
pub(super) async fn set_pin_and_migrate(
    pool: &PgPool,
    ic_number: &str,
    pin_hash: &str,
) -> Result<bool> {
    let query = r"
        UPDATE users
        SET pin_hash = $2,
            is_migrated = TRUE,
            updated_at = NOW()
        WHERE ic_number = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(ic_number)
        .bind(pin_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to update PIN")?;

    Ok(result.rows_affected() > 0)
}

/// Issue a fresh code for (account, purpose): overwrite any existing row and
/// enqueue the notification in the same transaction. Returns the code.
pub(super) async fn issue_code(
    pool: &PgPool,
    generator: &dyn CodeGenerator,
    account: &Account,
    purpose: Purpose,
) -> Result<i32> {
    let code = generator.generate();

    let mut tx = pool.begin().await.context("begin issue transaction")?;

    upsert_code(&mut tx, &account.ic_number, purpose, code).await?;
    enqueue_notification(&mut tx, account, purpose, code).await?;

    tx.commit().await.context("commit issue transaction")?;

    info!(
        ic_number = %account.ic_number,
        purpose = purpose.as_str(),
        "Generated and stored new verification code"
    );

    Ok(code)
}

async fn upsert_code(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ic_number: &str,
    purpose: Purpose,
    code: i32,
) -> Result<()> {
    // One row per (account, purpose): a reissue overwrites code, expiry, and
    // the used flag in place, so the prior code silently stops working.
    let query = r"
        INSERT INTO verification_codes (ic_number, purpose, code, expires_at)
        VALUES ($1, $2, $3, NOW() + ($4 * INTERVAL '1 second'))
        ON CONFLICT (ic_number, purpose) DO UPDATE
        SET code = EXCLUDED.code,
            expires_at = EXCLUDED.expires_at,
            used = FALSE,
            updated_at = NOW()
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(ic_number)
        .bind(purpose.as_str())
        .bind(code)
        .bind(CODE_TTL_SECONDS)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("failed to upsert verification code")?;

    Ok(())
}

async fn enqueue_notification(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    account: &Account,
    purpose: Purpose,
    code: i32,
) -> Result<()> {
    let recipient = match purpose {
        Purpose::Email => &account.email,
        Purpose::Sms => &account.phone,
    };
    let payload_json = json!({
        "code": code,
        "full_name": account.full_name,
    });
    let payload_text =
        serde_json::to_string(&payload_json).context("failed to serialize notification payload")?;

    let query = r"
        INSERT INTO notification_outbox (recipient, channel, template, payload_json)
        VALUES ($1, $2, $3, $4::jsonb)
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(recipient)
        .bind(purpose.as_str())
        .bind("verification_code")
        .bind(payload_text)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("failed to insert notification outbox row")?;

    Ok(())
}

/// Consume a code and set the matching contact flag in one transaction.
///
/// The conditional UPDATE is the single authority on validity: a wrong,
/// expired, or already-used code all miss it, and concurrent confirms
/// serialize on the row so only one can flip `used`.
pub(super) async fn confirm_code(
    pool: &PgPool,
    ic_number: &str,
    purpose: Purpose,
    code: i32,
) -> Result<bool> {
    let mut tx = pool.begin().await.context("begin confirm transaction")?;

    let query = r"
        UPDATE verification_codes
        SET used = TRUE,
            updated_at = NOW()
        WHERE ic_number = $1
          AND purpose = $2
          AND code = $3
          AND used = FALSE
          AND expires_at > NOW()
        RETURNING ic_number
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(ic_number)
        .bind(purpose.as_str())
        .bind(code)
        .fetch_optional(&mut *tx)
        .instrument(span)
        .await
        .context("failed to consume verification code")?;

    if row.is_none() {
        let _ = tx.rollback().await;
        return Ok(false);
    }

    let query = match purpose {
        Purpose::Email => {
            r"
            UPDATE users
            SET email_confirmed = TRUE,
                updated_at = NOW()
            WHERE ic_number = $1
            "
        }
        Purpose::Sms => {
            r"
            UPDATE users
            SET phone_confirmed = TRUE,
                updated_at = NOW()
            WHERE ic_number = $1
            "
        }
    };
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(ic_number)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to update contact confirmation")?;

    tx.commit().await.context("commit confirm transaction")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::CreateOutcome;

    #[test]
    fn create_outcome_debug_names() {
        assert_eq!(format!("{:?}", CreateOutcome::Created), "Created");
        assert_eq!(format!("{:?}", CreateOutcome::Duplicate), "Duplicate");
    }
}
