//! Party credential queries

use crate::StorageError;
use chrono::DateTime;
use juke_core::{Credential, PartyCode};
use sqlx::SqlitePool;

type Result<T> = std::result::Result<T, StorageError>;

#[derive(sqlx::FromRow)]
struct CredentialRow {
    party_code: String,
    access_token: String,
    refresh_token: String,
    expires_at: i64,
}

impl TryFrom<CredentialRow> for Credential {
    type Error = StorageError;

    fn try_from(row: CredentialRow) -> Result<Self> {
        let party_code = PartyCode::parse(&row.party_code)
            .map_err(|e| StorageError::corrupt(&row.party_code, e.to_string()))?;
        let expires_at = DateTime::from_timestamp(row.expires_at, 0).ok_or_else(|| {
            StorageError::corrupt(&row.party_code, "expires_at out of range")
        })?;

        Ok(Credential {
            party_code,
            access_token: row.access_token,
            refresh_token: row.refresh_token,
            expires_at,
        })
    }
}

/// Get the live credential for a party
///
/// Retired parties yield `None`.
pub async fn get(pool: &SqlitePool, party_code: &PartyCode) -> Result<Option<Credential>> {
    let row = sqlx::query_as::<_, CredentialRow>(
        "SELECT party_code, access_token, refresh_token, expires_at
         FROM party_credentials WHERE party_code = ? AND is_active = 1",
    )
    .bind(party_code.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(Credential::try_from).transpose()
}

/// Replace the credential of a live party, or insert it if the code is new
///
/// Returns `false` when the party was retired and the write was ignored.
///
/// `expires_at` is stored with second precision.
pub async fn upsert(pool: &SqlitePool, credential: &Credential) -> Result<bool> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO party_credentials
             (party_code, access_token, refresh_token, expires_at, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, 1, ?, ?)
         ON CONFLICT(party_code) DO UPDATE SET
             access_token = excluded.access_token,
             refresh_token = excluded.refresh_token,
             expires_at = excluded.expires_at,
             updated_at = excluded.updated_at
         WHERE party_credentials.is_active = 1",
    )
    .bind(credential.party_code.as_str())
    .bind(&credential.access_token)
    .bind(&credential.refresh_token)
    .bind(credential.expires_at.timestamp())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Insert the first credential of a party
///
/// Returns `false` if the code already has a row, live or retired.
pub async fn insert_new(pool: &SqlitePool, credential: &Credential) -> Result<bool> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO party_credentials
             (party_code, access_token, refresh_token, expires_at, is_active, created_at, updated_at)
         VALUES (?, ?, ?, ?, 1, ?, ?)
         ON CONFLICT(party_code) DO NOTHING",
    )
    .bind(credential.party_code.as_str())
    .bind(&credential.access_token)
    .bind(&credential.refresh_token)
    .bind(credential.expires_at.timestamp())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Retire a party: wipe its tokens and stop serving its credential
pub async fn retire(pool: &SqlitePool, party_code: &PartyCode) -> Result<bool> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE party_credentials
         SET is_active = 0, access_token = '', refresh_token = '', updated_at = ?
         WHERE party_code = ? AND is_active = 1",
    )
    .bind(now)
    .bind(party_code.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Count live parties
pub async fn count_live(pool: &SqlitePool) -> Result<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM party_credentials WHERE is_active = 1")
            .fetch_one(pool)
            .await?;

    Ok(count)
}
