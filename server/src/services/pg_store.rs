//! PostgreSQL-backed `AccountStore`.

use std::time::Duration;

use async_trait::async_trait;
use guard::Role;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::store::{AccountStore, NewUser, ProfileChanges, StoreError, UserRecord};

const USER_COLUMNS: &str = "id, name, email, password_hash, phone, address, answer_hash, role";

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn role_from_db(raw: i16) -> Result<Role, sqlx::Error> {
    let byte = u8::try_from(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Role::try_from(byte).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

fn role_to_db(role: Role) -> i16 {
    i16::from(u8::from(role))
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        answer_hash: row.try_get("answer_hash")?,
        role: role_from_db(row.try_get("role")?)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, phone, address, answer_hash, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.phone)
            .bind(&user.address)
            .bind(&user.answer_hash)
            .bind(role_to_db(user.role))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| if is_unique_violation(&e) { StoreError::EmailTaken } else { StoreError::Db(e) })?;
        Ok(user_from_row(&row)?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&sql).bind(email).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<UserRecord>, StoreError> {
        let sql = format!(
            "UPDATE users SET
                 name = COALESCE($2, name),
                 password_hash = COALESCE($3, password_hash),
                 phone = COALESCE($4, phone),
                 address = COALESCE($5, address),
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.password_hash)
            .bind(changes.phone)
            .bind(changes.address)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn create_session(&self, user_id: Uuid, token_hash: &str, ttl: Duration) -> Result<(), StoreError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?
            .rows_affected();
        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, expires_at)
             VALUES ($1, $2, now() + ($3::bigint * interval '1 second'))",
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(ttl_secs)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn session_user(&self, token_hash: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT u.id, u.name, u.email, u.password_hash, u.phone, u.address, u.answer_hash, u.role
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token_hash = $1 AND s.expires_at > now()",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "pg_store_test.rs"]
mod tests;
