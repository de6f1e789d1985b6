use crate::db::models::{SecretEntry, SecretRecord, UserEntry};
use crate::db::schema::SQLITE_INIT;
use crate::error::VaultError;
use sqlx::{Error as SqlxError, Pool, Sqlite};

pub type SqlitePool = Pool<Sqlite>;

/// Parameterized statements over the vault tables. Caller-supplied values are
/// always bound, never spliced into SQL text.
#[derive(Clone, Debug)]
pub struct VaultStorage {
    pool: SqlitePool,
}

impl VaultStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SqlxError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn insert_user(&self, user: &str, pass_hash: &str) -> Result<(), VaultError> {
        sqlx::query("INSERT INTO users (user, pass) VALUES (?, ?)")
            .bind(user)
            .bind(pass_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    VaultError::DuplicateUser(user.to_string())
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    /// Stored PHC hash for `user`, if the user exists.
    pub async fn password_hash(&self, user: &str) -> Result<Option<String>, VaultError> {
        let rec: Option<(String,)> = sqlx::query_as("SELECT pass FROM users WHERE user = ?")
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rec.map(|r| r.0))
    }

    pub async fn list_users(&self) -> Result<Vec<UserEntry>, VaultError> {
        let rows = sqlx::query_as::<_, UserEntry>("SELECT user FROM users ORDER BY user")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Insert a secret after checking, in the same transaction, that the owner
    /// exists. The foreign key constraint backs the check up.
    pub async fn insert_secret(
        &self,
        user: &str,
        name: &str,
        value: &str,
    ) -> Result<(), VaultError> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE user = ?")
            .bind(user)
            .fetch_optional(&mut *tx)
            .await?;
        if owner.is_none() {
            return Err(VaultError::UnknownUser(user.to_string()));
        }

        sqlx::query("INSERT INTO secrets (user, name, value) VALUES (?, ?, ?)")
            .bind(user)
            .bind(name)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    VaultError::DuplicateSecret {
                        user: user.to_string(),
                        name: name.to_string(),
                    }
                } else if is_foreign_key_violation(&e) {
                    VaultError::UnknownUser(user.to_string())
                } else {
                    e.into()
                }
            })?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_secrets(&self, user: &str) -> Result<Vec<SecretEntry>, VaultError> {
        let rows = sqlx::query_as::<_, SecretEntry>(
            "SELECT name FROM secrets WHERE user = ? ORDER BY name",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_secret(
        &self,
        user: &str,
        name: &str,
    ) -> Result<Option<SecretRecord>, VaultError> {
        let row = sqlx::query_as::<_, SecretRecord>(
            "SELECT name, value FROM secrets WHERE user = ? AND name = ?",
        )
        .bind(user)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Returns the number of rows changed; zero means no such secret.
    pub async fn update_secret(
        &self,
        user: &str,
        name: &str,
        value: &str,
    ) -> Result<u64, VaultError> {
        let res = sqlx::query("UPDATE secrets SET value = ? WHERE user = ? AND name = ?")
            .bind(value)
            .bind(user)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    /// Returns the number of rows removed.
    pub async fn delete_secret(&self, user: &str, name: &str) -> Result<u64, VaultError> {
        let res = sqlx::query("DELETE FROM secrets WHERE user = ? AND name = ?")
            .bind(user)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}

fn is_unique_violation(e: &SqlxError) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn is_foreign_key_violation(e: &SqlxError) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}
