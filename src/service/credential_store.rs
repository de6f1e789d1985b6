use crate::config::Config;
use crate::db::models::{SecretList, SecretRecord, UserList};
use crate::db::sqlite::{SqlitePool, VaultStorage};
use crate::error::VaultError;
use crate::service::password::PasswordPolicy;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

/// Handle over an initialized vault. Every operation is one request against
/// the store; nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct CredentialStore {
    storage: VaultStorage,
    passwords: PasswordPolicy,
}

impl CredentialStore {
    /// Open the database named by `cfg.database_url` and make sure both
    /// tables exist. Safe to call on every startup.
    pub async fn initialize(cfg: &Config) -> Result<Self, VaultError> {
        let passwords = PasswordPolicy::new(&cfg.hashing)?;
        let storage_init = |source: sqlx::Error| VaultError::StorageInit {
            url: cfg.database_url.clone(),
            source,
        };

        let connect_opts = SqliteConnectOptions::from_str(cfg.database_url.as_str())
            .map_err(storage_init)?
            .create_if_missing(true)
            .foreign_keys(true);
        // one operation per invocation; also keeps `sqlite::memory:` a single database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await
            .map_err(storage_init)?;

        let storage = VaultStorage::new(pool);
        storage.init_schema().await.map_err(storage_init)?;
        debug!(database_url = %cfg.database_url, "vault schema ready");

        Ok(Self { storage, passwords })
    }

    pub fn pool(&self) -> &SqlitePool {
        self.storage.pool()
    }

    /// Release the database handle.
    pub async fn close(&self) {
        self.storage.pool().close().await;
    }

    pub async fn create_user(&self, user: &str, plain_password: &str) -> Result<(), VaultError> {
        require_non_empty("user", user)?;
        self.passwords.check_length(plain_password)?;

        let policy = self.passwords.clone();
        let plain = plain_password.to_owned();
        let hash = tokio::task::spawn_blocking(move || policy.hash(&plain))
            .await
            .map_err(|e| VaultError::Hashing(format!("hashing task failed: {e}")))??;

        self.storage.insert_user(user, &hash).await?;
        info!(user, "user created");
        Ok(())
    }

    /// `false` for an unknown user or a wrong password.
    pub async fn verify_user(&self, user: &str, plain_password: &str) -> Result<bool, VaultError> {
        let Some(hash) = self.storage.password_hash(user).await? else {
            debug!(user, "verification for unknown user");
            return Ok(false);
        };

        let policy = self.passwords.clone();
        let plain = plain_password.to_owned();
        tokio::task::spawn_blocking(move || policy.verify(&plain, &hash))
            .await
            .map_err(|e| VaultError::Hashing(format!("verification task failed: {e}")))
    }

    pub async fn list_users(&self) -> Result<UserList, VaultError> {
        let users = self.storage.list_users().await?;
        debug!(count = users.len(), "listed users");
        Ok(users.into())
    }

    pub async fn create_secret(&self, user: &str, name: &str, value: &str) -> Result<(), VaultError> {
        require_non_empty("user", user)?;
        require_non_empty("name", name)?;
        self.storage.insert_secret(user, name, value).await?;
        info!(user, name, "secret created");
        Ok(())
    }

    pub async fn list_secrets(&self, user: &str) -> Result<SecretList, VaultError> {
        let secrets = self.storage.list_secrets(user).await?;
        debug!(user, count = secrets.len(), "listed secrets");
        Ok(secrets.into())
    }

    pub async fn get_secret(&self, user: &str, name: &str) -> Result<SecretRecord, VaultError> {
        self.storage
            .get_secret(user, name)
            .await?
            .ok_or_else(|| secret_not_found(user, name))
    }

    /// Never creates a missing secret: zero rows changed is `SecretNotFound`.
    pub async fn update_secret(
        &self,
        user: &str,
        name: &str,
        new_value: &str,
    ) -> Result<(), VaultError> {
        let changed = self.storage.update_secret(user, name, new_value).await?;
        if changed == 0 {
            return Err(secret_not_found(user, name));
        }
        info!(user, name, "secret updated");
        Ok(())
    }

    /// Idempotent: deleting a missing secret succeeds. Returns whether a row
    /// was actually removed.
    pub async fn delete_secret(&self, user: &str, name: &str) -> Result<bool, VaultError> {
        let removed = self.storage.delete_secret(user, name).await? > 0;
        if removed {
            info!(user, name, "secret deleted");
        } else {
            debug!(user, name, "delete of absent secret");
        }
        Ok(removed)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), VaultError> {
    if value.is_empty() {
        return Err(VaultError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

fn secret_not_found(user: &str, name: &str) -> VaultError {
    VaultError::SecretNotFound {
        user: user.to_string(),
        name: name.to_string(),
    }
}
