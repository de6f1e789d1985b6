use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum VaultError {
    #[error("cannot prepare storage at {url}: {source}")]
    StorageInit {
        url: String,
        #[source]
        source: SqlxError,
    },

    #[error("user {0} already exists")]
    DuplicateUser(String),

    #[error("secret {name} already exists for user {user}")]
    DuplicateSecret { user: String, name: String },

    #[error("user {0} does not exist")]
    UnknownUser(String),

    #[error("secret {name} not found for user {user}")]
    SecretNotFound { user: String, name: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),
}

impl VaultError {
    /// Process exit code the dispatcher reports for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            VaultError::DuplicateUser(_)
            | VaultError::DuplicateSecret { .. }
            | VaultError::UnknownUser(_)
            | VaultError::SecretNotFound { .. }
            | VaultError::InvalidInput(_) => 1,
            VaultError::StorageInit { .. }
            | VaultError::Hashing(_)
            | VaultError::Config(_)
            | VaultError::Database(_) => 2,
        }
    }
}

impl From<argon2::password_hash::Error> for VaultError {
    fn from(e: argon2::password_hash::Error) -> Self {
        VaultError::Hashing(e.to_string())
    }
}

impl From<argon2::Error> for VaultError {
    fn from(e: argon2::Error) -> Self {
        VaultError::Hashing(e.to_string())
    }
}
