//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then `CREDVAULT_*` environment
//! variables (nested keys separated by `__`). A `.env` file is loaded into the
//! environment by `main` before extraction.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "CREDVAULT_";
pub const DATABASE_FILE: &str = "secrets.db";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub loglevel: String,
    pub hashing: HashingConfig,
}

/// Argon2id work factor and password policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    /// 0 disables the length check.
    pub min_password_length: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
            min_password_length: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            loglevel: "warn".to_string(),
            hashing: HashingConfig::default(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// In-memory store with a cheap work factor, for tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            loglevel: "warn".to_string(),
            hashing: HashingConfig {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
                min_password_length: 0,
            },
        }
    }
}

/// `secrets.db` next to the installed executable.
fn default_database_url() -> String {
    let path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DATABASE_FILE)))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE));
    format!("sqlite://{}", path.display())
}
