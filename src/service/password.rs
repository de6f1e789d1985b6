//! Password hashing policy built on Argon2id.
//!
//! Hashes are stored as PHC strings, so the salt and the work factor used at
//! creation time travel with the hash and verification keeps working after the
//! configured parameters change.

use crate::config::HashingConfig;
use crate::error::VaultError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

#[derive(Clone)]
pub struct PasswordPolicy {
    params: Params,
    min_length: usize,
}

impl std::fmt::Debug for PasswordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordPolicy")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .field("parallelism", &self.params.p_cost())
            .field("min_length", &self.min_length)
            .finish()
    }
}

impl PasswordPolicy {
    /// Rejects parameter sets Argon2 cannot run with.
    pub fn new(cfg: &HashingConfig) -> Result<Self, VaultError> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)?;
        Ok(Self {
            params,
            min_length: cfg.min_password_length,
        })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn check_length(&self, plaintext: &str) -> Result<(), VaultError> {
        if plaintext.chars().count() < self.min_length {
            return Err(VaultError::InvalidInput(format!(
                "password must be at least {} characters",
                self.min_length
            )));
        }
        Ok(())
    }

    /// Salted Argon2id hash of `plaintext` as a PHC string.
    pub fn hash(&self, plaintext: &str) -> Result<String, VaultError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()
            .hash_password(plaintext.as_bytes(), &salt)?
            .to_string();
        Ok(hash)
    }

    /// `false` for a mismatch or an unparseable stored hash.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        self.hasher()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::PasswordPolicy;
    use crate::config::{Config, HashingConfig};
    use crate::error::VaultError;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::new(&Config::in_memory().hashing).expect("valid parameters")
    }

    #[test]
    fn hashes_and_verifies_passwords() {
        let policy = policy();
        let hash = policy.hash("hunter2").expect("hashing should succeed");
        assert_ne!(hash, "hunter2");
        assert!(hash.starts_with("$argon2id$"));
        assert!(policy.verify("hunter2", &hash));
        assert!(!policy.verify("hunter3", &hash));
    }

    #[test]
    fn same_password_gets_a_fresh_salt() {
        let policy = policy();
        let a = policy.hash("same").unwrap();
        let b = policy.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verification_follows_the_parameters_embedded_in_the_hash() {
        let hash = policy().hash("pw").unwrap();
        let stronger = PasswordPolicy::new(&HashingConfig {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
            min_password_length: 0,
        })
        .unwrap();
        assert!(stronger.verify("pw", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!policy().verify("pw", "not-a-phc-string"));
    }

    #[test]
    fn rejects_impossible_work_factor() {
        let cfg = HashingConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
            min_password_length: 0,
        };
        assert!(matches!(PasswordPolicy::new(&cfg), Err(VaultError::Hashing(_))));
    }

    #[test]
    fn minimum_length_is_optional() {
        assert!(policy().check_length("").is_ok());
        let strict = PasswordPolicy::new(&HashingConfig {
            min_password_length: 8,
            ..Config::in_memory().hashing
        })
        .unwrap();
        assert!(matches!(
            strict.check_length("short"),
            Err(VaultError::InvalidInput(_))
        ));
        assert!(strict.check_length("long enough").is_ok());
    }
}
