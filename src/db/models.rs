use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, PartialEq, Eq, FromRow)]
pub struct UserEntry {
    pub user: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserList {
    pub count: usize,
    pub users: Vec<UserEntry>,
}

impl From<Vec<UserEntry>> for UserList {
    fn from(users: Vec<UserEntry>) -> Self {
        Self {
            count: users.len(),
            users,
        }
    }
}

/// Listing row; the value column is never selected.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, FromRow)]
pub struct SecretEntry {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SecretList {
    pub count: usize,
    pub secrets: Vec<SecretEntry>,
}

impl From<Vec<SecretEntry>> for SecretList {
    fn from(secrets: Vec<SecretEntry>) -> Self {
        Self {
            count: secrets.len(),
            secrets,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, FromRow)]
pub struct SecretRecord {
    pub name: String,
    pub value: String,
}
