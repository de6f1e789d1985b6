//! Database module: schema, row models and the SQLite storage layer.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and query results
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: parameterized statements over a `SqlitePool`

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{SecretEntry, SecretList, SecretRecord, UserEntry, UserList};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, VaultStorage};
