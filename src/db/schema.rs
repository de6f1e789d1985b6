//! SQL DDL for the vault storage.

/// SQLite schema with:
/// - `users.user` as the primary key, `pass` holding the PHC hash string
/// - `secrets` keyed by `(user, name)` and owned by a user
/// - cascade on user removal; renaming a user does not touch secrets
///
/// Every statement is `IF NOT EXISTS`, so running it on each startup is a no-op
/// once the tables exist.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user TEXT PRIMARY KEY,
    pass TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS secrets (
    user TEXT,
    name TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (user, name),
    FOREIGN KEY (user)
        REFERENCES users (user)
            ON DELETE CASCADE
            ON UPDATE NO ACTION
);
"#;
