//! Command surface: one subcommand per store operation, plus console
//! formatting of the results.

use crate::error::VaultError;
use crate::service::credential_store::CredentialStore;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Parser)]
#[command(name = "credvault")]
#[command(about = "Local credential vault: hashed user accounts and per-user named secrets")]
#[command(version)]
pub struct Cli {
    /// Override the configured database, e.g. sqlite://./secrets.db
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Create a user with a hashed password
    #[command(name = "users:create")]
    UsersCreate {
        #[arg(long)]
        user: String,
        #[arg(long)]
        pass: String,
    },

    /// List all users
    #[command(name = "users:list")]
    UsersList,

    /// Store a new secret for a user
    #[command(name = "secrets:create")]
    SecretsCreate(SecretValueArgs),

    /// List a user's secret names (values hidden)
    #[command(name = "secrets:list")]
    SecretsList {
        #[arg(long)]
        user: String,
    },

    /// Print a secret value
    #[command(name = "secrets:get")]
    SecretsGet(SecretKeyArgs),

    /// Replace the value of an existing secret
    #[command(name = "secrets:update")]
    SecretsUpdate(SecretValueArgs),

    /// Delete a secret; succeeds if it is already gone
    #[command(name = "secrets:delete")]
    SecretsDelete(SecretKeyArgs),
}

#[derive(Debug, Args, PartialEq)]
pub struct SecretKeyArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Args, PartialEq)]
pub struct SecretValueArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub value: String,
}

/// Run one command against `store`, writing its report to `out`.
pub async fn run<W: Write>(
    store: &CredentialStore,
    command: Command,
    json: bool,
    out: &mut W,
) -> Result<(), VaultError> {
    match command {
        Command::UsersCreate { user, pass } => {
            store.create_user(&user, &pass).await?;
            report(out, format_args!("User {user} created"));
        }
        Command::UsersList => {
            let results = store.list_users().await?;
            if json {
                emit_json(out, &results);
            } else {
                if results.count == 0 {
                    report(out, format_args!("No users found"));
                }
                for entry in &results.users {
                    report(out, format_args!(" - {}", entry.user));
                }
                report(out, format_args!("Total: {}", results.count));
            }
        }
        Command::SecretsCreate(SecretValueArgs { user, name, value }) => {
            store.create_secret(&user, &name, &value).await?;
            report(out, format_args!("Secret {name} created for {user}"));
        }
        Command::SecretsList { user } => {
            let results = store.list_secrets(&user).await?;
            if json {
                emit_json(out, &results);
            } else {
                if results.count == 0 {
                    report(out, format_args!("No secrets found"));
                }
                for entry in &results.secrets {
                    report(out, format_args!(" - {}", entry.name));
                }
                report(out, format_args!("Total: {}", results.count));
            }
        }
        Command::SecretsGet(SecretKeyArgs { user, name }) => {
            let secret = store.get_secret(&user, &name).await?;
            if json {
                emit_json(out, &secret);
            } else {
                report(out, format_args!("{}", secret.value));
            }
        }
        Command::SecretsUpdate(SecretValueArgs { user, name, value }) => {
            store.update_secret(&user, &name, &value).await?;
            report(out, format_args!("Secret {name} updated"));
        }
        Command::SecretsDelete(SecretKeyArgs { user, name }) => {
            if store.delete_secret(&user, &name).await? {
                report(out, format_args!("Secret {name} deleted"));
            } else {
                report(out, format_args!("Secret {name} did not exist"));
            }
        }
    }
    Ok(())
}

// Write failures are ignored; the store operation has already run.
fn report<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) {
    let _ = writeln!(out, "{line}");
}

fn emit_json<W: Write, T: Serialize>(out: &mut W, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(body) => report(out, format_args!("{body}")),
        Err(e) => tracing::warn!(error = %e, "failed to serialize output"),
    }
}
