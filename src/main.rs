use clap::Parser;
use credvault::{Config, CredentialStore, VaultError, cli::Cli};
use mimalloc::MiMalloc;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => return fail(&VaultError::from(e)),
    };
    if let Some(url) = cli.database_url.clone() {
        cfg.database_url = url;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    debug!(
        database_url = %cfg.database_url,
        memory_kib = cfg.hashing.memory_kib,
        iterations = cfg.hashing.iterations,
        parallelism = cfg.hashing.parallelism,
        loglevel = %cfg.loglevel
    );

    let store = match CredentialStore::initialize(&cfg).await {
        Ok(store) => store,
        Err(e) => return fail(&e),
    };

    let result = credvault::cli::run(&store, cli.command, cli.json, &mut std::io::stdout()).await;
    store.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &VaultError) -> ExitCode {
    debug!(error = ?e, "command failed");
    eprintln!("error: {e}");
    ExitCode::from(e.exit_code())
}
