//! SINDESCOL server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the JSON API under `/api`.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash`:
//!
//! ```text
//! cargo run -p sindescol-server -- --hash-password
//! ```

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use sindescol_core::{
  store::MembershipStore,
  usuario::{NewUsuario, Rol},
};
use sindescol_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "SINDESCOL union registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let hash = sindescol_api::hash_password(&password)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?
    .with_timeout(server_cfg.query_timeout());

  if let Some(seed_path) = &server_cfg.seed_path {
    let seed_path = expand_tilde(seed_path);
    let sql = tokio::fs::read_to_string(&seed_path)
      .await
      .with_context(|| format!("failed to read seed file {seed_path:?}"))?;
    store
      .apply_sql(sql)
      .await
      .with_context(|| format!("failed to apply seed file {seed_path:?}"))?;
    tracing::info!(?seed_path, "reference data seeded");
  }

  bootstrap_admin(&store, &server_cfg).await?;

  let app = Router::new()
    .nest("/api", sindescol_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Create the configured administrator if no user exists yet.
async fn bootstrap_admin(store: &SqliteStore, cfg: &ServerConfig) -> anyhow::Result<()> {
  if store.count_usuarios().await.context("failed to count users")? > 0 {
    return Ok(());
  }
  let Some(password_hash) = cfg.admin_password_hash.clone() else {
    tracing::warn!("no users and no admin_password_hash configured; every request will be rejected");
    return Ok(());
  };

  let admin = NewUsuario {
    username: cfg.admin_username.clone(),
    nombre: "Administrador".to_owned(),
    rol: Rol::Admin,
    id_departamento: None,
    password_hash,
  };
  store
    .create_usuario(admin, None)
    .await
    .context("failed to create the initial administrator")?;
  tracing::info!(username = %cfg.admin_username, "initial administrator created");
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}
