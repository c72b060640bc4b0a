//! Runtime server configuration, deserialised from `config.toml` overlaid by
//! `SINDESCOL_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// SQL executed after the schema on every start; must be idempotent
  /// (`INSERT OR IGNORE`).
  pub seed_path:           Option<PathBuf>,
  pub query_timeout_secs:  u64,
  /// Username of the administrator created when the users table is empty.
  pub admin_username:      String,
  /// argon2 PHC string for that administrator, see `--hash-password`.
  pub admin_password_hash: Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_owned(),
      port:                3000,
      store_path:          PathBuf::from("sindescol.db"),
      seed_path:           None,
      query_timeout_secs:  5,
      admin_username:      "admin".to_owned(),
      admin_password_hash: None,
    }
  }
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SINDESCOL"))
      .build()?
      .try_deserialize()
  }

  pub fn query_timeout(&self) -> Duration { Duration::from_secs(self.query_timeout_secs) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/sindescol.toml")).unwrap();
    assert_eq!(cfg.port, 3000);
    assert_eq!(cfg.query_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.admin_username, "admin");
    assert!(cfg.admin_password_hash.is_none());
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/db.sqlite")), PathBuf::from(home).join("db.sqlite"));
    assert_eq!(expand_tilde(Path::new("/var/db.sqlite")), PathBuf::from("/var/db.sqlite"));
  }
}
