//! Gradebook HTTP server: configuration loading and app assembly.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use config::{Config, ConfigError, Environment, File};
use gradebook_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Prefix for environment overrides, e.g. `GRADEBOOK_PORT=9000`.
pub const ENV_PREFIX: &str = "GRADEBOOK";

/// Runtime server configuration, deserialised from `gradebook.toml` and
/// `GRADEBOOK_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8080,
      store_path: PathBuf::from("gradebook.sqlite3"),
    }
  }
}

impl ServerConfig {
  /// Load from an optional TOML file, overridden by the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

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

// ─── App ─────────────────────────────────────────────────────────────────────

/// The full application: the JSON API with request tracing.
pub fn app(store: SqliteStore) -> Router {
  gradebook_api::api_router(Arc::new(store)).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use config::FileFormat;
  use tower::ServiceExt as _;

  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_uses_defaults() {
    assert_eq!(from_toml(""), ServerConfig::default());
  }

  #[test]
  fn file_overrides_some_fields() {
    let cfg = from_toml("port = 9090\nstore_path = \"/var/lib/gradebook.db\"\n");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.store_path, PathBuf::from("/var/lib/gradebook.db"));
    assert_eq!(cfg.address(), "127.0.0.1:9090");
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/gradebook.toml"));
    assert!(cfg.is_ok());
  }

  #[test]
  fn tilde_expansion() {
    let plain = Path::new("data/gradebook.sqlite3");
    assert_eq!(expand_tilde(plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/gb.sqlite3")),
        PathBuf::from(home).join("gb.sqlite3")
      );
    }
  }

  #[tokio::test]
  async fn app_serves_the_api() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let req = Request::builder().uri("/classes").body(Body::empty()).unwrap();
    let resp = app(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }
}
