//! Configuration loading
//!
//! A single TOML file configures the engine. The file location resolves
//! with priority: CLI argument -> `OSTMAP_CONFIG` environment variable ->
//! `./ostmap.toml` -> built-in defaults (no file). Secrets additionally
//! resolve ENV -> TOML, so deployments can keep credentials out of the
//! file.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "OSTMAP_CONFIG";

/// Engine configuration as written in TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// SQLite database file; default `./ostmap.db`
    pub database_path: Option<PathBuf>,
    /// External ontology definition; default: bundled definition
    pub ontology_path: Option<PathBuf>,
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub feed: FeedSection,
    #[serde(default)]
    pub batch: BatchSection,
}

/// External music catalog credentials
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Market/region pin for catalog searches; default "KR"
    pub market: Option<String>,
}

/// Box-office feed credentials
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedSection {
    pub api_key: Option<String>,
}

/// Batch run tuning
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchSection {
    /// Concurrent item workers; default 4
    pub workers: Option<usize>,
    /// Ranked movies consumed per cycle; default 10
    pub item_limit: Option<usize>,
}

impl TomlConfig {
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("ostmap.db"))
    }

    pub fn market(&self) -> String {
        self.catalog
            .market
            .clone()
            .unwrap_or_else(|| "KR".to_string())
    }

    pub fn workers(&self) -> usize {
        self.batch.workers.unwrap_or(4)
    }

    pub fn item_limit(&self) -> usize {
        self.batch.item_limit.unwrap_or(10)
    }
}

/// Load configuration following the priority order above
pub fn load(cli_path: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = cli_path {
        return load_file(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return load_file(Path::new(&path));
    }

    let default_path = Path::new("ostmap.toml");
    if default_path.exists() {
        return load_file(default_path);
    }

    info!("No config file found; using built-in defaults");
    Ok(TomlConfig::default())
}

fn load_file(path: &Path) -> Result<TomlConfig> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read {}: {}", path.display(), e)))?;
    let config: TomlConfig =
        toml::from_str(&text).map_err(|e| Error::Config(format!("parse {}: {}", path.display(), e)))?;
    info!("Configuration loaded from {}", path.display());
    Ok(config)
}

/// Resolve catalog client credentials with ENV -> TOML priority
pub fn resolve_catalog_credentials(config: &TomlConfig) -> Result<(String, String)> {
    let env_id = std::env::var("OSTMAP_CATALOG_CLIENT_ID").ok();
    let env_secret = std::env::var("OSTMAP_CATALOG_CLIENT_SECRET").ok();

    if env_id.is_some() && config.catalog.client_id.is_some() {
        warn!("Catalog client id set in both environment and TOML; using environment");
    }

    let client_id = env_id
        .or_else(|| config.catalog.client_id.clone())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::Config(
                "Catalog client id not configured (OSTMAP_CATALOG_CLIENT_ID or [catalog] client_id)"
                    .to_string(),
            )
        })?;
    let client_secret = env_secret
        .or_else(|| config.catalog.client_secret.clone())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::Config(
                "Catalog client secret not configured (OSTMAP_CATALOG_CLIENT_SECRET or [catalog] client_secret)"
                    .to_string(),
            )
        })?;

    Ok((client_id, client_secret))
}

/// Resolve box-office feed API key with ENV -> TOML priority
pub fn resolve_feed_api_key(config: &TomlConfig) -> Result<String> {
    if std::env::var("OSTMAP_FEED_API_KEY").is_ok() && config.feed.api_key.is_some() {
        warn!("Feed API key set in both environment and TOML; using environment");
    }

    std::env::var("OSTMAP_FEED_API_KEY")
        .ok()
        .or_else(|| config.feed.api_key.clone())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::Config(
                "Feed API key not configured (OSTMAP_FEED_API_KEY or [feed] api_key)".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.database_path(), PathBuf::from("ostmap.db"));
        assert_eq!(config.market(), "KR");
        assert_eq!(config.workers(), 4);
        assert_eq!(config.item_limit(), 10);
    }

    #[test]
    fn test_parse_full_config() {
        let config: TomlConfig = toml::from_str(
            r#"
            database_path = "/var/lib/ostmap/ostmap.db"
            ontology_path = "/etc/ostmap/ontology.toml"

            [catalog]
            client_id = "id"
            client_secret = "secret"
            market = "JP"

            [feed]
            api_key = "feedkey"

            [batch]
            workers = 8
            item_limit = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.market(), "JP");
        assert_eq!(config.workers(), 8);
        assert_eq!(config.item_limit(), 20);
        let (id, secret) = resolve_catalog_credentials(&config).unwrap();
        assert_eq!(id, "id");
        assert_eq!(secret, "secret");
        assert_eq!(resolve_feed_api_key(&config).unwrap(), "feedkey");
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let config = TomlConfig::default();
        assert!(matches!(
            resolve_catalog_credentials(&config),
            Err(Error::Config(_))
        ));
        assert!(matches!(resolve_feed_api_key(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database_path = \"test.db\"").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.database_path(), PathBuf::from("test.db"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = load(Some(Path::new("/nonexistent/ostmap.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
