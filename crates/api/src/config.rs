//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use solestore_catalog::{Product, HIGHEST_PRICE};

use crate::route_handler::DEFAULT_BODY_LIMIT;

pub const BIND_ADDR_ENV: &str = "SOLESTORE_BIND_ADDR";
pub const PRICE_CEILING_ENV: &str = "SOLESTORE_PRICE_CEILING";
pub const CATALOG_ENV: &str = "SOLESTORE_CATALOG";
pub const BODY_LIMIT_ENV: &str = "SOLESTORE_BODY_LIMIT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse catalog {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Max price at or above this value disables the upper price bound.
    pub price_ceiling: f64,
    /// JSON array of products to serve. `None` starts with an empty catalog.
    pub catalog_path: Option<PathBuf>,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            price_ceiling: HIGHEST_PRICE,
            catalog_path: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = match lookup(BIND_ADDR_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<SocketAddr>()
                .map_err(|e| invalid(BIND_ADDR_ENV, &raw, e.to_string()))?,
            None => {
                tracing::warn!("{BIND_ADDR_ENV} not set; using {DEFAULT_BIND_ADDR}");
                defaults.bind_addr
            }
        };

        let price_ceiling = match lookup(PRICE_CEILING_ENV) {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => v,
                Ok(_) => return Err(invalid(PRICE_CEILING_ENV, &raw, "must be a positive number")),
                Err(e) => return Err(invalid(PRICE_CEILING_ENV, &raw, e.to_string())),
            },
            None => {
                tracing::warn!(
                    "{PRICE_CEILING_ENV} not set; using {}",
                    defaults.price_ceiling
                );
                defaults.price_ceiling
            }
        };

        let body_limit = match lookup(BODY_LIMIT_ENV) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => v,
                Ok(_) => return Err(invalid(BODY_LIMIT_ENV, &raw, "must be greater than zero")),
                Err(e) => return Err(invalid(BODY_LIMIT_ENV, &raw, e.to_string())),
            },
            None => {
                tracing::warn!("{BODY_LIMIT_ENV} not set; using {} bytes", defaults.body_limit);
                defaults.body_limit
            }
        };

        let catalog_path = lookup(CATALOG_ENV)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            price_ceiling,
            catalog_path,
            body_limit,
        })
    }

    /// Products to serve: the configured catalog file, or nothing.
    pub fn load_products(&self) -> Result<Vec<Product>, ConfigError> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => {
                tracing::warn!("{CATALOG_ENV} not set; serving an empty catalog");
                Ok(Vec::new())
            }
        }
    }
}

/// Read a JSON array of products.
pub fn load_catalog(path: &Path) -> Result<Vec<Product>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::CatalogParse {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_keys_use_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn every_defaulted_key_is_warned_about() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            AppConfig::from_lookup(lookup(&[])).unwrap();
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        for key in [BIND_ADDR_ENV, PRICE_CEILING_ENV, BODY_LIMIT_ENV] {
            assert!(logs.contains(&format!("{key} not set")), "{key} missing from {logs}");
        }
    }

    #[test]
    fn reads_every_key() {
        let config = AppConfig::from_lookup(lookup(&[
            (BIND_ADDR_ENV, "127.0.0.1:3000"),
            (PRICE_CEILING_ENV, "500"),
            (CATALOG_ENV, "/srv/catalog.json"),
            (BODY_LIMIT_ENV, "2048"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.price_ceiling, 500.0);
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
        assert_eq!(config.body_limit, 2048);
    }

    #[test]
    fn rejects_bad_values() {
        for (key, value) in [
            (BIND_ADDR_ENV, "localhost"),
            (PRICE_CEILING_ENV, "-1"),
            (PRICE_CEILING_ENV, "lots"),
            (BODY_LIMIT_ENV, "0"),
        ] {
            let err = AppConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: k, .. } if k == key));
        }
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let err = load_catalog(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogIo { .. }));
    }
}
