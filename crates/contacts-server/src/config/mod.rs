// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";
pub const CORS_ANY_ORIGIN: &str = "*";

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
    pub enable_audit_log: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 16 * 1024,
            cors_allowed_origins: vec![CORS_ANY_ORIGIN.to_string()],
            enable_audit_log: true,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.iter().any(|o| o == CORS_ANY_ORIGIN)
    }

    #[must_use]
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allows_any_origin() || self.cors_allowed_origins.iter().any(|o| o == origin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    Memory,
    Sqlite { path: PathBuf },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("artifacts/contacts.sqlite"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    pub bind: String,
    pub log_json: bool,
    pub tcp_keepalive_enabled: bool,
    pub shutdown_drain: Duration,
    pub store: StoreConfig,
    pub api: ApiConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            log_json: true,
            tcp_keepalive_enabled: true,
            shutdown_drain: Duration::from_millis(5000),
            store: StoreConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `CONTACTS_*` variables. Unparseable
    /// values fall back to their defaults; `CONTACTS_STORE` is the exception.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env_bool = |name: &str, default: bool| {
            lookup(name)
                .and_then(|v| parse_bool(v.trim()))
                .unwrap_or(default)
        };
        let env_u64 = |name: &str, default: u64| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };
        let env_usize = |name: &str, default: usize| {
            lookup(name)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(default)
        };

        let store = match lookup("CONTACTS_STORE").as_deref().map(str::trim) {
            Some("memory") => StoreConfig::Memory,
            _ => StoreConfig::Sqlite {
                path: lookup("CONTACTS_SQLITE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("artifacts/contacts.sqlite")),
            },
        };

        let cors_allowed_origins = lookup("CONTACTS_CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or(defaults.api.cors_allowed_origins);

        Self {
            bind: lookup("CONTACTS_BIND").unwrap_or(defaults.bind),
            log_json: env_bool("CONTACTS_LOG_JSON", defaults.log_json),
            tcp_keepalive_enabled: env_bool(
                "CONTACTS_TCP_KEEPALIVE_ENABLED",
                defaults.tcp_keepalive_enabled,
            ),
            shutdown_drain: Duration::from_millis(env_u64("CONTACTS_SHUTDOWN_DRAIN_MS", 5000)),
            store,
            api: ApiConfig {
                max_body_bytes: env_usize("CONTACTS_MAX_BODY_BYTES", defaults.api.max_body_bytes),
                cors_allowed_origins,
                enable_audit_log: env_bool(
                    "CONTACTS_AUDIT_LOG_ENABLED",
                    defaults.api.enable_audit_log,
                ),
            },
        }
    }

    /// Rejects an explicit `CONTACTS_STORE` value that names no backend.
    pub fn store_selection_error<F>(lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("CONTACTS_STORE").as_deref().map(str::trim) {
            None | Some("memory" | "sqlite") => None,
            Some(other) => Some(format!(
                "CONTACTS_STORE must be `memory` or `sqlite`, got `{other}`"
            )),
        }
    }
}

pub fn validate_startup_config_contract(config: &ServiceConfig) -> Result<(), String> {
    if config.api.max_body_bytes == 0 {
        return Err("api body limit must be > 0".to_string());
    }
    if config.api.cors_allowed_origins.is_empty() {
        return Err("cors allowed origins must not be empty".to_string());
    }
    if config.bind.parse::<std::net::SocketAddr>().is_err() {
        return Err(format!("invalid bind addr {}", config.bind));
    }
    if let StoreConfig::Sqlite { path } = &config.store {
        if path.as_os_str().is_empty() {
            return Err("sqlite store requires a non-empty path".to_string());
        }
    }
    Ok(())
}
