//! Configuration file parsing and management.
//!
//! Settings come from three layers, lowest precedence first: TOML config
//! files, environment variables, then CLI arguments (applied by the binary).

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::error::DomainSieveError;
use crate::registrar::VercelConfig;
use crate::types::CheckConfig;
use crate::utils::parse_duration_string;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default location of the SQLite cache, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "domains.sqlite";

/// Default domain list file.
pub const DEFAULT_DOMAINS_FILE: &str = "domains.txt";

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Registrar API settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<RegistrarFileConfig>,

    /// Cache database settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheFileConfig>,
}

/// `[registrar]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RegistrarFileConfig {
    /// Team identifier sent with every lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,

    /// API root (e.g. "https://api.vercel.com")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// HTTP timeout (as string, e.g., "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Domains per registrar call, 1-50
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

/// `[cache]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheFileConfig {
    /// SQLite database path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Re-check entries older than this (e.g. "30d"); unset means never
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<String>,
}

/// Configuration discovery and loading functionality.
#[derive(Debug, Default)]
pub struct ConfigManager;

impl ConfigManager {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainSieveError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainSieveError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainSieveError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config, then the home directory, then the working directory; later
    /// files override earlier ones field by field. Unreadable or invalid
    /// discovered files are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainSieveError> {
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        let mut merged_config = FileConfig::default();
        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => merged_config = self.merge_configs(merged_config, config),
                Err(e) => warn!("Ignoring config file {}: {}", path.display(), e),
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./domain-sieve.toml", "./.domain-sieve.toml"]
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
            .map(Path::to_path_buf)
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".domain-sieve.toml", "domain-sieve.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|p| p.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-sieve").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations. Values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            registrar: match (lower.registrar, higher.registrar) {
                (Some(lower), Some(higher)) => Some(RegistrarFileConfig {
                    team_id: higher.team_id.or(lower.team_id),
                    base_url: higher.base_url.or(lower.base_url),
                    timeout: higher.timeout.or(lower.timeout),
                    batch_size: higher.batch_size.or(lower.batch_size),
                }),
                (lower, higher) => higher.or(lower),
            },
            cache: match (lower.cache, higher.cache) {
                (Some(lower), Some(higher)) => Some(CacheFileConfig {
                    path: higher.path.or(lower.path),
                    max_age: higher.max_age.or(lower.max_age),
                }),
                (lower, higher) => higher.or(lower),
            },
        }
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainSieveError> {
        if let Some(registrar) = &config.registrar {
            if let Some(batch_size) = registrar.batch_size {
                validate_batch_size(batch_size)?;
            }
            if let Some(timeout) = &registrar.timeout {
                validate_duration("timeout", timeout)?;
            }
            if let Some(base_url) = &registrar.base_url {
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(DomainSieveError::config(format!(
                        "Registrar base_url '{}' must start with http:// or https://",
                        base_url
                    )));
                }
            }
        }

        if let Some(cache) = &config.cache {
            if let Some(max_age) = &cache.max_age {
                validate_duration("max_age", max_age)?;
            }
            if cache.path.as_deref().is_some_and(|p| p.trim().is_empty()) {
                return Err(DomainSieveError::config("Cache path cannot be empty"));
            }
        }

        Ok(())
    }
}

fn validate_batch_size(batch_size: usize) -> Result<(), DomainSieveError> {
    if batch_size == 0 || batch_size > DEFAULT_BATCH_SIZE {
        return Err(DomainSieveError::config(format!(
            "Batch size must be between 1 and {}",
            DEFAULT_BATCH_SIZE
        )));
    }
    Ok(())
}

fn validate_duration(field: &str, value: &str) -> Result<(), DomainSieveError> {
    if parse_duration_string(value).is_none() {
        return Err(DomainSieveError::config(format!(
            "Invalid {} '{}'. Use a format like '30s', '5m', '12h' or '7d'",
            field, value
        )));
    }
    Ok(())
}

/// Environment variable configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub bearer_token: Option<String>,
    pub team_id: Option<String>,
    pub base_url: Option<String>,
    pub cache_path: Option<String>,
    pub batch_size: Option<usize>,
    pub max_age: Option<String>,
    pub timeout: Option<String>,
}

/// Load configuration from the process environment.
///
/// Reads `VERCEL_BEARER_TOKEN`, `VERCEL_TEAM_ID` and the `DS_*` variables.
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    EnvConfig::from_lookup(|key| env::var(key).ok())
}

impl EnvConfig {
    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut env_config = EnvConfig {
            bearer_token: non_empty("VERCEL_BEARER_TOKEN"),
            team_id: non_empty("VERCEL_TEAM_ID"),
            base_url: non_empty("DS_API_URL"),
            cache_path: non_empty("DS_CACHE_PATH"),
            ..Default::default()
        };

        if let Some(val) = non_empty("DS_BATCH_SIZE") {
            match val.trim().parse::<usize>() {
                Ok(size) if validate_batch_size(size).is_ok() => {
                    env_config.batch_size = Some(size);
                }
                _ => warn!(
                    "Invalid DS_BATCH_SIZE='{}', must be 1-{}",
                    val, DEFAULT_BATCH_SIZE
                ),
            }
        }

        for (key, slot) in [
            ("DS_CACHE_MAX_AGE", &mut env_config.max_age),
            ("DS_TIMEOUT", &mut env_config.timeout),
        ] {
            if let Some(val) = non_empty(key) {
                if parse_duration_string(&val).is_some() {
                    *slot = Some(val);
                } else {
                    warn!("Invalid {}='{}', use a format like '30s', '12h', '7d'", key, val);
                }
            }
        }

        env_config
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub check: CheckConfig,
    pub registrar: VercelConfig,
    pub cache_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check: CheckConfig::default(),
            registrar: VercelConfig::default(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
        }
    }
}

impl Settings {
    /// Apply values from a (validated) config file.
    pub fn apply_file_config(mut self, file_config: &FileConfig) -> Self {
        if let Some(registrar) = &file_config.registrar {
            if let Some(team_id) = &registrar.team_id {
                self.registrar.team_id = Some(team_id.clone());
            }
            if let Some(base_url) = &registrar.base_url {
                self.registrar.base_url = base_url.clone();
            }
            if let Some(timeout) = registrar.timeout.as_deref().and_then(parse_duration_string) {
                self.registrar.timeout = timeout;
            }
            if let Some(batch_size) = registrar.batch_size {
                self.check = self.check.with_batch_size(batch_size);
            }
        }

        if let Some(cache) = &file_config.cache {
            if let Some(path) = &cache.path {
                self.cache_path = PathBuf::from(path);
            }
            if let Some(max_age) = cache.max_age.as_deref().and_then(parse_duration_string) {
                self.check = self.check.with_max_age(Some(max_age));
            }
        }

        self
    }

    /// Apply environment variables (override config files).
    pub fn apply_env_config(mut self, env_config: &EnvConfig) -> Self {
        if let Some(token) = &env_config.bearer_token {
            self.registrar.bearer_token = Some(token.clone());
        }
        if let Some(team_id) = &env_config.team_id {
            self.registrar.team_id = Some(team_id.clone());
        }
        if let Some(base_url) = &env_config.base_url {
            self.registrar.base_url = base_url.clone();
        }
        if let Some(path) = &env_config.cache_path {
            self.cache_path = PathBuf::from(path);
        }
        if let Some(batch_size) = env_config.batch_size {
            self.check = self.check.with_batch_size(batch_size);
        }
        if let Some(max_age) = env_config.max_age.as_deref().and_then(parse_duration_string) {
            self.check = self.check.with_max_age(Some(max_age));
        }
        if let Some(timeout) = env_config.timeout.as_deref().and_then(parse_duration_string) {
            self.registrar.timeout = timeout;
        }
        self
    }
}
