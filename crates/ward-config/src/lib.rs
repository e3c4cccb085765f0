//! Configuration management for Ward.
//!
//! Parses `ward.toml` with serde and discovers the file in the current
//! directory or any of its parents. Relative paths resolve against the
//! directory holding the config file.
//!
//! CLI settings are applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `docs.source_dir`
//! - `retrieve.assets_dir`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "ward.toml";

/// Default lifetime of a cached scan, in seconds.
const DEFAULT_CACHE_TTL_SECS: u64 = 120;

/// Files `/api/retrieve` serves unless configured otherwise.
const DEFAULT_RETRIEVE_ALLOWED: [&str; 2] = ["/legal/privacy.md", "/legal/terms.md"];

/// CLI settings that override configuration file values.
///
/// Only `Some` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override cache lifetime in seconds.
    pub cache_ttl_secs: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Raw docs configuration (use `docs_resolved` for resolved paths).
    docs: DocsConfigRaw,
    /// Raw retrieve configuration (use `retrieve_resolved`).
    retrieve: RetrieveConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved retrieve configuration (set after loading).
    #[serde(skip)]
    pub retrieve_resolved: RetrieveConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    cache_enabled: Option<bool>,
    cache_ttl_secs: Option<u64>,
}

/// Resolved documentation configuration.
#[derive(Debug)]
pub struct DocsConfig {
    /// Root of the documentation tree.
    pub source_dir: PathBuf,
    /// Whether scan results are cached.
    pub cache_enabled: bool,
    /// How long a cached scan stays valid.
    pub cache_ttl: Duration,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("docs"),
            cache_enabled: true,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

/// Raw retrieve configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RetrieveConfigRaw {
    assets_dir: Option<String>,
    allowed: Option<Vec<String>>,
}

/// Resolved configuration of the static file retrieval endpoint.
#[derive(Debug)]
pub struct RetrieveConfig {
    /// Directory the allowed files are read from.
    pub assets_dir: PathBuf,
    /// Request paths that may be served, e.g. `/legal/privacy.md`.
    pub allowed: Vec<String>,
}

impl Default for RetrieveConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("public"),
            allowed: default_allowed(),
        }
    }
}

fn default_allowed() -> Vec<String> {
    DEFAULT_RETRIEVE_ALLOWED.map(str::to_owned).to_vec()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`WARD_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `ward.toml` in the current directory and its parents, falling back
    /// to defaults relative to the current directory.
    ///
    /// CLI settings are applied after path resolution and take precedence
    /// over file values. The result is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.docs_resolved.cache_enabled = cache_enabled;
        }
        if let Some(secs) = settings.cache_ttl_secs {
            self.docs_resolved.cache_ttl = Duration::from_secs(secs);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            retrieve: RetrieveConfigRaw::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                ..DocsConfig::default()
            },
            retrieve_resolved: RetrieveConfig {
                assets_dir: base.join("public"),
                allowed: default_allowed(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 would bind a random port
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        if self.docs_resolved.cache_ttl.is_zero() {
            return Err(ConfigError::Validation(
                "docs.cache_ttl_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(dir, "docs.source_dir")?);
        }
        if let Some(ref dir) = self.retrieve.assets_dir {
            self.retrieve.assets_dir = Some(expand::expand_env(dir, "retrieve.assets_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            cache_enabled: self.docs.cache_enabled.unwrap_or(true),
            cache_ttl: Duration::from_secs(
                self.docs.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS),
            ),
        };

        self.retrieve_resolved = RetrieveConfig {
            assets_dir: resolve(self.retrieve.assets_dir.as_deref(), "public"),
            allowed: self.retrieve.allowed.clone().unwrap_or_else(default_allowed),
        };
    }
}
