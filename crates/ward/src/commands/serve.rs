//! `ward serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use ward_config::{CliSettings, Config};
use ward_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover ward.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long, env = "WARD_SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds a cached scan stays valid (overrides config).
    #[arg(long)]
    cache_ttl: Option<u64>,

    /// Disable scan caching.
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output (request and scan logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.highlight(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Source directory: {}",
            config.docs_resolved.source_dir.display()
        ));
        if config.docs_resolved.cache_enabled {
            output.info(&format!(
                "Cache: enabled ({}s)",
                config.docs_resolved.cache_ttl.as_secs()
            ));
        } else {
            output.info("Cache: disabled");
        }
        if !config.docs_resolved.source_dir.is_dir() {
            output.warning("Source directory does not exist, category requests will return 404");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Settings that override the config file.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            source_dir: self.source_dir.clone(),
            cache_enabled: self.no_cache.then_some(false),
            cache_ttl_secs: self.cache_ttl,
        }
    }
}
