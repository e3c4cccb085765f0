//! `ward scan` command implementation.
//!
//! Scans the documentation tree once, uncached, and prints what the server
//! would serve.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use ward_config::{CliSettings, Config};
use ward_docs::{DocsLibrary, LibraryConfig, ScanResult};
use ward_storage::{FsStorage, Storage};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scan command.
#[derive(Args)]
pub(crate) struct ScanArgs {
    /// Path to configuration file (default: auto-discover ward.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long, env = "WARD_SOURCE_DIR")]
    source_dir: Option<PathBuf>,
}

impl ScanArgs {
    /// Execute the scan command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the root can't be scanned.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let storage: Arc<dyn Storage> =
            Arc::new(FsStorage::new(config.docs_resolved.source_dir.clone()));
        let library = DocsLibrary::new(
            storage,
            LibraryConfig {
                cache_enabled: false,
                ..LibraryConfig::default()
            },
        );
        let result = library.scan(false)?;

        output.highlight(&format!(
            "Scanned {}",
            config.docs_resolved.source_dir.display()
        ));
        for line in report_lines(&result) {
            match line {
                ReportLine::Category(text) => output.info(&text),
                ReportLine::File(text) => output.detail(&text),
            }
        }

        if result.skipped_files() > 0 {
            output.warning(&format!(
                "{} file(s) could not be read and were skipped",
                result.skipped_files()
            ));
        }
        if result.unresolved_references() > 0 {
            output.warning(&format!(
                "{} reference(s) could not be resolved",
                result.unresolved_references()
            ));
        }
        output.success(&format!(
            "{} categories, {} files",
            result.len(),
            result.file_count()
        ));

        Ok(())
    }
}

/// One line of the scan report.
#[derive(Debug, PartialEq, Eq)]
enum ReportLine {
    Category(String),
    File(String),
}

/// Category headers followed by their files, parent first.
fn report_lines(result: &ScanResult) -> Vec<ReportLine> {
    let mut lines = Vec::new();
    for category in result.categories() {
        lines.push(ReportLine::Category(format!(
            "{} ({}) [{}]",
            category.display_name(),
            category.name,
            category.icon
        )));
        for file in category.all_files() {
            let marker = if file.is_parent { " (parent)" } else { "" };
            lines.push(ReportLine::File(format!(
                "  {}{marker} -> {}",
                file.name,
                file.link_path()
            )));
        }
    }
    lines
}
