pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{ExportFormat, MatchMode};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "TableSearchSystem")]
#[command(version, about = "Fuzzy keyword search across CSV and spreadsheet files")]
pub struct CliConfig {
    /// Keyword to search for (may also come from the config file)
    pub keyword: Option<String>,

    /// Directory scanned recursively for tables
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum similarity (0-1); defaults depend on the match mode
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Match whole rows (`row`) or individual cells (`cell`)
    #[arg(short, long)]
    pub mode: Option<MatchMode>,

    /// Export formats: csv, tsv, json, xlsx, zip
    #[arg(short, long, value_delimiter = ',')]
    pub export: Vec<ExportFormat>,

    /// Directory export files are written to
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of files searched at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Homophone table (JSON)
    #[arg(long)]
    pub homophones: Option<PathBuf>,

    /// Maximum number of hits printed
    #[arg(long, default_value = "50")]
    pub limit: usize,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, help = "Hide the progress bar")]
    pub no_progress: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Overlay explicitly given flags onto `settings`.
    pub fn apply_to(&self, settings: &mut settings::SearchSettings) {
        if let Some(keyword) = &self.keyword {
            settings.keyword = keyword.clone();
        }
        if let Some(dir) = &self.dir {
            settings.data_dir = dir.clone();
        }
        if self.threshold.is_some() {
            settings.threshold = self.threshold;
        }
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if !self.export.is_empty() {
            settings.export_formats = self.export.clone();
        }
        if let Some(output) = &self.output {
            settings.output_path = output.clone();
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrent_files = concurrency;
        }
        if let Some(path) = &self.homophones {
            settings.homophones_path = path.clone();
        }
        if self.log_file.is_some() {
            settings.log_file = self.log_file.clone();
        }

        settings.limit = self.limit;
        settings.verbose = self.verbose;
        settings.monitor = settings.monitor || self.monitor;
        settings.show_progress = !self.no_progress;
    }
}
