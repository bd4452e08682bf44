use crate::config::toml_config::TomlConfig;
use crate::core::normalizer::ColumnAliases;
use crate::core::ConfigProvider;
use crate::domain::model::{ExportFormat, MatchMode};
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::{
    validate_extensions, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, Validate,
};
use std::path::{Path, PathBuf};

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["csv", "xls", "xlsx", "et", "ods"];

/// Upper bound for files searched at once.
pub const MAX_CONCURRENT_FILES: usize = 256;

/// Fully resolved settings for one search run.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub keyword: String,
    pub data_dir: PathBuf,
    pub threshold: Option<f64>,
    pub mode: MatchMode,
    pub extensions: Vec<String>,
    pub concurrent_files: usize,
    pub homophones_path: PathBuf,
    pub column_aliases: ColumnAliases,
    pub output_path: String,
    pub export_formats: Vec<ExportFormat>,
    pub monitor: bool,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
    pub show_progress: bool,
    pub limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            data_dir: PathBuf::from("."),
            threshold: None,
            mode: MatchMode::default(),
            extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            concurrent_files: 4,
            homophones_path: PathBuf::from("homophones.json"),
            column_aliases: ColumnAliases::default(),
            output_path: "./results".to_string(),
            export_formats: Vec::new(),
            monitor: false,
            log_file: None,
            verbose: false,
            show_progress: true,
            limit: 50,
        }
    }
}

impl SearchSettings {
    pub fn new(keyword: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            keyword: keyword.into(),
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Overlay values present in a TOML file.
    pub fn apply_toml(&mut self, config: TomlConfig) {
        let search = config.search;
        if let Some(keyword) = search.keyword {
            self.keyword = keyword;
        }
        if let Some(data_dir) = search.data_dir {
            self.data_dir = data_dir;
        }
        if search.threshold.is_some() {
            self.threshold = search.threshold;
        }
        if let Some(mode) = search.mode {
            self.mode = mode;
        }
        if let Some(extensions) = search.extensions {
            self.extensions = extensions;
        }
        if let Some(concurrent) = search.concurrent_files {
            self.concurrent_files = concurrent;
        }
        if let Some(path) = search.homophones {
            self.homophones_path = path;
        }

        if let Some(output_path) = config.export.output_path {
            self.output_path = output_path;
        }
        if let Some(formats) = config.export.formats {
            self.export_formats = formats;
        }

        if !config.columns.is_empty() {
            self.column_aliases = ColumnAliases::new(
                config
                    .columns
                    .into_iter()
                    .map(|c| (c.standard, c.variants))
                    .collect(),
            );
        }

        if let Some(enabled) = config.monitoring.enabled {
            self.monitor = enabled;
        }
        if config.monitoring.log_file.is_some() {
            self.log_file = config.monitoring.log_file;
        }
    }
}

impl Validate for SearchSettings {
    fn validate(&self) -> Result<()> {
        // 命令列與設定檔都沒給關鍵字
        if self.keyword.is_empty() {
            return Err(SearchError::MissingConfigError {
                field: "keyword".to_string(),
            });
        }
        validate_non_empty_string("keyword", &self.keyword)?;
        validate_path("data_dir", &self.data_dir.to_string_lossy())?;
        validate_path("output_path", &self.output_path)?;
        validate_path("homophones", &self.homophones_path.to_string_lossy())?;
        validate_positive_number("concurrent_files", self.concurrent_files, 1)?;
        validate_range(
            "concurrent_files",
            self.concurrent_files,
            1,
            MAX_CONCURRENT_FILES,
        )?;
        validate_extensions("extensions", &self.extensions, &SUPPORTED_EXTENSIONS)?;

        if let Some(threshold) = self.threshold {
            validate_range("threshold", threshold, 0.0, 1.0)?;
        }

        Ok(())
    }
}

impl ConfigProvider for SearchSettings {
    fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn keyword(&self) -> &str {
        self.keyword.trim()
    }

    fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    fn match_mode(&self) -> MatchMode {
        self.mode
    }

    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn export_formats(&self) -> &[ExportFormat] {
        &self.export_formats
    }

    fn concurrent_files(&self) -> usize {
        self.concurrent_files
    }
}
