use crate::core::export::{export_filename, render};
use crate::core::searcher::TableSearcher;
use crate::core::{ConfigProvider, Pipeline, SearchReport, SourceFile, Storage};
use crate::domain::model::{ExportFormat, FileKind};
use crate::utils::error::{Result, SearchError};
use crate::utils::progress::ProgressDisplay;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use walkdir::WalkDir;

pub struct TableSearchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    searcher: Arc<TableSearcher>,
    stop_flag: Arc<AtomicBool>,
    show_progress: bool,
}

impl<S: Storage, C: ConfigProvider> TableSearchPipeline<S, C> {
    pub fn new(storage: S, config: C, searcher: TableSearcher) -> Self {
        Self {
            storage,
            config,
            searcher: Arc::new(searcher),
            stop_flag: Arc::new(AtomicBool::new(false)),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Setting the returned flag stops the search before the next file starts.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    fn is_searchable(&self, path: &std::path::Path, extensions: &[String]) -> Option<FileKind> {
        let name = path.file_name()?.to_str()?;
        // Office 暫存鎖定檔
        if name.starts_with("~$") {
            return None;
        }
        let ext = path.extension()?.to_str()?.to_lowercase();
        if !extensions.contains(&ext) {
            return None;
        }
        FileKind::from_path(path)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TableSearchPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceFile>> {
        let data_dir = self.config.data_dir();
        if !data_dir.is_dir() {
            return Err(SearchError::ConfigError {
                message: format!("Data directory not found: {}", data_dir.display()),
            });
        }

        let extensions: Vec<String> = self
            .config
            .extensions()
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        tracing::debug!("Scanning {} for {:?}", data_dir.display(), extensions);

        let mut files: Vec<SourceFile> = WalkDir::new(data_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let kind = self.is_searchable(entry.path(), &extensions)?;
                Some(SourceFile {
                    path: entry.into_path(),
                    kind,
                })
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    async fn transform(&self, files: Vec<SourceFile>) -> Result<SearchReport> {
        let keyword = self.config.keyword().to_string();
        let mode = self.config.match_mode();
        let threshold = TableSearcher::effective_threshold(&keyword, mode, self.config.threshold());
        tracing::info!(
            "Searching '{}' in {} files (mode: {}, threshold: {:.2})",
            keyword,
            files.len(),
            mode,
            threshold
        );

        let progress = if self.show_progress {
            ProgressDisplay::new(files.len() as u64)
        } else {
            ProgressDisplay::hidden()
        };
        let permits = self
            .config
            .concurrent_files()
            .clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(permits));
        let hit_count = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();
        let mut report = SearchReport {
            keyword: keyword.clone(),
            ..SearchReport::default()
        };

        for file in files {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| SearchError::ProcessingError {
                    message: format!("Worker pool closed: {}", e),
                })?;

            if self.stop_flag.load(Ordering::SeqCst) {
                report.cancelled = true;
                break;
            }

            let searcher = Arc::clone(&self.searcher);
            let keyword = keyword.clone();
            let progress = progress.clone();
            let hit_count = Arc::clone(&hit_count);

            tasks.spawn_blocking(move || {
                let _permit = permit;
                let result = searcher.search_file(&file.path, &keyword, mode, threshold);
                if let Ok(hits) = &result {
                    hit_count.fetch_add(hits.len(), Ordering::SeqCst);
                }
                progress.file_done(&file.file_name(), hit_count.load(Ordering::SeqCst));
                (file, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(hits))) => {
                    report.files_scanned += 1;
                    report.hits.extend(hits);
                }
                Ok((file, Err(e))) => {
                    tracing::warn!("❌ {}: {}", file.path.display(), e);
                    report.files_failed += 1;
                }
                Err(e) => {
                    tracing::error!("Search task failed: {}", e);
                    report.files_failed += 1;
                }
            }
        }

        if report.cancelled {
            progress.abandon();
        } else {
            progress.finish();
        }

        report.hits.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.path.cmp(&b.path))
                .then_with(|| a.row.cmp(&b.row))
        });

        Ok(report)
    }

    async fn load(&self, report: &SearchReport) -> Result<String> {
        if report.hits.is_empty() {
            return Ok("No results to export".to_string());
        }

        let mut formats: Vec<ExportFormat> = Vec::new();
        for format in self.config.export_formats() {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
        if formats.is_empty() {
            return Ok("Export skipped: no format requested".to_string());
        }

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut written = Vec::with_capacity(formats.len());

        for format in formats {
            let filename = export_filename(&timestamp, format);
            let data = render(&report.hits, format)?;
            tracing::debug!("Writing {} ({} bytes)", filename, data.len());
            self.storage.write_file(&filename, &data).await?;
            written.push(self.storage.location(&filename));
        }

        Ok(format!(
            "Exported {} results to: {}",
            report.hits.len(),
            written.join(", ")
        ))
    }
}
