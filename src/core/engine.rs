use crate::core::{Pipeline, SearchOutcome};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs a pipeline through discover → search → export.
pub struct SearchEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> SearchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<SearchOutcome> {
        tracing::info!("Starting search...");
        self.monitor.log_stats("Start");

        // Discover
        let files = self.pipeline.extract().await?;
        tracing::info!("🔎 Found {} table files", files.len());
        self.monitor.log_stats("Discover");

        // Search
        let report = self.pipeline.transform(files).await?;
        tracing::info!(
            "Searched {} files ({} failed), {} hits for '{}'",
            report.files_scanned,
            report.files_failed,
            report.hits.len(),
            report.keyword
        );
        if report.cancelled {
            tracing::warn!("Search was stopped before all files were processed");
        }
        self.monitor.log_stats("Search");

        // Export
        let exported = self.pipeline.load(&report).await?;
        tracing::info!("📁 {}", exported);
        self.monitor.log_stats("Export");
        self.monitor.log_final_stats();

        Ok(SearchOutcome { report, exported })
    }
}
