use crate::domain::model::{ExportFormat, MatchMode, SearchReport, SourceFile};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Location a relative path resolves to, for reporting.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &Path;
    fn keyword(&self) -> &str;
    /// Explicit threshold; `None` means the mode's default.
    fn threshold(&self) -> Option<f64>;
    fn match_mode(&self) -> MatchMode;
    fn extensions(&self) -> &[String];
    fn export_formats(&self) -> &[ExportFormat];
    fn concurrent_files(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceFile>>;
    async fn transform(&self, files: Vec<SourceFile>) -> Result<SearchReport>;
    async fn load(&self, report: &SearchReport) -> Result<String>;
}
