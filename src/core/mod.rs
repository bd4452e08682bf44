pub mod encoding;
pub mod engine;
pub mod export;
pub mod homophones;
pub mod loader;
pub mod normalizer;
pub mod pipeline;
pub mod searcher;
pub mod similarity;
pub mod variants;

pub use crate::domain::model::{SearchHit, SearchOutcome, SearchReport, SourceFile, Table};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
