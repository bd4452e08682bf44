pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, settings::SearchSettings, toml_config::TomlConfig};

pub use core::{
    engine::SearchEngine, homophones::HomophoneMap, loader::FileLoader,
    pipeline::TableSearchPipeline, searcher::TableSearcher,
};
pub use utils::error::{Result, SearchError};
