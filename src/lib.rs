pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{HttpFetcher, LocalStorage};
pub use core::{etl::EtlEngine, pipeline::BlocklistPipeline};
pub use domain::model::{
    default_outputs, Blocklist, Blocklists, Category, Entry, OutputFormat, OutputSpec, RawEntries,
    RunSummary, SourceMode, WrittenFile,
};
pub use utils::error::{BlocklistError, Result};
