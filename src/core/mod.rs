pub mod etl;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod write;

pub use crate::domain::model::{Blocklist, Blocklists, Entry, RawEntries, RunSummary, WrittenFile};
pub use crate::domain::ports::{ConfigProvider, Extractor, Fetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
