use crate::domain::model::{Blocklists, OutputSpec, RawEntries, SourceMode, WrittenFile};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// Replaces every `(path, data)` file. Either all files are replaced or,
    /// when staging fails, none of them are touched.
    fn write_files(
        &self,
        files: Vec<(String, Vec<u8>)>,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_mode(&self) -> SourceMode;
    fn source_url(&self) -> &str;
    fn api_endpoint(&self) -> &str;
    fn collection(&self) -> &str;
    fn page_limit(&self) -> usize;
    fn timeout_seconds(&self) -> u64;
    fn session_token(&self) -> Option<&str>;
    fn selector(&self) -> &str;
    fn output_path(&self) -> &str;
    fn outputs(&self) -> &[OutputSpec];
}

/// Retrieves the raw page bodies of the source.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<String>>;
}

/// Turns raw pages into URL and IP candidates. Site-specific parsing lives
/// behind this trait.
pub trait Extractor: Send + Sync {
    fn extract(&self, pages: &[String]) -> Result<RawEntries>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawEntries>;
    async fn transform(&self, raw: RawEntries) -> Result<Blocklists>;
    async fn load(&self, lists: Blocklists) -> Result<Vec<WrittenFile>>;
}
