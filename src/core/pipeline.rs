use crate::adapters::{HttpFetcher, LocalStorage};
use crate::core::extract::extractor_for;
use crate::core::normalize::normalize;
use crate::core::write::{render_all, write_all};
use crate::core::{Blocklists, ConfigProvider, Extractor, Fetcher, Pipeline, RawEntries, Storage, WrittenFile};
use crate::domain::model::OutputSpec;
use crate::utils::error::{BlocklistError, Result};

pub struct BlocklistPipeline<F: Fetcher, S: Storage> {
    pub(crate) fetcher: F,
    pub(crate) extractor: Box<dyn Extractor>,
    pub(crate) storage: S,
    pub(crate) outputs: Vec<OutputSpec>,
}

impl<F: Fetcher, S: Storage> BlocklistPipeline<F, S> {
    pub fn new(fetcher: F, extractor: Box<dyn Extractor>, storage: S, outputs: Vec<OutputSpec>) -> Self {
        Self {
            fetcher,
            extractor,
            storage,
            outputs,
        }
    }
}

impl BlocklistPipeline<HttpFetcher, LocalStorage> {
    /// Wires the HTTP fetcher, the extractor for the configured source mode
    /// and local file storage.
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self::new(
            HttpFetcher::from_config(config)?,
            extractor_for(config)?,
            LocalStorage::new(config.output_path().to_string()),
            config.outputs().to_vec(),
        ))
    }
}

#[async_trait::async_trait]
impl<F: Fetcher, S: Storage> Pipeline for BlocklistPipeline<F, S> {
    async fn extract(&self) -> Result<RawEntries> {
        let pages = self.fetcher.fetch().await?;
        tracing::debug!("Fetched {} page(s)", pages.len());
        self.extractor.extract(&pages)
    }

    async fn transform(&self, raw: RawEntries) -> Result<Blocklists> {
        let lists = normalize(&raw);
        if lists.is_empty() {
            return Err(BlocklistError::parse("no content available for blocklists"));
        }
        Ok(lists)
    }

    async fn load(&self, lists: Blocklists) -> Result<Vec<WrittenFile>> {
        let rendered = render_all(&lists, &self.outputs);
        write_all(&self.storage, rendered).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::WixDataExtractor;
    use crate::domain::model::default_outputs;
    use tempfile::TempDir;

    struct StaticFetcher(Vec<String>);

    #[async_trait::async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    fn pipeline(pages: Vec<String>, dir: &TempDir) -> BlocklistPipeline<StaticFetcher, LocalStorage> {
        BlocklistPipeline::new(
            StaticFetcher(pages),
            Box::new(WixDataExtractor),
            LocalStorage::new(dir.path().to_str().unwrap().to_string()),
            default_outputs(),
        )
    }

    #[tokio::test]
    async fn test_transform_rejects_when_nothing_survives() {
        let dir = TempDir::new().unwrap();
        let page = serde_json::json!({"items": [{"url": "not a domain"}]}).to_string();
        let pipeline = pipeline(vec![page], &dir);

        let raw = pipeline.extract().await.unwrap();
        let err = pipeline.transform(raw).await.unwrap_err();
        assert!(matches!(err, BlocklistError::ParseError { .. }));
    }

    #[tokio::test]
    async fn test_load_writes_every_output() {
        let dir = TempDir::new().unwrap();
        let page = serde_json::json!({"items": [{"url": "evil.com"}, {"url": "8.8.4.4"}]}).to_string();
        let pipeline = pipeline(vec![page], &dir);

        let raw = pipeline.extract().await.unwrap();
        let lists = pipeline.transform(raw).await.unwrap();
        let files = pipeline.load(lists).await.unwrap();

        assert_eq!(files.len(), 5);
        for file in &files {
            assert!(std::path::Path::new(&file.path).exists());
            assert_eq!(file.entries, 1);
        }
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_output_set() {
        let dir = TempDir::new().unwrap();
        let outputs = default_outputs();
        for spec in &outputs {
            std::fs::write(dir.path().join(&spec.filename), "stale.com\n").unwrap();
        }
        // 擋住其中一個暫存檔路徑
        std::fs::create_dir(dir.path().join("global-anti-scam-org-scam-urls-adblock.txt.tmp")).unwrap();

        let page = serde_json::json!({"items": [{"url": "evil.com"}, {"url": "8.8.4.4"}]}).to_string();
        let pipeline = pipeline(vec![page], &dir);
        let raw = pipeline.extract().await.unwrap();
        let lists = pipeline.transform(raw).await.unwrap();

        assert!(pipeline.load(lists).await.is_err());
        for spec in &outputs {
            assert_eq!(
                std::fs::read_to_string(dir.path().join(&spec.filename)).unwrap(),
                "stale.com\n",
                "{} was replaced",
                spec.filename
            );
        }
        let stray: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "tmp") && p.is_file())
            .collect();
        assert!(stray.is_empty(), "leftover temp files: {:?}", stray);
    }
}
