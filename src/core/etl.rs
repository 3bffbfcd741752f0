use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Fetch → Extract → Normalize → Write, abandoned on the first error.
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        tracing::info!("🚀 Starting blocklist run");

        // Extract
        let phase = Instant::now();
        let raw = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} URL and {} IP candidates in {:?}",
            raw.urls.len(),
            raw.ips.len(),
            phase.elapsed()
        );

        // Transform
        let phase = Instant::now();
        let lists = self.pipeline.transform(raw).await?;
        tracing::info!(
            "🧹 Normalized to {} URLs, {} domains, {} IPs in {:?}",
            lists.urls.len(),
            lists.domains.len(),
            lists.ips.len(),
            phase.elapsed()
        );

        // Load
        let phase = Instant::now();
        let files = self.pipeline.load(lists).await?;
        tracing::info!("💾 Wrote {} file(s) in {:?}", files.len(), phase.elapsed());

        tracing::info!("✅ Run finished in {:?}", started.elapsed());
        Ok(RunSummary { files })
    }
}
