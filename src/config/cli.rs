use super::defaults;
use crate::domain::model::{default_outputs, OutputSpec, SourceMode};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_provider, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "antiscam-blocklist")]
#[command(about = "Scrape the Global Anti-Scam Org scam website listing into blocklists")]
pub struct CliConfig {
    /// Page that lists the scam websites (also used to obtain the session)
    #[arg(long, default_value = defaults::SOURCE_URL)]
    pub source_url: String,

    /// Wix data query endpoint
    #[arg(long, default_value = defaults::API_ENDPOINT)]
    pub api_endpoint: String,

    /// Wix data collection holding the listing
    #[arg(long, default_value = defaults::COLLECTION)]
    pub collection: String,

    #[arg(long, value_enum, default_value_t = SourceMode::WixData)]
    pub mode: SourceMode,

    /// CSS selector used in html mode
    #[arg(long, default_value = defaults::SELECTOR)]
    pub selector: String,

    /// Items per data API request (server maximum is 1000)
    #[arg(long, default_value_t = defaults::PAGE_LIMIT)]
    pub page_limit: usize,

    #[arg(long, default_value_t = defaults::TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    /// Use this svSession token instead of requesting one
    #[arg(long)]
    pub session_token: Option<String>,

    /// Directory the blocklist files are written to
    #[arg(long, default_value = defaults::OUTPUT_PATH)]
    pub output_path: String,

    #[arg(skip = default_outputs())]
    pub outputs: Vec<OutputSpec>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig::parse_from(["antiscam-blocklist"])
    }
}

impl ConfigProvider for CliConfig {
    fn source_mode(&self) -> SourceMode {
        self.mode
    }

    fn source_url(&self) -> &str {
        &self.source_url
    }

    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    fn page_limit(&self) -> usize {
        self.page_limit
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    fn selector(&self) -> &str {
        &self.selector
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn outputs(&self) -> &[OutputSpec] {
        &self.outputs
    }
}

impl CliConfig {
    /// Copy that is safe to log: the session token is masked.
    pub fn redacted(&self) -> Self {
        Self {
            session_token: self.session_token.as_ref().map(|_| "<redacted>".to_string()),
            ..self.clone()
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
