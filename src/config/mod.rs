#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

/// Defaults shared by every configuration source.
pub mod defaults {
    pub const SOURCE_URL: &str = "https://www.globalantiscam.org/scam-websites";
    pub const API_ENDPOINT: &str =
        "https://www.globalantiscam.org/_api/cloud-data/v1/wix-data/collections/query";
    pub const COLLECTION: &str = "scamcompanies";
    pub const PAGE_LIMIT: usize = 1000;
    pub const TIMEOUT_SECONDS: u64 = 30;
    pub const SELECTOR: &str = "body";
    pub const OUTPUT_PATH: &str = ".";
}
