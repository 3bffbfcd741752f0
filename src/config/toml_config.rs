use crate::config::defaults;
use crate::domain::model::{default_outputs, OutputSpec, SourceMode};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BlocklistError, Result};
use crate::utils::validation::{validate_provider, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub mode: SourceMode,
    #[serde(default = "default_source_url")]
    pub url: String,
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    pub page_limit: Option<usize>,
    pub timeout_seconds: Option<u64>,
    pub session_token: Option<String>,
    pub selector: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_outputs")]
    pub outputs: Vec<OutputSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

fn default_source_url() -> String {
    defaults::SOURCE_URL.to_string()
}

fn default_api_endpoint() -> String {
    defaults::API_ENDPOINT.to_string()
}

fn default_collection() -> String {
    defaults::COLLECTION.to_string()
}

fn default_output_path() -> String {
    defaults::OUTPUT_PATH.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            url: default_source_url(),
            api_endpoint: default_api_endpoint(),
            collection: default_collection(),
            page_limit: None,
            timeout_seconds: None,
            session_token: None,
            selector: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            outputs: default_outputs(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BlocklistError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BlocklistError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SV_SESSION})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().is_some_and(|l| l.verbose)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().is_some_and(|l| l.json)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_mode(&self) -> SourceMode {
        self.source.mode
    }

    fn source_url(&self) -> &str {
        &self.source.url
    }

    fn api_endpoint(&self) -> &str {
        &self.source.api_endpoint
    }

    fn collection(&self) -> &str {
        &self.source.collection
    }

    fn page_limit(&self) -> usize {
        self.source.page_limit.unwrap_or(defaults::PAGE_LIMIT)
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds.unwrap_or(defaults::TIMEOUT_SECONDS)
    }

    fn session_token(&self) -> Option<&str> {
        // 未替換的 ${VAR} 視為未設定
        self.source
            .session_token
            .as_deref()
            .filter(|token| !token.starts_with("${"))
    }

    fn selector(&self) -> &str {
        self.source.selector.as_deref().unwrap_or(defaults::SELECTOR)
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn outputs(&self) -> &[OutputSpec] {
        &self.load.outputs
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
