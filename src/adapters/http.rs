use crate::domain::model::SourceMode;
use crate::domain::ports::{ConfigProvider, Fetcher};
use crate::utils::error::{BlocklistError, Result};
use regex::Regex;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

pub const SESSION_COOKIE: &str = "svSession";
const USER_AGENT: &str = concat!("antiscam-blocklist/", env!("CARGO_PKG_VERSION"));

/// Request body of the Wix data collection query endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery<'a> {
    pub collection_name: &'a str,
    pub data_query: DataQuery,
}

#[derive(Debug, Serialize)]
pub struct DataQuery {
    pub sort: Vec<SortField>,
    pub paging: Paging,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortField {
    pub field_name: String,
    pub order: String,
}

#[derive(Debug, Serialize)]
pub struct Paging {
    pub offset: usize,
    pub limit: usize,
}

impl<'a> CollectionQuery<'a> {
    pub fn new(collection_name: &'a str, offset: usize, limit: usize) -> Self {
        Self {
            collection_name,
            data_query: DataQuery {
                sort: vec![SortField {
                    field_name: "url".to_string(),
                    order: "ASC".to_string(),
                }],
                paging: Paging { offset, limit },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageHeader {
    #[serde(rename = "totalResults")]
    total_results: Option<usize>,
}

/// Connection settings copied out of a [`ConfigProvider`].
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub mode: SourceMode,
    pub source_url: String,
    pub api_endpoint: String,
    pub collection: String,
    pub page_limit: usize,
    pub session_token: Option<String>,
    pub timeout: Duration,
}

impl SourceSettings {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            mode: config.source_mode(),
            source_url: config.source_url().to_string(),
            api_endpoint: config.api_endpoint().to_string(),
            collection: config.collection().to_string(),
            page_limit: config.page_limit(),
            session_token: config.session_token().map(str::to_string),
            timeout: Duration::from_secs(config.timeout_seconds()),
        }
    }
}

pub struct HttpFetcher {
    client: Client,
    settings: SourceSettings,
}

impl HttpFetcher {
    pub fn new(settings: SourceSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(SourceSettings::from_config(config))
    }

    async fn get_text(&self, url: &str) -> Result<(Vec<String>, String)> {
        tracing::debug!("GET {}", url);
        let response = ensure_success(self.client.get(url).send().await?, url)?;

        let cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response.text().await?;
        Ok((cookies, body))
    }

    /// Resolves the `svSession` token needed by the data API.
    pub async fn session_token(&self) -> Result<String> {
        if let Some(token) = &self.settings.session_token {
            tracing::debug!("Using configured session token");
            return Ok(token.clone());
        }

        let (cookies, body) = self.get_text(&self.settings.source_url).await?;

        if let Some(token) = cookies.iter().find_map(|c| cookie_value(c, SESSION_COOKIE)) {
            tracing::debug!("Session token taken from Set-Cookie");
            return Ok(token);
        }

        if let Some(token) = embedded_session_token(&body) {
            tracing::debug!("Session token found in page markup");
            return Ok(token);
        }

        #[cfg(feature = "browser")]
        {
            tracing::info!("🌐 No session cookie over plain HTTP, launching headless browser");
            if let Some(token) =
                crate::adapters::browser::session_token(&self.settings.source_url).await?
            {
                return Ok(token);
            }
        }

        Err(BlocklistError::SessionError {
            message: format!("{} token not available", SESSION_COOKIE),
        })
    }

    pub async fn query_page(&self, token: &str, offset: usize) -> Result<String> {
        let endpoint = &self.settings.api_endpoint;
        let query = CollectionQuery::new(&self.settings.collection, offset, self.settings.page_limit);
        tracing::debug!("POST {} (offset {})", endpoint, offset);

        let response = self
            .client
            .post(endpoint)
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, token))
            .json(&query)
            .send()
            .await?;
        let response = ensure_success(response, endpoint)?;

        Ok(response.text().await?)
    }

    async fn fetch_wix_data(&self) -> Result<Vec<String>> {
        let token = self.session_token().await?;

        let first = self.query_page(&token, 0).await?;
        let total = serde_json::from_str::<PageHeader>(&first)
            .ok()
            .and_then(|h| h.total_results)
            .unwrap_or(0);

        let offsets = follow_up_offsets(total, self.settings.page_limit)?;
        tracing::info!(
            "📄 {} results reported, fetching {} more page(s)",
            total,
            offsets.len()
        );

        let mut pages = Vec::with_capacity(offsets.len() + 1);
        pages.push(first);
        for offset in offsets {
            pages.push(self.query_page(&token, offset).await?);
        }
        Ok(pages)
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self) -> Result<Vec<String>> {
        match self.settings.mode {
            SourceMode::WixData => self.fetch_wix_data().await,
            SourceMode::Html => {
                let (_, body) = self.get_text(&self.settings.source_url).await?;
                Ok(vec![body])
            }
        }
    }
}

fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    tracing::debug!("Response status: {}", status);
    if status.is_success() {
        Ok(response)
    } else {
        Err(BlocklistError::HttpStatusError {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Upper bound on pages fetched in one run. `totalResults` comes from the
/// server and is not trusted beyond this.
pub const MAX_PAGES: usize = 1000;

/// Offsets of the pages after the first one.
pub fn follow_up_offsets(total_results: usize, page_limit: usize) -> Result<Vec<usize>> {
    if page_limit == 0 {
        return Ok(Vec::new());
    }
    let pages = total_results.div_ceil(page_limit);
    if pages > MAX_PAGES {
        return Err(BlocklistError::parse(format!(
            "{} results reported, more than {} pages of {}",
            total_results, MAX_PAGES, page_limit
        )));
    }
    Ok((1..pages).map(|n| n * page_limit).collect())
}

/// Value of cookie `name` in a `Set-Cookie` header.
pub fn cookie_value(set_cookie: &str, name: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?;
    let (key, value) = pair.split_once('=')?;
    if key.trim() == name && !value.trim().is_empty() {
        Some(value.trim().trim_matches('"').to_string())
    } else {
        None
    }
}

fn session_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""svSession"\s*:\s*"([^"]+)""#).expect("static regex is valid")
    })
}

/// Wix pages sometimes inline the visitor session in their bootstrap JSON.
pub fn embedded_session_token(html: &str) -> Option<String> {
    session_pattern()
        .captures(html)
        .map(|caps| caps[1].to_string())
}
