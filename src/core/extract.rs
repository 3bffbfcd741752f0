use crate::core::normalize::{clean_url, entry_host, host_ip};
use crate::domain::model::{Category, RawEntries, SourceMode};
use crate::domain::ports::{ConfigProvider, Extractor};
use crate::utils::error::{BlocklistError, Result};
use scraper::{Html, Selector};
use serde::Deserialize;
use url::Host;

/// Splits a listing field into candidate tokens. One field may carry several
/// identifiers separated by whitespace.
pub fn split_candidates(field: &str) -> Vec<&str> {
    let is_padding = |c: char| c.is_whitespace() || c == '.';
    field
        .trim_matches(is_padding)
        .split_whitespace()
        .map(|token| token.trim_matches(is_padding))
        .filter(|token| !token.is_empty())
        .collect()
}

fn candidate_category(cleaned: &str) -> Option<Category> {
    match entry_host(cleaned)? {
        Host::Domain(domain) if domain.contains('.') => Some(Category::Url),
        Host::Domain(_) => None,
        host => host_ip(&host).map(|_| Category::Ip),
    }
}

/// Sorts candidate tokens into URL and IP sets. Only the shape is checked.
pub fn collect_candidates<'a, I>(fields: I) -> RawEntries
where
    I: IntoIterator<Item = &'a str>,
{
    let mut raw = RawEntries::default();
    for field in fields {
        for token in split_candidates(field) {
            let cleaned = clean_url(token);
            if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("www") {
                continue;
            }
            match candidate_category(&cleaned) {
                Some(Category::Ip) => raw.ips.insert(token.to_string()),
                Some(_) => raw.urls.insert(token.to_string()),
                None => continue,
            };
        }
    }
    raw
}

fn ensure_pages(pages: &[String]) -> Result<()> {
    if pages.is_empty() {
        return Err(BlocklistError::parse("no pages to extract from"));
    }
    if let Some(index) = pages.iter().position(|p| p.trim().is_empty()) {
        return Err(BlocklistError::parse(format!("page {} is empty", index + 1)));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    items: Option<Vec<serde_json::Value>>,
}

/// Reads the `url` field of every item returned by the Wix data API.
#[derive(Debug, Clone, Default)]
pub struct WixDataExtractor;

impl Extractor for WixDataExtractor {
    fn extract(&self, pages: &[String]) -> Result<RawEntries> {
        ensure_pages(pages)?;

        let mut fields = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            let response: QueryResponse = serde_json::from_str(page)?;
            let items = response.items.ok_or_else(|| {
                BlocklistError::parse(format!(
                    "page {} has no `items` array; the data API layout may have changed",
                    index + 1
                ))
            })?;
            fields.extend(
                items
                    .into_iter()
                    .filter_map(|item| item.get("url").and_then(|u| u.as_str()).map(str::to_string)),
            );
        }

        tracing::debug!("Found {} url fields", fields.len());
        Ok(collect_candidates(fields.iter().map(String::as_str)))
    }
}

/// Reads the text of every element matching a CSS selector.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    selector: String,
}

impl HtmlExtractor {
    pub fn new(selector: &str) -> Result<Self> {
        parse_selector(selector)?;
        Ok(Self {
            selector: selector.to_string(),
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| BlocklistError::config(format!("invalid CSS selector '{}': {}", selector, e)))
}

impl Extractor for HtmlExtractor {
    fn extract(&self, pages: &[String]) -> Result<RawEntries> {
        ensure_pages(pages)?;
        let selector = parse_selector(&self.selector)?;

        let mut texts = Vec::new();
        for (index, page) in pages.iter().enumerate() {
            let document = Html::parse_document(page);
            let before = texts.len();
            texts.extend(
                document
                    .select(&selector)
                    .map(|element| element.text().collect::<Vec<_>>().join(" ")),
            );
            if texts.len() == before {
                return Err(BlocklistError::parse(format!(
                    "selector '{}' matched nothing on page {}",
                    self.selector,
                    index + 1
                )));
            }
        }

        Ok(collect_candidates(texts.iter().map(String::as_str)))
    }
}

pub fn extractor_for<C: ConfigProvider + ?Sized>(config: &C) -> Result<Box<dyn Extractor>> {
    match config.source_mode() {
        SourceMode::WixData => Ok(Box::new(WixDataExtractor)),
        SourceMode::Html => Ok(Box::new(HtmlExtractor::new(config.selector())?)),
    }
}
