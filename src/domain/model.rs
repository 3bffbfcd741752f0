use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single normalized scam identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entry(String);

impl Entry {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Entry(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Cleaned URL: lower-cased host, path kept.
    Url,
    /// Bare host name derived from the URL entries.
    Domain,
    Ip,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Url => "url",
            Category::Domain => "domain",
            Category::Ip => "ip",
        };
        f.write_str(name)
    }
}

/// Where the scam listing is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SourceMode {
    /// Paged Wix data API behind an `svSession` cookie.
    #[default]
    WixData,
    /// A single rendered HTML page, parsed with a CSS selector.
    Html,
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::WixData => f.write_str("wix-data"),
            SourceMode::Html => f.write_str("html"),
        }
    }
}

/// Raw candidates as located by an extractor, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntries {
    pub urls: BTreeSet<String>,
    pub ips: BTreeSet<String>,
}

impl RawEntries {
    pub fn len(&self) -> usize {
        self.urls.len() + self.ips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.ips.is_empty()
    }
}

/// Ordered, deduplicated entries of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocklist {
    category: Category,
    entries: Vec<Entry>,
}

impl Blocklist {
    /// `entries` must already be sorted and deduplicated.
    pub(crate) fn from_sorted(category: Category, entries: Vec<Entry>) -> Self {
        Self { category, entries }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.0.clone()).collect()
    }
}

/// Everything one normalization pass produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocklists {
    pub urls: Blocklist,
    pub domains: Blocklist,
    pub ips: Blocklist,
}

impl Blocklists {
    pub fn get(&self, category: Category) -> &Blocklist {
        match category {
            Category::Url => &self.urls,
            Category::Domain => &self.domains,
            Category::Ip => &self.ips,
        }
    }

    /// Domains derive from URLs, so only URLs and IPs count here.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.ips.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// `<entry>`
    Plain,
    /// `||<entry>^`
    Adblock,
    /// `||<entry>^$all`
    AdblockAll,
    /// `<entry>`, one host per line for Pi-hole style sinkholes.
    DnsSinkhole,
}

impl OutputFormat {
    pub fn render_line(self, entry: &Entry) -> String {
        match self {
            OutputFormat::Plain | OutputFormat::DnsSinkhole => entry.as_str().to_string(),
            OutputFormat::Adblock => format!("||{}^", entry),
            OutputFormat::AdblockAll => format!("||{}^$all", entry),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Adblock => "adblock",
            OutputFormat::AdblockAll => "adblock-all",
            OutputFormat::DnsSinkhole => "dns-sinkhole",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub filename: String,
    pub category: Category,
    pub format: OutputFormat,
}

impl OutputSpec {
    pub fn new(filename: impl Into<String>, category: Category, format: OutputFormat) -> Self {
        Self {
            filename: filename.into(),
            category,
            format,
        }
    }
}

pub fn default_outputs() -> Vec<OutputSpec> {
    vec![
        OutputSpec::new(
            "global-anti-scam-org-scam-urls.txt",
            Category::Url,
            OutputFormat::Plain,
        ),
        OutputSpec::new(
            "global-anti-scam-org-scam-ips.txt",
            Category::Ip,
            OutputFormat::Plain,
        ),
        OutputSpec::new(
            "global-anti-scam-org-scam-urls-pihole.txt",
            Category::Domain,
            OutputFormat::DnsSinkhole,
        ),
        OutputSpec::new(
            "global-anti-scam-org-scam-urls-adblock.txt",
            Category::Domain,
            OutputFormat::Adblock,
        ),
        OutputSpec::new(
            "global-anti-scam-org-scam-urls-ublock.txt",
            Category::Domain,
            OutputFormat::AdblockAll,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: String,
    pub category: Category,
    pub format: OutputFormat,
    pub entries: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files: Vec<WrittenFile>,
}

impl RunSummary {
    pub fn entries_for(&self, category: Category) -> Option<usize> {
        self.files
            .iter()
            .find(|f| f.category == category)
            .map(|f| f.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_line_formats() {
        let entry = Entry::new("evil.com");
        assert_eq!(OutputFormat::Plain.render_line(&entry), "evil.com");
        assert_eq!(OutputFormat::Adblock.render_line(&entry), "||evil.com^");
        assert_eq!(OutputFormat::AdblockAll.render_line(&entry), "||evil.com^$all");
        assert_eq!(OutputFormat::DnsSinkhole.render_line(&entry), "evil.com");
    }

    #[test]
    fn test_default_outputs_are_five_distinct_files() {
        let outputs = default_outputs();
        assert_eq!(outputs.len(), 5);
        let names: BTreeSet<_> = outputs.iter().map(|o| o.filename.as_str()).collect();
        assert_eq!(names.len(), 5);
    }
}
