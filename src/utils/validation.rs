use crate::domain::model::SourceMode;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{BlocklistError, Result};
use std::collections::HashSet;
use url::Url;

/// Largest page the Wix data API will serve.
pub const MAX_PAGE_LIMIT: usize = 1000;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(BlocklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(BlocklistError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(BlocklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BlocklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BlocklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BlocklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BlocklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_selector(field_name: &str, selector: &str) -> Result<()> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| BlocklistError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: selector.to_string(),
            reason: format!("Invalid CSS selector: {}", e),
        })
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("source_url", config.source_url())?;
    validate_path("output_path", config.output_path())?;
    validate_range("timeout_seconds", config.timeout_seconds(), 1, 600)?;

    match config.source_mode() {
        SourceMode::WixData => {
            validate_url("api_endpoint", config.api_endpoint())?;
            validate_non_empty_string("collection", config.collection())?;
            validate_range("page_limit", config.page_limit(), 1, MAX_PAGE_LIMIT)?;
            if let Some(token) = config.session_token() {
                validate_non_empty_string("session_token", token)?;
            }
        }
        SourceMode::Html => validate_selector("selector", config.selector())?,
    }

    if config.outputs().is_empty() {
        return Err(BlocklistError::MissingConfigError {
            field: "outputs".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for output in config.outputs() {
        validate_path("outputs.filename", &output.filename)?;
        if !seen.insert(output.filename.as_str()) {
            return Err(BlocklistError::ConfigValidationError {
                field: "outputs.filename".to_string(),
                message: format!("'{}' is listed more than once", output.filename),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source_url", "https://example.com").is_ok());
        assert!(validate_url("source_url", "http://example.com").is_ok());
        assert!(validate_url("source_url", "").is_err());
        assert!(validate_url("source_url", "invalid-url").is_err());
        assert!(validate_url("source_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("page_limit", 1000, 1, MAX_PAGE_LIMIT).is_ok());
        assert!(validate_range("page_limit", 0, 1, MAX_PAGE_LIMIT).is_err());
        assert!(validate_range("page_limit", 1001, 1, MAX_PAGE_LIMIT).is_err());
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector("selector", "table td").is_ok());
        assert!(validate_selector("selector", "td[").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./out").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }
}
