//! Client and per-request configuration
//!
//! Everything here deserializes from JSON with defaults for every field, so
//! callers going through the C ABI can send only what they want to override.

use serde::{Deserialize, Serialize};

use crate::extractors::MarkupVersion;

pub const DEFAULT_COUNTRY: &str = "us";

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Base URLs for every upstream the client talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoints {
    /// JSON search endpoint
    pub search: String,
    /// JSON lookup endpoint
    pub lookup: String,
    /// XML autocomplete endpoint
    pub suggest: String,
    /// HTML app pages, followed by `/<country>/app/id<id>`
    pub app_page: String,
    /// HTML ratings pages and the reviews RSS feed, followed by `/<country>/...`
    pub store: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search: "https://itunes.apple.com/search".to_string(),
            lookup: "https://itunes.apple.com/lookup".to_string(),
            suggest: "https://search.itunes.apple.com/WebObjects/MZSearchHints.woa/wa/hints"
                .to_string(),
            app_page: "https://apps.apple.com".to_string(),
            store: "https://itunes.apple.com".to_string(),
        }
    }
}

/// Settings that apply to every call made through one client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub user_agent: String,
    /// Used when a request leaves `country` unset
    pub default_country: String,
    pub endpoints: Endpoints,
    /// Selector set used for scraped HTML pages
    pub markup: MarkupVersion,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_country: DEFAULT_COUNTRY.to_string(),
            endpoints: Endpoints::default(),
            markup: MarkupVersion::default(),
        }
    }
}

/// Pass-through transport settings attached to a single request.
///
/// The core never looks inside these; they are handed to the [`Transport`](crate::Transport).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestOptions {
    /// Extra headers sent verbatim
    pub headers: Vec<(String, String)>,
    /// Proxy URL, e.g. `http://localhost:8080`
    pub proxy: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"defaultCountry": "gb", "markup": "legacy"}"#).unwrap();

        assert_eq!(config.default_country, "gb");
        assert_eq!(config.markup, MarkupVersion::Legacy);
        assert_eq!(config.endpoints.lookup, "https://itunes.apple.com/lookup");
        assert!(config.user_agent.starts_with("app_store_scraper/"));
    }

    #[test]
    fn test_request_options_from_json() {
        let options: RequestOptions = serde_json::from_str(
            r#"{"headers": [["Accept-Language", "fr"]], "timeoutSecs": 5}"#,
        )
        .unwrap();

        assert_eq!(options.headers, vec![("Accept-Language".to_string(), "fr".to_string())]);
        assert_eq!(options.timeout_secs, Some(5));
        assert!(options.proxy.is_none());
    }
}
