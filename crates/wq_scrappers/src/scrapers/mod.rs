use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::redirect::Policy;
use reqwest::Client;
use wq_core::{Error, Result};

pub mod wikipedia;

pub use wikipedia::WikipediaScraper;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// HTTP settings for article fetches. The defaults imitate a desktop browser,
/// which the target site requires.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
    pub referer: String,
    pub max_redirects: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            referer: "https://www.google.com/".to_string(),
            max_redirects: 10,
        }
    }
}

impl ExtractorConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn build_client(&self) -> Result<Client> {
        let header = |name: &str, value: &str| {
            HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("Invalid {} header '{}': {}", name, value, e)))
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, header("Accept-Language", &self.accept_language)?);
        headers.insert(REFERER, header("Referer", &self.referer)?);

        Ok(Client::builder()
            .user_agent(header("User-Agent", &self.user_agent)?)
            .default_headers(headers)
            .redirect(Policy::limited(self.max_redirects))
            .timeout(self.timeout)
            .build()?)
    }
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use scraper::Selector;
    use url::Url;
    use wq_core::{Error, FetchError, Result};

    pub fn parse_url(url: &str) -> Result<Url> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(FetchError::InvalidUrl(format!("{}: unsupported scheme '{}'", url, scheme)).into()),
        }
    }

    pub fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector '{}': {}", css, e)))
    }

    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::utils;

    #[test]
    fn test_parse_url() {
        assert!(utils::parse_url("https://en.wikipedia.org/wiki/Rust").is_ok());
        assert!(matches!(
            utils::parse_url("invalid-url"),
            Err(Error::Fetch(wq_core::FetchError::InvalidUrl(_)))
        ));
        assert!(utils::parse_url("ftp://example.com/file").is_err());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(utils::collapse_whitespace("  Rust \n is\t fast  "), "Rust is fast");
        assert_eq!(utils::collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(utils::selector("p[["), Err(Error::Scraping(_))));
    }

    #[test]
    fn test_default_config_builds_client() {
        let config = ExtractorConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn test_bad_header_rejected() {
        let config = ExtractorConfig {
            referer: "line\nbreak".to_string(),
            ..ExtractorConfig::default()
        };
        assert!(matches!(config.build_client(), Err(Error::Config(_))));
    }
}
