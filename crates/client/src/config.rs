use std::time::Duration;

use reqwest::Url;

use crate::{ClientError, ClientResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the REST service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::Config(format!("base url '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "base url must be http or https, got '{}'",
                base_url.scheme()
            )));
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for an API path such as `/products/3`.
    ///
    /// A path prefix on the base URL (e.g. `https://host/api`) is kept.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ClientError::Config(format!("endpoint '{path}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_with_a_single_slash() {
        let cfg = ClientConfig::new("http://localhost:3001/").unwrap();
        assert_eq!(cfg.endpoint("/products").unwrap().as_str(), "http://localhost:3001/products");
        assert_eq!(cfg.endpoint("users/2").unwrap().as_str(), "http://localhost:3001/users/2");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let cfg = ClientConfig::new("https://shop.example/api").unwrap();
        assert_eq!(
            cfg.endpoint("/products/7").unwrap().as_str(),
            "https://shop.example/api/products/7"
        );
    }

    #[test]
    fn rejects_bad_base_urls() {
        assert!(matches!(ClientConfig::new("not a url"), Err(ClientError::Config(_))));
        assert!(matches!(ClientConfig::new("ftp://files.example"), Err(ClientError::Config(_))));
    }

    #[test]
    fn default_base_url_parses() {
        let cfg = ClientConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(cfg.base_url().as_str(), "http://localhost:3001/");
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT);
    }
}
