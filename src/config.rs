// Client configuration
use serde::Deserialize;
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com/";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Checks that `base_url` is an absolute http(s) URL and returns the
    /// config with a trailing `/` on it, so route paths can be appended as-is.
    ///
    /// The API key is not checked here; a bad key only shows up as a 401.
    pub fn validate(mut self) -> Result<Self, ClientError> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| ClientError::ConfigError(format!("invalid base url: {}", e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ClientError::ConfigError(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_goodreads_domain() {
        let config = ClientConfig::new("abc");
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validate_appends_trailing_slash() {
        let config = ClientConfig::new("abc")
            .with_base_url("http://127.0.0.1:8080")
            .validate()
            .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let result = ClientConfig::new("abc").with_base_url("not a url").validate();
        assert!(matches!(result, Err(ClientError::ConfigError(_))));

        let result = ClientConfig::new("abc")
            .with_base_url("ftp://example.com/")
            .validate();
        assert!(matches!(result, Err(ClientError::ConfigError(_))));
    }

    #[test]
    fn test_deserialize_defaults_base_url() {
        let config: ClientConfig = serde_json::from_str(r#"{"api_key": "k1"}"#).unwrap();
        assert_eq!(config, ClientConfig::new("k1"));

        let config: ClientConfig =
            serde_json::from_str(r#"{"api_key": "k1", "base_url": "http://localhost/"}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://localhost/");
    }
}
