// Error types for the Goodreads client
use thiserror::Error;

// Per-call failures. A 404 is not an error; it surfaces as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid API key: {key}")]
    Authentication { key: String },

    #[error("Request failed: {url} ({reason})")]
    RequestFailed {
        url: String,
        status: Option<u16>,
        reason: String,
    },
}

impl ApiError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication { .. })
    }

    pub fn is_request_failure(&self) -> bool {
        matches!(self, ApiError::RequestFailed { .. })
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

// Never leaves the crate: malformed bodies degrade to an absent result.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum ParseError {
    #[error("XML parse error: {0}")]
    XmlParseError(String),

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Unclosed element: {0}")]
    UnclosedElement(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_message_names_key() {
        let err = ApiError::Authentication {
            key: "bad-key".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid API key: bad-key");
        assert!(err.is_authentication());
        assert!(!err.is_request_failure());
    }

    #[test]
    fn test_request_failed_message_names_url() {
        let err = ApiError::RequestFailed {
            url: "https://www.goodreads.com/review/show.xml".to_string(),
            status: Some(500),
            reason: "unexpected status 500".to_string(),
        };
        assert!(err
            .to_string()
            .contains("https://www.goodreads.com/review/show.xml"));
        assert!(err.is_request_failure());
    }
}
