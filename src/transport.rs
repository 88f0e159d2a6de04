// Blocking HTTP transport and status classification
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;

use crate::error::{ApiError, ClientError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

// Outcome of a request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    Body(String),
    NotFound,
}

/// Performs one GET and hands back the status and body untouched.
///
/// Implementations must be reentrant: the client shares one transport
/// across every call and every thread.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<RawResponse, ApiError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<RawResponse, ApiError> {
        let failed = |e: reqwest::Error| ApiError::RequestFailed {
            url: url.to_string(),
            status: None,
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/xml")
            .send()
            .map_err(failed)?;

        let status = response.status().as_u16();
        let body = response.text().map_err(failed)?;

        Ok(RawResponse { status, body })
    }
}

pub fn classify(response: RawResponse, url: &str, api_key: &str) -> Result<Fetched, ApiError> {
    tracing::debug!(status = response.status, "goodreads response");

    match response.status {
        200..=299 => Ok(Fetched::Body(response.body)),
        404 => Ok(Fetched::NotFound),
        401 => Err(ApiError::Authentication {
            key: api_key.to_string(),
        }),
        status => Err(ApiError::RequestFailed {
            url: url.to_string(),
            status: Some(status),
            reason: format!("unexpected status {}", status),
        }),
    }
}

// Canned-response transport for tests
#[cfg(test)]
pub(crate) mod mock_transport {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    pub struct MockTransport {
        queued: Mutex<VecDeque<Result<RawResponse, ApiError>>>,
        fallback: Option<RawResponse>,
        calls: Mutex<Vec<String>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                queued: Mutex::new(VecDeque::new()),
                fallback: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        // Every request gets this response once the queue is drained.
        pub fn always(status: u16, body: &str) -> Self {
            Self {
                fallback: Some(RawResponse::new(status, body)),
                ..Self::new()
            }
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.queued
                .lock()
                .unwrap()
                .push_back(Ok(RawResponse::new(status, body)));
            self
        }

        pub fn fail(self, error: ApiError) -> Self {
            self.queued.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Transport for MockTransport {
        fn get(&self, url: &str) -> Result<RawResponse, ApiError> {
            self.calls.lock().unwrap().push(url.to_string());

            if let Some(next) = self.queued.lock().unwrap().pop_front() {
                return next;
            }

            self.fallback.clone().ok_or_else(|| ApiError::RequestFailed {
                url: url.to_string(),
                status: None,
                reason: "no canned response".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const URL: &str = "https://www.goodreads.com/review/show.xml?format=xml&key=K&id=1";

    #[test_case(200; "ok")]
    #[test_case(203; "other success")]
    fn test_classify_success_returns_body(status: u16) {
        let fetched = classify(RawResponse::new(status, "<r/>"), URL, "K").unwrap();
        assert_eq!(fetched, Fetched::Body("<r/>".to_string()));
    }

    #[test]
    fn test_classify_404_is_not_found_not_error() {
        let fetched = classify(RawResponse::new(404, "missing"), URL, "K").unwrap();
        assert_eq!(fetched, Fetched::NotFound);
    }

    #[test]
    fn test_classify_401_names_key() {
        let err = classify(RawResponse::new(401, ""), URL, "bad-key").unwrap_err();
        assert_eq!(
            err,
            ApiError::Authentication {
                key: "bad-key".to_string()
            }
        );
    }

    #[test_case(500; "server error")]
    #[test_case(403; "forbidden")]
    #[test_case(302; "redirect")]
    fn test_classify_other_status_is_request_failure(status: u16) {
        match classify(RawResponse::new(status, ""), URL, "K") {
            Err(ApiError::RequestFailed {
                url,
                status: Some(code),
                ..
            }) => {
                assert_eq!(url, URL);
                assert_eq!(code, status);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_connection_refused_is_request_failure() {
        let transport = HttpTransport::new().unwrap();
        let url = "http://127.0.0.1:1/author/show/5?format=xml&key=K";

        match transport.get(url) {
            Err(ApiError::RequestFailed {
                url: failed,
                status: None,
                ..
            }) => assert_eq!(failed, url),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_http_transport_sends_accept_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/author/show/5"))
            .and(query_param("format", "xml"))
            .and(query_param("key", "test-key"))
            .and(header("accept", "application/xml"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<GoodreadsResponse/>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/author/show/5?format=xml&key=test-key", server.uri());
        let response = tokio::task::spawn_blocking(move || {
            let transport = HttpTransport::new().unwrap();
            transport.get(&url)
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(response, RawResponse::new(200, "<GoodreadsResponse/>"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_http_transport_passes_error_statuses_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Page not found"))
            .mount(&server)
            .await;

        let url = format!("{}/book/isbn/0?format=xml&key=k", server.uri());
        let response = tokio::task::spawn_blocking(move || {
            let transport = HttpTransport::new().unwrap();
            transport.get(&url)
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "Page not found");
    }
}
