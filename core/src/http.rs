//! HTTP transport types and the injected fetch facility.
//!
//! # Design
//! Requests and responses are plain data. `SellerClient::build_*` produces an
//! `HttpRequest`, something implementing `Fetch` executes it, and
//! `SellerClient::parse_*` consumes the resulting `HttpResponse`. The core
//! never opens a socket itself; hosts plug in whatever transport they have.
//!
//! With the `ureq` feature (on by default) a blocking `UreqFetch` is
//! provided. It reports every HTTP status as data, because status
//! interpretation is left to the response body.

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and already carries the query string, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value whose name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// The host-provided fetch facility: one request in, one response out.
///
/// Implementations must perform exactly one round-trip per call and must not
/// retry. A failure to obtain any response at all is reported as
/// `ApiError::Transport`.
pub trait Fetch {
    fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Fetch for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError>,
{
    fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_fetch::UreqFetch;

#[cfg(feature = "ureq")]
mod ureq_fetch {
    use super::{Fetch, HttpMethod, HttpRequest, HttpResponse};
    use crate::error::ApiError;

    /// Blocking `Fetch` backed by a ureq agent.
    #[derive(Clone)]
    pub struct UreqFetch {
        agent: ureq::Agent,
    }

    impl UreqFetch {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqFetch {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Fetch for UreqFetch {
        fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let sent = match request.method {
                HttpMethod::Get => {
                    let mut builder = self.agent.get(&request.url);
                    for (name, value) in &request.headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    match &request.body {
                        Some(body) => builder.force_send_body().send(body.as_bytes()),
                        None => builder.call(),
                    }
                }
                HttpMethod::Post => {
                    let mut builder = self.agent.post(&request.url);
                    for (name, value) in &request.headers {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    match &request.body {
                        Some(body) => builder.send(body.as_bytes()),
                        None => builder.send_empty(),
                    }
                }
            };
            let mut response = sent.map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        v.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
