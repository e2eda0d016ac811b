//! HTTP exchange types for the host-does-IO pattern.
//!
//! # Design
//! `TrelloClient` describes each call as an `HttpRequest`, hands it to an
//! `HttpExecutor` supplied by the host, and interprets the returned
//! `HttpResponse`. The core never opens a socket, so the host picks the HTTP
//! stack, TLS and timeouts, and tests can answer requests from memory.

use crate::error::TransportError;

/// HTTP method for a request. The API surface used here is read-mostly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
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
/// `url` is absolute and already carries the credential query parameters.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Executes one `HttpRequest` on behalf of the core.
///
/// Non-2xx statuses must be returned as responses, not errors; only failures
/// that produce no response at all map to `TransportError::Io`.
pub trait HttpExecutor: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> HttpExecutor for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}
