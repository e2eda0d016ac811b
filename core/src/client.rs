//! Authenticated request builder and response interpreter for the board API.
//!
//! # Design
//! `TrelloClient` holds only its configuration and the host's executor and
//! carries no mutable state between calls. Each transport call is split into
//! a `build_*` step that produces an `HttpRequest` (credentials injected as
//! query parameters) and `parse_response`, which maps the status code onto
//! `TransportError`. The executor sits in between and is the only piece that
//! touches the network.

use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpExecutor, HttpMethod, HttpRequest, HttpResponse};
use crate::session::Session;
use crate::transport::{FormParams, Transport};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// `Transport` implementation that speaks HTTP through a host-supplied executor.
#[derive(Debug, Clone)]
pub struct TrelloClient<E> {
    config: ClientConfig,
    executor: E,
}

impl<E: HttpExecutor> TrelloClient<E> {
    pub fn new(config: ClientConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url_for(path),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_post(&self, path: &str, form: &FormParams) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: self.url_for(path),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(form.encode()),
        }
    }

    /// Map the response status onto a body or a `TransportError`.
    pub fn parse_response(
        &self,
        path: &str,
        response: HttpResponse,
    ) -> Result<Vec<u8>, TransportError> {
        if (200..300).contains(&response.status) {
            return Ok(response.body);
        }
        warn!(path, status = response.status, "request failed");
        let body = String::from_utf8_lossy(&response.body).into_owned();
        match response.status {
            401 => Err(TransportError::Unauthorized { body }),
            404 => Err(TransportError::NotFound {
                path: path.to_string(),
            }),
            status => Err(TransportError::Http { status, body }),
        }
    }

    /// Wrap this client in a `Session`, the root of resource navigation.
    pub fn into_session(self) -> Session
    where
        E: 'static,
    {
        Session::new(self)
    }

    fn url_for(&self, path: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("key", self.config.key())
            .append_pair("token", self.config.token())
            .finish();
        let separator = if path.contains('?') { '&' } else { '?' };
        format!("{}{path}{separator}{query}", self.config.base_url())
    }
}

impl<E: HttpExecutor> Transport for TrelloClient<E> {
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        let request = self.build_get(path);
        debug!(method = request.method.as_str(), path, "sending request");
        let response = self.executor.execute(request)?;
        self.parse_response(path, response)
    }

    fn post(&self, path: &str, form: &FormParams) -> Result<Vec<u8>, TransportError> {
        let request = self.build_post(path, form);
        debug!(method = request.method.as_str(), path, params = form.len(), "sending request");
        let response = self.executor.execute(request)?;
        self.parse_response(path, response)
    }
}
