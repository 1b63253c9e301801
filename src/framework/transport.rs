//! # REST Transport
//!
//! The single seam where bytes leave the process. [`RequestActor`](crate::framework::RequestActor)
//! only ever talks to a [`RestTransport`]; production wires in [`HttpTransport`],
//! tests wire in [`InMemoryTransport`](crate::framework::mock::InMemoryTransport).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::framework::FrameworkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestMethod::Get => "GET",
            RestMethod::Post => "POST",
            RestMethod::Put => "PUT",
            RestMethod::Delete => "DELETE",
        }
    }
}

/// A request as handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    pub method: RestMethod,
    pub href: String,
    pub body: Option<Value>,
}

impl RestRequest {
    pub fn get(href: impl Into<String>) -> Self {
        Self {
            method: RestMethod::Get,
            href: href.into(),
            body: None,
        }
    }

    pub fn post(href: impl Into<String>, body: Value) -> Self {
        Self {
            method: RestMethod::Post,
            href: href.into(),
            body: Some(body),
        }
    }

    pub fn delete(href: impl Into<String>) -> Self {
        Self {
            method: RestMethod::Delete,
            href: href.into(),
            body: None,
        }
    }
}

/// A raw response. Any status code is a response; only failing to get one
/// at all is a transport error.
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    pub status_code: u16,
    pub status_text: String,
    pub body: Option<Value>,
}

impl RestResponse {
    pub fn new(status_code: u16, status_text: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The server's error message if it sent one, else the status text.
    pub fn error_message(&self) -> String {
        self.body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.status_text.clone())
    }
}

#[async_trait]
pub trait RestTransport: Send + Sync + 'static {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, FrameworkError>;
}

/// `reqwest`-backed transport speaking JSON.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, FrameworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FrameworkError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RestTransport for HttpTransport {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, FrameworkError> {
        let method = match request.method {
            RestMethod::Get => Method::GET,
            RestMethod::Post => Method::POST,
            RestMethod::Put => Method::PUT,
            RestMethod::Delete => Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, request.href.as_str())
            .header(header::ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FrameworkError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FrameworkError::Transport(e.to_string()))?;
        debug!(href = %request.href, status = status.as_u16(), len = bytes.len(), "Response");

        // error pages are often not JSON; only a successful body must parse
        let body = match serde_json::from_slice::<Value>(&bytes) {
            _ if bytes.is_empty() => None,
            Ok(value) => Some(value),
            Err(e) if status.is_success() => return Err(FrameworkError::Decode(e.to_string())),
            Err(_) => None,
        };

        Ok(RestResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        ))
    }
}
