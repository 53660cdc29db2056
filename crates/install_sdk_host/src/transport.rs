//! HTTP transport contract and the immutable backend configuration it is driven with.

use std::{future::Future, pin::Pin};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Object-safe boxed future used by [`Transport`].
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;
/// Versioned API prefix shared by every SDK endpoint.
pub const API_BASE_PATH: &str = "/api/sdk/v1";
/// Backend host used when `isDebug` is set.
pub const DEBUG_HOST: &str = "install.test.xmsharetalk.cn";
/// Backend host used in production.
pub const PRODUCTION_HOST: &str = "install.sharexm.com.cn";

/// HTTP verbs the SDK issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    /// Returns the method token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    /// Returns whether a JSON body is sent with this method.
    pub const fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

/// Transport-level failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The abort signal fired before the response arrived.
    #[error("request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured bound.
        timeout_ms: u32,
    },
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("HTTP error: {status} {status_text}")]
    Http {
        /// Status code.
        status: u16,
        /// Status text.
        status_text: String,
    },
    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// A fully-resolved HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Absolute URL.
    pub url: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// JSON body, sent only for methods that carry one.
    pub body: Option<Value>,
    /// Request headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Abort bound in milliseconds.
    pub timeout_ms: u32,
}

impl HttpRequest {
    /// Returns the encoded body for methods that carry one.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Decode`] when the body cannot be encoded.
    pub fn encoded_body(&self) -> Result<Option<String>, TransportError> {
        match &self.body {
            Some(body) if self.method.carries_body() => serde_json::to_string(body)
                .map(Some)
                .map_err(|err| TransportError::Decode(err.to_string())),
            _ => Ok(None),
        }
    }
}

/// Response envelope produced by every SDK endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Endpoint payload.
    pub data: T,
    /// Business status code.
    #[serde(default)]
    pub code: i64,
    /// Business status message.
    #[serde(default)]
    pub msg: String,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decodes an envelope from a raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Decode`] when the body is not a matching envelope.
    pub fn from_body(body: Value) -> Result<Self, TransportError> {
        serde_json::from_value(body).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

/// Host HTTP transport.
pub trait Transport {
    /// Sends `request` and resolves to the JSON body (plain-text bodies arrive as
    /// [`Value::String`]).
    fn send<'a>(&'a self, request: &'a HttpRequest)
        -> TransportFuture<'a, Result<Value, TransportError>>;
}

/// Backend origin and timeout fixed at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    base_url: String,
    timeout_ms: u32,
}

impl TransportConfig {
    /// Resolves the backend origin for the debug flag, keeping the page's `http:`/`https:`
    /// protocol. Other protocols fall back to `https:`.
    pub fn for_environment(is_debug: bool, page_protocol: &str) -> Self {
        let protocol = match page_protocol {
            "http:" | "https:" => page_protocol,
            _ => "https:",
        };
        let host = if is_debug { DEBUG_HOST } else { PRODUCTION_HOST };
        Self {
            base_url: format!("{protocol}//{host}"),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Replaces the resolved origin.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the request timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Backend origin.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout.
    pub const fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Joins `path` onto the origin; absolute URLs pass through unchanged.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{path}", self.base_url)
        }
    }

    /// Builds a JSON request against `path`.
    pub fn json_request(&self, method: HttpMethod, path: &str, body: Option<Value>) -> HttpRequest {
        HttpRequest {
            url: self.resolve_url(path),
            method,
            body,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            timeout_ms: self.timeout_ms,
        }
    }
}
