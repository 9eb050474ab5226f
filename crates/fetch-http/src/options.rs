//! Client options and transport construction.

use crate::request::SharedHeaders;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Timeout used whenever the configured one is zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent when the header set does not carry one.
pub const DEFAULT_USER_AGENT: &str = concat!("fetch/", env!("CARGO_PKG_VERSION"));

/// Options applied to every request a [`crate::Fetch`] sends.
#[derive(Debug, Clone)]
pub struct Options {
    /// Headers copied onto every outgoing request.
    pub headers: SharedHeaders,
    /// Connect, TLS handshake and overall request timeout.
    pub timeout: Duration,
    /// Target host. Carried for callers; requests always use their own URL.
    pub host: Option<String>,
    /// Pre-built transport. Built from `timeout` when absent.
    pub transport: Option<Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            headers: SharedHeaders::new(),
            timeout: DEFAULT_TIMEOUT,
            host: None,
            transport: None,
        }
    }
}

impl Options {
    /// Options with the default timeout and an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout. Zero falls back to [`DEFAULT_TIMEOUT`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a default header.
    pub fn with_header(self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Use an existing header set, sharing it with whoever else holds it.
    pub fn with_headers(mut self, headers: SharedHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Use a pre-built transport instead of building one.
    pub fn with_transport(mut self, transport: Client) -> Self {
        self.transport = Some(transport);
        self
    }

    /// The timeout that will actually be applied.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    /// Replace a zero timeout with [`DEFAULT_TIMEOUT`].
    pub(crate) fn normalize_timeout(&mut self) {
        self.timeout = self.effective_timeout();
    }
}

/// Build a transport bound to the options' timeout.
///
/// `connect_timeout` covers both TCP connect and the TLS handshake; the
/// same value also bounds the whole request.
pub fn build_transport(options: &Options) -> Result<Client, reqwest::Error> {
    let timeout = options.effective_timeout();

    ClientBuilder::new()
        .connect_timeout(timeout)
        .timeout(timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
}

/// Normalize the timeout and make sure a transport exists.
///
/// Never fails: a builder error is logged and the stock client is used.
pub(crate) fn ensure_transport(options: &mut Options) -> Client {
    options.normalize_timeout();

    if let Some(transport) = &options.transport {
        return transport.clone();
    }

    let transport = build_transport(options).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to build HTTP transport, using defaults");
        Client::default()
    });
    options.transport = Some(transport.clone());
    transport
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
        assert!(options.host.is_none());
        assert!(options.headers.is_empty());
        assert!(options.transport.is_none());
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let options = Options::new().with_timeout(Duration::ZERO);
        assert_eq!(options.effective_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_custom_timeout_is_kept() {
        let options = Options::new().with_timeout(Duration::from_millis(250));
        assert_eq!(options.effective_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_ensure_transport_fills_defaults() {
        let mut options = Options {
            timeout: Duration::ZERO,
            ..Options::default()
        };

        ensure_transport(&mut options);

        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
        assert!(options.transport.is_some());
    }

    #[test]
    fn test_builder_chaining() {
        let options = Options::new()
            .with_host("api.example.com")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        assert_eq!(options.host.as_deref(), Some("api.example.com"));
        assert_eq!(options.headers.get(CONTENT_TYPE).unwrap(), "text/plain");
    }

    #[test]
    fn test_build_transport() {
        assert!(build_transport(&Options::default()).is_ok());
    }
}
