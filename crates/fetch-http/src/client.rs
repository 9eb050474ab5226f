//! The fetch client.

use crate::context::{Context, ContextError};
use crate::options::{ensure_transport, Options};
use crate::request::{headers, SharedHeaders};
use crate::response::Response;
use fetch_common_log::spans::{instrument_future, record_status, request_span, Timer};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Body, Client, Method, Request, StatusCode};
use std::time::Duration;

/// Request errors.
///
/// Every variant maps to a placeholder [`Response`] through
/// [`FetchError::response`], so callers can always read a status code.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("couldn't request {method}: {source}")]
    Build {
        method: Method,
        #[source]
        source: reqwest::Error,
    },

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e)
        } else {
            FetchError::Request(e)
        }
    }
}

impl FetchError {
    /// Status of the placeholder response for this error.
    ///
    /// `204 No Content` when the request could not be built, `504 Gateway
    /// Timeout` when it was sent but produced no response.
    pub fn status(&self) -> StatusCode {
        match self {
            FetchError::Build { .. } => StatusCode::NO_CONTENT,
            _ => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Placeholder response standing in for the one that never arrived.
    pub fn response(&self) -> Response {
        Response::synthesized(self.status())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FetchError::Timeout(_) | FetchError::Context(ContextError::DeadlineExceeded)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Context(ContextError::Cancelled))
    }
}

/// HTTP client with default headers and a fixed timeout.
///
/// Cloning is cheap; clones share the transport and the header set.
#[derive(Debug, Clone)]
pub struct Fetch {
    inner: Client,
    options: Options,
}

impl Fetch {
    /// Build a client. `None` means [`Options::default`].
    ///
    /// A zero timeout is replaced by [`crate::DEFAULT_TIMEOUT`], and a
    /// transport is built when the options carry none.
    pub fn new(options: Option<Options>) -> Self {
        let mut options = options.unwrap_or_default();
        let inner = ensure_transport(&mut options);
        Self { inner, options }
    }

    /// Client with the default options.
    pub fn default_client() -> Self {
        Self::new(None)
    }

    /// Send `Content-Type: application/json` on every request.
    pub fn with_json(self) -> Self {
        self.options.headers.set(
            CONTENT_TYPE,
            HeaderValue::from_static(headers::CONTENT_TYPE_JSON),
        );
        self
    }

    /// Options the client was built with, timeout normalized and transport filled in.
    pub fn settings(&self) -> &Options {
        &self.options
    }

    /// The header set applied to every request. Changes affect later calls.
    pub fn headers(&self) -> &SharedHeaders {
        &self.options.headers
    }

    pub fn timeout(&self) -> Duration {
        self.options.timeout
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Client {
        &self.inner
    }

    /// Send a prepared request.
    ///
    /// The request's headers are replaced by the configured header set.
    pub async fn execute(&self, request: Request) -> Result<Response, FetchError> {
        self.send(None, request).await
    }

    /// Send a prepared request, giving up when `ctx` is cancelled or expires.
    pub async fn execute_with_context(
        &self,
        ctx: &Context,
        request: Request,
    ) -> Result<Response, FetchError> {
        self.send(Some(ctx), request).await
    }

    async fn send(&self, ctx: Option<&Context>, mut request: Request) -> Result<Response, FetchError> {
        *request.headers_mut() = self.options.headers.snapshot();
        if request.timeout().is_none() {
            *request.timeout_mut() = Some(self.options.timeout);
        }

        let method = request.method().clone();
        let url = request.url().clone();
        let span = request_span(method.as_str(), url.as_str());
        tracing::debug!("Making {} request to: {}", method, url);

        let timer = Timer::start("http_request");
        let call = instrument_future(self.inner.execute(request), span.clone());
        let outcome = match ctx {
            Some(ctx) => ctx.run(call).await,
            None => Ok(call.await),
        };
        timer.finish();

        let result = outcome.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request abandoned");
            FetchError::from(e)
        })?;

        match result {
            Ok(response) => {
                record_status(&span, response.status().as_u16());
                tracing::debug!("{} response: {} {}", method, response.status(), url);
                Ok(Response::from_reqwest(response))
            }
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "request failed");
                Err(FetchError::from(e))
            }
        }
    }

    fn build(&self, method: Method, url: &str, body: Option<Body>) -> Result<Request, FetchError> {
        let mut builder = self.inner.request(method.clone(), url);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder.build().map_err(|source| {
            tracing::debug!(%method, url, error = %source, "could not build request");
            FetchError::Build { method, source }
        })
    }

    /// GET `url`.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let request = self.build(Method::GET, url, None)?;
        self.execute(request).await
    }

    /// GET `url` under `ctx`.
    pub async fn get_with_context(&self, ctx: &Context, url: &str) -> Result<Response, FetchError> {
        let request = self.build(Method::GET, url, None)?;
        self.execute_with_context(ctx, request).await
    }
}

macro_rules! verb_with_body {
    ($name:ident, $name_ctx:ident, $method:expr, $verb:literal) => {
        impl Fetch {
            #[doc = concat!($verb, " `url` with an optional body.")]
            pub async fn $name(&self, url: &str, body: Option<Body>) -> Result<Response, FetchError> {
                let request = self.build($method, url, body)?;
                self.execute(request).await
            }

            #[doc = concat!($verb, " `url` with an optional body, under `ctx`.")]
            pub async fn $name_ctx(
                &self,
                ctx: &Context,
                url: &str,
                body: Option<Body>,
            ) -> Result<Response, FetchError> {
                let request = self.build($method, url, body)?;
                self.execute_with_context(ctx, request).await
            }
        }
    };
}

verb_with_body!(post, post_with_context, Method::POST, "POST");
verb_with_body!(put, put_with_context, Method::PUT, "PUT");
verb_with_body!(delete, delete_with_context, Method::DELETE, "DELETE");
verb_with_body!(patch, patch_with_context, Method::PATCH, "PATCH");
verb_with_body!(options, options_with_context, Method::OPTIONS, "OPTIONS");

impl Default for Fetch {
    fn default() -> Self {
        Self::default_client()
    }
}
