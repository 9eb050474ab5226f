//! Response wrapper with a read-once body cache.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Body access errors.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("the body of response is empty")]
    EmptyBody,

    /// The body stream failed. Repeated reads return the same error.
    #[error("failed to read response body: {0}")]
    Read(#[source] Arc<reqwest::Error>),

    #[error("response body is not valid UTF-8: {0}")]
    Utf8(#[source] std::string::FromUtf8Error),

    #[error("failed to parse JSON (status {status}): {source}")]
    Decode {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An HTTP response whose body is read at most once and then cached.
///
/// Status and headers are available immediately. The body stays on the
/// wire until [`Response::bytes`] (or `text`/`decode`) pulls it; after that
/// every read is served from the cache. A read that fails leaves nothing
/// cached and every later read fails with the same error. A response
/// synthesized for a failed request has a status but no body.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Option<Url>,
    stream: Option<reqwest::Response>,
    body: Option<Bytes>,
    read_error: Option<Arc<reqwest::Error>>,
}

impl Response {
    pub(crate) fn from_reqwest(response: reqwest::Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: Some(response.url().clone()),
            stream: Some(response),
            body: None,
            read_error: None,
        }
    }

    /// A placeholder response with a status and nothing to read.
    pub fn synthesized(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            url: None,
            stream: None,
            body: None,
            read_error: None,
        }
    }

    /// A response whose body is already cached.
    pub fn from_bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::synthesized(status)
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Canonical reason phrase, empty for unknown codes.
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL after redirects; `None` for synthesized responses.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// True while nothing (or a zero-length body) has been cached.
    pub fn is_body_empty(&self) -> bool {
        self.body.as_ref().map_or(true, Bytes::is_empty)
    }

    /// The response body, read from the wire on first call.
    pub async fn bytes(&mut self) -> Result<Bytes, ResponseError> {
        if let Some(body) = &self.body {
            return Ok(body.clone());
        }
        if let Some(err) = &self.read_error {
            return Err(ResponseError::Read(Arc::clone(err)));
        }

        let stream = self.stream.take().ok_or(ResponseError::EmptyBody)?;
        let body = match stream.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(status = %self.status, error = %e, "response body read failed");
                let err = Arc::new(e);
                self.read_error = Some(Arc::clone(&err));
                return Err(ResponseError::Read(err));
            }
        };
        tracing::trace!(status = %self.status, len = body.len(), "response body cached");

        self.body = Some(body.clone());
        Ok(body)
    }

    /// The response body as text.
    pub async fn text(&mut self) -> Result<String, ResponseError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(ResponseError::Utf8)
    }

    /// Decode the JSON body into `T`.
    pub async fn decode<T: DeserializeOwned>(&mut self) -> Result<T, ResponseError> {
        let bytes = self.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| ResponseError::Decode {
            status: self.status.as_u16(),
            body: String::from_utf8_lossy(&bytes).to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
        age: u32,
    }

    #[tokio::test]
    async fn test_decode_cached_body() {
        let mut response =
            Response::from_bytes(StatusCode::OK, r#"{"name":"Rodrigo","age":30}"#);

        let person: Person = response.decode().await.unwrap();
        assert_eq!(
            person,
            Person {
                name: "Rodrigo".to_string(),
                age: 30
            }
        );
    }

    #[tokio::test]
    async fn test_decode_error_keeps_body() {
        let mut response = Response::from_bytes(StatusCode::BAD_REQUEST, "invalid json");

        let err = response.decode::<Person>().await.unwrap_err();
        match &err {
            ResponseError::Decode { status, body, .. } => {
                assert_eq!(*status, 400);
                assert_eq!(body, "invalid json");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
        assert!(err.to_string().contains("status 400"));
    }

    #[tokio::test]
    async fn test_synthesized_has_no_body() {
        let mut response = Response::synthesized(StatusCode::GATEWAY_TIMEOUT);

        assert!(response.is_body_empty());
        assert!(response.url().is_none());
        assert_eq!(response.status_code(), 504);
        assert_eq!(response.status_text(), "Gateway Timeout");
        assert!(matches!(response.bytes().await, Err(ResponseError::EmptyBody)));
        // Nothing was cached, so the failure repeats.
        assert!(matches!(response.text().await, Err(ResponseError::EmptyBody)));
    }

    #[tokio::test]
    async fn test_bytes_served_from_cache() {
        let mut response = Response::from_bytes(StatusCode::OK, "hello");

        assert!(!response.is_body_empty());
        let first = response.bytes().await.unwrap();
        let second = response.bytes().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(response.text().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_zero_length_cache_counts_as_empty() {
        let mut response = Response::from_bytes(StatusCode::NO_CONTENT, Bytes::new());

        assert!(response.is_body_empty());
        assert_eq!(response.bytes().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let mut response = Response::from_bytes(StatusCode::OK, vec![0xff, 0xfe]);
        assert!(matches!(response.text().await, Err(ResponseError::Utf8(_))));
    }

    #[test]
    fn test_unknown_status_text() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(Response::synthesized(status).status_text(), "");
    }
}
