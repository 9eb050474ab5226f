//! Default header set shared between a client and its outgoing requests.

use parking_lot::RwLock;
use reqwest::header::{AsHeaderName, HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::sync::Arc;

/// Common HTTP header values.
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// A header map shared by reference.
///
/// Every clone points at the same map. A client snapshots the map right
/// before each send, so a mutation made through any clone applies to every
/// request sent afterwards; concurrent writers race and the last one wins.
#[derive(Clone, Default)]
pub struct SharedHeaders {
    inner: Arc<RwLock<HeaderMap>>,
}

impl SharedHeaders {
    /// Create an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing header map.
    pub fn from_map(map: HeaderMap) -> Self {
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Set a header, replacing any previous values for that name.
    pub fn set(&self, name: HeaderName, value: HeaderValue) {
        self.inner.write().insert(name, value);
    }

    /// Add a value without removing existing values for that name.
    pub fn append(&self, name: HeaderName, value: HeaderValue) {
        self.inner.write().append(name, value);
    }

    /// Remove every value for a header name, returning the first one.
    pub fn remove<K: AsHeaderName>(&self, name: K) -> Option<HeaderValue> {
        self.inner.write().remove(name)
    }

    /// First value stored for a header name.
    pub fn get<K: AsHeaderName>(&self, name: K) -> Option<HeaderValue> {
        self.inner.read().get(name).cloned()
    }

    /// Copy of the current map.
    pub fn snapshot(&self) -> HeaderMap {
        self.inner.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Whether both handles point at the same underlying map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<HeaderMap> for SharedHeaders {
    fn from(map: HeaderMap) -> Self {
        Self::from_map(map)
    }
}

impl fmt::Debug for SharedHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedHeaders").field(&*self.inner.read()).finish()
    }
}
