//! Turn any serializable value into a request body.

use bytes::Bytes;
use serde::Serialize;
use std::io::{self, Cursor, Read};

/// A readable JSON payload.
///
/// Reads advance through the payload; converting into a [`reqwest::Body`]
/// sends whatever has not been read yet.
#[derive(Debug, Clone)]
pub struct JsonReader {
    inner: Cursor<Bytes>,
}

impl JsonReader {
    fn new(bytes: Bytes) -> Self {
        Self {
            inner: Cursor::new(bytes),
        }
    }

    /// The whole payload, regardless of how much was read.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }

    /// The part of the payload not read yet.
    pub fn into_bytes(self) -> Bytes {
        let position = self.inner.position() as usize;
        let bytes = self.inner.into_inner();
        bytes.slice(position.min(bytes.len())..)
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl Read for JsonReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl From<JsonReader> for reqwest::Body {
    fn from(reader: JsonReader) -> Self {
        reqwest::Body::from(reader.into_bytes())
    }
}

/// JSON-encode `value` into a reader.
///
/// Never fails: a value serde_json refuses is replaced by the text
/// `error to read: <type name>`.
pub fn new_reader<T: Serialize + ?Sized>(value: &T) -> JsonReader {
    match serde_json::to_vec(value) {
        Ok(encoded) => JsonReader::new(Bytes::from(encoded)),
        Err(e) => {
            let type_name = std::any::type_name::<T>();
            tracing::warn!(error = %e, type_name, "value is not JSON serializable");
            JsonReader::new(Bytes::from(format!("error to read: {type_name}")))
        }
    }
}

/// Older name for [`new_reader`].
#[deprecated(note = "use `new_reader`")]
pub fn new_struct_io<T: Serialize + ?Sized>(value: &T) -> JsonReader {
    new_reader(value)
}
