//! A small HTTP client over `reqwest`.
//!
//! [`Fetch`] applies a default header set and a timeout to every request and
//! hands back a [`Response`] whose body is read once and cached. Failed
//! requests still yield a placeholder response through
//! [`FetchError::response`].
//!
//! ```rust,ignore
//! use fetch_http::{Fetch, new_reader};
//!
//! let fetch = Fetch::default_client().with_json();
//! let mut rsp = fetch.post("https://example.com/login", Some(new_reader(&form).into())).await?;
//! println!("{} {}", rsp.status_code(), rsp.text().await?);
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod options;
pub mod reader;
pub mod request;
pub mod response;
pub mod tools;

pub use client::{Fetch, FetchError};
pub use config::{ConfigError, FetchConfig};
pub use context::{Context, ContextError};
pub use options::{build_transport, Options, DEFAULT_TIMEOUT};
pub use reader::{new_reader, JsonReader};
#[allow(deprecated)]
pub use reader::new_struct_io;
pub use request::{headers, SharedHeaders};
pub use response::{Response, ResponseError};
pub use tools::{must_bytes, must_string};
