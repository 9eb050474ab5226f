//! Default headers loaded from `fetch.yaml` (and `FETCH_*` variables), sent under a context.

use fetch_common_log::{init, LogConfig};
use fetch_http::{Context, Fetch, FetchConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(LogConfig::from_env())?;

    let mut config = FetchConfig::load("fetch.yaml")?.apply_env()?;
    config
        .headers
        .entry("user-agent".to_string())
        .or_insert_with(|| vec!["OLX-Group".to_string()]);

    let fetch = Fetch::new(Some(config.into_options()?)).with_json();
    let ctx = Context::with_timeout(Duration::from_secs(5));

    match fetch.get_with_context(&ctx, "http://www.google.com").await {
        Ok(rsp) => println!("{} {}", rsp.status_code(), rsp.status_text()),
        Err(e) => println!("{} ({e})", e.response().status_code()),
    }
    Ok(())
}
