//! Fetch a URL and print the body.

use fetch_common_log::{info, init, LogConfig};
use fetch_http::Fetch;

const URL: &str = "https://api.github.com/users/rodkranz";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(LogConfig::from_env())?;

    let fetch = Fetch::default_client();
    let mut rsp = fetch.get(URL).await?;
    let body = rsp.text().await?;

    info!(status = rsp.status_code(), "fetched {}", URL);
    println!("{body}");
    Ok(())
}
