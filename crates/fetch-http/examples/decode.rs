//! Decode a JSON body into a struct.

use fetch_common_log::{init, LogConfig};
use fetch_http::Fetch;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GitHubUser {
    name: Option<String>,
    company: Option<String>,
    location: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(LogConfig::from_env())?;

    let username = std::env::args().nth(1).unwrap_or_else(|| "rodkranz".to_string());
    let url = format!("https://api.github.com/users/{username}");

    let mut rsp = Fetch::default_client().get(&url).await?;
    let user: GitHubUser = rsp.decode().await?;

    println!(
        "Name: {}\nCompany: {}\nLocation: {}",
        user.name.unwrap_or_default(),
        user.company.unwrap_or_default(),
        user.location.unwrap_or_default()
    );
    Ok(())
}
