//! POST a JSON-encoded form and print whatever comes back.

use fetch_common_log::{init, warn, LogConfig};
use fetch_http::{must_string, new_reader, Fetch};
use serde::Serialize;

const TARGET_URL: &str = "http://website.com/";

#[derive(Serialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(LogConfig::from_env())?;

    let login = LoginForm {
        username: "username".to_string(),
        password: "password".to_string(),
    };

    let fetch = Fetch::default_client().with_json();
    let mut rsp = match fetch.post(TARGET_URL, Some(new_reader(&login).into())).await {
        Ok(rsp) => rsp,
        Err(e) => {
            warn!(error = %e, "could not login");
            e.response()
        }
    };

    println!("{}", must_string(rsp.text().await));
    Ok(())
}
