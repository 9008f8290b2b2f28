//! Example: fetching a URL with retries
//!
//! This example shows how to:
//! 1. Seed retry options from `FetchConfig::from_env`
//! 2. Observe retries with `on_retry`
//! 3. Tell exhausted budgets apart from rejected failures
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=fetch_retry=debug cargo run -p fetch-retry --features trace --example fetch_url -- https://httpbin.org/status/503
//! ```

use anyhow::Context;
use fetch_retry::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "trace")]
    fetch_retry::observability::init_tracing();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://httpbin.org/status/200".to_string());

    let config = FetchConfig::from_env();
    println!("Retrying up to {} times, {:?} to {:?} apart", config.retries, config.min_timeout, config.max_timeout);

    let options = config
        .retry_options::<HttpResponse, FetchError>()
        .on_retry(|outcome, remaining| match outcome {
            Ok(response) => println!("  {} -> retrying ({} left)", response.status(), remaining),
            Err(error) => println!("  {} -> retrying ({} left)", error, remaining),
        })
        .build();

    let request = FetchRequest::get(&url).with_context(|| format!("invalid url {}", url))?;

    match fetch_with_retry(options, request).await {
        Ok(response) => {
            println!("Final status: {}", response.status());
            println!("{}", response.text().unwrap_or_default());
        }
        Err(RetryError::Exhausted { retries, .. }) => {
            println!("Gave up after {} retries", retries);
        }
        Err(error) => return Err(error).context("fetch failed"),
    }

    Ok(())
}
