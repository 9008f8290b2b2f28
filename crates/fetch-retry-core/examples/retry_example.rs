//! Example: driving retries with the default and custom predicates
//!
//! This example demonstrates:
//! 1. The default predicate retrying a status-coded response until it recovers
//! 2. A custom predicate that only retries "network" errors
//! 3. Jitter impact (run several sequences and compare elapsed time)
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run -p fetch-retry-core --features tracing --example retry_example
//! ```

use fetch_retry_core::prelude::*;
use serde_json::{Value, json};
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// A simulated API that answers 503 the first few times
struct UnreliableApi {
    attempts: AtomicU32,
    fail_count: u32,
}

impl UnreliableApi {
    fn new(fail_count: u32) -> Arc<Self> {
        Arc::new(Self {
            attempts: AtomicU32::new(0),
            fail_count,
        })
    }

    async fn call(&self) -> Result<Value, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!("  Attempt {}: 503 Service Unavailable", attempt + 1);
            Ok(json!({ "status": 503, "ok": false }))
        } else {
            println!("  Attempt {}: 200 OK", attempt + 1);
            Ok(json!({ "status": 200, "ok": true, "data": "API response data" }))
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: default predicate
async fn example_default_predicate() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Default Predicate ===\n");

    let options = RetryOptions::<Value, std::io::Error>::builder()
        .retries(3)
        .min_timeout(Duration::from_millis(50))
        .retry_on_default()
        .on_retry(|outcome, remaining| {
            println!("  Retrying {:?} ({} retries left)", outcome.as_ref().ok(), remaining);
        })
        .build();

    let api = UnreliableApi::new(2);
    let start = Instant::now();

    let body = run(
        options,
        |api: Arc<UnreliableApi>| async move { api.call().await },
        Arc::clone(&api),
    )
    .await?;

    println!("\nResult: {}", body["data"]);
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 100ms + 200ms = ~300ms");

    Ok(())
}

/// Example 2: custom predicate
async fn example_custom_predicate() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 2: Custom Predicate (Network Errors Only) ===\n");

    let driver = RetryDriver::new(
        RetryOptions::<&'static str, std::io::Error>::builder()
            .retries(3)
            .min_timeout(Duration::from_millis(10))
            .retry_on(|outcome, _| match outcome {
                Ok(_) => false,
                Err(err) => err.to_string().to_lowercase().contains("network"),
            })
            .build(),
    );

    println!("Test 1: Auth error (should NOT retry)");
    let result = driver
        .execute(|| async {
            Err::<&'static str, _>(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "auth failed",
            ))
        })
        .await;
    match result {
        Err(RetryError::Rejected(err)) => println!("  Rejected: {}", err),
        other => println!("  Unexpected: {:?}", other),
    }

    println!("\nTest 2: Network error (should retry)");
    let attempts = AtomicU32::new(0);
    let result = driver
        .execute(|| {
            let current = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if current < 2 {
                    println!("  Attempt {}: network timeout", current + 1);
                    Err(std::io::Error::other("network timeout"))
                } else {
                    println!("  Attempt {}: success", current + 1);
                    Ok("success")
                }
            }
        })
        .await?;
    println!("Result: {} after {} attempts", result, attempts.load(Ordering::SeqCst));

    Ok(())
}

/// Example 3: jitter
async fn example_jitter_impact() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 3: Jitter Impact (5 Runs Each) ===\n");

    for randomize in [false, true] {
        println!("randomize = {}:", randomize);
        for i in 0..5 {
            let options = RetryOptions::<Value, std::io::Error>::builder()
                .retries(1)
                .min_timeout(Duration::from_millis(50))
                .randomize(randomize)
                .retry_on_default()
                .build();

            let api = UnreliableApi::new(1);
            let start = Instant::now();
            let _ = run(
                options,
                |api: Arc<UnreliableApi>| async move { api.call().await },
                api,
            )
            .await;
            println!("  Run {}: {:?}", i + 1, start.elapsed());
        }
    }

    println!("\nWithout jitter every run waits ~100ms; with jitter anywhere in [0, 100ms).");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    example_default_predicate().await?;
    example_custom_predicate().await?;
    example_jitter_impact().await?;

    println!("\nAll examples completed successfully!");
    Ok(())
}
