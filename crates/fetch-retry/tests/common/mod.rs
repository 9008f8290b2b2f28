//! Common test utilities and helpers

use fetch_retry::{FetchRequest, FetchRetryOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// GET request against a mock server path
#[allow(dead_code)]
pub fn get(base: &str, path: &str) -> FetchRequest {
    FetchRequest::get(&format!("{}{}", base, path)).expect("valid mock server url")
}

/// Options with short delays so tests run in real time
#[allow(dead_code)]
pub fn fast_options(retries: u32) -> fetch_retry::RetryOptionsBuilder<fetch_retry::HttpResponse, fetch_retry::FetchError> {
    FetchRetryOptions::builder()
        .retries(retries)
        .min_timeout(Duration::from_millis(5))
        .max_timeout(Duration::from_millis(20))
}

/// Records `(status, remaining)` for every `on_retry` call
#[allow(dead_code)]
pub type RetryLog = Arc<Mutex<Vec<(Option<u16>, u32)>>>;

/// Options whose observer appends to the returned log
#[allow(dead_code)]
pub fn observed_options(retries: u32) -> (FetchRetryOptions, RetryLog) {
    let log: RetryLog = Arc::default();
    let sink = Arc::clone(&log);
    let options = fast_options(retries)
        .on_retry(move |outcome, remaining| {
            let status = outcome.as_ref().ok().map(|r| r.status().as_u16());
            sink.lock().unwrap().push((status, remaining));
        })
        .build();
    (options, log)
}
