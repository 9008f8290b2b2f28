//! Default fetch resolution order
//!
//! The global slot is process-wide, so everything touching it lives in one
//! test in its own binary.

use async_trait::async_trait;
use fetch_retry::http::{HeaderMap, StatusCode};
use fetch_retry::{
    FetchRequest, FetchResolver, FetchSource, HttpFetch, HttpResponse, clear_global_fetch,
    fetch_with_retry, install_global_fetch, with_fetch,
};
use std::time::Duration;

/// Answers every request with its own name as the body
#[derive(Debug)]
struct Named(&'static str);

#[async_trait]
impl HttpFetch for Named {
    async fn fetch(&self, _request: FetchRequest) -> fetch_retry::Result<HttpResponse> {
        Ok(HttpResponse::new(StatusCode::OK, HeaderMap::new(), self.0))
    }

    fn name(&self) -> &'static str {
        self.0
    }
}

fn resolved_name(resolver: &FetchResolver) -> (FetchSource, &'static str) {
    let (source, fetch) = resolver.resolve().expect("a fetch function resolves");
    (source, fetch.name())
}

#[tokio::test]
async fn test_resolution_order() {
    let without_env = FetchResolver::new([
        FetchSource::Global,
        FetchSource::Platform,
        FetchSource::Fallback,
    ]);

    // Nothing installed: the fallback answers when compiled in
    assert!(clear_global_fetch().is_none());
    #[cfg(feature = "reqwest")]
    assert_eq!(resolved_name(&without_env), (FetchSource::Fallback, "reqwest"));

    // Platform beats fallback
    let scoped = with_fetch(Named("platform"), async { resolved_name(&without_env) }).await;
    assert_eq!(scoped, (FetchSource::Platform, "platform"));

    // Global beats platform
    assert!(install_global_fetch(Named("global")).is_none());
    let scoped = with_fetch(Named("platform"), async { resolved_name(&without_env) }).await;
    assert_eq!(scoped, (FetchSource::Global, "global"));

    // The default entry point uses the same order
    let response = with_fetch(Named("platform"), async {
        fetch_with_retry(
            fetch_retry::FetchRetryOptions::builder()
                .min_timeout(Duration::from_millis(1))
                .build(),
            FetchRequest::get("http://localhost/").unwrap(),
        )
        .await
        .unwrap()
    })
    .await;
    assert_eq!(response.text().unwrap(), "global");

    // Replacing returns the previous one
    let previous = install_global_fetch(Named("replacement")).expect("global was installed");
    assert_eq!(previous.name(), "global");

    let removed = clear_global_fetch().expect("replacement was installed");
    assert_eq!(removed.name(), "replacement");

    let scoped = with_fetch(Named("platform"), async { resolved_name(&without_env) }).await;
    assert_eq!(scoped, (FetchSource::Platform, "platform"));
}

#[cfg(all(feature = "env", feature = "reqwest"))]
#[test]
fn test_environment_beats_fallback() {
    let resolver = FetchResolver::new([FetchSource::Environment, FetchSource::Fallback]);

    temp_env::with_var("FETCH_RETRY_TIMEOUT_SECS", Some("5"), || {
        assert_eq!(resolved_name(&resolver).0, FetchSource::Environment);
    });

    temp_env::with_vars(
        [
            ("FETCH_RETRY_TIMEOUT_SECS", None::<&str>),
            ("FETCH_RETRY_PROXY", None),
            ("FETCH_RETRY_USER_AGENT", None),
        ],
        || assert_eq!(resolved_name(&resolver).0, FetchSource::Fallback),
    );
}
