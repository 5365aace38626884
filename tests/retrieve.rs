//! End-to-end retrieval tests over the public API
//!
//! Exercises the full path a library consumer sees: a custom `Transport`
//! injected into a `Fetcher`, a `CacheStore` on a temp path, and a
//! `Retriever` orchestrating the two.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use webfetch::{
    CacheStore, FetchConfig, Fetcher, Reply, Retriever, Transport, TransportError,
};

/// Transport that always serves the same 200 body and counts calls.
struct CountingTransport {
    body: String,
    calls: AtomicUsize,
}

impl CountingTransport {
    fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for CountingTransport {
    async fn get(&self, _url: &str, _user_agent: Option<&str>) -> Result<Reply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Reply {
            status: 200,
            retry_after: None,
            body: Ok(self.body.clone()),
        })
    }
}

fn retriever_with(transport: Arc<CountingTransport>, temp_dir: &TempDir) -> Retriever {
    let store = CacheStore::open(temp_dir.path().join("responses.json"));
    Retriever::with_store(store)
        .with_fetcher(Fetcher::with_transport(transport as Arc<dyn Transport>))
}

#[tokio::test]
async fn test_fetch_then_cache_hit_across_processes() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = FetchConfig::new("https://example.com/report")
        .with_cache_ttl(Duration::from_secs(3600));

    // "Process" one fetches from the network and persists the result.
    let warm = CountingTransport::new("quarterly report");
    let mut retriever = retriever_with(Arc::clone(&warm), &temp_dir);
    let first = retriever.fetch(&config).await.expect("Network fetch");
    assert_eq!(first.body, "quarterly report");
    assert_eq!(warm.calls(), 1);
    drop(retriever);

    // "Process" two reopens the store from disk and never hits the network.
    let cold = CountingTransport::new("should not be served");
    let mut retriever = retriever_with(Arc::clone(&cold), &temp_dir);
    let second = retriever.fetch(&config).await.expect("Cached fetch");
    assert_eq!(second.body, "quarterly report");
    assert_eq!(second.status, 200);
    assert_eq!(cold.calls(), 0, "The reopened cache must satisfy the fetch");
}

#[tokio::test]
async fn test_force_refetches_even_with_a_durable_entry() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = FetchConfig::new("https://example.com/report")
        .with_cache_ttl(Duration::from_secs(3600));

    let warm = CountingTransport::new("stale");
    let mut retriever = retriever_with(Arc::clone(&warm), &temp_dir);
    retriever.fetch(&config).await.expect("Warm the cache");
    drop(retriever);

    let fresh = CountingTransport::new("fresh");
    let mut retriever = retriever_with(Arc::clone(&fresh), &temp_dir);
    let result = retriever
        .fetch(&config.clone().with_force(true))
        .await
        .expect("Forced fetch");

    assert_eq!(result.body, "fresh");
    assert_eq!(fresh.calls(), 1, "Force must bypass the durable entry");
}

#[tokio::test]
async fn test_outfile_download_with_nested_directories() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let outfile = temp_dir
        .path()
        .join("downloads")
        .join("2024")
        .join("report.html");
    let config = FetchConfig::new("https://example.com/report").with_outfile(&outfile);

    let transport = CountingTransport::new("<html>report</html>");
    let mut retriever = retriever_with(Arc::clone(&transport), &temp_dir);
    let result = retriever.fetch(&config).await.expect("Fetch to file");

    assert!(result.body.is_empty());
    assert_eq!(result.status, 200);
    let written = std::fs::read_to_string(&outfile).expect("Outfile should exist");
    assert_eq!(written, "<html>report</html>");
}

#[tokio::test]
async fn test_independent_stores_do_not_share_entries() {
    let dir_a = TempDir::new().expect("Failed to create temp directory");
    let dir_b = TempDir::new().expect("Failed to create temp directory");
    let config = FetchConfig::new("https://example.com/report")
        .with_cache_ttl(Duration::from_secs(3600));

    let transport_a = CountingTransport::new("a");
    let mut retriever_a = retriever_with(Arc::clone(&transport_a), &dir_a);
    retriever_a.fetch(&config).await.expect("Fetch into store A");

    let transport_b = CountingTransport::new("b");
    let mut retriever_b = retriever_with(Arc::clone(&transport_b), &dir_b);
    let result = retriever_b.fetch(&config).await.expect("Fetch into store B");

    assert_eq!(result.body, "b", "Store B must not see store A's entry");
    assert_eq!(transport_b.calls(), 1);
}
