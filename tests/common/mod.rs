#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use formsink::config::{Config, S3Config, StorageBackend};
use formsink::storage::{MemoryStore, ObjectStore, PutObject, PutReceipt, StorageFault};

pub const TEST_BUCKET: &str = "feedback-test-bucket";

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit a JSON body to the form endpoint, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit-form"))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit form-urlencoded data, return (body, status).
    pub async fn submit_form(&self, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit-form"))
            .form(data)
            .send()
            .await
            .expect("submit form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a raw body with an explicit content type, return (body, status).
    pub async fn submit_raw(&self, content_type: &str, raw: &'static str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/submit-form"))
            .header("content-type", content_type)
            .body(raw)
            .send()
            .await
            .expect("submit raw failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        bucket: TEST_BUCKET.to_string(),
        storage: StorageBackend::Memory,
        s3: S3Config::default(),
        storage_timeout: None,
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
        max_body_size: 1_048_576,
        trusted_proxies: vec![],
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app backed by a fresh in-memory store.
pub async fn spawn_app() -> (TestApp, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = spawn_with(test_config(), store.clone()).await;
    (app, store)
}

/// Spawn a test app with the given config and store.
pub async fn spawn_with(config: Config, store: Arc<dyn ObjectStore>) -> TestApp {
    let app = formsink::build_app(config, store);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}

/// Store that fails every put with the same fault.
pub struct FaultyStore {
    fault: StorageFault,
    pub calls: AtomicUsize,
}

impl FaultyStore {
    pub fn new(fault: StorageFault) -> Self {
        Self {
            fault,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FaultyStore {
    fn name(&self) -> &str {
        "faulty"
    }

    async fn put(&self, _object: PutObject) -> Result<PutReceipt, StorageFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.fault.clone())
    }
}

/// Store that takes `delay` before accepting a put.
pub struct SlowStore {
    pub delay: Duration,
}

#[async_trait]
impl ObjectStore for SlowStore {
    fn name(&self) -> &str {
        "slow"
    }

    async fn put(&self, _object: PutObject) -> Result<PutReceipt, StorageFault> {
        tokio::time::sleep(self.delay).await;
        Ok(PutReceipt::default())
    }
}

/// Store whose put panics.
pub struct PanickingStore;

#[async_trait]
impl ObjectStore for PanickingStore {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn put(&self, _object: PutObject) -> Result<PutReceipt, StorageFault> {
        panic!("store exploded");
    }
}
