use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 12;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 6;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("kcse-course-checker/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
});

pub async fn fetch_json(url: &str) -> Result<Value> {
    let response = HTTP_CLIENT
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .with_context(|| format!("catalog request failed: {url}"))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("failed reading catalog body: {url}"))?;
    debug!("GET {url} -> {status} ({} bytes)", body.len());
    if !status.is_success() {
        let preview: String = body.chars().take(180).collect();
        return Err(anyhow!("catalog server returned {status} for {url}: {preview}"));
    }
    serde_json::from_str(&body).with_context(|| format!("catalog at {url} is not JSON"))
}

pub fn catalog_url(base_url: &str, slug: &str) -> String {
    format!("{}/{slug}.json", base_url.trim_end_matches('/'))
}
