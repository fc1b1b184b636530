use anyhow::{Context, Result};
use serde::Serialize;
use std::time::{Duration, Instant};

pub const USER_AGENT: &str = concat!("release-watch/", env!("CARGO_PKG_VERSION"));

/// Catalogs run to tens of megabytes; the default body cap is too small.
const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: Vec<u8>,
    /// Raw `Last-Modified` header, used as a date fallback for feeds.
    pub last_modified: Option<String>,
}

/// Blocking HTTP client with one timeout for every request it makes.
#[derive(Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }

    /// GETs a URL; any non-2xx status is an error.
    pub fn get(&self, url: &str) -> Result<Fetched> {
        let start = Instant::now();
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .with_context(|| format!("GET {url}"))?;
        let status = response.status().as_u16();
        let last_modified = response
            .headers()
            .get("last-modified")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .with_context(|| format!("read body of {url}"))?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::info!(
            url,
            status,
            elapsed_ms,
            body_bytes = body.len(),
            "fetch complete"
        );

        Ok(Fetched {
            body,
            last_modified,
        })
    }

    /// POSTs a JSON payload and returns the status and response text.
    pub fn post_json<T: Serialize>(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        payload: &T,
    ) -> Result<(u16, String)> {
        let mut request = self.agent.post(url).header("User-Agent", USER_AGENT);
        if let Some(token) = bearer_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let mut response = request
            .send_json(payload)
            .with_context(|| format!("POST {url}"))?;
        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .with_context(|| format!("read response of {url}"))?;
        Ok((status, text))
    }
}
