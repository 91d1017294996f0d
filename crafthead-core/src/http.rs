//! HTTP Client abstraction layer for upstream lookups
//!
//! Profile lookups and texture downloads both go through [`HttpClient`] so the
//! pipeline can be exercised in tests without real network requests. The
//! default implementation wraps reqwest.
//!
//! Unlike a plain `text()` helper, the client hands back the status code
//! untouched: the profile provider treats 204/206 and some 4xx bodies as
//! "no such player" rather than as failures.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use crate::Error;

/// Status + raw body of an upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: HashMap<String, String>) -> Result<HttpResponse, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    /// `timeout` bounds each whole request, connect through last body byte.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::UpstreamUnavailable(format!("Failed to build reqwest client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: &str, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}
