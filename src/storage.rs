use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, StatusCode};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage responded {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("storage request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Durable home for finished clips.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `key`, returning the URL the object is served from.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StoreError>;
}

/// Plain HTTP PUT to `<base>/<bucket>/<key>`.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            token: None,
        }
    }

    /// Bearer token sent with every PUT.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        self.client = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build storage client, uploads will have no timeout: {e}");
            reqwest::Client::new()
        });
        self
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StoreError> {
        let url = self.object_url(key);
        let size = bytes.len();
        let started = Instant::now();

        let mut request = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        // Anything but a plain 200 counts as a failed upload
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!(status = status.as_u16(), "Failed to read storage error body: {e}");
                String::new()
            });
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            %url,
            bytes = size,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Upload finished"
        );
        Ok(url)
    }
}
