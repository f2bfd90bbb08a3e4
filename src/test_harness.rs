//! Stand-ins for yt-dlp and object storage
//!
//! Lets the processor and router run end to end without spawning
//! processes or opening sockets.

use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    extractor::{ExtractionPlan, Extractor, ToolError},
    storage::{ObjectStore, StoreError},
};

enum Outcome {
    Write(Vec<u8>),
    Nothing,
    Fail(String),
}

/// Extractor that writes canned bytes, writes nothing, or fails.
pub struct StubExtractor {
    outcome: Outcome,
    calls: AtomicUsize,
    last_output: Mutex<Option<PathBuf>>,
}

impl StubExtractor {
    fn with(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_output: Mutex::new(None),
        }
    }

    pub fn writes(bytes: &[u8]) -> Self {
        Self::with(Outcome::Write(bytes.to_vec()))
    }

    /// Exits "successfully" without producing a file.
    pub fn writes_nothing() -> Self {
        Self::with(Outcome::Nothing)
    }

    pub fn fails(diagnostic: &str) -> Self {
        Self::with(Outcome::Fail(diagnostic.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_output(&self) -> Option<PathBuf> {
        self.last_output.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for StubExtractor {
    async fn extract(&self, plan: &ExtractionPlan) -> Result<PathBuf, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_output.lock().unwrap() = Some(plan.output_path.clone());

        match &self.outcome {
            Outcome::Write(bytes) => {
                tokio::fs::write(&plan.output_path, bytes).await.unwrap();
                Ok(plan.output_path.clone())
            }
            Outcome::Nothing => Ok(plan.output_path.clone()),
            Outcome::Fail(diagnostic) => Err(ToolError::Exited {
                code: Some(1),
                diagnostic: diagnostic.clone(),
            }),
        }
    }
}

/// Records every PUT as (key, byte count, content type).
pub struct RecordingStore {
    base_url: String,
    reject: Option<(u16, String)>,
    puts: Mutex<Vec<(String, usize, String)>>,
}

impl RecordingStore {
    pub fn accepting(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            reject: None,
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16, body: &str) -> Self {
        Self {
            base_url: String::new(),
            reject: Some((status, body.to_string())),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn puts(&self) -> Vec<(String, usize, String)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StoreError> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), bytes.len(), content_type.to_string()));

        match &self.reject {
            Some((status, body)) => Err(StoreError::Rejected {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(format!("{}/{}", self.base_url, key)),
        }
    }
}
