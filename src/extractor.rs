use std::{
    ffi::OsString,
    path::PathBuf,
    process::Stdio,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

pub const DEFAULT_FORMAT: &str = "best[height<=1080][ext=mp4]/best[ext=mp4]/best";

/// Everything the extraction tool needs for one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPlan {
    pub source_url: String,
    /// `*<start>-<end>`, as understood by `--download-sections`.
    pub section: String,
    pub output_path: PathBuf,
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("exited with status {code:?}: {diagnostic}")]
    Exited {
        code: Option<i32>,
        diagnostic: String,
    },

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Cuts a section out of a remote video into a local file.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Returns the path the tool was asked to write. Whether the file
    /// actually exists is for the caller to check.
    async fn extract(&self, plan: &ExtractionPlan) -> Result<PathBuf, ToolError>;
}

/// Runs yt-dlp as a child process.
pub struct YtDlpExtractor {
    program: PathBuf,
    format: String,
    timeout: Option<Duration>,
}

impl YtDlpExtractor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            format: DEFAULT_FORMAT.to_string(),
            timeout: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn args(&self, plan: &ExtractionPlan) -> Vec<OsString> {
        vec![
            "--format".into(),
            self.format.clone().into(),
            "--download-sections".into(),
            plan.section.clone().into(),
            "--output".into(),
            plan.output_path.clone().into_os_string(),
            "--no-warnings".into(),
            plan.source_url.clone().into(),
        ]
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    async fn extract(&self, plan: &ExtractionPlan) -> Result<PathBuf, ToolError> {
        let args = self.args(plan);
        debug!(program = %self.program.display(), ?args, "Spawning extractor");

        let started = Instant::now();
        let mut command = Command::new(&self.program);
        // kill_on_drop reaps the child if the timeout below abandons it
        command
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let child = command.output();

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child)
                .await
                .map_err(|_| ToolError::TimedOut(limit))?,
            None => child.await,
        }
        .map_err(|source| ToolError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(ToolError::Exited {
                code: output.status.code(),
                diagnostic,
            });
        }

        info!(
            section = %plan.section,
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Extraction finished"
        );
        Ok(plan.output_path.clone())
    }
}
