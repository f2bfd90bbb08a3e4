use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{extractor::ToolError, storage::StoreError};

/// Every way a clip request can fail.
///
/// Converted straight into the HTTP response; nothing is retried.
#[derive(Error, Debug)]
pub enum ClipError {
    #[error("Missing required parameters")]
    MissingParameter,

    #[error("Invalid clip id: {0}")]
    InvalidClipId(String),

    /// yt-dlp exited unsuccessfully; carries its diagnostic output.
    #[error("yt-dlp failed: {0}")]
    ExtractionFailed(String),

    /// yt-dlp reported success but left no file behind.
    #[error("Video file was not created")]
    ArtifactMissing,

    /// Storage answered with something other than 200; carries its body.
    #[error("Storage upload failed: {0}")]
    UploadFailed(String),

    #[error("{0}")]
    Unclassified(String),
}

impl ClipError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ClipError::MissingParameter | ClipError::InvalidClipId(_) => {
                StatusCode::BAD_REQUEST
            }
            ClipError::ExtractionFailed(_)
            | ClipError::ArtifactMissing
            | ClipError::UploadFailed(_)
            | ClipError::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ClipError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

impl From<ToolError> for ClipError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Exited { diagnostic, .. } => ClipError::ExtractionFailed(diagnostic),
            other => ClipError::ExtractionFailed(other.to_string()),
        }
    }
}

impl From<StoreError> for ClipError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected { body, .. } => ClipError::UploadFailed(body),
            StoreError::Transport(e) => ClipError::Unclassified(e.to_string()),
        }
    }
}

impl From<std::io::Error> for ClipError {
    fn from(err: std::io::Error) -> Self {
        ClipError::Unclassified(err.to_string())
    }
}
