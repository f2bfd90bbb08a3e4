use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{info, instrument};

use crate::{
    config::Config,
    error::ClipError,
    extractor::{ExtractionPlan, Extractor, YtDlpExtractor},
    models::{ClipResult, ClipSpec},
    storage::{HttpObjectStore, ObjectStore},
};

pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

pub fn source_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
}

/// Maps a validated request onto the extraction tool's inputs.
pub fn plan_extraction(clip: &ClipSpec, workspace: &Path) -> ExtractionPlan {
    ExtractionPlan {
        source_url: source_url(&clip.video_id),
        section: format!("*{}-{}", clip.start, clip.end),
        output_path: workspace.join(format!("clip_{}.mp4", clip.clip_id)),
    }
}

/// Storage key for a clip. Reusing a clip id overwrites the earlier upload.
pub fn plan_upload(clip_id: &str) -> String {
    format!("clips/{clip_id}.mp4")
}

/// Drives extract → check → read → upload for one request at a time.
pub struct ClipProcessor {
    extractor: Arc<dyn Extractor>,
    store: Arc<dyn ObjectStore>,
    work_dir: PathBuf,
}

impl ClipProcessor {
    pub fn new(extractor: Arc<dyn Extractor>, store: Arc<dyn ObjectStore>, work_dir: PathBuf) -> Self {
        Self {
            extractor,
            store,
            work_dir,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let extractor = YtDlpExtractor::new(&config.ytdlp_path)
            .with_format(&config.format)
            .with_timeout(config.extract_timeout());
        let store = HttpObjectStore::new(&config.storage_base_url, &config.storage_bucket)
            .with_token(config.storage_token.clone())
            .with_timeout(config.upload_timeout());
        Self::new(Arc::new(extractor), Arc::new(store), config.work_dir())
    }

    #[instrument(skip_all, fields(clip_id = %clip.clip_id, video_id = %clip.video_id))]
    pub async fn process(&self, clip: &ClipSpec) -> Result<ClipResult, ClipError> {
        // Removed on drop, whichever way this function exits
        let workspace = tempfile::Builder::new()
            .prefix("clip-")
            .tempdir_in(&self.work_dir)?;

        let plan = plan_extraction(clip, workspace.path());
        info!(section = %plan.section, "Extracting segment");
        let output = self.extractor.extract(&plan).await?;

        match tokio::fs::metadata(&output).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(ClipError::ArtifactMissing),
        }

        let bytes = tokio::fs::read(&output).await?;
        info!(bytes = bytes.len(), "Uploading clip");

        let video_url = self
            .store
            .put(&plan_upload(&clip.clip_id), bytes, VIDEO_CONTENT_TYPE)
            .await?;

        Ok(ClipResult::completed(video_url, thumbnail_url(&clip.video_id)))
    }
}
