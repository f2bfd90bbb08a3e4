use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;

use crate::extractor::DEFAULT_FORMAT;

/// Runtime settings, read from flags or the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "clip-processor", version, about = "Cuts YouTube segments and stores them as MP4 clips")]
pub struct Config {
    /// Address the HTTP server listens on
    #[arg(long, env = "CLIP_BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// yt-dlp executable
    #[arg(long, env = "YTDLP_PATH", default_value = "yt-dlp")]
    pub ytdlp_path: PathBuf,

    /// yt-dlp format selection
    #[arg(long, env = "YTDLP_FORMAT", default_value = DEFAULT_FORMAT)]
    pub format: String,

    /// Seconds before a running extraction is killed (0 = no limit)
    #[arg(long, env = "EXTRACT_TIMEOUT_SECS", default_value_t = 600)]
    pub extract_timeout_secs: u64,

    /// Object storage endpoint, without the bucket
    #[arg(long, env = "STORAGE_BASE_URL")]
    pub storage_base_url: String,

    #[arg(long, env = "STORAGE_BUCKET")]
    pub storage_bucket: String,

    /// Bearer token for the storage PUT
    #[arg(long, env = "STORAGE_TOKEN", hide_env_values = true)]
    pub storage_token: Option<String>,

    /// Seconds before an upload is abandoned (0 = no limit)
    #[arg(long, env = "UPLOAD_TIMEOUT_SECS", default_value_t = 120)]
    pub upload_timeout_secs: u64,

    /// Parent directory for per-request workspaces (default: system temp dir)
    #[arg(long, env = "CLIP_WORK_DIR")]
    pub work_dir: Option<PathBuf>,
}

impl Config {
    pub fn extract_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.extract_timeout_secs)
    }

    pub fn upload_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.upload_timeout_secs)
    }

    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [&str; 5] = [
        "clip-processor",
        "--storage-base-url",
        "https://storage.example.com",
        "--storage-bucket",
        "nice-clips",
    ];

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(REQUIRED).unwrap();
        assert_eq!(config.bind, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.ytdlp_path, PathBuf::from("yt-dlp"));
        assert_eq!(config.format, DEFAULT_FORMAT);
        assert_eq!(config.extract_timeout(), Some(Duration::from_secs(600)));
        assert_eq!(config.upload_timeout(), Some(Duration::from_secs(120)));
        assert!(config.storage_token.is_none());
    }

    #[test]
    fn test_zero_timeout_disables_bound() {
        let mut args = REQUIRED.to_vec();
        args.extend(["--extract-timeout-secs", "0", "--upload-timeout-secs", "0"]);
        let config = Config::try_parse_from(args).unwrap();
        assert_eq!(config.extract_timeout(), None);
        assert_eq!(config.upload_timeout(), None);
    }

    #[test]
    fn test_work_dir_override() {
        let mut args = REQUIRED.to_vec();
        args.extend(["--work-dir", "/var/tmp/clips"]);
        let config = Config::try_parse_from(args).unwrap();
        assert_eq!(config.work_dir(), PathBuf::from("/var/tmp/clips"));
    }
}
