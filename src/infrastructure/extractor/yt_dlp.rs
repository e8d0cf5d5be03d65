//! `yt-dlp` subprocess extractor.

use crate::domain::errors::ExtractionError;
use crate::domain::gateways::MediaExtractor;
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// How long `yt-dlp --version` may take during health checks.
const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Extracts media by running `yt-dlp`.
///
/// The child process is killed if the extraction future is dropped, so a
/// cancelled request does not leave a download running in the background.
pub struct YtDlpExtractor {
    program: OsString,
    leading_args: Vec<OsString>,
    format: String,
}

impl YtDlpExtractor {
    /// Creates an extractor running `program` with the given format selector.
    pub fn new(program: impl Into<OsString>, format: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            format: format.into(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }

    fn download_args(&self, url: &str, destination: &Path) -> Vec<OsString> {
        vec![
            "-f".into(),
            self.format.as_str().into(),
            "--no-playlist".into(),
            "--no-progress".into(),
            "--no-part".into(),
            "-o".into(),
            destination.as_os_str().to_owned(),
            "--print".into(),
            "after_move:filepath".into(),
            "--".into(),
            url.into(),
        ]
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract(&self, url: &str, destination: &Path) -> Result<PathBuf, ExtractionError> {
        debug!("Running yt-dlp for {}", url);

        let output = self
            .command()
            .args(self.download_args(url, destination))
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    ExtractionError::Failed("yt-dlp is not installed".to_string())
                } else {
                    ExtractionError::Failed(format!("could not run yt-dlp: {e}"))
                }
            })?;

        if !output.status.success() {
            return Err(classify_failure(&output.stderr));
        }

        if let Some(printed) = last_line(&output.stdout) {
            let printed = PathBuf::from(printed);
            if tokio::fs::try_exists(&printed).await.unwrap_or(false) {
                return Ok(printed);
            }
        }

        if tokio::fs::try_exists(destination).await.unwrap_or(false) {
            Ok(destination.to_path_buf())
        } else {
            Err(ExtractionError::Failed(
                "yt-dlp reported success but produced no file".to_string(),
            ))
        }
    }

    async fn health_check(&self) -> bool {
        let version = self.command().arg("--version").output();

        match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, version).await {
            Ok(Ok(output)) => output.status.success(),
            Ok(Err(e)) => {
                warn!("yt-dlp health check failed: {}", e);
                false
            }
            Err(_) => {
                warn!("yt-dlp health check timed out");
                false
            }
        }
    }
}

fn last_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .next_back()
        .map(ToString::to_string)
}

/// Maps `yt-dlp` stderr onto an [`ExtractionError`].
fn classify_failure(stderr: &[u8]) -> ExtractionError {
    let message = last_line(stderr).unwrap_or_else(|| "yt-dlp exited with an error".to_string());
    let lower = String::from_utf8_lossy(stderr).to_ascii_lowercase();

    if lower.contains("unsupported url") {
        ExtractionError::UnsupportedUrl(message)
    } else if lower.contains("postprocessing") || lower.contains("post-processing") {
        ExtractionError::PostProcessing(message)
    } else {
        ExtractionError::Failed(message)
    }
}
