/*!
 * External download and segmentation tools.
 *
 * Remote audio is fetched with `yt-dlp` and long recordings are cut into
 * fixed-length chunks with `ffmpeg`. Both sit behind the `MediaToolkit`
 * trait so the controller can be driven without either installed.
 */

use async_trait::async_trait;
use log::{debug, error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use url::Url;

use crate::errors::MediaToolError;
use crate::file_utils::FileManager;
use crate::timeline::segment_ordinal;

/// Remove `<stem>_segment_*.mp3` chunks left over from an earlier run
///
/// Returns how many files were deleted.
pub fn clear_stale_segments(out_dir: &Path, stem: &str) -> Result<usize, MediaToolError> {
    let stale = FileManager::find_prefixed(out_dir, &format!("{}_segment_", stem), "mp3").map_err(|e| {
        MediaToolError::ToolFailed {
            tool: "ffmpeg".to_string(),
            message: e.to_string(),
        }
    })?;
    if stale.is_empty() {
        return Ok(0);
    }

    info!("Removing {} leftover segment(s) for {}", stale.len(), stem);
    Ok(FileManager::remove_files(&stale))
}

/// Whether the input should be downloaded rather than read from disk
pub fn is_remote_locator(input: &str) -> bool {
    match Url::parse(input.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Sort chunk files by the ordinal embedded in their names, then by name
pub fn sort_segment_files(files: &mut [PathBuf]) {
    files.sort_by(|a, b| {
        let name_a = a.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let name_b = b.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        match (segment_ordinal(&name_a), segment_ordinal(&name_b)) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| name_a.cmp(&name_b)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => name_a.cmp(&name_b),
        }
    });
}

/// Drop ffmpeg's banner and stream listing, keeping the lines that explain a failure
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "size=",
        "[segment @",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        stderr.lines().last().unwrap_or("").trim().to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Download and segmentation operations used by a job
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Fetch remote audio into `dest` as mp3 and return the file written
    async fn fetch(&self, locator: &str, dest: &Path) -> Result<PathBuf, MediaToolError>;

    /// Cut `input` into `chunk_seconds` pieces named `<stem>_segment_NNN.mp3` in `out_dir`
    ///
    /// Every piece's own clock starts at zero. Returns the pieces in playback order.
    async fn segment(
        &self,
        input: &Path,
        chunk_seconds: u64,
        out_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, MediaToolError>;
}

/// `yt-dlp` and `ffmpeg` run as child processes
#[derive(Debug, Clone)]
pub struct ExternalTools {
    timeout: Duration,
}

impl ExternalTools {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    async fn run(&self, tool: &str, args: &[String]) -> Result<Output, MediaToolError> {
        debug!("Running {} {}", tool, args.join(" "));

        let child = Command::new(tool).args(args).kill_on_drop(true).output();

        let output = tokio::select! {
            result = child => {
                result.map_err(|e| match e.kind() {
                    ErrorKind::NotFound => MediaToolError::ToolNotFound(tool.to_string()),
                    _ => MediaToolError::ToolFailed {
                        tool: tool.to_string(),
                        message: e.to_string(),
                    },
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(MediaToolError::Timeout {
                    tool: tool.to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if tool == "ffmpeg" {
                filter_ffmpeg_stderr(&stderr)
            } else {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let text = if stderr.trim().is_empty() { stdout } else { stderr };
                text.trim().to_string()
            };
            error!("{} failed: {}", tool, message);
            return Err(MediaToolError::ToolFailed {
                tool: tool.to_string(),
                message,
            });
        }

        Ok(output)
    }
}

impl Default for ExternalTools {
    fn default() -> Self {
        Self::new(600)
    }
}

#[async_trait]
impl MediaToolkit for ExternalTools {
    async fn fetch(&self, locator: &str, dest: &Path) -> Result<PathBuf, MediaToolError> {
        if let Some(parent) = dest.parent() {
            FileManager::ensure_dir(parent).map_err(|e| MediaToolError::ToolFailed {
                tool: "yt-dlp".to_string(),
                message: e.to_string(),
            })?;
        }

        info!("Downloading audio from {}", locator);
        let args = vec![
            "--no-warnings".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            "mp3".to_string(),
            "-o".to_string(),
            dest.to_string_lossy().to_string(),
            locator.to_string(),
        ];
        self.run("yt-dlp", &args).await?;

        if !dest.exists() {
            return Err(MediaToolError::ToolFailed {
                tool: "yt-dlp".to_string(),
                message: format!("expected output {} was not created", dest.display()),
            });
        }

        info!("Audio downloaded to {}", dest.display());
        Ok(dest.to_path_buf())
    }

    async fn segment(
        &self,
        input: &Path,
        chunk_seconds: u64,
        out_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, MediaToolError> {
        if !input.exists() {
            return Err(MediaToolError::InputNotFound(input.display().to_string()));
        }

        let pattern = out_dir.join(format!("{}_segment_%03d.mp3", stem));
        let args = vec![
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-f".to_string(),
            "segment".to_string(),
            "-segment_time".to_string(),
            chunk_seconds.to_string(),
            "-c".to_string(),
            "copy".to_string(),
            "-reset_timestamps".to_string(),
            "1".to_string(),
            "-y".to_string(),
            pattern.to_string_lossy().to_string(),
        ];
        self.run("ffmpeg", &args).await?;

        let mut files = FileManager::find_prefixed(out_dir, &format!("{}_segment_", stem), "mp3")
            .map_err(|e| MediaToolError::ToolFailed {
                tool: "ffmpeg".to_string(),
                message: e.to_string(),
            })?;
        if files.is_empty() {
            return Err(MediaToolError::NoSegmentsProduced);
        }

        sort_segment_files(&mut files);
        info!("Audio split into {} segment(s)", files.len());
        Ok(files)
    }
}
