/*!
 * Mock download and segmentation tools for controller tests
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chunkscribe::errors::MediaToolError;
use chunkscribe::media_tools::MediaToolkit;

/// Writes placeholder chunk files instead of running ffmpeg
#[derive(Debug, Clone)]
pub struct MockMediaTools {
    /// Number of chunks `segment` produces
    pub chunks: usize,
    /// Make `segment` fail
    pub fail_segmentation: bool,
    /// Locators passed to `fetch`
    pub fetched: Arc<Mutex<Vec<String>>>,
    /// Chunk lengths passed to `segment`
    pub chunk_seconds_seen: Arc<Mutex<Vec<u64>>>,
}

impl MockMediaTools {
    pub fn with_chunks(chunks: usize) -> Self {
        Self {
            chunks,
            fail_segmentation: false,
            fetched: Arc::new(Mutex::new(Vec::new())),
            chunk_seconds_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_segmentation: true,
            ..Self::with_chunks(0)
        }
    }
}

#[async_trait]
impl MediaToolkit for MockMediaTools {
    async fn fetch(&self, locator: &str, dest: &Path) -> Result<PathBuf, MediaToolError> {
        self.fetched.lock().push(locator.to_string());
        std::fs::write(dest, b"downloaded audio").map_err(|e| MediaToolError::ToolFailed {
            tool: "yt-dlp".to_string(),
            message: e.to_string(),
        })?;
        Ok(dest.to_path_buf())
    }

    async fn segment(
        &self,
        input: &Path,
        chunk_seconds: u64,
        out_dir: &Path,
        stem: &str,
    ) -> Result<Vec<PathBuf>, MediaToolError> {
        self.chunk_seconds_seen.lock().push(chunk_seconds);
        if !input.exists() {
            return Err(MediaToolError::InputNotFound(input.display().to_string()));
        }
        if self.fail_segmentation {
            return Err(MediaToolError::ToolFailed {
                tool: "ffmpeg".to_string(),
                message: "Invalid data found when processing input".to_string(),
            });
        }

        let mut files = Vec::with_capacity(self.chunks);
        for i in 0..self.chunks {
            let path = out_dir.join(format!("{}_segment_{:03}.mp3", stem, i));
            std::fs::write(&path, b"chunk").map_err(|e| MediaToolError::ToolFailed {
                tool: "ffmpeg".to_string(),
                message: e.to_string(),
            })?;
            files.push(path);
        }

        if files.is_empty() {
            return Err(MediaToolError::NoSegmentsProduced);
        }
        Ok(files)
    }
}
