/*!
 * Common test utilities for the chunkscribe test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use chunkscribe::subtitle_processor::SubtitleEntry;

// Re-export the mock media tools module
pub mod mock_media;

/// Routes library logs to the test harness output, once per process
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds an entry without validation
pub fn entry(start_ms: u64, end_ms: u64, text: &str) -> SubtitleEntry {
    SubtitleEntry::new(1, start_ms, end_ms, text.to_string())
}

/// SRT text for a segment with the given `(start_ms, end_ms, text)` triples
pub fn segment_srt(entries: &[(u64, u64, &str)]) -> String {
    let entries: Vec<SubtitleEntry> = entries
        .iter()
        .enumerate()
        .map(|(i, (start, end, text))| SubtitleEntry::new(i + 1, *start, *end, text.to_string()))
        .collect();
    chunkscribe::format_srt(&entries)
}

/// A short two-segment fixture where the second segment restarts its clock
pub fn create_reset_segments(dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
    let first = create_test_file(
        dir,
        &format!("{}_segment_000.srt", stem),
        &segment_srt(&[(0, 60_000, "first segment opens"), (60_000, 125_000, "first segment closes")]),
    )?;
    let second = create_test_file(
        dir,
        &format!("{}_segment_001.srt", stem),
        &segment_srt(&[(200, 3_000, "second segment opens"), (3_000, 9_000, "second segment closes")]),
    )?;
    Ok(vec![first, second])
}
