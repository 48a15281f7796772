use anyhow::{Result, Context};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: File stem used to name every intermediate file of a job
    pub fn job_stem<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "output".to_string())
    }

    // @generates: `<dir>/_temp_<stem>_combined.srt`, staged before the final rename
    pub fn temp_output_path<P: AsRef<Path>>(output: P) -> PathBuf {
        let output = output.as_ref();
        let dir = output.parent().unwrap_or_else(|| Path::new(""));
        dir.join(format!("_temp_{}_combined.srt", Self::job_stem(output)))
    }

    // @generates: `<dir>/_temp_<stem>_downloaded.mp3` for fetched audio
    pub fn download_path<P: AsRef<Path>>(work_dir: P, stem: &str) -> PathBuf {
        work_dir.as_ref().join(format!("_temp_{}_downloaded.mp3", stem))
    }

    // @generates: Sibling path with a different extension (segment.mp3 -> segment.srt)
    pub fn with_extension<P: AsRef<Path>>(path: P, extension: &str) -> PathBuf {
        path.as_ref().with_extension(extension)
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(wanted) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        Ok(result)
    }

    /// Files directly inside `dir` whose name starts with `prefix` and has the extension
    pub fn find_prefixed<P: AsRef<Path>>(dir: P, prefix: &str, extension: &str) -> Result<Vec<PathBuf>> {
        let wanted = extension.trim_start_matches('.');
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy();

            let ext_matches = path
                .extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(wanted))
                .unwrap_or(false);

            if path.is_file() && ext_matches && name.starts_with(prefix) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write through a staging file, then rename it over `path`
    ///
    /// Readers never observe a half-written file. The staging file is removed
    /// if the rename fails.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let staging = Self::temp_output_path(path);

        Self::write_to_file(&staging, content)?;
        if let Err(e) = fs::rename(&staging, path) {
            let _ = fs::remove_file(&staging);
            return Err(e).with_context(|| format!("Failed to move {:?} to {:?}", staging, path));
        }

        debug!("Wrote {:?}", path);
        Ok(())
    }

    /// Remove files, logging failures instead of stopping
    ///
    /// Returns how many files were actually deleted.
    pub fn remove_files<P: AsRef<Path>>(paths: &[P]) -> usize {
        let mut removed = 0;
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                continue;
            }
            match fs::remove_file(path) {
                Ok(()) => {
                    debug!("Removed {:?}", path);
                    removed += 1;
                }
                Err(e) => warn!("Could not remove {:?}: {}", path, e),
            }
        }
        removed
    }
}
