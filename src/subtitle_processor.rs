use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug};

use crate::errors::SubtitleError;
use crate::timestamp;

// @module: Subtitle parsing, entry model and serialization

// @const: SRT timing line regex (`<start> --> <end>`)
static TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2,}:\d{2}:\d{2}[,.]\d{3})$").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number as read from the source (positional only)
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without validation
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: start < end, text trimmed
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self, SubtitleError> {
        if start_time_ms >= end_time_ms {
            return Err(SubtitleError::InvalidInterval {
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: text.trim().to_string(),
        })
    }

    /// Returns a copy moved `offset_ms` later on the timeline
    pub fn shifted(&self, offset_ms: u64, seq_num: usize) -> Result<Self, SubtitleError> {
        let invalid = SubtitleError::InvalidInterval {
            start_ms: self.start_time_ms,
            end_ms: self.end_time_ms,
        };
        let start = self.start_time_ms.checked_add(offset_ms).ok_or(invalid.clone())?;
        let end = self.end_time_ms.checked_add(offset_ms).ok_or(invalid)?;

        Self::new_validated(seq_num, start, end, self.text.clone())
    }

    /// Length of the displayed text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms.saturating_sub(self.start_time_ms)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        timestamp::encode(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        timestamp::encode(self.end_time_ms)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Parse SRT format text into subtitle entries
///
/// Blocks that don't have the index / timing / text shape are skipped with a
/// warning and parsing resumes at the next block. Blocks whose text is empty
/// are dropped silently. Entries keep the index found in the source.
pub fn parse_srt_string(content: &str) -> Vec<SubtitleEntry> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut entries = Vec::new();
    let mut skipped = 0;

    for (line_no, block) in split_blocks(content) {
        match parse_block(line_no, &block) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {
                debug!("Dropping empty subtitle block at line {}", line_no);
            }
            Err(e) => {
                warn!("Skipping subtitle block: {}", e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed subtitle block(s), kept {}", skipped, entries.len());
    }

    entries
}

/// Group non-blank lines into blocks, remembering where each block starts
///
/// Besides blank lines, an index line directly followed by a timing line also
/// opens a new block, so a missing separator costs nothing.
fn split_blocks(content: &str) -> Vec<(usize, Vec<&str>)> {
    let lines: Vec<&str> = content.lines().map(|l| l.trim_end_matches('\r')).collect();
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_start = 0;

    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push((current_start, std::mem::take(&mut current)));
            }
            continue;
        }

        let opens_block = current.len() >= 2
            && is_index_line(line)
            && lines.get(i + 1).is_some_and(|next| TIMING_REGEX.is_match(next.trim()));
        if opens_block {
            blocks.push((current_start, std::mem::take(&mut current)));
        }

        if current.is_empty() {
            current_start = i + 1;
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push((current_start, current));
    }

    blocks
}

fn is_index_line(line: &str) -> bool {
    line.trim().parse::<usize>().is_ok_and(|n| n > 0)
}

fn parse_block(line_no: usize, lines: &[&str]) -> Result<Option<SubtitleEntry>, SubtitleError> {
    let malformed = |reason: String| SubtitleError::MalformedBlock { line: line_no, reason };

    let index_line = lines[0].trim();
    let seq_num = match index_line.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => return Err(malformed(format!("expected a positive index, found '{}'", index_line))),
    };

    let timing_line = lines
        .get(1)
        .map(|l| l.trim())
        .ok_or_else(|| malformed(format!("block {} has no timing line", seq_num)))?;
    let caps = TIMING_REGEX
        .captures(timing_line)
        .ok_or_else(|| malformed(format!("invalid timing line '{}'", timing_line)))?;

    let start_ms = timestamp::try_decode(&caps[1]).map_err(|e| malformed(e.to_string()))?;
    let end_ms = timestamp::try_decode(&caps[2]).map_err(|e| malformed(e.to_string()))?;

    let text = lines[2..]
        .iter()
        .map(|l| l.trim())
        .collect::<Vec<_>>()
        .join("\n");
    if text.trim().is_empty() {
        return Ok(None);
    }

    SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text).map(Some)
}

/// Render entries as SRT text
///
/// Indices are reassigned `1..N` in order. Entries with empty text or an
/// invalid interval are skipped. The result ends with exactly one newline
/// (or is empty when nothing was written).
pub fn format_srt(entries: &[SubtitleEntry]) -> String {
    let mut output = String::new();
    let mut index = 0;

    for entry in entries {
        let text = entry
            .text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            debug!("Not writing entry {} with empty text", entry.seq_num);
            continue;
        }
        if entry.start_time_ms >= entry.end_time_ms {
            warn!(
                "Not writing entry {} with invalid time range: {} >= {}",
                entry.seq_num, entry.start_time_ms, entry.end_time_ms
            );
            continue;
        }

        index += 1;
        output.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index,
            entry.format_start_time(),
            entry.format_end_time(),
            text
        ));
    }

    let content_len = output.trim_end().len();
    output.truncate(content_len);
    if !output.is_empty() {
        output.push('\n');
    }

    output
}

/// Collection of subtitle entries with their source
#[derive(Debug, Clone)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Create an empty collection
    pub fn new(source_file: PathBuf) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
        }
    }

    /// Read and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;

        let entries = parse_srt_string(&content);
        if entries.is_empty() {
            warn!("No subtitle entries parsed from {}", path.display());
        }

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Render the collection as SRT text
    pub fn to_srt_string(&self) -> String {
        format_srt(&self.entries)
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, self.to_srt_string())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
