/*!
 * Segment identity and ordering.
 *
 * The segmenter encodes each chunk's position in its file name
 * (`talk_segment_007.mp3`, `talk_min3.srt`, ...). The ordinal recovered from
 * that name is the only ordering signal used when stitching segments back
 * together; directory listing order is never trusted.
 */

use std::cmp::Ordering;
use std::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

use crate::subtitle_processor::SubtitleEntry;

static ORDINAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:segment_|segment|_min)(\d+)(?:\.[a-z0-9]+)?$").unwrap()
});

/// Extract the segment ordinal from a file name or path
pub fn segment_ordinal(name: &str) -> Option<u32> {
    let basename = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());

    ORDINAL_REGEX
        .captures(&basename)
        .and_then(|caps| caps[1].parse::<u32>().ok())
}

/// One segment's transcript, ready to be placed on the global timeline
#[derive(Debug, Clone)]
pub struct SegmentTranscript {
    /// Name of the source chunk (file name or path)
    pub name: String,

    /// Position recovered from the name, `None` when the name carries none
    pub ordinal: Option<u32>,

    /// Entries on the segment's own clock
    pub entries: Vec<SubtitleEntry>,
}

impl SegmentTranscript {
    /// Build a transcript, deriving the ordinal from `name`
    pub fn new(name: impl Into<String>, entries: Vec<SubtitleEntry>) -> Self {
        let name = name.into();
        let ordinal = segment_ordinal(&name);
        if ordinal.is_none() {
            warn!("Could not extract segment number from '{}'. Assigning last sort order.", name);
        }

        Self { name, ordinal, entries }
    }

    /// Build a transcript with an explicitly supplied ordinal
    pub fn with_ordinal(name: impl Into<String>, ordinal: Option<u32>, entries: Vec<SubtitleEntry>) -> Self {
        Self {
            name: name.into(),
            ordinal,
            entries,
        }
    }

    /// Ordering key: known ordinals ascending, unknown ordinals last, names
    /// break ties
    pub fn order_cmp(&self, other: &Self) -> Ordering {
        match (self.ordinal, other.ordinal) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
        .then_with(|| self.name.cmp(&other.name))
    }
}

/// Sort segments into timeline order
pub fn sort_segments(segments: &mut [SegmentTranscript]) {
    segments.sort_by(|a, b| a.order_cmp(b));
}
