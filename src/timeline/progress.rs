/*!
 * Progress reporting for transcription jobs.
 *
 * Stages report checkpoints through an injected `ProgressReporter` instead of
 * touching any shared UI state. Closures and tokio channels both work as
 * reporters.
 */

use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// A checkpoint reached while processing a job
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Transcription of a segment has begun
    SegmentStarted {
        /// Position in processing order (0-based)
        index: usize,
        /// Total number of segments in the job
        total: usize,
        /// Segment name
        name: String,
    },

    /// Transcription of a segment has ended
    SegmentFinished {
        index: usize,
        total: usize,
        name: String,
        /// Whether the segment produced a usable transcript
        success: bool,
    },

    /// All segments are on one timeline
    CombineFinished {
        /// Entries on the combined timeline
        entries: usize,
        /// Segments that contributed at least one entry
        segments: usize,
    },

    /// Short entries have been folded into blocks
    MergeFinished {
        /// Entries before merging
        before: usize,
        /// Blocks after merging
        after: usize,
    },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentStarted { index, total, name } => {
                write!(f, "Transcribing segment {}/{}: {}", index + 1, total, name)
            }
            Self::SegmentFinished { index, total, name, success: true } => {
                write!(f, "Transcribed segment {}/{}: {}", index + 1, total, name)
            }
            Self::SegmentFinished { index, total, name, success: false } => {
                write!(f, "Failed segment {}/{}: {}, skipping", index + 1, total, name)
            }
            Self::CombineFinished { entries, segments } => {
                write!(f, "Combined {} segment(s) into {} entries", segments, entries)
            }
            Self::MergeFinished { before, after } => {
                write!(f, "Lengthened subtitles: {} entries -> {} blocks", before, after)
            }
        }
    }
}

/// Receiver of progress checkpoints
pub trait ProgressReporter: Send + Sync {
    /// Called once per checkpoint, possibly from several tasks at once
    fn report(&self, event: ProgressEvent);
}

impl<F> ProgressReporter for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        self(event)
    }
}

impl ProgressReporter for UnboundedSender<ProgressEvent> {
    fn report(&self, event: ProgressEvent) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.send(event);
    }
}

/// Reporter that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}
