/*!
 * The timeline pipeline: order → combine → optional merge → serialize.
 *
 * Pure and synchronous. Each stage takes its input by reference and builds a
 * new sequence, so separate jobs can run this concurrently without sharing
 * anything.
 */

use log::{info, warn};

use crate::errors::SubtitleError;
use crate::subtitle_processor::{format_srt, parse_srt_string, SubtitleEntry};
use super::combiner::SegmentCombiner;
use super::merger::SubtitleMerger;
use super::progress::{ProgressEvent, ProgressReporter};
use super::segment::{sort_segments, SegmentTranscript};

/// Final subtitle track produced by the pipeline
#[derive(Debug, Clone)]
pub struct TimelineOutput {
    /// Entries as written, numbered `1..N`
    pub entries: Vec<SubtitleEntry>,

    /// Serialized SRT text
    pub srt: String,

    /// Segments that contributed at least one entry
    pub contributing_segments: usize,

    /// Entries dropped while shifting onto the global clock
    pub dropped_entries: usize,
}

/// Builds one subtitle track out of per-segment transcripts
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    combiner: SegmentCombiner,
    merger: Option<SubtitleMerger>,
}

impl TimelineBuilder {
    /// Builder that combines without merging
    pub fn new(combiner: SegmentCombiner) -> Self {
        Self {
            combiner,
            merger: None,
        }
    }

    /// Enable merging of short entries
    pub fn with_merger(mut self, merger: SubtitleMerger) -> Self {
        self.merger = Some(merger);
        self
    }

    /// Run the full pipeline
    ///
    /// Fails only when no entry at all survives.
    pub fn build(
        &self,
        mut segments: Vec<SegmentTranscript>,
        reporter: &dyn ProgressReporter,
    ) -> Result<TimelineOutput, SubtitleError> {
        sort_segments(&mut segments);

        let combined = self.combiner.combine(&segments);
        reporter.report(ProgressEvent::CombineFinished {
            entries: combined.entries.len(),
            segments: combined.contributing_segments,
        });
        info!(
            "Combined {} of {} segment(s) into {} entries",
            combined.contributing_segments,
            segments.len(),
            combined.entries.len()
        );

        if combined.entries.is_empty() {
            warn!("No usable entries after combining {} segment(s)", segments.len());
            return Err(SubtitleError::NoUsableEntries);
        }

        let entries = match &self.merger {
            Some(merger) => {
                let merged = merger.merge(&combined.entries);
                reporter.report(ProgressEvent::MergeFinished {
                    before: combined.entries.len(),
                    after: merged.len(),
                });
                merged
            }
            None => combined.entries,
        };

        let srt = format_srt(&entries);

        Ok(TimelineOutput {
            entries,
            srt,
            contributing_segments: combined.contributing_segments,
            dropped_entries: combined.dropped_entries,
        })
    }
}

/// Parse SRT text, merge short entries and serialize again
///
/// Returns the new text together with the number of merged blocks.
pub fn lengthen_srt(content: &str, merger: &SubtitleMerger) -> Result<(String, usize), SubtitleError> {
    let entries = parse_srt_string(content);
    if entries.is_empty() {
        return Err(SubtitleError::NoUsableEntries);
    }

    let merged = merger.merge(&entries);
    Ok((format_srt(&merged), merged.len()))
}
