/*!
 * Stitching independently transcribed segments onto one timeline.
 *
 * Each chunk is normally transcribed as a standalone clip, so its clock
 * restarts at zero. A segment whose first caption starts within the reset
 * threshold is shifted by the end of everything emitted for the previous
 * segment; any other segment is taken to already be on the global clock and
 * is emitted unshifted.
 *
 * A segment that really opens with speech in its first second cannot be told
 * apart from a reset. The heuristic is kept as is so existing inputs keep
 * producing the same output.
 */

use log::{debug, info, warn};

use crate::subtitle_processor::SubtitleEntry;
use super::segment::SegmentTranscript;

/// First-caption start below which a segment is treated as a clock reset
pub const DEFAULT_RESET_THRESHOLD_MS: u64 = 1_000;

/// Result of combining a list of segments
#[derive(Debug, Clone, Default)]
pub struct CombinedTimeline {
    /// Entries on the global clock, numbered `1..N`
    pub entries: Vec<SubtitleEntry>,

    /// Segments that contributed at least one entry
    pub contributing_segments: usize,

    /// Entries discarded because shifting left them with start >= end
    pub dropped_entries: usize,
}

/// Concatenates per-segment entries, correcting per-segment clock resets
#[derive(Debug, Clone)]
pub struct SegmentCombiner {
    reset_threshold_ms: u64,
}

impl Default for SegmentCombiner {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentCombiner {
    /// Combiner with the standard 1000ms reset threshold
    pub fn new() -> Self {
        Self {
            reset_threshold_ms: DEFAULT_RESET_THRESHOLD_MS,
        }
    }

    /// Combiner with a custom reset threshold
    pub fn with_reset_threshold(reset_threshold_ms: u64) -> Self {
        Self { reset_threshold_ms }
    }

    /// Reset threshold in milliseconds
    pub fn reset_threshold_ms(&self) -> u64 {
        self.reset_threshold_ms
    }

    /// Combine segments in the order given
    ///
    /// The caller is responsible for ordering (see `sort_segments`): reset
    /// detection depends on what came before.
    pub fn combine(&self, segments: &[SegmentTranscript]) -> CombinedTimeline {
        let mut combined = CombinedTimeline::default();
        let mut last_segment_end_ms: u64 = 0;

        for segment in segments {
            let Some(first) = segment.entries.first() else {
                warn!("No entries in segment {}, skipping", segment.name);
                continue;
            };

            let offset_ms = if first.start_time_ms < self.reset_threshold_ms {
                info!(
                    "Segment {}: reset detected, applying offset {}ms",
                    segment.name, last_segment_end_ms
                );
                last_segment_end_ms
            } else {
                debug!(
                    "Segment {}: timestamps appear continuous (first start {}ms), no offset",
                    segment.name, first.start_time_ms
                );
                0
            };

            let mut segment_max_end: Option<u64> = None;
            for entry in &segment.entries {
                let seq_num = combined.entries.len() + 1;
                match entry.shifted(offset_ms, seq_num) {
                    Ok(shifted) => {
                        segment_max_end = Some(segment_max_end.map_or(shifted.end_time_ms, |m| m.max(shifted.end_time_ms)));
                        combined.entries.push(shifted);
                    }
                    Err(e) => {
                        warn!(
                            "Segment {}: skipping entry {} after offset {}ms: {}",
                            segment.name, entry.seq_num, offset_ms, e
                        );
                        combined.dropped_entries += 1;
                    }
                }
            }

            match segment_max_end {
                Some(end) => {
                    last_segment_end_ms = end;
                    combined.contributing_segments += 1;
                    debug!("Segment {} processed, last end time now {}ms", segment.name, end);
                }
                None => {
                    warn!("Segment {} produced no valid entries", segment.name);
                }
            }
        }

        combined
    }
}
