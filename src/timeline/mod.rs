/*!
 * Subtitle timeline reconstruction.
 *
 * Turns independently transcribed segment subtitles into one continuous
 * track:
 *
 * - `segment`: ordinal extraction and ordering of segment transcripts
 * - `combiner`: clock-reset detection and offsetting onto one timeline
 * - `merger`: folding short consecutive entries into readable blocks
 * - `progress`: injected progress reporting
 * - `pipeline`: the stages wired together
 */

pub mod combiner;
pub mod merger;
pub mod pipeline;
pub mod progress;
pub mod segment;

// Re-export main types
pub use combiner::{CombinedTimeline, SegmentCombiner, DEFAULT_RESET_THRESHOLD_MS};
pub use merger::{SubtitleMerger, DEFAULT_MIN_CHARS};
pub use pipeline::{lengthen_srt, TimelineBuilder, TimelineOutput};
pub use progress::{NoProgress, ProgressEvent, ProgressReporter};
pub use segment::{segment_ordinal, sort_segments, SegmentTranscript};
