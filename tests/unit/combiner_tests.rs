/*!
 * Tests for segment ordering and timeline combination
 */

use chunkscribe::timeline::{segment_ordinal, sort_segments, SegmentCombiner, SegmentTranscript, DEFAULT_RESET_THRESHOLD_MS};
use crate::common::entry;

#[test]
fn test_segmentOrdinal_withKnownPatterns_shouldExtractNumber() {
    assert_eq!(segment_ordinal("talk_segment_007.srt"), Some(7));
    assert_eq!(segment_ordinal("/tmp/out/talk_segment_1000.mp3"), Some(1000));
    assert_eq!(segment_ordinal("lecture_min12.srt"), Some(12));
    assert_eq!(segment_ordinal("Segment3.SRT"), Some(3));
    assert_eq!(segment_ordinal("notes.srt"), None);
}

#[test]
fn test_sortSegments_withShuffledNames_shouldOrderByOrdinalThenName() {
    let mut segments = vec![
        SegmentTranscript::new("talk_segment_010.srt", vec![]),
        SegmentTranscript::new("zz_unnumbered.srt", vec![]),
        SegmentTranscript::new("talk_segment_002.srt", vec![]),
        SegmentTranscript::new("aa_unnumbered.srt", vec![]),
        SegmentTranscript::new("talk_segment_001.srt", vec![]),
    ];
    sort_segments(&mut segments);

    let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "talk_segment_001.srt",
            "talk_segment_002.srt",
            "talk_segment_010.srt",
            "aa_unnumbered.srt",
            "zz_unnumbered.srt",
        ]
    );
}

#[test]
fn test_combine_withClockReset_shouldOffsetByPreviousEnd() {
    let segments = vec![
        SegmentTranscript::new("a_segment_000.srt", vec![entry(0, 60_000, "a1"), entry(60_000, 125_000, "a2")]),
        SegmentTranscript::new("a_segment_001.srt", vec![entry(200, 3_000, "b1"), entry(3_000, 5_000, "b2")]),
    ];

    let combined = SegmentCombiner::new().combine(&segments);

    assert_eq!(combined.entries.len(), 4);
    assert_eq!(combined.entries[2].start_time_ms, 125_200);
    assert_eq!(combined.entries[2].end_time_ms, 128_000);
    assert_eq!(combined.entries[3].end_time_ms, 130_000);
    assert_eq!(combined.contributing_segments, 2);
}

#[test]
fn test_combine_withContinuousClock_shouldNotShift() {
    let segments = vec![
        SegmentTranscript::new("a_segment_000.srt", vec![entry(0, 125_000, "a")]),
        SegmentTranscript::new("a_segment_001.srt", vec![entry(125_300, 130_000, "b")]),
    ];

    let combined = SegmentCombiner::new().combine(&segments);

    assert_eq!(combined.entries[1].start_time_ms, 125_300);
    assert_eq!(combined.entries[1].end_time_ms, 130_000);
}

#[test]
fn test_combine_withThresholdBoundary_shouldTreatThresholdAsContinuous() {
    assert_eq!(DEFAULT_RESET_THRESHOLD_MS, 1000);
    let segments = vec![
        SegmentTranscript::new("a_segment_000.srt", vec![entry(0, 10_000, "a")]),
        SegmentTranscript::new("a_segment_001.srt", vec![entry(1_000, 2_000, "b")]),
        SegmentTranscript::new("a_segment_002.srt", vec![entry(999, 2_000, "c")]),
    ];

    let combined = SegmentCombiner::new().combine(&segments);

    // 1000ms is not below the threshold: unshifted, and it becomes the new reference end
    assert_eq!(combined.entries[1].start_time_ms, 1_000);
    assert_eq!(combined.entries[2].start_time_ms, 2_999);
}

#[test]
fn test_combine_withInvalidShiftedEntry_shouldDropOnlyThatEntry() {
    let segments = vec![
        SegmentTranscript::new("a_segment_000.srt", vec![entry(0, 5_000, "a")]),
        SegmentTranscript::new(
            "a_segment_001.srt",
            vec![entry(100, 900, "ok"), entry(2_000, 2_000, "zero length"), entry(3_000, 4_000, "ok too")],
        ),
    ];

    let combined = SegmentCombiner::new().combine(&segments);

    assert_eq!(combined.entries.len(), 3);
    assert_eq!(combined.dropped_entries, 1);
    let seq: Vec<usize> = combined.entries.iter().map(|e| e.seq_num).collect();
    assert_eq!(seq, vec![1, 2, 3]);
}

#[test]
fn test_combine_withEmptySegments_shouldSkipThem() {
    let segments = vec![
        SegmentTranscript::new("a_segment_000.srt", vec![entry(0, 8_000, "a")]),
        SegmentTranscript::new("a_segment_001.srt", vec![]),
        SegmentTranscript::new("a_segment_002.srt", vec![entry(0, 1_000, "c")]),
    ];

    let combined = SegmentCombiner::new().combine(&segments);

    assert_eq!(combined.entries.len(), 2);
    assert_eq!(combined.entries[1].start_time_ms, 8_000);
    assert_eq!(combined.contributing_segments, 2);
}

#[test]
fn test_combine_withNoSegments_shouldBeEmpty() {
    let combined = SegmentCombiner::new().combine(&[]);
    assert!(combined.entries.is_empty());
    assert_eq!(combined.contributing_segments, 0);
}

#[test]
fn test_combine_withManyResetSegments_shouldKeepStartsMonotonic() {
    let segments: Vec<SegmentTranscript> = (0..20)
        .map(|i| {
            SegmentTranscript::new(
                format!("long_segment_{:03}.srt", i),
                vec![entry(0, 300_000, "start"), entry(300_000, 600_000, "end")],
            )
        })
        .collect();

    let combined = SegmentCombiner::new().combine(&segments);

    assert_eq!(combined.entries.len(), 40);
    assert!(combined.entries.windows(2).all(|w| w[0].start_time_ms <= w[1].start_time_ms));
    assert_eq!(combined.entries.last().map(|e| e.end_time_ms), Some(20 * 600_000));
}
