/*!
 * Tests for folding short captions into blocks
 */

use chunkscribe::timeline::{SubtitleMerger, DEFAULT_MIN_CHARS};
use crate::common::entry;

const LONG: &str = "this is a much longer caption exceeding forty five characters total";

#[test]
fn test_merge_withShortLeadingCaptions_shouldFoldLongCaptionIntoBlock() {
    // "Hi there" is still under the threshold when the long caption arrives
    let entries = vec![entry(0, 1_000, "Hi"), entry(1_000, 2_500, "there"), entry(3_000, 8_000, LONG)];

    let merged = SubtitleMerger::new(DEFAULT_MIN_CHARS).merge(&entries);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].text, format!("Hi there {}", LONG));
    assert_eq!(merged[0].start_time_ms, 0);
    assert_eq!(merged[0].end_time_ms, 8_000);
    assert_eq!(merged[0].seq_num, 1);
}

#[test]
fn test_merge_withBlockReachingThreshold_shouldStartNewBlock() {
    let entries = vec![
        entry(0, 1_000, "Hi"),
        entry(1_000, 6_000, LONG),
        entry(6_000, 7_000, "bye"),
        entry(7_000, 8_000, "now"),
    ];

    let merged = SubtitleMerger::new(DEFAULT_MIN_CHARS).merge(&entries);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].text, format!("Hi {}", LONG));
    assert_eq!(merged[0].end_time_ms, 6_000);
    assert_eq!(merged[1].text, "bye now");
    assert_eq!((merged[1].start_time_ms, merged[1].end_time_ms), (6_000, 8_000));
    assert_eq!((merged[0].seq_num, merged[1].seq_num), (1, 2));
}

#[test]
fn test_merge_withOutOfOrderEnds_shouldNeverShrinkBlock() {
    let entries = vec![entry(0, 5_000, "a"), entry(1_000, 2_000, "b")];

    let merged = SubtitleMerger::new(45).merge(&entries);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].end_time_ms, 5_000);
}

#[test]
fn test_merge_withEmptyInput_shouldReturnEmpty() {
    assert!(SubtitleMerger::default().merge(&[]).is_empty());
}

#[test]
fn test_merge_appliedTwice_shouldBeStable() {
    let entries: Vec<_> = (0..30u64)
        .map(|i| entry(i * 1_000, i * 1_000 + 900, &"word ".repeat((i % 7 + 1) as usize)))
        .collect();
    let merger = SubtitleMerger::new(45);

    let once = merger.merge(&entries);
    let twice = merger.merge(&once);

    assert_eq!(once, twice);
}

#[test]
fn test_merge_shouldPreserveTotalCoverage() {
    let entries = vec![entry(0, 500, "a"), entry(500, 900, "b"), entry(900, 1_500, "c")];

    let merged = SubtitleMerger::new(2).merge(&entries);

    assert_eq!(merged.first().map(|e| e.start_time_ms), Some(0));
    assert_eq!(merged.last().map(|e| e.end_time_ms), Some(1_500));
    let joined: Vec<&str> = merged.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(joined.join(" "), "a b c");
}
