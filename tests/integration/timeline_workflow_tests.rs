/*!
 * Integration tests for rebuilding one track from segment subtitles
 */

use anyhow::Result;
use std::sync::Arc;
use parking_lot::Mutex;

use chunkscribe::errors::SubtitleError;
use chunkscribe::subtitle_processor::{parse_srt_string, SubtitleCollection};
use chunkscribe::timeline::{
    lengthen_srt, NoProgress, ProgressEvent, SegmentCombiner, SegmentTranscript, SubtitleMerger, TimelineBuilder,
};
use crate::common;

fn load_segments(paths: &[std::path::PathBuf]) -> Result<Vec<SegmentTranscript>> {
    paths
        .iter()
        .map(|p| -> Result<SegmentTranscript> {
            let collection = SubtitleCollection::from_file(p)?;
            let name = p.file_name().unwrap().to_string_lossy().to_string();
            Ok(SegmentTranscript::new(name, collection.entries))
        })
        .collect()
}

#[test]
fn test_timelineBuild_withFilesInReverseOrder_shouldUseOrdinals() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let mut paths = common::create_reset_segments(temp_dir.path(), "talk")?;
    paths.reverse();

    let output = TimelineBuilder::new(SegmentCombiner::new()).build(load_segments(&paths)?, &NoProgress)?;

    let starts: Vec<u64> = output.entries.iter().map(|e| e.start_time_ms).collect();
    assert_eq!(starts, vec![0, 60_000, 125_200, 128_000]);
    assert!(output.srt.starts_with("1\n00:00:00,000 --> 00:01:00,000\nfirst segment opens\n"));
    assert!(output.srt.contains("3\n00:02:05,200 --> 00:02:08,000\nsecond segment opens\n"));
    assert!(output.srt.ends_with("second segment closes\n"));
    Ok(())
}

#[test]
fn test_timelineBuild_withMerger_shouldReportEachStage() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let paths = common::create_reset_segments(temp_dir.path(), "talk")?;
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let reporter = move |event: ProgressEvent| sink.lock().push(event);

    let output = TimelineBuilder::new(SegmentCombiner::new())
        .with_merger(SubtitleMerger::new(45))
        .build(load_segments(&paths)?, &reporter)?;

    // 40 characters after two captions is still short, so the third joins too
    assert_eq!(output.entries.len(), 2);
    assert_eq!(output.entries[0].text, "first segment opens first segment closes second segment opens");
    assert_eq!(output.entries[0].end_time_ms, 128_000);
    assert_eq!(output.entries[1].start_time_ms, 128_000);
    assert_eq!(output.entries[1].end_time_ms, 134_000);

    let events = events.lock();
    assert_eq!(
        *events,
        vec![
            ProgressEvent::CombineFinished { entries: 4, segments: 2 },
            ProgressEvent::MergeFinished { before: 4, after: 2 },
        ]
    );
    Ok(())
}

#[test]
fn test_timelineBuild_withOnlyEmptySegments_shouldFail() {
    let segments = vec![
        SegmentTranscript::new("x_segment_000.srt", parse_srt_string("garbage")),
        SegmentTranscript::new("x_segment_001.srt", vec![]),
    ];

    let result = TimelineBuilder::default().build(segments, &NoProgress);
    assert!(matches!(result, Err(SubtitleError::NoUsableEntries)));
}

#[test]
fn test_timelineOutput_whenReparsed_shouldMatchEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let paths = common::create_reset_segments(temp_dir.path(), "talk")?;

    let output = TimelineBuilder::new(SegmentCombiner::new()).build(load_segments(&paths)?, &NoProgress)?;

    assert_eq!(parse_srt_string(&output.srt), output.entries);
    Ok(())
}

#[test]
fn test_lengthenSrt_withShortCaptions_shouldMergeAndRenumber() -> Result<()> {
    let long = "x".repeat(50);
    let content = common::segment_srt(&[
        (0, 1_000, "Hi"),
        (1_000, 2_000, "there"),
        (5_000, 9_000, long.as_str()),
        (9_000, 10_000, "bye"),
    ]);

    let (lengthened, blocks) = lengthen_srt(&content, &SubtitleMerger::new(45))?;

    // The long caption joins the short block, which then closes at 59 characters
    let entries = parse_srt_string(&lengthened);
    assert_eq!(blocks, 2);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, format!("Hi there {}", long));
    assert_eq!(entries[0].end_time_ms, 9_000);
    assert_eq!(entries[1].text, "bye");
    assert_eq!(entries[1].seq_num, 2);

    // Lengthening an already lengthened file changes nothing
    assert_eq!(lengthen_srt(&lengthened, &SubtitleMerger::new(45))?, (lengthened.clone(), 2));
    Ok(())
}
