/*!
 * # chunkscribe - long-form audio to subtitles
 *
 * A Rust library that turns long recordings into one continuous SRT file by
 * transcribing fixed-length chunks independently and stitching the results.
 *
 * ## Features
 *
 * - Download remote audio (yt-dlp) or use a local file
 * - Split audio into chunks whose clocks restart at zero (ffmpeg)
 * - Transcribe chunks concurrently with a Whisper-compatible service
 * - Rebuild one global timeline from per-chunk subtitles
 * - Merge short captions into readable blocks
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timestamp`: SRT timestamp encoding and decoding
 * - `subtitle_processor`: Subtitle entries, SRT parsing and serialization
 * - `timeline`: Segment ordering, combining, merging and the pipeline that ties them together
 * - `transcription`: Concurrent per-segment transcription with retries
 * - `providers`: Transcription service clients
 * - `media_tools`: Download and segmentation tools
 * - `file_utils`: File system operations
 * - `app_config`: Configuration management
 * - `app_controller`: Job orchestration
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media_tools;
pub mod providers;
pub mod subtitle_processor;
pub mod timeline;
pub mod timestamp;
pub mod transcription;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, JobSummary};
pub use subtitle_processor::{format_srt, parse_srt_string, SubtitleCollection, SubtitleEntry};
pub use timeline::{SegmentCombiner, SegmentTranscript, SubtitleMerger, TimelineBuilder};
pub use language_utils::{get_language_name, resolve_transcription_language};
pub use errors::{AppError, MediaToolError, ProviderError, SubtitleError};
