/*!
 * Concurrent transcription of audio segments.
 *
 * Each segment is sent to the provider independently, with a bounded number
 * of requests in flight and retries for transient failures. A segment that
 * still fails is skipped; the job carries on with the others.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use crate::app_config::TranscriptionConfig;
use crate::errors::ProviderError;
use crate::file_utils::FileManager;
use crate::providers::{Transcription, TranscriptionProvider};
use crate::subtitle_processor::{format_srt, parse_srt_string, SubtitleEntry};
use crate::timeline::{ProgressEvent, ProgressReporter, SegmentTranscript};
use crate::timestamp;

/// Render a segment's transcript as SRT, timed relative to the segment start
///
/// Returns `None` when the transcript has no usable timed text.
pub fn render_segment_srt(transcription: &Transcription) -> Option<String> {
    let entries: Vec<SubtitleEntry> = transcription
        .segments
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            SubtitleEntry::new(
                i + 1,
                timestamp::seconds_to_ms(seg.start),
                timestamp::seconds_to_ms(seg.end),
                seg.text.trim().to_string(),
            )
        })
        .collect();

    let srt = format_srt(&entries);
    if srt.is_empty() { None } else { Some(srt) }
}

/// Tuning for a batch of transcription requests
#[derive(Debug, Clone)]
pub struct TranscriptionOptions {
    /// Requests in flight at once
    pub concurrent_requests: usize,
    /// Extra attempts after the first failure
    pub retry_count: u32,
    /// Delay before the first retry, doubled each time
    pub retry_backoff_ms: u64,
    /// Write `<segment>.txt` when only untimed text comes back
    pub save_plain_text_fallback: bool,
}

impl Default for TranscriptionOptions {
    fn default() -> Self {
        Self::from(&TranscriptionConfig::default())
    }
}

impl From<&TranscriptionConfig> for TranscriptionOptions {
    fn from(config: &TranscriptionConfig) -> Self {
        Self {
            concurrent_requests: config.concurrent_requests.max(1),
            retry_count: config.retry_count,
            retry_backoff_ms: config.retry_backoff_ms,
            save_plain_text_fallback: config.save_plain_text_fallback,
        }
    }
}

/// What came out of transcribing a set of segments
#[derive(Debug, Default)]
pub struct TranscriptionReport {
    /// Usable transcripts in segment order
    pub transcripts: Vec<SegmentTranscript>,
    /// Per-segment subtitle files written
    pub srt_files: Vec<PathBuf>,
    /// Plain-text fallbacks written
    pub text_files: Vec<PathBuf>,
    /// Segments skipped, with the reason
    pub failures: Vec<(String, String)>,
    /// Wall-clock time spent
    pub elapsed: Duration,
}

enum SegmentResult {
    Transcribed { transcript: SegmentTranscript, srt_file: PathBuf },
    TextOnly { text_file: Option<PathBuf>, reason: String },
    Failed { reason: String },
}

/// Sends segments to a provider and collects per-segment subtitles
#[derive(Debug, Clone)]
pub struct TranscriptionService {
    provider: Arc<dyn TranscriptionProvider>,
    options: TranscriptionOptions,
}

impl TranscriptionService {
    pub fn new(provider: Arc<dyn TranscriptionProvider>, options: TranscriptionOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &TranscriptionOptions {
        &self.options
    }

    /// Transcribe one file, retrying transient failures with exponential backoff
    pub async fn transcribe_with_retry(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Transcription, ProviderError> {
        let mut attempt = 0;
        let mut backoff = Duration::from_millis(self.options.retry_backoff_ms);

        loop {
            match self.provider.transcribe(audio_path, language).await {
                Ok(transcription) => return Ok(transcription),
                Err(e) if e.is_retryable() && attempt < self.options.retry_count => {
                    attempt += 1;
                    warn!(
                        "Transcription of {} failed ({}), retry {}/{} in {:?}",
                        audio_path.display(),
                        e,
                        attempt,
                        self.options.retry_count,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Transcribe every segment and write `<segment>.srt` next to each one
    ///
    /// Failed segments are logged and left out. The returned transcripts keep
    /// the order of `files`.
    pub async fn transcribe_segments(
        &self,
        files: &[PathBuf],
        language: Option<&str>,
        reporter: &dyn ProgressReporter,
    ) -> TranscriptionReport {
        let start_time = Instant::now();
        let total = files.len();
        let limit = self.options.concurrent_requests.max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        let failures = Arc::new(Mutex::new(Vec::new()));

        info!("Transcribing {} segment(s) with {} ({} at a time)", total, self.provider.name(), limit);

        let mut results = stream::iter(files.iter().enumerate())
            .map(|(index, path)| {
                let semaphore = semaphore.clone();
                let failures = failures.clone();

                async move {
                    let _permit = semaphore.acquire().await.ok();
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());

                    reporter.report(ProgressEvent::SegmentStarted { index, total, name: name.clone() });
                    let result = self.transcribe_one(path, language).await;

                    let success = matches!(result, SegmentResult::Transcribed { .. });
                    match &result {
                        SegmentResult::Transcribed { .. } => {}
                        SegmentResult::TextOnly { reason, .. } | SegmentResult::Failed { reason } => {
                            error!("Failed to transcribe {}, skipping: {}", name, reason);
                            failures.lock().push((name.clone(), reason.clone()));
                        }
                    }
                    reporter.report(ProgressEvent::SegmentFinished { index, total, name, success });

                    (index, result)
                }
            })
            .buffer_unordered(limit)
            .collect::<Vec<_>>()
            .await;

        results.sort_by_key(|(idx, _)| *idx);

        let mut report = TranscriptionReport::default();
        for (_, result) in results {
            match result {
                SegmentResult::Transcribed { transcript, srt_file } => {
                    report.transcripts.push(transcript);
                    report.srt_files.push(srt_file);
                }
                SegmentResult::TextOnly { text_file: Some(file), .. } => report.text_files.push(file),
                SegmentResult::TextOnly { text_file: None, .. } | SegmentResult::Failed { .. } => {}
            }
        }
        report.failures = std::mem::take(&mut *failures.lock());
        report.elapsed = start_time.elapsed();

        info!(
            "Transcribed {}/{} segment(s) in {:.1}s",
            report.transcripts.len(),
            total,
            report.elapsed.as_secs_f64()
        );
        report
    }

    async fn transcribe_one(&self, path: &Path, language: Option<&str>) -> SegmentResult {
        let transcription = match self.transcribe_with_retry(path, language).await {
            Ok(t) => t,
            Err(e) => return SegmentResult::Failed { reason: e.to_string() },
        };

        let name = path.display().to_string();
        let Some(srt) = render_segment_srt(&transcription) else {
            let reason = ProviderError::EmptyTranscript(name).to_string();
            let text = transcription.text.as_deref().map(str::trim).unwrap_or("");
            if text.is_empty() || !self.options.save_plain_text_fallback {
                return SegmentResult::TextOnly { text_file: None, reason };
            }

            let text_file = FileManager::with_extension(path, "txt");
            return match FileManager::write_to_file(&text_file, &format!("{}\n", text)) {
                Ok(()) => {
                    warn!("Saved untimed transcript to {}", text_file.display());
                    SegmentResult::TextOnly { text_file: Some(text_file), reason }
                }
                Err(e) => SegmentResult::TextOnly { text_file: None, reason: format!("{}; {}", reason, e) },
            };
        };

        let srt_file = FileManager::with_extension(path, "srt");
        if let Err(e) = FileManager::write_to_file(&srt_file, &srt) {
            return SegmentResult::Failed { reason: e.to_string() };
        }
        debug!("Wrote segment subtitles {}", srt_file.display());

        let srt_name = srt_file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| srt_file.display().to_string());

        SegmentResult::Transcribed {
            transcript: SegmentTranscript::new(srt_name, parse_srt_string(&srt)),
            srt_file,
        }
    }
}
