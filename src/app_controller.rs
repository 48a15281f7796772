use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::MediaToolError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::media_tools::{clear_stale_segments, is_remote_locator, ExternalTools, MediaToolkit};
use crate::providers::whisper_api::WhisperApi;
use crate::providers::TranscriptionProvider;
use crate::subtitle_processor::SubtitleCollection;
use crate::timeline::{
    lengthen_srt, ProgressEvent, ProgressReporter, SegmentCombiner, SegmentTranscript, SubtitleMerger,
    TimelineBuilder,
};
use crate::transcription::{TranscriptionOptions, TranscriptionService};

// @module: Application controller for transcription jobs

/// Outcome of a finished job
#[derive(Debug, Clone)]
pub struct JobSummary {
    // @field: Final subtitle file
    pub output_path: PathBuf,
    // @field: Segments the audio was split into (or input files combined)
    pub segments_total: usize,
    // @field: Segments that yielded usable subtitles
    pub segments_transcribed: usize,
    // @field: Entries in the written file
    pub entries_written: usize,
    // @field: Entries dropped while shifting onto the global clock
    pub dropped_entries: usize,
    // @field: Wall-clock duration
    pub elapsed: Duration,
}

// @struct: Progress bar driven by pipeline events
struct ProgressBarReporter {
    bar: ProgressBar,
}

impl ProgressBarReporter {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for ProgressBarReporter {
    fn report(&self, event: ProgressEvent) {
        match &event {
            ProgressEvent::SegmentStarted { total, .. } => {
                self.bar.set_length(*total as u64);
            }
            ProgressEvent::SegmentFinished { success: false, .. } => {
                self.bar.inc(1);
                self.bar.println(event.to_string());
                return;
            }
            ProgressEvent::SegmentFinished { .. } => self.bar.inc(1),
            ProgressEvent::CombineFinished { .. } | ProgressEvent::MergeFinished { .. } => {}
        }
        self.bar.set_message(event.to_string());
    }
}

// @struct: Files a job creates and may have to remove
#[derive(Debug, Default)]
struct JobArtifacts {
    downloaded_audio: Option<PathBuf>,
    segment_audio: Vec<PathBuf>,
    segment_srts: Vec<PathBuf>,
}

/// Main application controller for transcription jobs
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Speech-to-text service
    provider: Arc<dyn TranscriptionProvider>,
    // @field: Download and segmentation tools
    tools: Arc<dyn MediaToolkit>,
}

impl Controller {
    // @method: Create a controller talking to the configured service and local tools
    pub fn with_config(config: Config) -> Result<Self> {
        let transcription = &config.transcription;
        let provider = WhisperApi::new(
            transcription.get_api_key(),
            transcription.get_endpoint(),
            transcription.get_model(),
            transcription.timeout_secs,
        );
        let tools = ExternalTools::new(config.segmentation.tool_timeout_secs);

        Ok(Self::with_components(config, Arc::new(provider), Arc::new(tools)))
    }

    // @method: Create a controller with explicit collaborators
    pub fn with_components(
        config: Config,
        provider: Arc<dyn TranscriptionProvider>,
        tools: Arc<dyn MediaToolkit>,
    ) -> Self {
        Self { config, provider, tools }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Timeline stages as configured
    pub fn timeline_builder(&self) -> TimelineBuilder {
        let subtitles = &self.config.subtitles;
        let builder = TimelineBuilder::new(SegmentCombiner::with_reset_threshold(subtitles.reset_threshold_ms));
        if subtitles.lengthen {
            builder.with_merger(self.merger())
        } else {
            builder
        }
    }

    fn merger(&self) -> SubtitleMerger {
        SubtitleMerger::with_separator(self.config.subtitles.min_chars, self.config.subtitles.join_separator.clone())
    }

    fn check_overwrite(output: &Path, force_overwrite: bool) -> Result<()> {
        if output.exists() && !force_overwrite {
            return Err(anyhow!(
                "Output file already exists: {:?} (use -f to force overwrite)",
                output
            ));
        }
        Ok(())
    }

    /// Transcribe `input` (local audio path or http(s) URL) into one subtitle file
    pub async fn run(&self, input: &str, output: PathBuf, force_overwrite: bool) -> Result<JobSummary> {
        let reporter = ProgressBarReporter::new();
        let result = self.run_with_reporter(input, output, force_overwrite, &reporter).await;
        reporter.finish();
        result
    }

    /// Same as `run`, reporting progress to the given reporter
    pub async fn run_with_reporter(
        &self,
        input: &str,
        output: PathBuf,
        force_overwrite: bool,
        reporter: &dyn ProgressReporter,
    ) -> Result<JobSummary> {
        let start_time = Instant::now();
        Self::check_overwrite(&output, force_overwrite)?;

        let language = language_utils::resolve_transcription_language(&self.config.language)?;
        let out_dir = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        FileManager::ensure_dir(&out_dir)?;
        let stem = FileManager::job_stem(&output);

        let mut artifacts = JobArtifacts::default();
        let result = self
            .process(input, &output, &out_dir, &stem, language.as_deref(), reporter, &mut artifacts)
            .await;
        self.cleanup(&artifacts);

        let mut summary = result?;
        summary.elapsed = start_time.elapsed();
        info!(
            "Wrote {} entries from {}/{} segment(s) to {:?} in {:.1}s",
            summary.entries_written,
            summary.segments_transcribed,
            summary.segments_total,
            summary.output_path,
            summary.elapsed.as_secs_f64()
        );
        Ok(summary)
    }

    #[allow(clippy::too_many_arguments)]
    async fn process(
        &self,
        input: &str,
        output: &Path,
        out_dir: &Path,
        stem: &str,
        language: Option<&str>,
        reporter: &dyn ProgressReporter,
        artifacts: &mut JobArtifacts,
    ) -> Result<JobSummary> {
        // Input resolution
        let audio = if is_remote_locator(input) {
            let dest = FileManager::download_path(out_dir, stem);
            artifacts.downloaded_audio = Some(dest.clone());
            self.tools.fetch(input, &dest).await?
        } else {
            let path = PathBuf::from(input);
            if !path.is_file() {
                return Err(MediaToolError::InputNotFound(input.to_string()).into());
            }
            info!("Using local audio file: {}", path.display());
            path
        };

        // Segmentation
        clear_stale_segments(out_dir, stem)?;
        let segments = self
            .tools
            .segment(&audio, self.config.segmentation.chunk_seconds, out_dir, stem)
            .await?;
        artifacts.segment_audio = segments.clone();

        // Transcription
        let service = TranscriptionService::new(
            self.provider.clone(),
            TranscriptionOptions::from(&self.config.transcription),
        );
        let report = service.transcribe_segments(&segments, language, reporter).await;
        artifacts.segment_srts = report.srt_files.clone();
        for text_file in &report.text_files {
            info!("Untimed transcript kept at {}", text_file.display());
        }
        if report.transcripts.is_empty() {
            return Err(anyhow!("No subtitle files were generated from {} segment(s)", segments.len()));
        }

        // Timeline
        let segments_transcribed = report.transcripts.len();
        let timeline = self
            .timeline_builder()
            .build(report.transcripts, reporter)
            .context("Failed to build the subtitle timeline")?;

        FileManager::write_atomic(output, &timeline.srt)?;

        Ok(JobSummary {
            output_path: output.to_path_buf(),
            segments_total: segments.len(),
            segments_transcribed,
            entries_written: timeline.entries.len(),
            dropped_entries: timeline.dropped_entries,
            elapsed: Duration::ZERO,
        })
    }

    fn cleanup(&self, artifacts: &JobArtifacts) {
        let cleanup = &self.config.cleanup;
        let mut doomed: Vec<&PathBuf> = Vec::new();

        if cleanup.delete_segments {
            doomed.extend(artifacts.segment_audio.iter());
        }
        if cleanup.delete_segment_srts {
            doomed.extend(artifacts.segment_srts.iter());
        }
        if cleanup.delete_downloaded_audio {
            doomed.extend(artifacts.downloaded_audio.iter());
        }

        let removed = FileManager::remove_files(&doomed);
        debug!("Cleanup removed {} intermediate file(s)", removed);
    }

    /// Combine existing per-segment subtitle files into one track
    pub fn combine_files(&self, inputs: &[PathBuf], output: &Path, force_overwrite: bool) -> Result<JobSummary> {
        let start_time = Instant::now();
        Self::check_overwrite(output, force_overwrite)?;

        let mut segments = Vec::with_capacity(inputs.len());
        for path in inputs {
            match SubtitleCollection::from_file(path) {
                Ok(collection) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| path.display().to_string());
                    segments.push(SegmentTranscript::new(name, collection.entries));
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }
        let usable = segments.iter().filter(|s| !s.entries.is_empty()).count();

        let timeline = self
            .timeline_builder()
            .build(segments, &crate::timeline::NoProgress)
            .context("Failed to combine subtitle files")?;
        FileManager::write_atomic(output, &timeline.srt)?;

        Ok(JobSummary {
            output_path: output.to_path_buf(),
            segments_total: inputs.len(),
            segments_transcribed: usable,
            entries_written: timeline.entries.len(),
            dropped_entries: timeline.dropped_entries,
            elapsed: start_time.elapsed(),
        })
    }

    /// Merge short entries of an existing subtitle file
    ///
    /// Returns the number of blocks written.
    pub fn lengthen_file(&self, input: &Path, output: &Path, force_overwrite: bool) -> Result<usize> {
        Self::check_overwrite(output, force_overwrite)?;

        let content = FileManager::read_to_string(input)?;
        let (lengthened, blocks) = lengthen_srt(&content, &self.merger())
            .with_context(|| format!("Failed to lengthen {:?}", input))?;
        FileManager::write_atomic(output, &lengthened)?;

        info!("Lengthened {:?} into {} blocks", output, blocks);
        Ok(blocks)
    }
}
