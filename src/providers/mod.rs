/*!
 * Transcription service clients.
 *
 * This module contains the boundary to the external speech-to-text service:
 * - `whisper_api`: OpenAI-compatible `/audio/transcriptions` client (Groq, OpenAI, self-hosted)
 * - `mock`: Scripted provider for tests
 */

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::ProviderError;

/// One timed piece of a transcript, relative to the start of its audio clip
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscribedSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Recognised text
    pub text: String,
}

/// Result of transcribing one audio clip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcription {
    /// Timed segments, possibly empty
    pub segments: Vec<TranscribedSegment>,
    /// Full plain text, when the service returns it
    pub text: Option<String>,
}

/// Common trait for all transcription providers
///
/// Implementations take one audio segment and return the timed text for it,
/// with timestamps relative to that segment's own start.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync + Debug {
    /// Transcribe one audio file
    ///
    /// # Arguments
    /// * `audio_path` - The audio segment to send
    /// * `language` - ISO 639-1 code, or `None` for auto-detection
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcription, ProviderError>;

    /// Human-readable provider name for logs
    fn name(&self) -> String;
}

pub mod mock;
pub mod whisper_api;
