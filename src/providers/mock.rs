/*!
 * Mock transcription provider for testing.
 *
 * Simulates the speech-to-text service without network access:
 * - Working: returns scripted segments per audio file
 * - Failing: always returns an error
 * - Intermittent: fails every N requests
 * - TextOnly: returns plain text with no timed segments
 * - Empty: returns nothing at all
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{TranscribedSegment, Transcription, TranscriptionProvider};
use crate::errors::ProviderError;

/// Behaviour of the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns the scripted transcript for each file
    Working,
    /// Always errors with a server error
    Failing,
    /// Fails every N requests with a retryable error
    Intermittent { fail_every: usize },
    /// Returns plain text but no segments
    TextOnly,
    /// Returns an empty transcription
    Empty,
    /// Waits before answering
    Slow { delay_ms: u64 },
}

/// Mock transcription provider
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    behavior: MockBehavior,
    /// Transcripts keyed by audio file name
    scripts: Arc<HashMap<String, Vec<TranscribedSegment>>>,
    request_count: Arc<AtomicUsize>,
    /// Languages received, in request order
    languages: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockTranscriber {
    /// Create a new mock with the given behaviour
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            scripts: Arc::new(HashMap::new()),
            request_count: Arc::new(AtomicUsize::new(0)),
            languages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    pub fn text_only() -> Self {
        Self::new(MockBehavior::TextOnly)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Script the transcript returned for a file name
    ///
    /// Each tuple is `(start_secs, end_secs, text)`.
    pub fn with_script(mut self, file_name: &str, segments: &[(f64, f64, &str)]) -> Self {
        let mut scripts = (*self.scripts).clone();
        scripts.insert(
            file_name.to_string(),
            segments
                .iter()
                .map(|(start, end, text)| TranscribedSegment {
                    start: *start,
                    end: *end,
                    text: text.to_string(),
                })
                .collect(),
        );
        self.scripts = Arc::new(scripts);
        self
    }

    /// Number of transcription requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Languages passed to each request
    pub fn languages_seen(&self) -> Vec<Option<String>> {
        self.languages.lock().clone()
    }

    fn scripted(&self, audio_path: &Path) -> Transcription {
        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let segments = self.scripts.get(&file_name).cloned().unwrap_or_else(|| {
            vec![TranscribedSegment {
                start: 0.0,
                end: 2.0,
                text: format!("[TRANSCRIBED] {}", file_name),
            }]
        });
        let text = segments
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ");

        Transcription {
            segments,
            text: Some(text),
        }
    }
}

#[async_trait]
impl TranscriptionProvider for MockTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcription, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.languages.lock().push(language.map(|l| l.to_string()));

        match self.behavior {
            MockBehavior::Working => Ok(self.scripted(audio_path)),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.scripted(audio_path))
                }
            }

            MockBehavior::TextOnly => Ok(Transcription {
                segments: Vec::new(),
                text: Some("plain transcript without timing".to_string()),
            }),

            MockBehavior::Empty => Ok(Transcription::default()),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.scripted(audio_path))
            }
        }
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}
