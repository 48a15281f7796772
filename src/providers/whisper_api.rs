use std::path::Path;
use std::time::Duration;
use async_trait::async_trait;
use serde::Deserialize;
use reqwest::{multipart, Client, StatusCode};
use log::{debug, error};

use crate::errors::ProviderError;
use super::{TranscribedSegment, Transcription, TranscriptionProvider};

/// Client for OpenAI-compatible transcription APIs (Groq, OpenAI, self-hosted)
#[derive(Debug)]
pub struct WhisperApi {
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication, empty for anonymous endpoints
    api_key: String,
    /// Base URL, e.g. `https://api.groq.com/openai/v1`
    endpoint: String,
    /// Model name
    model: String,
}

/// `verbose_json` transcription response
#[derive(Debug, Deserialize)]
struct VerboseTranscriptionResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    segments: Option<Vec<TranscribedSegment>>,
}

impl WhisperApi {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Full URL of the transcription route
    pub fn transcriptions_url(&self) -> String {
        format!("{}/audio/transcriptions", self.endpoint.trim_end_matches('/'))
    }

    fn mime_for(path: &Path) -> &'static str {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_lowercase()).as_deref() {
            Some("wav") => "audio/wav",
            Some("m4a") => "audio/mp4",
            Some("ogg") | Some("opus") => "audio/ogg",
            Some("flac") => "audio/flac",
            Some("webm") => "audio/webm",
            _ => "audio/mpeg",
        }
    }

    fn map_status(status: StatusCode, body: String) -> ProviderError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(body),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(body),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            },
        }
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperApi {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcription, ProviderError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read {}: {}", audio_path.display(), e)))?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(Self::mime_for(audio_path))
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to build multipart body: {}", e)))?;

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment");
        if let Some(language) = language {
            form = form.text("language", language.to_string());
        }

        debug!("Requesting transcription for {} ({})", audio_path.display(), self.model);

        let mut request = self.client.post(self.transcriptions_url()).multipart(form);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Transcription API error ({}): {}", status, error_text);
            return Err(Self::map_status(status, error_text));
        }

        let body: VerboseTranscriptionResponse = response.json().await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(Transcription {
            segments: body.segments.unwrap_or_default(),
            text: body.text,
        })
    }

    fn name(&self) -> String {
        format!("{} @ {}", self.model, self.endpoint)
    }
}
