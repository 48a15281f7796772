use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::timeline::{DEFAULT_MIN_CHARS, DEFAULT_RESET_THRESHOLD_MS};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Spoken language code (ISO), or "auto" to let the service detect it
    #[serde(default = "default_language")]
    pub language: String,

    /// Transcription service config
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Audio segmentation config
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Subtitle post-processing config
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Intermediate file housekeeping
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Transcription provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    // @provider: Groq hosted Whisper
    #[default]
    Groq,
    // @provider: OpenAI Whisper API
    OpenAI,
    // @provider: Any OpenAI-compatible transcription endpoint
    Custom,
}

impl TranscriptionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Groq => "Groq",
            Self::OpenAI => "OpenAI",
            Self::Custom => "Custom endpoint",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Groq => "groq".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Custom => "custom".to_string(),
        }
    }

    // @returns: Environment variable consulted when no key is configured
    pub fn api_key_env_var(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Custom => "TRANSCRIPTION_API_KEY",
        }
    }

    /// Whether the provider is hosted and refuses anonymous requests
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Custom)
    }
}

// Implement Display trait for TranscriptionProvider
impl std::fmt::Display for TranscriptionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranscriptionProvider
impl std::str::FromStr for TranscriptionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAI),
            "custom" => Ok(Self::Custom),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Transcription service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Transcription provider to use
    #[serde(default)]
    pub provider: TranscriptionProvider,

    /// Model name (e.g., "whisper-large-v3")
    #[serde(default = "String::new")]
    pub model: String,

    /// API key; the provider's environment variable is used when empty
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL (base of the OpenAI-compatible API)
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Maximum number of segments transcribed at once
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff for retries in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Keep the plain transcript as a .txt file when no timed segments come back
    #[serde(default = "default_true")]
    pub save_plain_text_fallback: bool,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            provider: TranscriptionProvider::default(),
            model: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            save_plain_text_fallback: true,
        }
    }
}

impl TranscriptionConfig {
    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if !self.model.is_empty() {
            return self.model.clone();
        }

        match self.provider {
            TranscriptionProvider::Groq => default_groq_model(),
            TranscriptionProvider::OpenAI => default_openai_model(),
            TranscriptionProvider::Custom => default_groq_model(),
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }

        match self.provider {
            TranscriptionProvider::Groq => default_groq_endpoint(),
            TranscriptionProvider::OpenAI => default_openai_endpoint(),
            TranscriptionProvider::Custom => default_custom_endpoint(),
        }
    }

    /// Get the API key, falling back to the provider's environment variable
    pub fn get_api_key(&self) -> String {
        if !self.api_key.is_empty() {
            return self.api_key.clone();
        }

        std::env::var(self.provider.api_key_env_var()).unwrap_or_default()
    }
}

/// Audio segmentation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SegmentationConfig {
    /// Length of each audio chunk in seconds
    #[serde(default = "default_chunk_seconds")]
    pub chunk_seconds: u64,

    /// Timeout for the download and segmentation tools in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            chunk_seconds: default_chunk_seconds(),
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

/// Subtitle post-processing settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Merge short consecutive entries into longer blocks
    #[serde(default = "default_true")]
    pub lengthen: bool,

    /// Blocks shorter than this (in characters) absorb the next entry
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Text inserted between merged captions
    #[serde(default = "default_join_separator")]
    pub join_separator: String,

    /// First-caption start (ms) below which a segment counts as a clock reset
    #[serde(default = "default_reset_threshold_ms")]
    pub reset_threshold_ms: u64,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            lengthen: true,
            min_chars: default_min_chars(),
            join_separator: default_join_separator(),
            reset_threshold_ms: default_reset_threshold_ms(),
        }
    }
}

/// Which intermediate files are removed once a job ends
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CleanupConfig {
    /// Delete the audio chunks produced by segmentation
    #[serde(default = "default_true")]
    pub delete_segments: bool,

    /// Delete audio fetched from a remote locator
    #[serde(default = "default_true")]
    pub delete_downloaded_audio: bool,

    /// Delete the per-segment subtitle files
    #[serde(default = "default_true")]
    pub delete_segment_srts: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            delete_segments: true,
            delete_downloaded_audio: true,
            delete_segment_srts: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "ja".to_string()
}

fn default_concurrent_requests() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_chunk_seconds() -> u64 {
    600 // 10 minute chunks
}

fn default_tool_timeout_secs() -> u64 {
    600
}

fn default_min_chars() -> usize {
    DEFAULT_MIN_CHARS
}

fn default_join_separator() -> String {
    " ".to_string()
}

fn default_reset_threshold_ms() -> u64 {
    DEFAULT_RESET_THRESHOLD_MS
}

fn default_true() -> bool {
    true
}

fn default_groq_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_custom_endpoint() -> String {
    "http://localhost:8000/v1".to_string()
}

fn default_groq_model() -> String {
    "whisper-large-v3".to_string()
}

fn default_openai_model() -> String {
    "whisper-1".to_string()
}

impl Config {
    /// Load the configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Load the configuration, writing the defaults first if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::resolve_transcription_language(&self.language)?;

        if self.transcription.provider.requires_api_key() && self.transcription.get_api_key().is_empty() {
            return Err(anyhow!(
                "Transcription API key is required for {} (set it in the config or {})",
                self.transcription.provider.display_name(),
                self.transcription.provider.api_key_env_var()
            ));
        }

        if self.transcription.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }

        if self.segmentation.chunk_seconds == 0 {
            return Err(anyhow!("chunk_seconds must be greater than 0"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            transcription: TranscriptionConfig::default(),
            segmentation: SegmentationConfig::default(),
            subtitles: SubtitleConfig::default(),
            cleanup: CleanupConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
