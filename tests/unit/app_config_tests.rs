/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use chunkscribe::app_config::{Config, LogLevel, TranscriptionProvider};
use crate::common;

fn config_with_key() -> Config {
    let mut config = Config::default();
    config.transcription.api_key = "test-key".to_string();
    config
}

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "ja");
    assert_eq!(config.transcription.provider, TranscriptionProvider::Groq);
    assert_eq!(config.transcription.get_model(), "whisper-large-v3");
    assert_eq!(config.transcription.get_endpoint(), "https://api.groq.com/openai/v1");
    assert_eq!(config.transcription.concurrent_requests, 2);
    assert_eq!(config.segmentation.chunk_seconds, 600);
    assert!(config.subtitles.lengthen);
    assert_eq!(config.subtitles.min_chars, 45);
    assert_eq!(config.subtitles.join_separator, " ");
    assert_eq!(config.subtitles.reset_threshold_ms, 1000);
    assert!(config.cleanup.delete_segments && config.cleanup.delete_segment_srts && config.cleanup.delete_downloaded_audio);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_providerDefaults_withOpenAI_shouldUseOpenAIModelAndEndpoint() {
    let mut config = Config::default();
    config.transcription.provider = TranscriptionProvider::OpenAI;

    assert_eq!(config.transcription.get_model(), "whisper-1");
    assert_eq!(config.transcription.get_endpoint(), "https://api.openai.com/v1");

    config.transcription.model = "custom-model".to_string();
    assert_eq!(config.transcription.get_model(), "custom-model");
}

/// Test configuration validation
#[test]
fn test_configValidation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = config_with_key();
    assert!(config.validate().is_ok());

    config.language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.language = "auto".to_string();
    assert!(config.validate().is_ok());

    config.transcription.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.transcription.concurrent_requests = 1;

    config.segmentation.chunk_seconds = 0;
    assert!(config.validate().is_err());
    config.segmentation.chunk_seconds = 300;

    // A self-hosted endpoint works without a key
    config.transcription.api_key.clear();
    config.transcription.provider = TranscriptionProvider::Custom;
    assert!(config.validate().is_ok());
}

#[test]
fn test_providerFromStr_withKnownAndUnknownNames_shouldParse() {
    assert_eq!("GROQ".parse::<TranscriptionProvider>().unwrap(), TranscriptionProvider::Groq);
    assert_eq!("openai".parse::<TranscriptionProvider>().unwrap(), TranscriptionProvider::OpenAI);
    assert!("ollama".parse::<TranscriptionProvider>().is_err());
    assert_eq!(TranscriptionProvider::Custom.to_string(), "custom");
}

#[test]
fn test_partialJson_withMissingSections_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(r#"{"language": "en", "subtitles": {"min_chars": 30}}"#)?;

    assert_eq!(config.language, "en");
    assert_eq!(config.subtitles.min_chars, 30);
    assert!(config.subtitles.lengthen);
    assert_eq!(config.transcription.retry_count, 3);
    Ok(())
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let mut changed = created.clone();
    changed.language = "en".to_string();
    changed.save(&path)?;

    let reloaded = Config::from_file(&path)?;
    assert_eq!(reloaded.language, "en");
    Ok(())
}
