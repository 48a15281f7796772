/*!
 * Tests for language code resolution
 */

use chunkscribe::language_utils::{get_language_name, is_auto_detect, resolve_transcription_language};

#[test]
fn test_resolve_withTwoLetterCode_shouldKeepIt() {
    assert_eq!(resolve_transcription_language("ja").unwrap(), Some("ja".to_string()));
    assert_eq!(resolve_transcription_language(" EN ").unwrap(), Some("en".to_string()));
}

#[test]
fn test_resolve_withThreeLetterCodes_shouldMapToTwoLetters() {
    assert_eq!(resolve_transcription_language("jpn").unwrap(), Some("ja".to_string()));
    assert_eq!(resolve_transcription_language("fre").unwrap(), Some("fr".to_string()));
    assert_eq!(resolve_transcription_language("deu").unwrap(), Some("de".to_string()));
}

#[test]
fn test_resolve_withAuto_shouldReturnNone() {
    assert!(is_auto_detect("auto"));
    assert!(is_auto_detect(""));
    assert_eq!(resolve_transcription_language("AUTO").unwrap(), None);
}

#[test]
fn test_resolve_withUnknownCode_shouldFail() {
    assert!(resolve_transcription_language("xx").is_err());
    assert!(resolve_transcription_language("english").is_err());
}

#[test]
fn test_languageName_withValidCode_shouldReturnName() {
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert_eq!(get_language_name("auto").unwrap(), "Auto-detect");
}
