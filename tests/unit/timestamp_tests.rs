/*!
 * Tests for the SRT timestamp codec
 */

use chunkscribe::errors::SubtitleError;
use chunkscribe::timestamp::{decode, encode, encode_seconds, seconds_to_ms, try_decode};

#[test]
fn test_encode_withLargeValue_shouldPadAllComponents() {
    assert_eq!(encode(5_025_678), "01:23:45,678");
    assert_eq!(encode(125_200), "00:02:05,200");
    assert_eq!(encode(999), "00:00:00,999");
}

#[test]
fn test_encode_withMoreThan99Hours_shouldKeepAllHourDigits() {
    assert_eq!(encode(100 * 3_600_000), "100:00:00,000");
}

#[test]
fn test_encodeSeconds_withFractionalSeconds_shouldRoundToMillis() {
    assert_eq!(encode_seconds(1.2345), "00:00:01,235");
    assert_eq!(encode_seconds(600.0), "00:10:00,000");
    assert_eq!(seconds_to_ms(0.0004), 0);
}

#[test]
fn test_encodeSeconds_withInvalidInput_shouldClampToZero() {
    assert_eq!(encode_seconds(-3.0), "00:00:00,000");
    assert_eq!(encode_seconds(f64::NAN), "00:00:00,000");
    assert_eq!(seconds_to_ms(f64::NEG_INFINITY), 0);
}

#[test]
fn test_decode_withEitherSeparator_shouldParse() {
    assert_eq!(try_decode("01:23:45,678"), Ok(5_025_678));
    assert_eq!(try_decode("01:23:45.678"), Ok(5_025_678));
    assert_eq!(try_decode(" 00:00:01,000 "), Ok(1_000));
}

#[test]
fn test_decode_withMalformedInput_shouldReturnZero() {
    assert_eq!(decode("garbage"), 0);
    assert_eq!(decode("00:61:00,000"), 0);
    assert_eq!(decode("00:00:00,12"), 0);
    assert!(matches!(try_decode("1:2"), Err(SubtitleError::InvalidTimestamp(_))));
}

#[test]
fn test_roundTrip_overTenHours_shouldBeLossless() {
    for ms in (0..36_000_000u64).step_by(104_729) {
        assert_eq!(decode(&encode(ms)), ms, "round trip failed for {}", ms);
    }
}
