/*!
 * SRT timestamp codec.
 *
 * All time arithmetic in the crate goes through integer milliseconds; this
 * module is the only place that converts between those and the
 * `HH:MM:SS,mmm` text form.
 */

use log::warn;

use crate::errors::SubtitleError;

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Format milliseconds as `HH:MM:SS,mmm`
///
/// Hours are padded to two digits but are not capped, so audio longer than
/// 99 hours renders as `100:00:00,000`.
pub fn encode(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Convert fractional seconds to milliseconds, clamping negative and
/// non-finite input to zero
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        if seconds.is_nan() || seconds < 0.0 {
            warn!("Invalid seconds value '{}' received, clamping to 0", seconds);
        }
        return 0;
    }

    (seconds * 1000.0).round() as u64
}

/// Format fractional seconds as `HH:MM:SS,mmm`
pub fn encode_seconds(seconds: f64) -> String {
    encode(seconds_to_ms(seconds))
}

/// Parse `HH:MM:SS,mmm` (or `HH:MM:SS.mmm`) into milliseconds
pub fn try_decode(text: &str) -> Result<u64, SubtitleError> {
    let invalid = || SubtitleError::InvalidTimestamp(text.to_string());
    let trimmed = text.trim();

    let mut parts = trimmed.splitn(3, ':');
    let (Some(hours), Some(minutes), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let (seconds, millis) = rest.split_once([',', '.']).ok_or_else(invalid)?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || !all_digits(minutes) || !all_digits(seconds) || !all_digits(millis) {
        return Err(invalid());
    }
    if millis.len() != 3 {
        return Err(invalid());
    }

    let hours: u64 = hours.parse().map_err(|_| invalid())?;
    let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
    let millis: u64 = millis.parse().map_err(|_| invalid())?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|h| h.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
        .ok_or_else(invalid)
}

/// Parse a timestamp, degrading to 0 on malformed input
pub fn decode(text: &str) -> u64 {
    match try_decode(text) {
        Ok(ms) => ms,
        Err(e) => {
            warn!("Could not parse time string '{}': {}. Returning 0.", text, e);
            0
        }
    }
}
