//! Race time codec
//!
//! Times are stored as little-endian `f32` seconds and shown as `MM:SS.ff`
//! clock text. Decoding rounds to hundredths, so a re-encoded time may differ
//! from the stored float by up to 0.005 seconds. Encoding the decoded text
//! again is stable.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};

use crate::common::{HtError, HtResult};

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Convert stored time bytes to `MM:SS.ff` clock text
///
/// Minutes are zero padded to two digits and are not wrapped into hours.
/// Rounding happens before formatting, so times from 5999.995 s up to
/// 6000 s print as `100:00.00` rather than `99:59.99`.
pub fn decode(bytes: [u8; 4]) -> HtResult<String> {
    let seconds = f32::from_le_bytes(bytes);
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(HtError::InvalidDuration(seconds));
    }

    // Exact in f64: an f32 mantissa times 100 fits in 53 bits
    let hundredths = (f64::from(seconds) * 100.0).round_ties_even() as u64;

    Ok(format!(
        "{:02}:{:02}.{:02}",
        hundredths / 6000,
        hundredths % 6000 / 100,
        hundredths % 100
    ))
}

/// Convert `MM:SS.ffffff` clock text to stored time bytes
pub fn encode(text: &str) -> HtResult<[u8; 4]> {
    let seconds = parse_seconds(text)?;
    Ok((seconds as f32).to_le_bytes())
}

/// Parse clock text into elapsed seconds
///
/// Surrounding whitespace is ignored. The fraction is optional and holds
/// up to six digits (microseconds); minutes may exceed 59.
pub fn parse_seconds(text: &str) -> HtResult<f64> {
    let trimmed = text.trim();
    let mut lexer = Lexer::new(trimmed);

    let minutes = lexer.expect_digits("minutes")?;
    lexer.expect(TokenKind::Colon)?;
    let seconds = lexer.expect_digits("seconds")?;

    let fraction = if lexer.match_token(&TokenKind::Dot)? {
        Some(lexer.expect_digits("fraction")?)
    } else {
        None
    };
    lexer.expect(TokenKind::Eof)?;

    let minutes: u64 = minutes
        .parse()
        .map_err(|_| HtError::malformed_duration(trimmed, "minutes out of range"))?;

    if seconds.len() > 2 {
        return Err(HtError::malformed_duration(trimmed, "seconds must be at most 2 digits"));
    }
    let seconds: u64 = seconds
        .parse()
        .map_err(|_| HtError::malformed_duration(trimmed, "invalid seconds"))?;
    if seconds >= 60 {
        return Err(HtError::malformed_duration(trimmed, "seconds must be below 60"));
    }

    let micros = match fraction {
        Some(digits) if digits.len() > 6 => {
            return Err(HtError::malformed_duration(trimmed, "fraction must be at most 6 digits"));
        }
        Some(digits) => format!("{digits:0<6}")
            .parse::<u64>()
            .map_err(|_| HtError::malformed_duration(trimmed, "invalid fraction"))?,
        None => 0,
    };

    let whole = minutes
        .checked_mul(60)
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(MICROS_PER_SECOND))
        .and_then(|us| us.checked_add(micros))
        .ok_or_else(|| HtError::malformed_duration(trimmed, "minutes out of range"))?;

    Ok(whole as f64 / MICROS_PER_SECOND as f64)
}
