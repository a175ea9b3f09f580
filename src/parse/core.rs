use memchr::memchr;
use thiserror::Error;

/// A record that violates the `key;value` input contract.
/// Malformed records are fatal to the whole run — a silently skipped record
/// would make every aggregate for its key wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("no ';' separator in record {0:?}")]
    MissingSeparator(String),
    #[error("invalid measurement {0:?}: expected -?digits.digit")]
    InvalidValue(String),
}

/// Longest slice echoed back in an error message.
const ERROR_SNIPPET: usize = 64;

fn snippet(bytes: &[u8]) -> String {
    let end = bytes.len().min(ERROR_SNIPPET);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Split one record into key bytes and value bytes at the first `;`.
#[inline]
pub fn split_record(line: &[u8]) -> Result<(&[u8], &[u8]), RecordError> {
    match memchr(b';', line) {
        Some(i) => Ok((&line[..i], &line[i + 1..])),
        None => Err(RecordError::MissingSeparator(snippet(line))),
    }
}

/// Parse a fixed-point value of the lexical form `-?[0-9]+\.[0-9]` into
/// tenths: `"12.3"` → `123`, `"-0.5"` → `-5`.
///
/// Direct digit accumulation, no float parser: integer digits accumulate
/// into an `i64`, the single fractional digit becomes the low decimal digit,
/// and a leading `-` flips the sign after the magnitude is read. Exponents,
/// multi-digit fractions, and thousands separators are outside the input
/// contract and rejected; so is a missing fraction — `"5"` and `"5."` are
/// errors, never `5.0`.
#[inline]
pub fn parse_tenths(bytes: &[u8]) -> Result<i64, RecordError> {
    let digits = match bytes.first() {
        Some(b'-') => &bytes[1..],
        _ => bytes,
    };
    // Shortest admissible magnitude is "d.d".
    if digits.len() < 3 || digits[digits.len() - 2] != b'.' {
        return Err(RecordError::InvalidValue(snippet(bytes)));
    }
    let frac = digits[digits.len() - 1];
    if !frac.is_ascii_digit() {
        return Err(RecordError::InvalidValue(snippet(bytes)));
    }

    let mut magnitude: i64 = 0;
    for &d in &digits[..digits.len() - 2] {
        if !d.is_ascii_digit() {
            return Err(RecordError::InvalidValue(snippet(bytes)));
        }
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add((d - b'0') as i64))
            .ok_or_else(|| RecordError::InvalidValue(snippet(bytes)))?;
    }
    let tenths = magnitude
        .checked_mul(10)
        .and_then(|m| m.checked_add((frac - b'0') as i64))
        .ok_or_else(|| RecordError::InvalidValue(snippet(bytes)))?;

    Ok(if bytes.first() == Some(&b'-') {
        -tenths
    } else {
        tenths
    })
}

/// Split and parse one record in a single step.
#[inline]
pub fn parse_record(line: &[u8]) -> Result<(&[u8], i64), RecordError> {
    let (key, value) = split_record(line)?;
    Ok((key, parse_tenths(value)?))
}
