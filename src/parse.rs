// src/parse.rs
use crate::aggregate::Tenths;

/// Record separator between the key and the value on every line.
pub const DELIMITER: u8 = b';';

/// Splits a line at the first delimiter. `None` when no delimiter is present.
#[inline]
pub fn split_line(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let idx = line.iter().position(|&b| b == DELIMITER)?;
    Some((&line[..idx], &line[idx + 1..]))
}

/// Structural completeness check for a value substring: an optional sign
/// followed by one or two integer digits, a `.`, and exactly one fractional
/// digit. Guards against truncated numbers before `parse_tenths` indexes
/// fixed positions.
#[inline]
pub fn value_shape_ok(value: &[u8]) -> bool {
    let digits = match value.first() {
        Some(&b'-') => &value[1..],
        _ => value,
    };
    matches!(digits.len(), 3 | 4) && digits[digits.len() - 2] == b'.'
}

/// Converts an ASCII `[-]D.D` or `[-]DD.D` value into signed integer tenths
/// ("23.4" -> 234, "-3.4" -> -34).
///
/// The integer-part width is decided by whether the byte at offset 1 (after
/// the optional sign) is the decimal point; no generic numeric parsing and no
/// allocation happen here. Callers must have established the shape with
/// [`value_shape_ok`] first; anything else yields garbage, not a panic.
#[inline]
pub fn parse_tenths(value: &[u8]) -> Tenths {
    let (digits, negative) = match value.first() {
        Some(&b'-') => (&value[1..], true),
        _ => (value, false),
    };

    let v = if digits[1] == b'.' {
        // D.D
        (digits[0] as Tenths - '0' as Tenths) * 10 + (digits[2] as Tenths - '0' as Tenths)
    } else {
        // DD.D
        (digits[0] as Tenths - '0' as Tenths) * 100
            + (digits[1] as Tenths - '0' as Tenths) * 10
            + (digits[3] as Tenths - '0' as Tenths)
    };

    if negative {
        -v
    } else {
        v
    }
}

/// Applies every structural guard to one raw line and returns the key and the
/// parsed tenths value, or `None` for a line that must be skipped: empty,
/// missing delimiter, empty key, bad value shape, or a key that is not valid
/// UTF-8. A trailing `\r` is stripped first so CRLF input aggregates the same
/// on the sequential and the chunked path.
#[inline]
pub fn parse_line(line: &[u8]) -> Option<(&str, Tenths)> {
    let line = match line.last() {
        Some(&b'\r') => &line[..line.len() - 1],
        _ => line,
    };
    if line.is_empty() {
        return None;
    }

    let (key, value) = split_line(line)?;
    if key.is_empty() || !value_shape_ok(value) {
        return None;
    }

    let key = std::str::from_utf8(key).ok()?;
    Some((key, parse_tenths(value)))
}
