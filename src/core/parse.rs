// Comma-delimited integer list parsing into a `Store`.
// Conversion mirrors C-style literal rules: 0x/0X hex, leading-0 octal, else decimal.
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use crate::core::error::{Error, ErrorKind};
use crate::core::store::Store;

pub const DELIMITER: char = ',';

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseIntFailure {
    /// No digits, a digit outside the detected base, or trailing garbage.
    Invalid,
    /// Syntactically valid but does not fit in an `i32`.
    OutOfRange,
}

impl fmt::Display for ParseIntFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseIntFailure::Invalid => f.write_str("invalid integer literal"),
            ParseIntFailure::OutOfRange => f.write_str("integer out of range"),
        }
    }
}

impl StdError for ParseIntFailure {}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ParseSummary {
    /// Non-empty tokens visited.
    pub tokens: usize,
    pub stored: usize,
    /// Empty segments between, before, or after delimiters.
    pub skipped: usize,
}

/// Splits `input` on `,` and appends every converted token to `store`, in order.
///
/// Stops at the first malformed token or failed append and returns only the
/// error. Entries appended before the failure stay in the store; the caller
/// owns teardown.
pub fn parse_and_store(input: &str, store: &mut Store) -> Result<ParseSummary, Error> {
    let mut summary = ParseSummary::default();
    for token in input.split(DELIMITER) {
        if token.is_empty() {
            summary.skipped += 1;
            continue;
        }
        summary.tokens += 1;
        let value = parse_int(token).map_err(|failure| malformed(token, failure))?;
        store.append(value)?;
        summary.stored += 1;
        tracing::trace!(value, "stored token");
    }
    Ok(summary)
}

/// Converts one token with automatic base detection.
///
/// Accepts one optional `+`/`-` sign and a single trailing newline.
pub fn parse_int(token: &str) -> Result<i32, ParseIntFailure> {
    let (negative, unsigned) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let (radix, digits) = detect_radix(unsigned);

    let digit_len = digits
        .bytes()
        .take_while(|byte| char::from(*byte).is_digit(radix))
        .count();
    if digit_len == 0 {
        return Err(ParseIntFailure::Invalid);
    }

    let mut magnitude: u64 = 0;
    let mut overflow = false;
    for byte in digits[..digit_len].bytes() {
        let digit = u64::from(char::from(byte).to_digit(radix).unwrap_or(0));
        match magnitude
            .checked_mul(u64::from(radix))
            .and_then(|value| value.checked_add(digit))
        {
            Some(value) => magnitude = value,
            None => overflow = true,
        }
    }
    if overflow {
        return Err(ParseIntFailure::OutOfRange);
    }

    let rest = &digits[digit_len..];
    if !rest.is_empty() && rest != "\n" {
        return Err(ParseIntFailure::Invalid);
    }

    let signed = if negative {
        i64::try_from(magnitude).map(|value| -value)
    } else {
        i64::try_from(magnitude)
    };
    signed
        .ok()
        .and_then(|value| i32::try_from(value).ok())
        .ok_or(ParseIntFailure::OutOfRange)
}

fn detect_radix(unsigned: &str) -> (u32, &str) {
    let bytes = unsigned.as_bytes();
    if bytes.first() != Some(&b'0') {
        return (10, unsigned);
    }
    let hex_prefix = matches!(bytes.get(1), Some(b'x' | b'X'))
        && bytes.get(2).is_some_and(|byte| byte.is_ascii_hexdigit());
    if hex_prefix {
        (16, &unsigned[2..])
    } else {
        (8, unsigned)
    }
}

fn malformed(token: &str, failure: ParseIntFailure) -> Error {
    Error::new(ErrorKind::Malformed)
        .with_message(failure.to_string())
        .with_token(token)
        .with_hint("Tokens are decimal, 0x-prefixed hex, or 0-prefixed octal integers.")
        .with_source(failure)
}
