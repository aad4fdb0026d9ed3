//! Hand-rolled decoding of ABI return values.
//!
//! Upstream payloads are untrusted: a contract whose selector collides with
//! `name()` may return anything. Decoding never panics and never reads out of
//! bounds, malformed input becomes `None` or an empty string.

use std::fmt;

use num_bigint::BigUint;
use web3::types::U256;

/// Size of an ABI word in bytes.
pub const WORD: usize = 32;

/// Largest integer an offset or length may take (2^53 - 1). Anything above is
/// treated as malformed rather than as a real position in the payload.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Decode `0x`-prefixed hex text into bytes. Returns `None` for a missing
/// prefix, an odd number of digits or non-hex characters.
pub fn decode_hex(raw: &str) -> Option<Vec<u8>> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))?;
    hex::decode(digits).ok()
}

/// True for an empty payload or one made only of zero bytes.
pub fn is_blank(data: &[u8]) -> bool {
    data.iter().all(|b| *b == 0)
}

/// A decoded unsigned integer. Values that fit one ABI word stay a `U256`,
/// anything wider is kept at full precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uint {
    Word(U256),
    Wide(BigUint),
}

impl Uint {
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Uint::Word(v) if *v <= U256::from(u64::MAX) => Some(v.low_u64()),
            _ => None,
        }
    }
}

impl fmt::Display for Uint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uint::Word(v) => write!(f, "{}", v),
            Uint::Wide(v) => write!(f, "{}", v),
        }
    }
}

/// Interpret `data` as a big-endian unsigned integer of any width. Short
/// values are fine, leading zero padding is ignored.
pub fn decode_uint(data: &[u8]) -> Option<Uint> {
    if data.is_empty() {
        return None;
    }
    let first = data.iter().position(|b| *b != 0).unwrap_or(data.len());
    let significant = &data[first..];
    if significant.len() > WORD {
        return Some(Uint::Wide(BigUint::from_bytes_be(significant)));
    }
    Some(Uint::Word(U256::from_big_endian(significant)))
}

/// Read one word at `at` as a position/length inside the payload.
fn word_as_index(data: &[u8], at: usize) -> Option<usize> {
    let end = at.checked_add(WORD)?;
    let value = match decode_uint(data.get(at..end)?)? {
        Uint::Word(v) => v,
        Uint::Wide(_) => return None,
    };
    if value > U256::from(MAX_SAFE_INTEGER) {
        return None;
    }
    usize::try_from(value.low_u64()).ok()
}

/// Decode a single dynamic `string` return value.
///
/// Layout: word 0 holds the byte offset of the length word, the length word
/// holds the byte count, the string bytes follow. Trailing NULs are stripped
/// and invalid UTF-8 is replaced rather than rejected.
pub fn decode_dynamic_string(data: &[u8]) -> String {
    decode_string_parts(data).unwrap_or_default()
}

fn decode_string_parts(data: &[u8]) -> Option<String> {
    if data.len() < 2 * WORD {
        return None;
    }
    let offset = word_as_index(data, 0)?;
    let start = offset.checked_add(WORD)?;
    if start > data.len() {
        return None;
    }
    let length = word_as_index(data, offset)?;
    let end = start.checked_add(length)?;
    if end > data.len() {
        return None;
    }

    let mut bytes = &data[start..end];
    while let [rest @ .., 0] = bytes {
        bytes = rest;
    }
    Some(String::from_utf8_lossy(bytes).into_owned())
}
