//! # Typed Accessors
//!
//! Positioned read/write primitives for the value kinds a pseudo-file can
//! hold. Every function takes the caller's buffer and a byte offset, exactly
//! like a positioned file read or write, and returns the number of bytes
//! transferred.
//!
//! ## Encodings
//!
//! | kind | read | write |
//! |---|---|---|
//! | boolean | `'1'` / `'0'` | byte 0 at offset 0: `0x00` or `'0'` is false, anything else true |
//! | u32 | `%08x` | hex text at offset 0, first eight bytes |
//! | u64 | `%016x` | read-only |
//! | bytes | raw content | spliced at offset (gaps padded with spaces), truncated to capacity |
//!
//! ## Partial I/O
//!
//! - Reads copy `min(buf.len(), size - offset)` bytes; an offset at or past
//!   the end reads zero bytes and succeeds.
//! - An empty buffer is always a successful no-op.
//! - Boolean and integer writes must start at offset 0. The whole payload is
//!   reported as accepted so that tools appending a newline see a complete
//!   write.

use std::cmp::min;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::engine::TextBuffer;
use crate::error::{StatusError, StatusResult};

/// Width of a u32 rendered as hex text.
pub const U32_TEXT_WIDTH: usize = 8;
/// Width of a u64 rendered as hex text.
pub const U64_TEXT_WIDTH: usize = 16;

/// Lower bound of an integer setting and what to store instead of a value below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds
{
    /// Smallest value that may be stored
    pub min: u32,
    /// Stored instead of a value below `min`; `None` rejects such writes
    pub default: Option<u32>,
}

impl Bounds
{
    /// Values below `min` are rejected.
    #[must_use]
    pub const fn at_least(min: u32) -> Self
    {
        Self { min, default: None }
    }

    /// Values below `min` are replaced by `default`.
    #[must_use]
    pub const fn or_default(min: u32, default: u32) -> Self
    {
        Self {
            min,
            default: Some(default),
        }
    }

    /// The value to store for `value`, or `None` if it must be rejected.
    #[must_use]
    pub fn apply(self, value: u32) -> Option<u32>
    {
        if value >= self.min { Some(value) } else { self.default }
    }
}

/// Copy the window `[offset, offset + buf.len())` of `data` into `buf`.
pub fn read_bytes(data: &[u8], buf: &mut [u8], offset: u64) -> usize
{
    let Ok(offset) = usize::try_from(offset) else {
        return 0;
    };
    if offset >= data.len() {
        return 0;
    }
    let count = min(buf.len(), data.len() - offset);
    buf[..count].copy_from_slice(&data[offset..offset + count]);
    count
}

/// Read a boolean as a single ASCII digit.
pub fn read_bool(value: bool, buf: &mut [u8], offset: u64) -> usize
{
    read_bytes(&[encode_bool(value)], buf, offset)
}

/// Read a u32 as eight hex digits.
pub fn read_u32(value: u32, buf: &mut [u8], offset: u64) -> usize
{
    read_bytes(format!("{value:0U32_TEXT_WIDTH$x}").as_bytes(), buf, offset)
}

/// Read a u64 as sixteen hex digits.
pub fn read_u64(value: u64, buf: &mut [u8], offset: u64) -> usize
{
    read_bytes(format!("{value:0U64_TEXT_WIDTH$x}").as_bytes(), buf, offset)
}

/// Decode a boolean write and hand the value to `store`.
///
/// `store` is not called for an empty payload or a rejected write.
///
/// ## Errors
///
/// `Invalid` if the payload does not start at offset 0.
pub fn write_bool(buf: &[u8], offset: u64, store: impl FnOnce(bool)) -> StatusResult<usize>
{
    let Some(&first) = buf.first() else {
        return Ok(0);
    };
    if offset != 0 {
        return Err(StatusError::Invalid(format!("boolean write at offset {offset}")));
    }
    store(decode_bool(first));
    Ok(buf.len())
}

/// Decode a hex integer write, apply `bounds` and store it atomically.
///
/// ## Errors
///
/// `Invalid` if the payload does not start at offset 0, or if the value is
/// below `bounds.min` and no default is declared. The cell is left untouched.
pub fn write_u32(cell: &AtomicU32, buf: &[u8], offset: u64, bounds: Bounds) -> StatusResult<usize>
{
    if buf.is_empty() {
        return Ok(0);
    }
    if offset != 0 {
        return Err(StatusError::Invalid(format!("integer write at offset {offset}")));
    }
    let parsed = parse_hex(buf, U32_TEXT_WIDTH);
    // At most eight hex digits were consumed.
    let value = u32::try_from(parsed).unwrap_or(u32::MAX);
    let stored = bounds.apply(value).ok_or_else(|| {
        StatusError::Invalid(format!("value 0x{value:x} is below the minimum 0x{:x}", bounds.min))
    })?;
    cell.store(stored, Ordering::SeqCst);
    Ok(buf.len())
}

/// Splice `buf` into a text buffer at `offset`.
///
/// The stored string becomes the old content up to `offset` followed by as
/// much of `buf` as fits, cut at the first NUL in `buf`. A gap between the
/// current end and `offset` is filled with spaces, which restores whitespace
/// trimmed from the end of a previous chunk. With `trim`, trailing ASCII
/// whitespace is removed from the result. Returns the number of payload bytes
/// that fit, before trimming.
pub fn write_text(cell: &TextBuffer, buf: &[u8], offset: u64, trim: bool) -> usize
{
    if buf.is_empty() {
        return 0;
    }
    let max_len = cell.max_len();
    let offset = match usize::try_from(offset) {
        Ok(offset) if offset < max_len => offset,
        _ => return 0,
    };
    cell.update(|content| {
        // Cuts the old tail, or pads up to `offset`
        content.resize(offset, b' ');
        let count = min(buf.len(), max_len - offset);
        let payload = &buf[..count];
        let payload = payload
            .iter()
            .position(|&b| b == 0)
            .map_or(payload, |nul| &payload[..nul]);
        content.extend_from_slice(payload);
        if trim {
            while content.last().is_some_and(u8::is_ascii_whitespace) {
                content.pop();
            }
        }
        count
    })
}

/// ASCII encoding of a boolean.
#[must_use]
pub fn encode_bool(value: bool) -> u8
{
    if value { b'1' } else { b'0' }
}

/// Decode one byte as a boolean: `0x00` and `'0'` are false.
#[must_use]
pub fn decode_bool(byte: u8) -> bool
{
    !matches!(byte, 0 | b'0')
}

/// Parse the first `window` bytes of `text` the way `strtoul(s, NULL, 16)` does.
///
/// The window counts every byte, including leading ASCII whitespace and a
/// `0x`/`0X` prefix, which are skipped; parsing stops at the first non-hex
/// byte. Text without digits parses as 0.
#[must_use]
pub fn parse_hex(text: &[u8], window: usize) -> u64
{
    let mut rest = &text[..min(text.len(), window)];
    while let [first, tail @ ..] = rest {
        if !first.is_ascii_whitespace() {
            break;
        }
        rest = tail;
    }
    if let [b'0', b'x' | b'X', tail @ ..] = rest {
        if tail.first().is_some_and(u8::is_ascii_hexdigit) {
            rest = tail;
        }
    }
    rest.iter()
        .map_while(|&b| char::from(b).to_digit(16))
        .fold(0u64, |acc, digit| (acc << 4) | u64::from(digit))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_parse_hex_like_strtoul()
    {
        assert_eq!(parse_hex(b"00000032", 8), 0x32);
        assert_eq!(parse_hex(b"  ff\n", 8), 0xff);
        assert_eq!(parse_hex(b"0x1A", 8), 0x1a);
        assert_eq!(parse_hex(b"0x", 8), 0);
        assert_eq!(parse_hex(b"zz", 8), 0);
        assert_eq!(parse_hex(&[0, 0, 0, 0], 8), 0);
        assert_eq!(parse_hex(b"123456789", 8), 0x1234_5678);
        assert_eq!(parse_hex(b"0x123456789", 8), 0x12_3456);
        assert_eq!(parse_hex(b"   1234567", 8), 0x12345);
    }

    #[test]
    fn test_bounds_apply()
    {
        assert_eq!(Bounds::at_least(1).apply(0), None);
        assert_eq!(Bounds::at_least(1).apply(7), Some(7));
        assert_eq!(Bounds::or_default(50, 50).apply(10), Some(50));
        assert_eq!(Bounds::or_default(50, 50).apply(0x64), Some(0x64));
    }

    #[test]
    fn test_decode_bool()
    {
        assert!(!decode_bool(b'0'));
        assert!(!decode_bool(0));
        assert!(decode_bool(b'1'));
        assert!(decode_bool(1));
        assert!(decode_bool(b'y'));
    }
}
