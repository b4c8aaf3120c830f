//! Tests for the typed accessors

use std::sync::atomic::{AtomicU32, Ordering};

use statusfs_core::accessor::{
    read_bool, read_bytes, read_u32, read_u64, write_bool, write_text, write_u32, Bounds,
};
use statusfs_core::engine::TextBuffer;

#[test]
fn test_read_bool_window()
{
    let mut buf = [0u8; 4];
    assert_eq!(read_bool(true, &mut buf, 0), 1);
    assert_eq!(buf[0], b'1');
    assert_eq!(read_bool(false, &mut buf, 0), 1);
    assert_eq!(buf[0], b'0');
    assert_eq!(read_bool(true, &mut buf, 1), 0);
    assert_eq!(read_bool(true, &mut [], 0), 0);
}

#[test]
fn test_read_u32_partial()
{
    let mut buf = [0u8; 2];
    assert_eq!(read_u32(0x1234_abcd, &mut buf, 1), 2);
    assert_eq!(&buf, b"23");

    let mut buf = [0u8; 16];
    assert_eq!(read_u32(0x32, &mut buf, 0), 8);
    assert_eq!(&buf[..8], b"00000032");
    assert_eq!(read_u32(0x32, &mut buf, 6), 2);
    assert_eq!(&buf[..2], b"32");
    assert_eq!(read_u32(0x32, &mut buf, 8), 0);
}

#[test]
fn test_read_u64_width()
{
    let mut buf = [0u8; 32];
    assert_eq!(read_u64(0x1_0000_0000, &mut buf, 0), 16);
    assert_eq!(&buf[..16], b"0000000100000000");
    assert_eq!(read_u64(0, &mut buf, u64::MAX), 0);
}

#[test]
fn test_read_bytes_offsets()
{
    let mut buf = [0u8; 3];
    assert_eq!(read_bytes(b"hello", &mut buf, 3), 2);
    assert_eq!(&buf[..2], b"lo");
    assert_eq!(read_bytes(b"hello", &mut buf, 5), 0);
    assert_eq!(read_bytes(b"hello", &mut buf, 500), 0);
}

#[test]
fn test_write_bool_rules()
{
    let mut stored = None;
    assert_eq!(write_bool(b"1\n", 0, |v| stored = Some(v)), Ok(2));
    assert_eq!(stored, Some(true));

    let mut stored = None;
    assert_eq!(write_bool(b"0", 0, |v| stored = Some(v)), Ok(1));
    assert_eq!(stored, Some(false));

    let mut stored = None;
    assert!(write_bool(b"1", 1, |v| stored = Some(v)).unwrap_err().is_invalid());
    assert_eq!(stored, None);

    assert_eq!(write_bool(b"", 5, |v| stored = Some(v)), Ok(0));
    assert_eq!(stored, None);
}

#[test]
fn test_write_u32_text_and_bounds()
{
    let cell = AtomicU32::new(0x64);
    assert_eq!(write_u32(&cell, b"3e8\n", 0, Bounds::or_default(50, 50)), Ok(4));
    assert_eq!(cell.load(Ordering::SeqCst), 0x3e8);

    // Below minimum with a default: default is stored
    assert_eq!(write_u32(&cell, &0u32.to_le_bytes(), 0, Bounds::or_default(50, 50)), Ok(4));
    assert_eq!(cell.load(Ordering::SeqCst), 50);

    // Below minimum without a default: rejected, cell untouched
    assert!(write_u32(&cell, b"0", 0, Bounds::at_least(1)).unwrap_err().is_invalid());
    assert_eq!(cell.load(Ordering::SeqCst), 50);

    // Not at offset 0
    assert!(write_u32(&cell, b"ff", 2, Bounds::at_least(1)).unwrap_err().is_invalid());
    assert_eq!(cell.load(Ordering::SeqCst), 50);

    // Empty payload is a no-op
    assert_eq!(write_u32(&cell, b"", 3, Bounds::at_least(1)), Ok(0));
}

#[test]
fn test_write_text_trims_and_truncates()
{
    let buffer = TextBuffer::new(16, "old");
    assert_eq!(write_text(&buffer, b"C:\\symbols\r\n", 0, true), 12);
    assert_eq!(buffer.to_string_lossy(), "C:\\symbols");

    // Untrimmed keeps whitespace
    assert_eq!(write_text(&buffer, b"x \n", 0, false), 3);
    assert_eq!(buffer.to_string_lossy(), "x \n");

    // Truncated to capacity - 1
    assert_eq!(write_text(&buffer, b"0123456789abcdefghij", 0, true), 15);
    assert_eq!(buffer.to_string_lossy(), "0123456789abcde");

    // Splice at an offset replaces the tail
    assert_eq!(write_text(&buffer, b"XY", 4, true), 2);
    assert_eq!(buffer.to_string_lossy(), "0123XY");

    // Offset past capacity transfers nothing
    assert_eq!(write_text(&buffer, b"Z", 15, true), 0);
    assert_eq!(write_text(&buffer, b"", 0, true), 0);
    assert_eq!(buffer.to_string_lossy(), "0123XY");
}

#[test]
fn test_write_text_pads_gap_with_spaces()
{
    let buffer = TextBuffer::new(16, "0123XY");
    assert_eq!(write_text(&buffer, b"Z", 8, true), 1);
    assert_eq!(buffer.to_string_lossy(), "0123XY  Z");

    // Padding alone is trimmed away again
    assert_eq!(write_text(&buffer, b"\n", 12, true), 1);
    assert_eq!(buffer.to_string_lossy(), "0123XY  Z");
}

#[test]
fn test_write_text_stops_at_nul()
{
    let buffer = TextBuffer::new(32, "");
    assert_eq!(write_text(&buffer, b"srv\0garbage", 0, true), 11);
    assert_eq!(buffer.to_string_lossy(), "srv");
}
