//! Tests for descriptor types and engine state cells

use std::sync::atomic::Ordering;

use statusfs_core::engine::{flags, TextBuffer};
use statusfs_core::prelude::*;

#[test]
fn test_value_kind_widths()
{
    assert_eq!(ValueKind::Boolean.fixed_width(), Some(1));
    assert_eq!(ValueKind::UInt32.fixed_width(), Some(8));
    assert_eq!(ValueKind::UInt64.fixed_width(), Some(16));
    assert_eq!(ValueKind::ByteBuffer.fixed_width(), None);
}

#[test]
fn test_access_mode_writable()
{
    assert!(AccessMode::ReadWrite.is_writable());
    assert!(!AccessMode::ReadOnly.is_writable());
}

#[test]
fn test_pseudo_file_display()
{
    let file = PseudoFile::new("statistics", 1470, AccessMode::ReadOnly, ValueKind::ByteBuffer);
    let line = format!("{}", file);
    assert!(line.starts_with("r-"));
    assert!(line.ends_with("statistics"));
    assert!(line.contains("1470"));
}

#[test]
fn test_engine_config_defaults()
{
    let state = EngineState::new(&EngineConfig::default());
    assert!(state.load_bool(BoolSetting::CacheEnable));
    assert!(state.load_bool(BoolSetting::PagingEnable));
    assert!(!state.load_bool(BoolSetting::ProcessShowTerminated));
    assert!(state.load_bool(BoolSetting::RefreshEnable));
    assert_eq!(state.u32_cell(U32Setting::RefreshTickPeriodMs).load(Ordering::SeqCst), 100);
    assert_eq!(state.flags(), 0);
}

#[test]
fn test_inverted_flags()
{
    let config = EngineConfig {
        cache_enabled: false,
        ..EngineConfig::default()
    };
    let state = EngineState::new(&config);
    assert!(state.flag(flags::NO_CACHE));
    assert!(!state.load_bool(BoolSetting::CacheEnable));

    state.store_bool(BoolSetting::CacheEnable, true);
    assert!(!state.flag(flags::NO_CACHE));

    state.store_bool(BoolSetting::PagingEnable, false);
    assert!(state.flag(flags::NO_PAGING));
    // Other bits are left alone
    assert!(!state.flag(flags::PROCESS_SHOW_TERMINATED));
}

#[test]
fn test_text_buffer_capacity()
{
    let buffer = TextBuffer::new(8, "0123456789");
    assert_eq!(buffer.max_len(), 7);
    assert_eq!(buffer.to_string_lossy(), "0123456");

    buffer.set("ab\0cd");
    assert_eq!(buffer.to_string_lossy(), "ab");
    assert_eq!(buffer.len(), 2);
    assert!(!buffer.is_empty());
}

#[test]
fn test_call_statistics_collect_only_when_enabled()
{
    let state = EngineState::default();
    state.calls.record("read_physical", std::time::Duration::from_micros(10));
    assert_eq!(state.calls.calls("read_physical"), 0);
    assert!(state.calls.render().is_none());

    state.store_bool(BoolSetting::CallStatistics, true);
    state.calls.record("read_physical", std::time::Duration::from_micros(10));
    let value = state.calls.measure("read_physical", || 7);
    assert_eq!(value, 7);
    assert_eq!(state.calls.calls("read_physical"), 2);
    assert!(state.calls.render().unwrap().contains("read_physical"));

    state.store_bool(BoolSetting::CallStatistics, false);
    state.store_bool(BoolSetting::CallStatistics, true);
    assert_eq!(state.calls.calls("read_physical"), 0);
}
