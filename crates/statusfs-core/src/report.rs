//! # Report Renderer
//!
//! Text reports regenerated on every read: the aggregate engine statistics
//! and the call-site statistics table.
//!
//! The aggregate report has a fixed layout. Every counter is printed as a
//! right-aligned 16-digit hex field, so the rendered length does not depend on
//! the counter values and a listing can report it exactly.

use crate::engine::{CallStatistics, StatisticsSnapshot};
use crate::error::{StatusError, StatusResult};

/// Upper bound for the rendered aggregate report.
pub const STATISTICS_CAPACITY: usize = 0x800;

const LABEL_WIDTH: usize = 32;
const VALUE_WIDTH: usize = 16;
const LINE_WIDTH: usize = LABEL_WIDTH + VALUE_WIDTH;

enum Line<'a>
{
    Heading(&'a str),
    Value(&'a str, u64),
}

/// Render the aggregate statistics report.
#[must_use]
pub fn render_statistics(stats: &StatisticsSnapshot) -> String
{
    let lines = [
        Line::Heading("ENGINE STATISTICS (4kB PAGES / COUNTS - HEX)"),
        Line::Heading("================================================"),
        Line::Heading("PHYSICAL MEMORY:"),
        Line::Value("  READ CACHE HIT:", stats.phys_cache_hit),
        Line::Value("  READ RETRIEVED:", stats.phys_read_success),
        Line::Value("  READ FAIL:", stats.phys_read_fail),
        Line::Value("  WRITE:", stats.phys_write),
        Line::Heading("PAGED VIRTUAL MEMORY:"),
        Line::Value("  READ SUCCESS:", stats.page_read_total()),
        Line::Value("    Prototype:", stats.page_prototype),
        Line::Value("    Transition:", stats.page_transition),
        Line::Value("    DemandZero:", stats.page_demand_zero),
        Line::Value("    VAD:", stats.page_vad),
        Line::Value("    Cache:", stats.page_cache_hit),
        Line::Value("    PageFile:", stats.page_page_file),
        Line::Value("    Compressed:", stats.page_compressed),
        Line::Value("  READ FAIL:", stats.page_fail_total()),
        Line::Value("    Cache:", stats.page_fail_cache_hit),
        Line::Value("    VAD:", stats.page_fail_vad),
        Line::Value("    PageFile:", stats.page_fail_page_file),
        Line::Value("    Compressed:", stats.page_fail_compressed),
        Line::Value("    Other:", stats.page_fail),
        Line::Heading("TLB (PAGE TABLES):"),
        Line::Value("  CACHE HIT:", stats.tlb_cache_hit),
        Line::Value("  RETRIEVED:", stats.tlb_read_success),
        Line::Value("  FAILED:", stats.tlb_read_fail),
        Line::Value("PHYSICAL MEMORY REFRESH:", stats.phys_refresh),
        Line::Value("TLB MEMORY REFRESH:", stats.tlb_refresh),
        Line::Value("PROCESS PARTIAL REFRESH:", stats.process_refresh_partial),
        Line::Value("PROCESS FULL REFRESH:", stats.process_refresh_full),
    ];

    let mut out = String::with_capacity(STATISTICS_CAPACITY);
    for line in &lines {
        let text = match line {
            Line::Heading(text) => format!("{text:<LINE_WIDTH$}\n"),
            Line::Value(label, value) => format!("{label:<LABEL_WIDTH$}{value:>VALUE_WIDTH$x}\n"),
        };
        out.push_str(&text);
    }
    debug_assert!(out.len() <= STATISTICS_CAPACITY, "statistics layout outgrew its bound");
    out
}

/// Render the call-site statistics table.
///
/// ## Errors
///
/// `Invalid` while call statistics are not being collected.
pub fn render_call_statistics(calls: &CallStatistics) -> StatusResult<String>
{
    calls
        .render()
        .ok_or_else(|| StatusError::Invalid("call statistics are disabled".to_string()))
}
