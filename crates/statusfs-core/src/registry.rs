//! # Name Registry
//!
//! The fixed table of pseudo-files exposed by the `.status` module.
//!
//! Each entry names an engine cell by tag, the accessor used to reach it,
//! whether it may be written, and the notification that follows a write. The
//! table is static; the only runtime structure is a case-insensitive name
//! index built once on first lookup.

use std::collections::HashMap;
use std::sync::atomic::Ordering;

use once_cell::sync::Lazy;

use crate::accessor::{self, Bounds};
use crate::engine::{BoolSetting, EngineState, TextSetting, U32Setting, U64Setting};
use crate::error::{StatusError, StatusResult};
use crate::report;
use crate::types::{AccessMode, PseudoFile, ValueKind};

/// Common prefix of every symbol setting.
pub const SYMBOL_PREFIX: &str = "config_symbol";

/// Reports rendered on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report
{
    /// Aggregate engine statistics
    Statistics,
    /// Per-call-site statistics
    CallStatistics,
}

/// What a pseudo-file reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target
{
    Bool(BoolSetting),
    UInt32(U32Setting, Bounds),
    UInt64(U64Setting),
    Text(TextSetting),
    Report(Report),
}

/// Notification fired after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect
{
    None,
    /// Tell listeners to re-evaluate their logging thresholds
    NotifyVerbosityChange,
    /// Refresh the registry cache immediately
    ForceRegistryRefresh,
    /// Have the symbol subsystem re-read all symbol settings
    ReconfigureSymbols,
}

impl SideEffect
{
    /// Whether the notification also fires when the write itself failed.
    ///
    /// Symbol writes are coalesced by the symbol subsystem, which re-reads
    /// every setting, so it is told about failed writes too. The registry
    /// refresh is requested by any write attempt to its tick setting.
    #[must_use]
    pub fn fires_on_failure(self) -> bool
    {
        matches!(self, Self::ForceRegistryRefresh | Self::ReconfigureSymbols)
    }
}

/// One registered pseudo-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSpec
{
    pub name: &'static str,
    pub target: Target,
    pub mode: AccessMode,
    pub effect: SideEffect,
}

const TICK_BOUNDS: Bounds = Bounds::or_default(1, 1);

const fn rw(name: &'static str, target: Target, effect: SideEffect) -> FileSpec
{
    FileSpec {
        name,
        target,
        mode: AccessMode::ReadWrite,
        effect,
    }
}

const fn ro(name: &'static str, target: Target) -> FileSpec
{
    FileSpec {
        name,
        target,
        mode: AccessMode::ReadOnly,
        effect: SideEffect::None,
    }
}

/// Every pseudo-file, in listing order.
pub static FILES: &[FileSpec] = &[
    rw("config_cache_enable", Target::Bool(BoolSetting::CacheEnable), SideEffect::None),
    rw("config_paging_enable", Target::Bool(BoolSetting::PagingEnable), SideEffect::None),
    rw("config_statistics_fncall", Target::Bool(BoolSetting::CallStatistics), SideEffect::None),
    ro("config_refresh_enable", Target::Bool(BoolSetting::RefreshEnable)),
    rw(
        "config_refresh_tick_period_ms",
        Target::UInt32(U32Setting::RefreshTickPeriodMs, Bounds::or_default(50, 50)),
        SideEffect::None,
    ),
    rw("config_refresh_read", Target::UInt32(U32Setting::RefreshRead, TICK_BOUNDS), SideEffect::None),
    rw("config_refresh_tlb", Target::UInt32(U32Setting::RefreshTlb, TICK_BOUNDS), SideEffect::None),
    rw(
        "config_refresh_proc_partial",
        Target::UInt32(U32Setting::RefreshProcPartial, TICK_BOUNDS),
        SideEffect::None,
    ),
    rw(
        "config_refresh_proc_total",
        Target::UInt32(U32Setting::RefreshProcTotal, TICK_BOUNDS),
        SideEffect::None,
    ),
    rw(
        "config_refresh_registry",
        Target::UInt32(U32Setting::RefreshRegistry, TICK_BOUNDS),
        SideEffect::ForceRegistryRefresh,
    ),
    rw("config_symbol_enable", Target::Bool(BoolSetting::SymbolEnable), SideEffect::ReconfigureSymbols),
    rw("config_symbolcache", Target::Text(TextSetting::SymbolCache), SideEffect::ReconfigureSymbols),
    rw("config_symbolserver", Target::Text(TextSetting::SymbolServer), SideEffect::ReconfigureSymbols),
    rw(
        "config_symbolserver_enable",
        Target::Bool(BoolSetting::SymbolServerEnable),
        SideEffect::ReconfigureSymbols,
    ),
    ro("statistics", Target::Report(Report::Statistics)),
    rw("config_printf_enable", Target::Bool(BoolSetting::PrintfEnable), SideEffect::NotifyVerbosityChange),
    rw("config_printf_v", Target::Bool(BoolSetting::PrintfV), SideEffect::NotifyVerbosityChange),
    rw("config_printf_vv", Target::Bool(BoolSetting::PrintfVv), SideEffect::NotifyVerbosityChange),
    rw("config_printf_vvv", Target::Bool(BoolSetting::PrintfVvv), SideEffect::NotifyVerbosityChange),
    rw(
        "config_process_show_terminated",
        Target::Bool(BoolSetting::ProcessShowTerminated),
        SideEffect::None,
    ),
    ro("native_max_address", Target::UInt64(U64Setting::NativeMaxAddress)),
    ro("statistics_fncall", Target::Report(Report::CallStatistics)),
];

static INDEX: Lazy<HashMap<String, &'static FileSpec>> = Lazy::new(|| {
    let index: HashMap<_, _> = FILES
        .iter()
        .filter(|file| !is_symbol_setting(file.name))
        .map(|file| (file.name.to_ascii_lowercase(), file))
        .collect();
    debug_assert!(FILES.iter().all(|file| is_symbol_setting(file.name) || index.contains_key(file.name)));
    index
});

// Symbol settings, searched on their own once the prefix matches.
static SYMBOL_GROUP: Lazy<Vec<&'static FileSpec>> =
    Lazy::new(|| FILES.iter().filter(|file| is_symbol_setting(file.name)).collect());

/// Find a pseudo-file by case-insensitive name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static FileSpec>
{
    if is_symbol_setting(name) {
        return SYMBOL_GROUP.iter().find(|file| file.name.eq_ignore_ascii_case(name)).copied();
    }
    INDEX.get(name.to_ascii_lowercase().as_str()).copied()
}

/// Whether `name` falls in the symbol settings group.
#[must_use]
pub fn is_symbol_setting(name: &str) -> bool
{
    name.len() >= SYMBOL_PREFIX.len()
        && name.is_char_boundary(SYMBOL_PREFIX.len())
        && name[..SYMBOL_PREFIX.len()].eq_ignore_ascii_case(SYMBOL_PREFIX)
}

fn len_u64(len: usize) -> u64
{
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl FileSpec
{
    /// Encoding of this file's content.
    #[must_use]
    pub fn kind(&self) -> ValueKind
    {
        match self.target {
            Target::Bool(_) => ValueKind::Boolean,
            Target::UInt32(..) => ValueKind::UInt32,
            Target::UInt64(_) => ValueKind::UInt64,
            Target::Text(_) | Target::Report(_) => ValueKind::ByteBuffer,
        }
    }

    /// Current size in bytes.
    ///
    /// Reports are rendered to measure them.
    #[must_use]
    pub fn size(&self, state: &EngineState) -> u64
    {
        if let Some(width) = self.kind().fixed_width() {
            return width;
        }
        match self.target {
            Target::Text(setting) => len_u64(state.text(setting).len()),
            Target::Report(Report::Statistics) => {
                len_u64(report::render_statistics(&state.statistics.snapshot()).len())
            }
            Target::Report(Report::CallStatistics) => len_u64(state.calls.render().map_or(0, |text| text.len())),
            Target::Bool(_) | Target::UInt32(..) | Target::UInt64(_) => 0,
        }
    }

    /// Listing entry for this file.
    #[must_use]
    pub fn describe(&self, state: &EngineState) -> PseudoFile
    {
        PseudoFile::new(self.name, self.size(state), self.mode, self.kind())
    }

    /// Read through the typed accessor for this file.
    ///
    /// ## Errors
    ///
    /// `Invalid` when reading call statistics while they are disabled.
    pub fn read(&self, state: &EngineState, buf: &mut [u8], offset: u64) -> StatusResult<usize>
    {
        let count = match self.target {
            Target::Bool(setting) => accessor::read_bool(state.load_bool(setting), buf, offset),
            Target::UInt32(setting, _) => accessor::read_u32(state.u32_cell(setting).load(Ordering::SeqCst), buf, offset),
            Target::UInt64(setting) => accessor::read_u64(state.u64_cell(setting).load(Ordering::SeqCst), buf, offset),
            Target::Text(setting) => state.text(setting).with_bytes(|bytes| accessor::read_bytes(bytes, buf, offset)),
            Target::Report(Report::Statistics) => {
                let text = report::render_statistics(&state.statistics.snapshot());
                accessor::read_bytes(text.as_bytes(), buf, offset)
            }
            Target::Report(Report::CallStatistics) => {
                let text = report::render_call_statistics(&state.calls)?;
                accessor::read_bytes(text.as_bytes(), buf, offset)
            }
        };
        Ok(count)
    }

    /// Write through the typed accessor for this file.
    ///
    /// Does not check `mode` and does not fire side effects; both are the
    /// caller's job.
    ///
    /// ## Errors
    ///
    /// `Invalid` when the accessor rejects the payload, `NotFound` for targets
    /// that cannot be written at all.
    pub fn write(&self, state: &EngineState, buf: &[u8], offset: u64) -> StatusResult<usize>
    {
        match self.target {
            Target::Bool(setting) => accessor::write_bool(buf, offset, |value| state.store_bool(setting, value)),
            Target::UInt32(setting, bounds) => accessor::write_u32(state.u32_cell(setting), buf, offset, bounds),
            Target::Text(setting) => Ok(accessor::write_text(state.text(setting), buf, offset, true)),
            Target::UInt64(_) | Target::Report(_) => Err(StatusError::NotFound(self.name.to_string())),
        }
    }
}
