//! # Engine State
//!
//! The live configuration and counters of the memory introspection engine.
//!
//! The engine owns this state and hands out an `Arc<EngineState>`; the
//! `.status` module only ever reads and writes individual cells. Every cell is
//! atomic (or lock-guarded for text), because readers of the pseudo-files are
//! never excluded while the engine's own threads update the same values.
//!
//! Cells are addressed by small enumerated tags ([`BoolSetting`],
//! [`U32Setting`], [`U64Setting`], [`TextSetting`]) so the static registry
//! table can refer to them without holding references.

pub mod calls;
pub mod statistics;
pub mod text;

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

pub use calls::CallStatistics;
pub use statistics::{EngineStatistics, StatisticsSnapshot};
pub use text::TextBuffer;

/// Bits of the engine flags word.
pub mod flags
{
    /// Include terminated processes in process listings.
    pub const PROCESS_SHOW_TERMINATED: u64 = 1 << 0;
    /// Bypass the physical/page table caches.
    pub const NO_CACHE: u64 = 1 << 1;
    /// Do not resolve paged-out virtual memory.
    pub const NO_PAGING: u64 = 1 << 2;
}

/// Capacity of the local symbol cache path, terminator included.
pub const SYMBOL_CACHE_CAPACITY: usize = 260;
/// Capacity of the symbol server URL, terminator included.
pub const SYMBOL_SERVER_CAPACITY: usize = 512;
/// Default symbol server.
pub const DEFAULT_SYMBOL_SERVER: &str = "https://msdl.microsoft.com/download/symbols";

/// Boolean cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolSetting
{
    /// `flags & PROCESS_SHOW_TERMINATED`
    ProcessShowTerminated,
    /// `!(flags & NO_CACHE)`
    CacheEnable,
    /// `!(flags & NO_PAGING)`
    PagingEnable,
    /// Call-site statistics collection
    CallStatistics,
    /// Background refresh thread running
    RefreshEnable,
    /// Symbol subsystem enabled
    SymbolEnable,
    /// Remote symbol server enabled
    SymbolServerEnable,
    /// Diagnostic output enabled
    PrintfEnable,
    /// Verbose output
    PrintfV,
    /// Extra verbose output
    PrintfVv,
    /// Extra verbose output including raw transport traffic
    PrintfVvv,
}

/// 32-bit integer cells (refresh thread timing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum U32Setting
{
    /// Length of one refresh tick in milliseconds
    RefreshTickPeriodMs,
    /// Ticks between physical memory cache refreshes
    RefreshRead,
    /// Ticks between page table cache refreshes
    RefreshTlb,
    /// Ticks between partial process refreshes
    RefreshProcPartial,
    /// Ticks between full process refreshes
    RefreshProcTotal,
    /// Ticks between registry cache refreshes
    RefreshRegistry,
}

/// 64-bit integer cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum U64Setting
{
    /// Highest physical address of the acquisition device
    NativeMaxAddress,
}

/// Text cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSetting
{
    /// Local symbol cache directory
    SymbolCache,
    /// Symbol server URL
    SymbolServer,
}

/// Initial values for a new [`EngineState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig
{
    pub show_terminated: bool,
    pub cache_enabled: bool,
    pub paging_enabled: bool,
    pub call_statistics: bool,
    pub refresh_enabled: bool,
    pub tick_period_ms: u32,
    pub tick_read: u32,
    pub tick_tlb: u32,
    pub tick_proc_partial: u32,
    pub tick_proc_total: u32,
    pub tick_registry: u32,
    pub verbose: bool,
    pub verbose_v: bool,
    pub verbose_vv: bool,
    pub verbose_vvv: bool,
    pub symbols_enabled: bool,
    pub symbol_server_enabled: bool,
    pub symbol_cache: String,
    pub symbol_server: String,
    pub native_max_address: u64,
}

impl Default for EngineConfig
{
    fn default() -> Self
    {
        Self {
            show_terminated: false,
            cache_enabled: true,
            paging_enabled: true,
            call_statistics: false,
            refresh_enabled: true,
            tick_period_ms: 100,
            tick_read: 5,
            tick_tlb: 50,
            tick_proc_partial: 50,
            tick_proc_total: 150,
            tick_registry: 300,
            verbose: true,
            verbose_v: false,
            verbose_vv: false,
            verbose_vvv: false,
            symbols_enabled: true,
            symbol_server_enabled: true,
            symbol_cache: String::new(),
            symbol_server: DEFAULT_SYMBOL_SERVER.to_string(),
            native_max_address: 0,
        }
    }
}

/// Refresh thread settings.
#[derive(Debug, Default)]
pub struct RefreshSettings
{
    pub enabled: AtomicBool,
    pub tick_period_ms: AtomicU32,
    pub tick_read: AtomicU32,
    pub tick_tlb: AtomicU32,
    pub tick_proc_partial: AtomicU32,
    pub tick_proc_total: AtomicU32,
    pub tick_registry: AtomicU32,
}

/// Diagnostic output levels.
#[derive(Debug, Default)]
pub struct Verbosity
{
    pub enabled: AtomicBool,
    pub v: AtomicBool,
    pub vv: AtomicBool,
    pub vvv: AtomicBool,
}

/// Symbol subsystem settings.
#[derive(Debug)]
pub struct SymbolSettings
{
    pub enabled: AtomicBool,
    pub server_enabled: AtomicBool,
    pub local_cache: TextBuffer,
    pub server: TextBuffer,
}

/// All state the `.status` module can address.
#[derive(Debug)]
pub struct EngineState
{
    flags: AtomicU64,
    pub refresh: RefreshSettings,
    pub verbosity: Verbosity,
    pub symbols: SymbolSettings,
    pub statistics: EngineStatistics,
    pub calls: CallStatistics,
    pub native_max_address: AtomicU64,
}

impl Default for EngineState
{
    fn default() -> Self
    {
        Self::new(&EngineConfig::default())
    }
}

impl EngineState
{
    /// Build engine state from its initial configuration.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self
    {
        let mut bits = 0;
        if config.show_terminated {
            bits |= flags::PROCESS_SHOW_TERMINATED;
        }
        if !config.cache_enabled {
            bits |= flags::NO_CACHE;
        }
        if !config.paging_enabled {
            bits |= flags::NO_PAGING;
        }

        Self {
            flags: AtomicU64::new(bits),
            refresh: RefreshSettings {
                enabled: AtomicBool::new(config.refresh_enabled),
                tick_period_ms: AtomicU32::new(config.tick_period_ms),
                tick_read: AtomicU32::new(config.tick_read),
                tick_tlb: AtomicU32::new(config.tick_tlb),
                tick_proc_partial: AtomicU32::new(config.tick_proc_partial),
                tick_proc_total: AtomicU32::new(config.tick_proc_total),
                tick_registry: AtomicU32::new(config.tick_registry),
            },
            verbosity: Verbosity {
                enabled: AtomicBool::new(config.verbose),
                v: AtomicBool::new(config.verbose_v),
                vv: AtomicBool::new(config.verbose_vv),
                vvv: AtomicBool::new(config.verbose_vvv),
            },
            symbols: SymbolSettings {
                enabled: AtomicBool::new(config.symbols_enabled),
                server_enabled: AtomicBool::new(config.symbol_server_enabled),
                local_cache: TextBuffer::new(SYMBOL_CACHE_CAPACITY, &config.symbol_cache),
                server: TextBuffer::new(SYMBOL_SERVER_CAPACITY, &config.symbol_server),
            },
            statistics: EngineStatistics::default(),
            calls: CallStatistics::new(config.call_statistics),
            native_max_address: AtomicU64::new(config.native_max_address),
        }
    }

    /// Current flags word.
    #[must_use]
    pub fn flags(&self) -> u64
    {
        self.flags.load(Ordering::SeqCst)
    }

    /// Returns `true` if every bit of `mask` is set.
    #[must_use]
    pub fn flag(&self, mask: u64) -> bool
    {
        self.flags() & mask == mask
    }

    /// Atomically set or clear the bits of `mask`, leaving other bits alone.
    pub fn set_flag(&self, mask: u64, on: bool)
    {
        if on {
            self.flags.fetch_or(mask, Ordering::SeqCst);
        } else {
            self.flags.fetch_and(!mask, Ordering::SeqCst);
        }
    }

    /// Current value of a boolean cell.
    #[must_use]
    pub fn load_bool(&self, setting: BoolSetting) -> bool
    {
        match setting {
            BoolSetting::ProcessShowTerminated => self.flag(flags::PROCESS_SHOW_TERMINATED),
            BoolSetting::CacheEnable => !self.flag(flags::NO_CACHE),
            BoolSetting::PagingEnable => !self.flag(flags::NO_PAGING),
            BoolSetting::CallStatistics => self.calls.is_enabled(),
            other => self.bool_cell(other).is_some_and(|cell| cell.load(Ordering::SeqCst)),
        }
    }

    /// Atomically update a boolean cell.
    pub fn store_bool(&self, setting: BoolSetting, value: bool)
    {
        match setting {
            BoolSetting::ProcessShowTerminated => self.set_flag(flags::PROCESS_SHOW_TERMINATED, value),
            BoolSetting::CacheEnable => self.set_flag(flags::NO_CACHE, !value),
            BoolSetting::PagingEnable => self.set_flag(flags::NO_PAGING, !value),
            BoolSetting::CallStatistics => self.calls.set_enabled(value),
            other => {
                if let Some(cell) = self.bool_cell(other) {
                    cell.store(value, Ordering::SeqCst);
                }
            }
        }
    }

    // Dedicated boolean cells; flag bits and the collector are handled by the callers.
    fn bool_cell(&self, setting: BoolSetting) -> Option<&AtomicBool>
    {
        match setting {
            BoolSetting::RefreshEnable => Some(&self.refresh.enabled),
            BoolSetting::SymbolEnable => Some(&self.symbols.enabled),
            BoolSetting::SymbolServerEnable => Some(&self.symbols.server_enabled),
            BoolSetting::PrintfEnable => Some(&self.verbosity.enabled),
            BoolSetting::PrintfV => Some(&self.verbosity.v),
            BoolSetting::PrintfVv => Some(&self.verbosity.vv),
            BoolSetting::PrintfVvv => Some(&self.verbosity.vvv),
            BoolSetting::ProcessShowTerminated
            | BoolSetting::CacheEnable
            | BoolSetting::PagingEnable
            | BoolSetting::CallStatistics => None,
        }
    }

    /// The atomic cell behind a 32-bit setting.
    #[must_use]
    pub fn u32_cell(&self, setting: U32Setting) -> &AtomicU32
    {
        match setting {
            U32Setting::RefreshTickPeriodMs => &self.refresh.tick_period_ms,
            U32Setting::RefreshRead => &self.refresh.tick_read,
            U32Setting::RefreshTlb => &self.refresh.tick_tlb,
            U32Setting::RefreshProcPartial => &self.refresh.tick_proc_partial,
            U32Setting::RefreshProcTotal => &self.refresh.tick_proc_total,
            U32Setting::RefreshRegistry => &self.refresh.tick_registry,
        }
    }

    /// The atomic cell behind a 64-bit setting.
    #[must_use]
    pub fn u64_cell(&self, setting: U64Setting) -> &AtomicU64
    {
        match setting {
            U64Setting::NativeMaxAddress => &self.native_max_address,
        }
    }

    /// The buffer behind a text setting.
    #[must_use]
    pub fn text(&self, setting: TextSetting) -> &TextBuffer
    {
        match setting {
            TextSetting::SymbolCache => &self.symbols.local_cache,
            TextSetting::SymbolServer => &self.symbols.server,
        }
    }
}
