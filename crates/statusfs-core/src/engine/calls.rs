//! # Call-Site Statistics
//!
//! Optional profiling collector counting calls and time per named call site.
//!
//! Collection is off by default. While disabled, [`CallStatistics::record`]
//! is a cheap atomic load and nothing is stored; [`CallStatistics::render`]
//! returns `None` so readers can tell "not collecting" apart from "empty".

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy)]
struct CallEntry
{
    calls: u64,
    total: Duration,
}

/// Per-call-site counters.
#[derive(Debug, Default)]
pub struct CallStatistics
{
    enabled: AtomicBool,
    entries: Mutex<BTreeMap<String, CallEntry>>,
}

impl CallStatistics
{
    /// Create a collector, optionally already enabled.
    #[must_use]
    pub fn new(enabled: bool) -> Self
    {
        Self {
            enabled: AtomicBool::new(enabled),
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Whether calls are currently being collected.
    #[must_use]
    pub fn is_enabled(&self) -> bool
    {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Turn collection on or off.
    ///
    /// Turning it off discards everything collected so far; turning on an
    /// already running collector keeps its data.
    pub fn set_enabled(&self, enabled: bool)
    {
        let was_enabled = self.enabled.swap(enabled, Ordering::SeqCst);
        if was_enabled && !enabled {
            self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }

    /// Record one call of `name` that took `elapsed`.
    pub fn record(&self, name: &str, elapsed: Duration)
    {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(name.to_string()).or_default();
        entry.calls += 1;
        entry.total += elapsed;
    }

    /// Run `f`, recording its duration under `name`.
    pub fn measure<T>(&self, name: &str, f: impl FnOnce() -> T) -> T
    {
        if !self.is_enabled() {
            return f();
        }
        let start = Instant::now();
        let result = f();
        self.record(name, start.elapsed());
        result
    }

    /// Number of calls recorded for `name`.
    #[must_use]
    pub fn calls(&self, name: &str) -> u64
    {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, |entry| entry.calls)
    }

    /// Render the call table, or `None` while collection is disabled.
    #[must_use]
    pub fn render(&self) -> Option<String>
    {
        if !self.is_enabled() {
            return None;
        }
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = String::with_capacity(256 + entries.len() * 80);
        out.push_str("FUNCTION CALL STATISTICS:\n");
        out.push_str("VALUES IN DECIMAL, TIME IN MICROSECONDS uS\n");
        out.push_str("FUNCTION CALL NAME                     CALLS   TIME AVG        TIME TOTAL\n");
        out.push_str("==========================================================================\n");
        for (name, entry) in entries.iter() {
            let total_us = entry.total.as_micros();
            let avg_us = total_us.checked_div(u128::from(entry.calls)).unwrap_or(0);
            out.push_str(&format!("{name:<32} {:>12} {avg_us:>10} {total_us:>17}\n", entry.calls));
        }
        Some(out)
    }
}
