//! # Engine Statistics
//!
//! Monotonic counters maintained by the memory engine, and the plain snapshot
//! the report renderer works from.
//!
//! The engine bumps counters with relaxed atomic increments from whichever
//! thread performed the read. A snapshot loads each counter once; counters are
//! independent, so a snapshot taken during heavy traffic can mix values from
//! slightly different instants, but the derived totals are always computed
//! from the snapshot itself and therefore always match its sub-categories.

use std::sync::atomic::{AtomicU64, Ordering};

macro_rules! engine_counters {
    ($($(#[$doc:meta])* $field:ident,)+) => {
        /// Live counters owned by the engine.
        #[derive(Debug, Default)]
        pub struct EngineStatistics
        {
            $($(#[$doc])* pub $field: AtomicU64,)+
        }

        /// Point-in-time copy of [`EngineStatistics`].
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct StatisticsSnapshot
        {
            $($(#[$doc])* pub $field: u64,)+
        }

        impl EngineStatistics
        {
            /// Load every counter once.
            #[must_use]
            pub fn snapshot(&self) -> StatisticsSnapshot
            {
                StatisticsSnapshot {
                    $($field: self.$field.load(Ordering::Relaxed),)+
                }
            }

            /// Overwrite every counter from a snapshot.
            ///
            /// Used by tests and by engines restoring counters after a reset.
            pub fn restore(&self, snapshot: &StatisticsSnapshot)
            {
                $(self.$field.store(snapshot.$field, Ordering::Relaxed);)+
            }
        }
    };
}

engine_counters! {
    /// Physical reads served from the page cache
    phys_cache_hit,
    /// Physical reads fetched from the device
    phys_read_success,
    /// Physical reads that failed
    phys_read_fail,
    /// Physical writes
    phys_write,
    /// Paged reads resolved through a prototype PTE
    page_prototype,
    /// Paged reads resolved from a transition page
    page_transition,
    /// Paged reads resolved as demand-zero pages
    page_demand_zero,
    /// Paged reads resolved through the VAD tree
    page_vad,
    /// Paged reads served from the page cache
    page_cache_hit,
    /// Paged reads resolved from the page file
    page_page_file,
    /// Paged reads resolved from the compressed store
    page_compressed,
    /// Paged reads failing on a cached failure
    page_fail_cache_hit,
    /// Paged reads failing in the VAD tree
    page_fail_vad,
    /// Paged reads failing on the page file
    page_fail_page_file,
    /// Paged reads failing in the compressed store
    page_fail_compressed,
    /// Paged reads failing for any other reason
    page_fail,
    /// Page table reads served from cache
    tlb_cache_hit,
    /// Page table reads fetched
    tlb_read_success,
    /// Page table reads that failed
    tlb_read_fail,
    /// Physical memory cache refreshes
    phys_refresh,
    /// Page table cache refreshes
    tlb_refresh,
    /// Partial process list refreshes
    process_refresh_partial,
    /// Full process list refreshes
    process_refresh_full,
}

impl StatisticsSnapshot
{
    /// Sum of the seven paged-read success sub-categories.
    #[must_use]
    pub fn page_read_total(&self) -> u64
    {
        [
            self.page_prototype,
            self.page_transition,
            self.page_demand_zero,
            self.page_vad,
            self.page_cache_hit,
            self.page_page_file,
            self.page_compressed,
        ]
        .into_iter()
        .fold(0, u64::wrapping_add)
    }

    /// Sum of the five paged-read failure sub-categories.
    #[must_use]
    pub fn page_fail_total(&self) -> u64
    {
        [
            self.page_fail_cache_hit,
            self.page_fail_vad,
            self.page_fail_page_file,
            self.page_fail_compressed,
            self.page_fail,
        ]
        .into_iter()
        .fold(0, u64::wrapping_add)
    }
}
