//! Property tests for report totals and bounded settings

use std::sync::atomic::Ordering;
use std::sync::Arc;

use proptest::prelude::*;
use statusfs_core::engine::StatisticsSnapshot;
use statusfs_core::prelude::*;
use statusfs_core::registry::{self, Target};
use statusfs_core::report::render_statistics;

fn field(report: &str, label: &str) -> u64
{
    let line = report.lines().find(|line| line.starts_with(label)).unwrap();
    u64::from_str_radix(line[label.len()..].trim(), 16).unwrap()
}

fn counter() -> impl Strategy<Value = u64>
{
    prop_oneof![Just(0u64), Just(u64::MAX), any::<u64>(), 0u64..0x1_0000]
}

proptest! {
    #[test]
    fn page_totals_match_sub_categories(
        read in proptest::collection::vec(counter(), 7),
        fail in proptest::collection::vec(counter(), 5),
    ) {
        let stats = StatisticsSnapshot {
            page_prototype: read[0],
            page_transition: read[1],
            page_demand_zero: read[2],
            page_vad: read[3],
            page_cache_hit: read[4],
            page_page_file: read[5],
            page_compressed: read[6],
            page_fail_cache_hit: fail[0],
            page_fail_vad: fail[1],
            page_fail_page_file: fail[2],
            page_fail_compressed: fail[3],
            page_fail: fail[4],
            ..StatisticsSnapshot::default()
        };
        let report = render_statistics(&stats);

        let read_sum = read.iter().fold(0u64, |acc, v| acc.wrapping_add(*v));
        let fail_sum = fail.iter().fold(0u64, |acc, v| acc.wrapping_add(*v));
        prop_assert_eq!(field(&report, "  READ SUCCESS:"), read_sum);
        prop_assert_eq!(stats.page_read_total(), read_sum);
        prop_assert_eq!(stats.page_fail_total(), fail_sum);

        // The paged READ FAIL line is the second one with that label.
        let paged_fail = report
            .lines()
            .filter(|line| line.starts_with("  READ FAIL:"))
            .nth(1)
            .unwrap();
        prop_assert_eq!(u64::from_str_radix(paged_fail["  READ FAIL:".len()..].trim(), 16).unwrap(), fail_sum);
    }

    #[test]
    fn bounded_settings_never_store_below_minimum(value in any::<u32>()) {
        let state = Arc::new(EngineState::default());
        let module = StatusModule::new(state.clone(), Arc::new(NoopHooks));
        let text = format!("{value:08x}");
        for file in registry::FILES {
            let Target::UInt32(setting, bounds) = file.target else {
                continue;
            };
            prop_assert!(module.write(file.name, text.as_bytes(), 0).is_ok());
            let stored = state.u32_cell(setting).load(Ordering::SeqCst);
            prop_assert!(stored >= bounds.min);
            if value >= bounds.min {
                prop_assert_eq!(stored, value);
            } else {
                prop_assert_eq!(Some(stored), bounds.default);
            }
        }
    }
}
