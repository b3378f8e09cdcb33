//! Metrics sink boundary.
//!
//! Index logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only allowed bridge between index operations
//! and the global metrics state.
use crate::{
    obs::metrics::{self, bump},
    types::TypeOrdinal,
};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Insert {
        ty: TypeOrdinal,
        displaced: bool,
    },
    Remove {
        ty: TypeOrdinal,
        removed: bool,
    },
    Lookup {
        ty: TypeOrdinal,
        hit: bool,
    },
    /// `subclasses` is false for exact queries, which match one type.
    HandleSetQuery {
        ty: TypeOrdinal,
        subclasses: bool,
        types_matched: u64,
        hits: u64,
        stale: u64,
    },
    Sweep {
        removed: u64,
    },
    Resize {
        from: u64,
        to: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the process-wide metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::Insert { ty, displaced } => {
                bump(&mut m.ops.inserts, 1);
                let entry = m.types.entry(ty).or_default();
                bump(&mut entry.inserts, 1);
                if displaced {
                    bump(&mut m.ops.overwrites, 1);
                    bump(&mut entry.overwrites, 1);
                }
            }

            MetricsEvent::Remove { ty, removed } => {
                if removed {
                    bump(&mut m.ops.removes, 1);
                    bump(&mut m.types.entry(ty).or_default().removes, 1);
                } else {
                    bump(&mut m.ops.remove_misses, 1);
                }
            }

            MetricsEvent::Lookup { ty, hit } => {
                bump(&mut m.ops.lookups, 1);
                let entry = m.types.entry(ty).or_default();
                bump(&mut entry.lookups, 1);
                if hit {
                    bump(&mut m.ops.lookup_hits, 1);
                    bump(&mut entry.lookup_hits, 1);
                }
            }

            MetricsEvent::HandleSetQuery {
                ty,
                subclasses,
                types_matched,
                hits,
                stale,
            } => {
                bump(&mut m.ops.set_queries, 1);
                if subclasses {
                    bump(&mut m.ops.subclass_queries, 1);
                }
                bump(&mut m.ops.set_types_matched, types_matched);
                bump(&mut m.ops.set_hits, hits);
                bump(&mut m.ops.stale_filtered, stale);
                let entry = m.types.entry(ty).or_default();
                bump(&mut entry.set_queries, 1);
                bump(&mut entry.stale_filtered, stale);
            }

            MetricsEvent::Sweep { removed } => {
                bump(&mut m.ops.sweeps, 1);
                bump(&mut m.ops.swept, removed);
            }

            MetricsEvent::Resize { from, to } => {
                bump(&mut m.ops.resizes, 1);
                bump(&mut m.ops.types_added, to.saturating_sub(from));
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`,
        //   which restores the previous slot on every exit, including unwind.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the original borrow.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current metrics state.
///
/// `window_start_ms` filters by window start (`EventState::since_ms`),
/// not by per-event timestamps.
#[must_use]
pub fn metrics_report(window_start_ms: Option<u64>) -> metrics::EventReport {
    metrics::report_window_start(window_start_ms)
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope and `Guard`
    //   restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
