use crate::types::TypeOrdinal;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{LazyLock, Mutex, PoisonError},
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory counters for index operations, shared process-wide.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub types: BTreeMap<TypeOrdinal, TypeCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            types: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Per-node maintenance
    pub inserts: u64,
    pub overwrites: u64,
    pub removes: u64,
    pub remove_misses: u64,

    // Exact lookups
    pub lookups: u64,
    pub lookup_hits: u64,

    // Handle-set queries, exact and subclass
    pub set_queries: u64,
    pub subclass_queries: u64,
    pub set_types_matched: u64,
    pub set_hits: u64,
    pub stale_filtered: u64,

    // Lifecycle
    pub sweeps: u64,
    pub swept: u64,
    pub resizes: u64,
    pub types_added: u64,
}

///
/// TypeCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TypeCounters {
    pub inserts: u64,
    pub overwrites: u64,
    pub removes: u64,
    pub lookups: u64,
    pub lookup_hits: u64,
    pub set_queries: u64,
    pub stale_filtered: u64,
}

// Shared by every thread; index readers commonly run off the owner thread.
static EVENT_STATE: LazyLock<Mutex<EventState>> =
    LazyLock::new(|| Mutex::new(EventState::default()));

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    let state = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&state)
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    let mut state = EVENT_STATE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut state)
}

/// Reset all event state.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Increment a counter without wrapping.
pub(crate) const fn bump(counter: &mut u64, by: u64) {
    *counter = counter.saturating_add(by);
}

///
/// EventReport
/// Event/counter report for one metrics window.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since `since_ms`.
    pub counters: Option<EventState>,
    /// Per-type counters with derived hit rates.
    pub type_counters: Vec<TypeEventSummary>,
}

///
/// TypeEventSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TypeEventSummary {
    pub ty: TypeOrdinal,
    pub inserts: u64,
    pub overwrites: u64,
    pub removes: u64,
    pub lookups: u64,
    pub lookup_hits: u64,
    pub lookup_hit_rate: f64,
    pub set_queries: u64,
    pub stale_filtered: u64,
}

/// Build a metrics report by inspecting in-memory counters only.
///
/// A window start later than the current window yields an empty report.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report_window_start(window_start_ms: Option<u64>) -> EventReport {
    let snap = with_state(Clone::clone);
    if window_start_ms.is_some_and(|start| start > snap.since_ms) {
        return EventReport::default();
    }

    let type_counters = snap
        .types
        .iter()
        .map(|(ty, c)| {
            let lookup_hit_rate = if c.lookups > 0 {
                c.lookup_hits as f64 / c.lookups as f64
            } else {
                0.0
            };

            TypeEventSummary {
                ty: *ty,
                inserts: c.inserts,
                overwrites: c.overwrites,
                removes: c.removes,
                lookups: c.lookups,
                lookup_hits: c.lookup_hits,
                lookup_hit_rate,
                set_queries: c.set_queries,
                stale_filtered: c.stale_filtered,
            }
        })
        .collect();

    EventReport {
        counters: Some(snap),
        type_counters,
    }
}
