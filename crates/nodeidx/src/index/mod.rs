mod name;
mod report;
mod set;


pub use name::NameIndex;
pub use report::{IndexReport, TypeSummary};
pub use set::HandleSet;

use crate::{
    config::IndexConfig,
    error::{IndexError, InternalError},
    obs::sink::{self, MetricsEvent},
    traits::{Node, NodeStore, TypeHierarchy},
    types::{Handle, TypeOrdinal},
};
use std::{
    fmt,
    sync::{Arc, Weak},
};
use tracing::{debug, error, trace, warn};

///
/// NodeIndex
///
/// One `NameIndex` per type ordinal, addressed by position.
///
/// The slot count tracks the type hierarchy only through explicit
/// [`resize`](Self::resize) calls: after new types are registered the owner
/// must resize before touching their ordinals, otherwise operations fail with
/// `TypeOutOfRange`.
///
/// No internal locking. Owners serialize writers against readers, e.g. by
/// keeping the index behind an `RwLock`.
///

pub struct NodeIndex {
    slots: Vec<NameIndex>,
    types: Arc<dyn TypeHierarchy + Send + Sync>,
    store: Option<Weak<dyn NodeStore + Send + Sync>>,
    slot_capacity: usize,
    metrics: bool,
}

impl NodeIndex {
    /// Build an index sized to the types registered right now.
    #[must_use]
    pub fn new(types: Arc<dyn TypeHierarchy + Send + Sync>) -> Self {
        Self::with_config(types, &IndexConfig::default())
    }

    #[must_use]
    pub fn with_config(types: Arc<dyn TypeHierarchy + Send + Sync>, config: &IndexConfig) -> Self {
        let type_count = types.type_count();
        let mut slots = Vec::with_capacity(type_count.saturating_add(config.reserve_types));
        slots.resize_with(type_count, || NameIndex::with_capacity(config.slot_capacity));

        Self {
            slots,
            types,
            store: None,
            slot_capacity: config.slot_capacity,
            metrics: config.metrics,
        }
    }

    /// Bind the authoritative store used for liveness checks.
    ///
    /// Only a weak reference is kept; the index never owns or mutates the
    /// store. Rebinding replaces the previous store.
    pub fn connect<S>(&mut self, store: &Arc<S>)
    where
        S: NodeStore + Send + Sync + 'static,
    {
        let store = Arc::downgrade(store) as Weak<dyn NodeStore + Send + Sync>;
        self.store = Some(store);

        debug!(type_count = self.slots.len(), "node index connected to store");
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.store
            .as_ref()
            .is_some_and(|store| store.strong_count() > 0)
    }

    /// Grow the slot array to the current type count. Never shrinks.
    pub fn resize(&mut self) {
        let from = self.slots.len();
        let to = self.types.type_count();
        if to <= from {
            return;
        }

        let capacity = self.slot_capacity;
        self.slots
            .resize_with(to, || NameIndex::with_capacity(capacity));

        debug!(from, to, "node index resized");
        self.record(MetricsEvent::Resize {
            from: from as u64,
            to: to as u64,
        });
    }

    /// File `node` under its type and name, replacing any handle already
    /// filed under that name. Returns the displaced handle.
    ///
    /// Nodes carrying `Handle::UNDEFINED` are refused and leave the index
    /// untouched.
    pub fn insert_handle(&mut self, node: &impl Node) -> Result<Option<Handle>, InternalError> {
        let ty = node.node_type();
        let handle = node.handle();
        let slot = self.slot_mut(ty)?;
        if handle.is_undefined() {
            warn!(ty = %ty, name = node.name(), "refusing to index undefined handle");
            return Ok(None);
        }
        let displaced = slot.insert(node.name(), handle);

        trace!(ty = %ty, handle = %handle, name = node.name(), ?displaced, "node indexed");
        self.record(MetricsEvent::Insert {
            ty,
            displaced: displaced.is_some(),
        });

        Ok(displaced)
    }

    /// Drop `node` from its type's map. Nodes that were never filed are a
    /// no-op; returns whether an entry was removed.
    pub fn remove_handle(&mut self, node: &impl Node) -> Result<bool, InternalError> {
        let ty = node.node_type();
        let handle = node.handle();
        let removed = self.slot_mut(ty)?.remove(handle);

        trace!(ty = %ty, handle = %handle, removed, "node unindexed");
        self.record(MetricsEvent::Remove { ty, removed });

        Ok(removed)
    }

    /// Exact lookup. `Ok(None)` means the name is not filed under `ty`;
    /// an ordinal beyond the slot array is an error.
    pub fn get_handle(&self, ty: TypeOrdinal, name: &str) -> Result<Option<Handle>, InternalError> {
        let handle = self.slot(ty)?.get(name);
        self.record(MetricsEvent::Lookup {
            ty,
            hit: handle.is_some(),
        });

        Ok(handle)
    }

    /// Live handles named `name` under `ty`, or under every type that is-a
    /// `ty` when `include_subclasses` is set.
    ///
    /// Handles the store no longer holds are filtered out. The result is
    /// unordered. Requires a connected store; the queried ordinal is
    /// range-checked before the store binding.
    pub fn get_handle_set(
        &self,
        ty: TypeOrdinal,
        name: &str,
        include_subclasses: bool,
    ) -> Result<HandleSet, InternalError> {
        let store = if include_subclasses {
            self.connected_store()?
        } else {
            let slot = self.slot(ty)?;
            let store = self.connected_store()?;

            let handle = slot.get(name);
            let live = handle.filter(|handle| store.holds(*handle));
            self.record(MetricsEvent::HandleSetQuery {
                ty,
                subclasses: false,
                types_matched: 1,
                hits: u64::from(live.is_some()),
                stale: u64::from(handle.is_some() && live.is_none()),
            });

            return Ok(HandleSet::from_option(live));
        };

        let type_count = self.types.type_count();
        let max = usize::from(u16::MAX) + 1;
        if type_count > max {
            error!(type_count, max, "type hierarchy exceeds the ordinal space");
            return Err(IndexError::OrdinalSpaceExhausted {
                count: type_count,
                max,
            }
            .into());
        }

        let mut out = HandleSet::new();
        let (mut matched, mut stale) = (0u64, 0u64);

        for candidate in (0..type_count).filter_map(TypeOrdinal::from_index) {
            if !self.types.is_a(candidate, ty) {
                continue;
            }
            matched += 1;

            let Some(handle) = self.slot(candidate)?.get(name) else {
                continue;
            };
            if store.holds(handle) {
                out.insert(handle);
            } else {
                stale += 1;
            }
        }

        trace!(ty = %ty, name, matched, hits = out.len(), stale, "subclass query");
        self.record(MetricsEvent::HandleSetQuery {
            ty,
            subclasses: true,
            types_matched: matched,
            hits: out.len() as u64,
            stale,
        });

        Ok(out)
    }

    /// Remove every entry, across all types, whose handle satisfies
    /// `predicate`. Returns the number of entries removed.
    pub fn remove(&mut self, mut predicate: impl FnMut(Handle) -> bool) -> usize {
        let removed = self
            .slots
            .iter_mut()
            .map(|slot| slot.remove_if(&mut predicate))
            .sum::<usize>();

        debug!(removed, "node index sweep");
        self.record(MetricsEvent::Sweep {
            removed: removed as u64,
        });

        removed
    }

    /// Drop every entry while keeping the slot count.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Read-only access to one type's map.
    pub fn slot(&self, ty: TypeOrdinal) -> Result<&NameIndex, InternalError> {
        let position = self.position(ty)?;

        Ok(&self.slots[position])
    }

    /// Number of per-type slots.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.slots.len()
    }

    /// Total entries across all types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().map(NameIndex::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(NameIndex::is_empty)
    }

    /// Snapshot slot occupancy (diagnostics only).
    #[must_use]
    pub fn report(&self) -> IndexReport {
        let types = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.is_empty())
            .filter_map(|(position, slot)| {
                TypeOrdinal::from_index(position).map(|ty| TypeSummary {
                    ty,
                    entries: slot.len(),
                })
            })
            .collect();

        IndexReport {
            type_count: self.slots.len(),
            entries: self.len(),
            connected: self.is_connected(),
            types,
        }
    }

    fn slot_mut(&mut self, ty: TypeOrdinal) -> Result<&mut NameIndex, InternalError> {
        let position = self.position(ty)?;

        Ok(&mut self.slots[position])
    }

    fn position(&self, ty: TypeOrdinal) -> Result<usize, InternalError> {
        let position = ty.as_index();
        let len = self.slots.len();
        if position >= len {
            error!(ty = %ty, len, "type ordinal out of range for node index");
            return Err(IndexError::TypeOutOfRange { ty, len }.into());
        }

        Ok(position)
    }

    fn connected_store(&self) -> Result<Arc<dyn NodeStore + Send + Sync>, InternalError> {
        match self.store.as_ref().and_then(Weak::upgrade) {
            Some(store) => Ok(store),
            None => {
                error!("node index queried before a store was connected");
                Err(IndexError::StoreNotConnected.into())
            }
        }
    }

    fn record(&self, event: MetricsEvent) {
        if self.metrics {
            sink::record(event);
        }
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeIndex")
            .field("slots", &self.slots)
            .field("connected", &self.is_connected())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
