//! In-memory collaborators for index tests: a single-parent type tree with
//! an append-only ordinal space, and a node table that owns liveness.
//!
//! Metrics state is process-wide, so indexes built here are quiet unless a
//! test asks for a metered one and holds `metrics_lock` while asserting.

use crate::{
    config::IndexConfig,
    index::NodeIndex,
    traits::{Node, NodeStore, TypeHierarchy},
    types::{Handle, TypeOrdinal},
};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
};

static METRICS_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that reset or assert on global metrics counters.
pub(crate) fn metrics_lock() -> MutexGuard<'static, ()> {
    METRICS_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An index that records no metrics events.
pub(crate) fn quiet_index(types: Arc<dyn TypeHierarchy + Send + Sync>) -> NodeIndex {
    let config = IndexConfig {
        metrics: false,
        ..IndexConfig::default()
    };

    NodeIndex::with_config(types, &config)
}

///
/// TypeTree
///

#[derive(Debug, Default)]
pub(crate) struct TypeTree {
    parents: RwLock<Vec<Option<TypeOrdinal>>>,
}

impl TypeTree {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a root type.
    pub(crate) fn add_root(&self) -> TypeOrdinal {
        self.push(None)
    }

    /// Register a subtype of `parent`.
    pub(crate) fn add_child(&self, parent: TypeOrdinal) -> TypeOrdinal {
        self.push(Some(parent))
    }

    fn push(&self, parent: Option<TypeOrdinal>) -> TypeOrdinal {
        let mut parents = self.parents.write().expect("type tree lock");
        let ty = TypeOrdinal::from_index(parents.len()).expect("ordinal space exhausted");
        parents.push(parent);
        ty
    }
}

impl TypeHierarchy for TypeTree {
    fn type_count(&self) -> usize {
        self.parents.read().expect("type tree lock").len()
    }

    fn is_a(&self, candidate: TypeOrdinal, ancestor: TypeOrdinal) -> bool {
        let parents = self.parents.read().expect("type tree lock");
        let mut current = Some(candidate);

        while let Some(ty) = current {
            if ty == ancestor {
                return true;
            }
            current = parents.get(ty.as_index()).copied().flatten();
        }

        false
    }
}

///
/// NodeTable
///

#[derive(Debug, Default)]
pub(crate) struct NodeTable {
    live: RwLock<HashSet<Handle>>,
}

impl NodeTable {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn add(&self, handle: Handle) {
        self.live.write().expect("node table lock").insert(handle);
    }

    pub(crate) fn delete(&self, handle: Handle) {
        self.live.write().expect("node table lock").remove(&handle);
    }
}

impl NodeStore for NodeTable {
    fn holds(&self, handle: Handle) -> bool {
        self.live.read().expect("node table lock").contains(&handle)
    }
}

///
/// TestNode
///

#[derive(Clone, Debug)]
pub(crate) struct TestNode {
    pub(crate) ty: TypeOrdinal,
    pub(crate) name: String,
    pub(crate) handle: Handle,
}

impl TestNode {
    pub(crate) fn new(ty: TypeOrdinal, name: &str, handle: u64) -> Self {
        Self {
            ty,
            name: name.to_string(),
            handle: Handle(handle),
        }
    }
}

impl Node for TestNode {
    fn node_type(&self) -> TypeOrdinal {
        self.ty
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self) -> Handle {
        self.handle
    }
}

///
/// Fixture
///
/// Type tree `node > {concept, predicate}`, `concept > word`, with a
/// connected store and a freshly built index. The index is quiet unless
/// built through [`Fixture::metered`].
///

pub(crate) struct Fixture {
    pub(crate) tree: Arc<TypeTree>,
    pub(crate) table: Arc<NodeTable>,
    pub(crate) index: NodeIndex,
    pub(crate) node: TypeOrdinal,
    pub(crate) concept: TypeOrdinal,
    pub(crate) predicate: TypeOrdinal,
    pub(crate) word: TypeOrdinal,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self::build(false)
    }

    /// Like `new`, but the index feeds the metrics sink.
    pub(crate) fn metered() -> Self {
        Self::build(true)
    }

    fn build(metrics: bool) -> Self {
        let tree = TypeTree::new();
        let node = tree.add_root();
        let concept = tree.add_child(node);
        let predicate = tree.add_child(node);
        let word = tree.add_child(concept);

        let table = NodeTable::new();
        let mut index = if metrics {
            NodeIndex::new(tree.clone())
        } else {
            quiet_index(tree.clone())
        };
        index.connect(&table);

        Self {
            tree,
            table,
            index,
            node,
            concept,
            predicate,
            word,
        }
    }

    /// Store and index a node in one step, as an owning store would.
    pub(crate) fn add(&mut self, ty: TypeOrdinal, name: &str, handle: u64) -> TestNode {
        let node = TestNode::new(ty, name, handle);
        self.table.add(node.handle);
        self.index.insert_handle(&node).expect("type in range");
        node
    }
}
