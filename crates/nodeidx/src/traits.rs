//! Collaborator contracts: the node being indexed, the type hierarchy that
//! owns the ordinal space, and the authoritative store that owns liveness.

use crate::types::{Handle, TypeOrdinal};

///
/// Node
///
/// Anything the index can file: a typed, named node with a stable handle.
///

pub trait Node {
    fn node_type(&self) -> TypeOrdinal;

    fn name(&self) -> &str;

    fn handle(&self) -> Handle;
}

///
/// TypeHierarchy
///
/// Read-only view of the external type system.
/// `is_a` must be reflexive and transitive; `type_count` never decreases.
///

pub trait TypeHierarchy {
    /// Number of types registered so far.
    fn type_count(&self) -> usize;

    /// True if `candidate` is `ancestor` or one of its descendants.
    fn is_a(&self, candidate: TypeOrdinal, ancestor: TypeOrdinal) -> bool;
}

///
/// NodeStore
///
/// The authoritative store. The index only ever asks whether a handle is
/// still live.
///

pub trait NodeStore {
    fn holds(&self, handle: Handle) -> bool;
}
