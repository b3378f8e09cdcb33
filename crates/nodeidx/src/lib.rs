//! Type-partitioned, name-keyed secondary index over graph nodes.
//!
//! The index resolves `(type, name)` to the unique stored handle and, for
//! polymorphic lookups, collects live handles across a whole subclass tree.
//! Node lifetime and the type hierarchy are owned elsewhere; both are reached
//! through the traits in [`traits`].
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod index;
pub mod obs;
pub mod traits;
pub mod types;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or config loaders are re-exported here.
///

pub mod prelude {
    pub use crate::{
        index::{HandleSet, NameIndex, NodeIndex},
        traits::{Node, NodeStore, TypeHierarchy},
        types::{Handle, TypeOrdinal},
    };
}
