use crate::types::TypeOrdinal;
use serde::{Deserialize, Serialize};

///
/// IndexReport
/// Point-in-time snapshot of slot occupancy (diagnostics only).
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct IndexReport {
    pub type_count: usize,
    pub entries: usize,
    pub connected: bool,
    /// Non-empty slots in ascending ordinal order.
    pub types: Vec<TypeSummary>,
}

///
/// TypeSummary
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeSummary {
    pub ty: TypeOrdinal,
    pub entries: usize,
}
