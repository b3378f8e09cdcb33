//! Index configuration, loaded from TOML.
//!
//! Configuration only tunes capacity and instrumentation. It never changes
//! what the index returns.

use serde::Deserialize;
use std::{fs, io, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// ConfigFile
///
/// Top-level TOML document. Only the `[index]` table is read.
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    index: IndexConfig,
}

///
/// IndexConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Initial capacity of each per-type name map.
    pub slot_capacity: usize,

    /// Extra slot capacity reserved beyond the type count at construction.
    pub reserve_types: usize,

    /// Emit metrics events for index operations.
    pub metrics: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            slot_capacity: 0,
            reserve_types: 0,
            metrics: true,
        }
    }
}

impl IndexConfig {
    /// Parse a TOML document containing an optional `[index]` table.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;

        Ok(file.index)
    }

    /// Read and parse a TOML config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorOrigin, InternalError};

    #[test]
    fn empty_document_yields_defaults() {
        let config = IndexConfig::from_toml_str("").expect("empty config parses");

        assert_eq!(config, IndexConfig::default());
        assert!(config.metrics);
    }

    #[test]
    fn index_table_overrides_fields() {
        let config = IndexConfig::from_toml_str(
            r"
            [index]
            slot_capacity = 64
            metrics = false
            ",
        )
        .expect("config parses");

        assert_eq!(config.slot_capacity, 64);
        assert_eq!(config.reserve_types, 0);
        assert!(!config.metrics);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = IndexConfig::from_toml_str(
            r"
            [index]
            slot_capacty = 64
            ",
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));

        let err: InternalError = err.into();
        assert_eq!(err.origin, ErrorOrigin::Config);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = IndexConfig::from_path("/nonexistent/nodeidx.toml").unwrap_err();

        assert!(err.to_string().contains("/nonexistent/nodeidx.toml"));
    }
}
