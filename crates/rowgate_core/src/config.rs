//! Deployment configuration.
//!
//! # Responsibility
//! - Load logging, database and table settings from a JSON document.
//! - Turn configured table definitions into a validated `SchemaRegistry`.
//!
//! # Invariants
//! - Every field has a default, so `{}` is a valid configuration.
//! - No tables configured means the built-in catalog is served.
//! - Live relational access needs `database_path`; rehearsal does not.

use crate::catalog::builtin_registry;
use crate::logging::default_log_level;
use crate::model::registry::SchemaRegistry;
use crate::model::schema::{SchemaError, TableSchema, TableSchemaDef};
use crate::store::relational::UpdateScope;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// One of `trace|debug|info|warn|error`.
    #[serde(default = "default_level")]
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// SQLite database file holding the provisioned tables. Required unless
    /// `relational.rehearsal` is set.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub relational: RelationalConfig,
    #[serde(default)]
    pub tables: Vec<TableSchemaDef>,
}

/// Relational store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationalConfig {
    /// Record statements without executing them.
    #[serde(default)]
    pub rehearsal: bool,
    #[serde(default)]
    pub update_scope: UpdateScope,
}

fn default_level() -> String {
    default_log_level().to_string()
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            log_level: default_level(),
            log_dir: None,
            database_path: None,
            relational: RelationalConfig::default(),
            tables: Vec::new(),
        }
    }
}

impl AccessConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Validated schemas for the configured tables, or the built-in catalog
    /// when none are configured.
    pub fn registry(&self) -> Result<SchemaRegistry, ConfigError> {
        if self.tables.is_empty() {
            return builtin_registry().map_err(ConfigError::Schema);
        }
        let schemas = self
            .tables
            .iter()
            .cloned()
            .map(TableSchema::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchemaRegistry::from_schemas(schemas)?)
    }

    /// Database file for live relational access, or `None` in rehearsal.
    ///
    /// # Errors
    /// - `ConfigError::MissingDatabasePath` when live access has no file to
    ///   open. A fresh in-memory database would hold none of the tables.
    pub fn live_database_path(&self) -> Result<Option<&Path>, ConfigError> {
        if self.relational.rehearsal {
            return Ok(None);
        }
        self.database_path
            .as_deref()
            .map(Some)
            .ok_or(ConfigError::MissingDatabasePath)
    }
}

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Schema(SchemaError),
    MissingDatabasePath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Schema(err) => write!(f, "invalid table definition: {err}"),
            Self::MissingDatabasePath => write!(
                f,
                "`database_path` is required unless `relational.rehearsal` is set"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::MissingDatabasePath => None,
        }
    }
}

impl From<SchemaError> for ConfigError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessConfig, ConfigError};
    use crate::store::relational::UpdateScope;
    use std::path::Path;

    #[test]
    fn empty_document_uses_defaults_and_builtin_tables() {
        let config = AccessConfig::from_json_str("{}").expect("empty config parses");
        assert_eq!(config, AccessConfig::default());
        assert!(!config.relational.rehearsal);
        assert_eq!(config.relational.update_scope, UpdateScope::Unscoped);

        let registry = config.registry().expect("builtin registry");
        assert!(registry.find("cases").is_some());
    }

    #[test]
    fn configured_tables_replace_builtin_catalog() {
        let config = AccessConfig::from_json_str(
            r#"{
                "relational": {"rehearsal": true, "update_scope": "by_key"},
                "tables": [{
                    "name": "EXAMPLE",
                    "columns": ["k1", "k2", "k3", "k4"],
                    "key_columns": ["k1", "k2"],
                    "mandatory_columns": ["k1", "k2", "k3"]
                }]
            }"#,
        )
        .expect("config parses");

        assert_eq!(config.relational.update_scope, UpdateScope::ByKey);
        let registry = config.registry().expect("registry");
        assert_eq!(registry.len(), 1);
        assert!(registry.find("cases").is_none());
        assert_eq!(
            registry.get("EXAMPLE").expect("example").mandatory_columns(),
            ["k1", "k2", "k3"]
        );
    }

    #[test]
    fn invalid_table_definition_is_reported() {
        let config = AccessConfig::from_json_str(
            r#"{"tables": [{"name": "T", "columns": ["a"], "key_columns": []}]}"#,
        )
        .expect("config parses");
        assert!(matches!(config.registry(), Err(ConfigError::Schema(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = AccessConfig::load(dir.path().join("absent.json")).expect_err("must fail");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn live_access_requires_a_database_path() {
        let live = AccessConfig::default();
        assert!(matches!(
            live.live_database_path(),
            Err(ConfigError::MissingDatabasePath)
        ));

        let rehearsal = AccessConfig::from_json_str(r#"{"relational": {"rehearsal": true}}"#)
            .expect("config parses");
        assert_eq!(rehearsal.live_database_path().expect("rehearsal needs no file"), None);

        let with_file = AccessConfig::from_json_str(r#"{"database_path": "/srv/rowgate.db"}"#)
            .expect("config parses");
        assert_eq!(
            with_file.live_database_path().expect("path configured"),
            Some(Path::new("/srv/rowgate.db"))
        );
    }
}
