//! Registry of table schemas served by one deployment.

use crate::model::schema::{SchemaError, TableSchema};

/// Ordered collection of schemas with unique names.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<TableSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from schemas, rejecting duplicate table names.
    pub fn from_schemas(
        schemas: impl IntoIterator<Item = TableSchema>,
    ) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Adds one schema. Names are unique ignoring ASCII case, since lookups
    /// through [`SchemaRegistry::find`] are case-insensitive.
    pub fn register(&mut self, schema: TableSchema) -> Result<(), SchemaError> {
        if self.find(schema.name()).is_some() {
            return Err(SchemaError::DuplicateTable(schema.name().to_string()));
        }
        self.schemas.push(schema);
        Ok(())
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.schemas.iter().find(|schema| schema.name() == name)
    }

    /// Case-insensitive lookup, used for externally supplied table names.
    pub fn find(&self, name: &str) -> Option<&TableSchema> {
        self.schemas
            .iter()
            .find(|schema| schema.name().eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableSchema> + '_ {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
