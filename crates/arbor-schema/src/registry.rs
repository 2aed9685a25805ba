use arbor_core::Value;
use indexmap::IndexMap;
use std::path::Path;

/// Failure of a [`Registry`] operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("schema id {0:?} is already registered")]
    AlreadyRegistered(String),
    #[error("schema id {0:?} is not registered")]
    NotFound(String),
    #[error("schema has no \"$id\" string member")]
    MissingId,
}

/// Failure of [`Registry::register_file`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    File(#[from] arbor_parser::FileError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Insertion-ordered map from absolute `$id` strings to schema documents,
/// used to resolve absolute `$ref` targets during validation.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: IndexMap<String, Value>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding; fails if the id is already present.
    pub fn insert(&mut self, id: impl Into<String>, schema: Value) -> Result<(), RegistryError> {
        let id = id.into();
        if self.schemas.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        self.schemas.insert(id, schema);
        Ok(())
    }

    /// Replace an existing binding, returning the previous schema; fails if
    /// the id is absent.
    pub fn update(&mut self, id: &str, schema: Value) -> Result<Value, RegistryError> {
        match self.schemas.get_mut(id) {
            Some(slot) => Ok(std::mem::replace(slot, schema)),
            None => Err(RegistryError::NotFound(id.to_owned())),
        }
    }

    /// Add or replace; returns the previous binding if there was one.
    pub fn upsert(&mut self, id: impl Into<String>, schema: Value) -> Option<Value> {
        self.schemas.insert(id.into(), schema)
    }

    pub fn remove(&mut self, id: &str) -> Option<Value> {
        self.schemas.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.schemas.get(id)
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schemas.iter().map(|(id, schema)| (id.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Register a schema under its own `"$id"` member.
    pub fn register(&mut self, schema: Value) -> Result<String, RegistryError> {
        let id = schema
            .get("$id")
            .and_then(Value::as_str)
            .ok_or(RegistryError::MissingId)?
            .to_owned();
        self.insert(id.clone(), schema)?;
        Ok(id)
    }

    /// Parse a schema file and register it under its `"$id"`.
    pub fn register_file(&mut self, path: impl AsRef<Path>) -> Result<String, LoadError> {
        let schema = arbor_parser::parse_file(path)?;
        Ok(self.register(schema)?)
    }
}
