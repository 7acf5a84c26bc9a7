//! Bound models: row-model type to its data access component and URL prefix.

use crate::error::ConfigError;
use crate::model::{ModelDescriptor, RowModel};
use crate::service::DataAccess;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

struct Entry {
    prefix: String,
    api: Arc<dyn Any + Send + Sync>,
    descriptor: ModelDescriptor,
}

/// Filled while routes are registered, read-only afterwards.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<TypeId, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `api` as the component for `M` under `prefix`. Each model and each prefix binds once.
    pub fn insert<M: RowModel>(
        &mut self,
        prefix: &str,
        api: Arc<DataAccess<M>>,
    ) -> Result<(), ConfigError> {
        let type_id = TypeId::of::<M>();
        if self.entries.contains_key(&type_id) {
            return Err(ConfigError::DuplicateModel(std::any::type_name::<M>()));
        }
        if self.entries.values().any(|e| e.prefix == prefix) {
            return Err(ConfigError::DuplicatePrefix(prefix.to_string()));
        }
        let descriptor = api.descriptor().clone();
        self.entries.insert(
            type_id,
            Entry {
                prefix: prefix.to_string(),
                api,
                descriptor,
            },
        );
        Ok(())
    }

    /// The data access component of a bound model, for hand-written endpoints.
    pub fn get<M: RowModel>(&self) -> Option<Arc<DataAccess<M>>> {
        let entry = self.entries.get(&TypeId::of::<M>())?;
        entry.api.clone().downcast::<DataAccess<M>>().ok()
    }

    pub fn prefix_of<M: RowModel>(&self) -> Option<&str> {
        self.entries
            .get(&TypeId::of::<M>())
            .map(|e| e.prefix.as_str())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.entries.values().map(|e| &e.descriptor)
    }

    /// `(prefix, descriptor)` of every bound model, sorted by prefix.
    pub fn bound(&self) -> Vec<(&str, &ModelDescriptor)> {
        let mut bound: Vec<_> = self
            .entries
            .values()
            .map(|e| (e.prefix.as_str(), &e.descriptor))
            .collect();
        bound.sort_by_key(|(prefix, _)| *prefix);
        bound
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
