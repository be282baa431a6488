//! Identifier Index: in-flight identifier -> live resource.

use crate::types::{Identifier, ResourceId};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct IdentifierIndex {
    entries: HashMap<Identifier, ResourceId>,
}

impl IdentifierIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identifier: Identifier) -> Option<ResourceId> {
        self.entries.get(&identifier).copied()
    }

    /// Point `identifier` at `resource`, returning the entry it replaced.
    pub fn insert(&mut self, identifier: Identifier, resource: ResourceId) -> Option<ResourceId> {
        self.entries.insert(identifier, resource)
    }

    pub fn remove(&mut self, identifier: Identifier) -> Option<ResourceId> {
        self.entries.remove(&identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.entries.values().copied()
    }
}
