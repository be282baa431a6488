//! URL Index: url -> resources loaded for it, in binding order.
//!
//! Every present entry holds at least one resource. The first element is the
//! one `first` reports.

use crate::types::ResourceId;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct UrlIndex {
    bindings: HashMap<String, Vec<ResourceId>>,
}

impl UrlIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, url: &str, resource: ResourceId) {
        self.bindings.entry(url.to_string()).or_default().push(resource);
    }

    /// Remove one binding. Returns false when `resource` was not bound to `url`.
    pub fn unbind(&mut self, url: &str, resource: ResourceId) -> bool {
        let Some(bound) = self.bindings.get_mut(url) else {
            return false;
        };
        let Some(pos) = bound.iter().position(|r| *r == resource) else {
            return false;
        };
        bound.remove(pos);
        if bound.is_empty() {
            self.bindings.remove(url);
        }
        true
    }

    pub fn first(&self, url: &str) -> Option<ResourceId> {
        self.bindings.get(url).and_then(|bound| bound.first().copied())
    }

    pub fn all(&self, url: &str) -> &[ResourceId] {
        self.bindings.get(url).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_bound(&self, url: &str, resource: ResourceId) -> bool {
        self.all(url).contains(&resource)
    }

    pub fn url_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.bindings.values().flatten().copied()
    }
}
