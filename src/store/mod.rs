//! Resource Store
//!
//! Arena of resource records plus the identifier and URL indexes. This module
//! is the only place either index is mutated, so the invariant that a live
//! identifier on a record matches its index entry is kept here.

pub mod identifier_index;
pub mod url_index;

pub use identifier_index::IdentifierIndex;
pub use url_index::UrlIndex;

use crate::protocol::LoaderRef;
use crate::resource::Resource;
use crate::types::{Identifier, ResourceId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ResourceStore {
    resources: HashMap<ResourceId, Resource>,
    next_id: u64,
    by_identifier: IdentifierIndex,
    by_url: UrlIndex,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record, index its identifier (if any) and bind its URL.
    pub fn create(
        &mut self,
        identifier: Option<Identifier>,
        url: &str,
        loader: Option<LoaderRef>,
    ) -> ResourceId {
        self.next_id += 1;
        let id = ResourceId(self.next_id);
        let resource = Resource::new(id, identifier, url, loader);
        if let Some(ident) = identifier {
            if let Some(previous) = self.by_identifier.insert(ident, id) {
                // A reused identifier orphans the older record's claim on it.
                if let Some(old) = self.resources.get_mut(&previous) {
                    old.identifier = None;
                }
            }
        }
        self.by_url.bind(url, id);
        self.resources.insert(id, resource);
        id
    }

    pub fn get(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.get(&id)
    }

    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.resources.get_mut(&id)
    }

    /// The live record for an in-flight identifier.
    pub fn live(&self, identifier: Identifier) -> Option<ResourceId> {
        self.by_identifier.get(identifier)
    }

    pub fn live_mut(&mut self, identifier: Identifier) -> Option<&mut Resource> {
        let id = self.by_identifier.get(identifier)?;
        self.resources.get_mut(&id)
    }

    /// Replace the live record for `identifier` with a new hop to `url`.
    ///
    /// The new record inherits the old record's redirect chain with the old
    /// record appended; the old record loses its identifier and its chain.
    pub fn splice_redirect(&mut self, identifier: Identifier, url: &str) -> Option<ResourceId> {
        let old_id = self.by_identifier.get(identifier)?;
        let old = self.resources.get_mut(&old_id)?;
        old.identifier = None;
        let mut redirects = std::mem::take(&mut old.redirects);
        redirects.push(old_id);
        let loader = old.loader.clone();

        let new_id = self.create(Some(identifier), url, loader);
        if let Some(new) = self.resources.get_mut(&new_id) {
            new.redirects = redirects;
        }
        Some(new_id)
    }

    /// Drop the identifier index entry for a completed load.
    pub fn release_identifier(&mut self, identifier: Identifier) -> Option<ResourceId> {
        let id = self.by_identifier.remove(identifier)?;
        if let Some(resource) = self.resources.get_mut(&id) {
            resource.identifier = None;
        }
        Some(id)
    }

    pub fn first_for_url(&self, url: &str) -> Option<&Resource> {
        self.by_url.first(url).and_then(|id| self.resources.get(&id))
    }

    pub fn all_for_url(&self, url: &str) -> impl Iterator<Item = &Resource> + '_ {
        self.by_url
            .all(url)
            .iter()
            .filter_map(|id| self.resources.get(id))
    }

    pub fn is_bound(&self, id: ResourceId) -> bool {
        self.resources
            .get(&id)
            .is_some_and(|r| self.by_url.is_bound(&r.url, id))
    }

    /// Remove the URL binding of a record. Returns false if it was not bound.
    pub fn unbind(&mut self, id: ResourceId) -> bool {
        match self.resources.get(&id) {
            Some(resource) => self.by_url.unbind(&resource.url, id),
            None => false,
        }
    }

    pub fn in_flight_count(&self) -> usize {
        self.by_identifier.len()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Drop records nothing refers to any more.
    ///
    /// A record is kept while it is in flight, URL-bound, attached to a frame
    /// (per `attached`), or on the redirect chain of a kept record. Returns the
    /// number of records removed.
    pub fn sweep(&mut self, attached: impl Fn(ResourceId) -> bool) -> usize {
        let mut keep: HashSet<ResourceId> = self
            .by_identifier
            .resources()
            .chain(self.by_url.resources())
            .collect();
        keep.extend(self.resources.keys().copied().filter(|id| attached(*id)));

        let chained: Vec<ResourceId> = keep
            .iter()
            .filter_map(|id| self.resources.get(id))
            .flat_map(|r| r.redirects.iter().copied())
            .collect();
        keep.extend(chained);

        let before = self.resources.len();
        self.resources.retain(|id, _| keep.contains(id));
        before - self.resources.len()
    }
}
