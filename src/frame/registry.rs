//! Frame Registry
//!
//! Owns the frame tree and frame membership of resources. It never touches the
//! URL index: clearing reports which resources it detached and the caller
//! unbinds them.

use super::Frame;
use crate::types::{FrameId, ResourceId};
use std::collections::HashMap;
use tracing::debug;

/// What a commit or detach changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Resources removed from their frame, in clearing order.
    pub detached: Vec<ResourceId>,
    /// Resources the committed frame kept.
    pub preserved: Vec<ResourceId>,
    /// Frames whose registration was dropped, parents before children.
    pub removed_frames: Vec<FrameId>,
}

#[derive(Debug, Default)]
pub struct FrameRegistry {
    frames: HashMap<FrameId, Frame>,
    roots: Vec<FrameId>,
    attached_to: HashMap<ResourceId, FrameId>,
}

impl FrameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent upsert. Links `frame_id` under `parent` (or as a root).
    pub fn register_or_update(
        &mut self,
        parent: Option<&FrameId>,
        frame_id: &FrameId,
        display_name: &str,
    ) {
        let previous_parent = self.frames.get(frame_id).and_then(|f| {
            if f.registered {
                Some(f.parent_frame_id.clone())
            } else {
                None
            }
        });
        if let Some(previous) = previous_parent {
            if previous.as_ref() != parent {
                self.unlink(previous.as_ref(), frame_id);
            }
        }

        let frame = self
            .frames
            .entry(frame_id.clone())
            .or_insert_with(|| Frame::placeholder(frame_id.clone()));
        frame.parent_frame_id = parent.cloned();
        frame.display_name = display_name.to_string();
        frame.registered = true;

        let siblings = match parent {
            Some(parent_id) => {
                &mut self
                    .frames
                    .entry(parent_id.clone())
                    .or_insert_with(|| Frame::placeholder(parent_id.clone()))
                    .child_frame_ids
            }
            None => &mut self.roots,
        };
        if !siblings.contains(frame_id) {
            siblings.push(frame_id.clone());
        }
    }

    /// Navigation of `frame_id` to a new load.
    ///
    /// Clears the frame and its whole subtree, keeping only resources for which
    /// `preserve` holds, then registers the frame under `parent`.
    pub fn commit(
        &mut self,
        parent: Option<&FrameId>,
        frame_id: &FrameId,
        display_name: &str,
        preserve: impl Fn(ResourceId) -> bool,
    ) -> ClearOutcome {
        let mut outcome = ClearOutcome::default();
        self.clear_subtree(frame_id, &preserve, &mut outcome);
        self.register_or_update(parent, frame_id, display_name);
        outcome.preserved = self.resources(frame_id).to_vec();
        debug!(
            frame_id = %frame_id,
            detached = outcome.detached.len(),
            preserved = outcome.preserved.len(),
            removed_frames = outcome.removed_frames.len(),
            "Committed frame load"
        );
        outcome
    }

    /// Remove `frame_id` and its subtree entirely.
    pub fn detach(&mut self, frame_id: &FrameId) -> ClearOutcome {
        let mut outcome = ClearOutcome::default();
        if !self.frames.contains_key(frame_id) {
            return outcome;
        }
        self.clear_subtree(frame_id, &|_| false, &mut outcome);
        if let Some(frame) = self.frames.remove(frame_id) {
            if frame.registered {
                self.unlink(frame.parent_frame_id.as_ref(), frame_id);
            }
        }
        outcome.removed_frames.push(frame_id.clone());
        debug!(
            frame_id = %frame_id,
            detached = outcome.detached.len(),
            removed_frames = outcome.removed_frames.len(),
            "Detached frame"
        );
        outcome
    }

    /// Append `resource` to the frame's resources, creating the frame lazily.
    pub fn attach(&mut self, frame_id: &FrameId, resource: ResourceId) {
        if let Some(current) = self.attached_to.get(&resource).cloned() {
            debug_assert_eq!(
                &current, frame_id,
                "resource {} attached to a second frame",
                resource
            );
            if &current == frame_id {
                return;
            }
            if let Some(frame) = self.frames.get_mut(&current) {
                frame.resources.retain(|r| *r != resource);
            }
        }
        self.frames
            .entry(frame_id.clone())
            .or_insert_with(|| Frame::placeholder(frame_id.clone()))
            .resources
            .push(resource);
        self.attached_to.insert(resource, frame_id.clone());
    }

    pub fn frame(&self, frame_id: &FrameId) -> Option<&Frame> {
        self.frames.get(frame_id)
    }

    pub fn resources(&self, frame_id: &FrameId) -> &[ResourceId] {
        self.frames
            .get(frame_id)
            .map(|f| f.resources.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[FrameId] {
        &self.roots
    }

    pub fn frame_of(&self, resource: ResourceId) -> Option<&FrameId> {
        self.attached_to.get(&resource)
    }

    pub fn is_attached(&self, resource: ResourceId) -> bool {
        self.attached_to.contains_key(&resource)
    }

    /// Pre-order walk: each frame's resources, then its children. Stops when
    /// `visit` returns true and reports whether it did.
    pub fn for_all(&self, mut visit: impl FnMut(ResourceId) -> bool) -> bool {
        self.roots
            .iter()
            .any(|root| self.visit_frame(root, &mut visit))
    }

    fn visit_frame(&self, frame_id: &FrameId, visit: &mut impl FnMut(ResourceId) -> bool) -> bool {
        let Some(frame) = self.frames.get(frame_id) else {
            return false;
        };
        if frame.resources.iter().any(|r| visit(*r)) {
            return true;
        }
        frame
            .child_frame_ids
            .iter()
            .any(|child| self.visit_frame(child, visit))
    }

    fn clear_subtree(
        &mut self,
        frame_id: &FrameId,
        preserve: &dyn Fn(ResourceId) -> bool,
        outcome: &mut ClearOutcome,
    ) {
        let Some(frame) = self.frames.get_mut(frame_id) else {
            return;
        };
        let (kept, dropped): (Vec<ResourceId>, Vec<ResourceId>) =
            frame.resources.drain(..).partition(|r| preserve(*r));
        frame.resources = kept;
        let children = std::mem::take(&mut frame.child_frame_ids);

        for resource in dropped {
            self.attached_to.remove(&resource);
            outcome.detached.push(resource);
        }

        for child in children {
            outcome.removed_frames.push(child.clone());
            self.clear_subtree(&child, preserve, outcome);
            self.unregister(&child);
        }
    }

    /// Drop a cleared descendant's registration. Resources it preserved stay
    /// attached to the now unreachable frame until it is committed again.
    fn unregister(&mut self, frame_id: &FrameId) {
        let Some(frame) = self.frames.get_mut(frame_id) else {
            return;
        };
        frame.registered = false;
        frame.parent_frame_id = None;
        frame.display_name.clear();
        if frame.is_empty_placeholder() {
            self.frames.remove(frame_id);
        }
    }

    fn unlink(&mut self, parent: Option<&FrameId>, frame_id: &FrameId) {
        match parent {
            Some(parent_id) => {
                if let Some(parent_frame) = self.frames.get_mut(parent_id) {
                    parent_frame.child_frame_ids.retain(|c| c != frame_id);
                    if parent_frame.is_empty_placeholder() {
                        self.frames.remove(parent_id);
                    }
                }
            }
            None => self.roots.retain(|r| r != frame_id),
        }
    }
}
