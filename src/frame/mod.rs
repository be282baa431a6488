//! Frames
//!
//! A frame is one node of the page's frame tree. Resources are attached to the
//! frame named by their loader once a response arrives; the registry keeps the
//! parent/child links and performs the clearing that navigations trigger.

pub mod registry;

pub use registry::{ClearOutcome, FrameRegistry};

use crate::types::{FrameId, ResourceId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub frame_id: FrameId,
    pub parent_frame_id: Option<FrameId>,
    pub display_name: String,
    /// Attached resources in attachment order.
    pub resources: Vec<ResourceId>,
    /// Subframes in registration order.
    pub child_frame_ids: Vec<FrameId>,
    /// False for frames that only exist because a resource or subframe named
    /// them before any commit did.
    pub registered: bool,
}

impl Frame {
    fn placeholder(frame_id: FrameId) -> Self {
        Frame {
            frame_id,
            parent_frame_id: None,
            display_name: String::new(),
            resources: Vec::new(),
            child_frame_ids: Vec::new(),
            registered: false,
        }
    }

    fn is_empty_placeholder(&self) -> bool {
        !self.registered && self.resources.is_empty() && self.child_frame_ids.is_empty()
    }
}
