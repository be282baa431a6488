//! Notification Sink
//!
//! The outbound port of the tracker. Consumers implement `TrackerSink` and
//! receive borrowed views of resources; nothing handed to a sink can be used to
//! mutate tracker state. Every method defaults to doing nothing.

use crate::resource::Resource;
use crate::types::FrameId;
use serde::Serialize;
use std::sync::mpsc::{channel, Receiver, SendError, Sender};
use tracing::{debug, trace};

pub trait TrackerSink {
    fn resource_started(&mut self, _resource: &Resource) {}

    fn resource_updated(&mut self, _resource: &Resource) {}

    fn resource_finished(&mut self, _resource: &Resource) {}

    fn frame_registered(
        &mut self,
        _frame_id: &FrameId,
        _parent_frame_id: Option<&FrameId>,
        _display_name: &str,
    ) {
    }

    fn frame_removed(&mut self, _frame_id: &FrameId) {}

    /// A resource became (or, after a commit, remained) a member of a frame.
    fn resource_attached(&mut self, _frame_id: &FrameId, _resource: &Resource) {}
}

/// Discards every notification.
impl TrackerSink for () {}

/// Owned snapshot of one outbound notification.
///
/// Snapshots are taken when the event fires and do not follow later mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TrackerEvent {
    ResourceStarted { resource: Box<Resource> },
    ResourceUpdated { resource: Box<Resource> },
    ResourceFinished { resource: Box<Resource> },
    FrameRegistered {
        frame_id: FrameId,
        parent_frame_id: Option<FrameId>,
        display_name: String,
    },
    FrameRemoved { frame_id: FrameId },
    ResourceAttached {
        frame_id: FrameId,
        resource: Box<Resource>,
    },
}

impl TrackerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackerEvent::ResourceStarted { .. } => "resource-started",
            TrackerEvent::ResourceUpdated { .. } => "resource-updated",
            TrackerEvent::ResourceFinished { .. } => "resource-finished",
            TrackerEvent::FrameRegistered { .. } => "frame-registered",
            TrackerEvent::FrameRemoved { .. } => "frame-removed",
            TrackerEvent::ResourceAttached { .. } => "resource-attached",
        }
    }

    pub fn resource(&self) -> Option<&Resource> {
        match self {
            TrackerEvent::ResourceStarted { resource }
            | TrackerEvent::ResourceUpdated { resource }
            | TrackerEvent::ResourceFinished { resource }
            | TrackerEvent::ResourceAttached { resource, .. } => Some(resource),
            TrackerEvent::FrameRegistered { .. } | TrackerEvent::FrameRemoved { .. } => None,
        }
    }
}

/// Sinks that want owned snapshots rather than borrowed views.
///
/// Every `SnapshotSink` is a `TrackerSink`; each notification is cloned into a
/// `TrackerEvent` and handed to `accept`.
pub trait SnapshotSink {
    fn accept(&mut self, event: TrackerEvent);
}

impl<T: SnapshotSink> TrackerSink for T {
    fn resource_started(&mut self, resource: &Resource) {
        self.accept(TrackerEvent::ResourceStarted {
            resource: Box::new(resource.clone()),
        })
    }

    fn resource_updated(&mut self, resource: &Resource) {
        self.accept(TrackerEvent::ResourceUpdated {
            resource: Box::new(resource.clone()),
        })
    }

    fn resource_finished(&mut self, resource: &Resource) {
        self.accept(TrackerEvent::ResourceFinished {
            resource: Box::new(resource.clone()),
        })
    }

    fn frame_registered(
        &mut self,
        frame_id: &FrameId,
        parent_frame_id: Option<&FrameId>,
        display_name: &str,
    ) {
        self.accept(TrackerEvent::FrameRegistered {
            frame_id: frame_id.clone(),
            parent_frame_id: parent_frame_id.cloned(),
            display_name: display_name.to_string(),
        })
    }

    fn frame_removed(&mut self, frame_id: &FrameId) {
        self.accept(TrackerEvent::FrameRemoved {
            frame_id: frame_id.clone(),
        })
    }

    fn resource_attached(&mut self, frame_id: &FrameId, resource: &Resource) {
        self.accept(TrackerEvent::ResourceAttached {
            frame_id: frame_id.clone(),
            resource: Box::new(resource.clone()),
        })
    }
}

/// Keeps every event in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<TrackerEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(TrackerEvent::name).collect()
    }

    pub fn take(&mut self) -> Vec<TrackerEvent> {
        std::mem::take(&mut self.events)
    }
}

impl SnapshotSink for RecordingSink {
    fn accept(&mut self, event: TrackerEvent) {
        self.events.push(event);
    }
}

/// In-process event bus: forwards snapshots over a std channel.
///
/// Sending is best-effort; a dropped receiver silently discards events.
#[derive(Clone)]
pub struct ChannelSink {
    sender: Sender<TrackerEvent>,
}

impl ChannelSink {
    pub fn new_pair() -> (Self, Receiver<TrackerEvent>) {
        let (sender, receiver) = channel();
        (Self { sender }, receiver)
    }

    pub fn send(&self, event: TrackerEvent) -> Result<(), SendError<TrackerEvent>> {
        self.sender.send(event)
    }
}

impl SnapshotSink for ChannelSink {
    fn accept(&mut self, event: TrackerEvent) {
        let _ = self.send(event);
    }
}

/// Logs every notification through `tracing` and forwards nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TrackerSink for TracingSink {
    fn resource_started(&mut self, resource: &Resource) {
        debug!(resource = %resource.id, url = %resource.url, "resource-started");
    }

    fn resource_updated(&mut self, resource: &Resource) {
        trace!(resource = %resource.id, url = %resource.url, "resource-updated");
    }

    fn resource_finished(&mut self, resource: &Resource) {
        debug!(
            resource = %resource.id,
            url = %resource.url,
            failed = resource.failed,
            size = resource.resource_size,
            "resource-finished"
        );
    }

    fn frame_registered(
        &mut self,
        frame_id: &FrameId,
        parent_frame_id: Option<&FrameId>,
        display_name: &str,
    ) {
        debug!(
            frame_id = %frame_id,
            parent = ?parent_frame_id,
            display_name,
            "frame-registered"
        );
    }

    fn frame_removed(&mut self, frame_id: &FrameId) {
        debug!(frame_id = %frame_id, "frame-removed");
    }

    fn resource_attached(&mut self, frame_id: &FrameId, resource: &Resource) {
        trace!(frame_id = %frame_id, resource = %resource.id, "resource-attached");
    }
}
