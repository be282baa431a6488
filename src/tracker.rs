//! Resource Tracker
//!
//! Top-level coordinator. Every inbound notification runs to completion on
//! `&mut self`: it looks up or creates a resource in the store, mutates it,
//! updates frame membership, and tells the sink what changed.
//!
//! Notifications naming an identifier the tracker no longer (or never) knew
//! are ignored without a trace. They race legitimately with completed loads.

use crate::config::TrackerSettings;
use crate::frame::{ClearOutcome, Frame, FrameRegistry};
use crate::protocol::{
    CachedResourcePayload, FramePayload, LoaderRef, Notification, RequestPayload,
    ResponsePayload, WebSocketHandshakeRequest, WebSocketHandshakeResponse,
};
use crate::resource::{display_name_for_url, Resource, ResourceType};
use crate::sink::TrackerSink;
use crate::store::ResourceStore;
use crate::types::{FrameId, Identifier, ResourceId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Severity of a console message reported against a resource URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Tip,
    Log,
    Warning,
    Error,
    Debug,
}

pub struct ResourceTracker<S: TrackerSink = ()> {
    store: ResourceStore,
    frames: FrameRegistry,
    sink: S,
    settings: TrackerSettings,
    main_resource: Option<ResourceId>,
    in_flight_warned: bool,
}

impl Default for ResourceTracker<()> {
    fn default() -> Self {
        Self::new(())
    }
}

impl<S: TrackerSink> ResourceTracker<S> {
    pub fn new(sink: S) -> Self {
        Self::with_registry(FrameRegistry::new(), sink)
    }

    pub fn with_registry(frames: FrameRegistry, sink: S) -> Self {
        ResourceTracker {
            store: ResourceStore::new(),
            frames,
            sink,
            settings: TrackerSettings::default(),
            main_resource: None,
            in_flight_warned: false,
        }
    }

    pub fn with_settings(mut self, settings: TrackerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Route one notification to its handler.
    pub fn dispatch(&mut self, notification: Notification) {
        match notification {
            Notification::InitialRequest {
                identifier,
                url,
                loader,
            } => self.on_initial_request(identifier, &url, loader),
            Notification::WillSendRequest {
                identifier,
                time,
                request,
                redirect_response,
            } => self.on_will_send_request(identifier, time, &request, redirect_response.as_ref()),
            Notification::MarkCached { identifier } => self.on_mark_cached(identifier),
            Notification::ResponseReceived {
                identifier,
                time,
                resource_type,
                response,
            } => self.on_response_received(identifier, time, resource_type, &response),
            Notification::ContentLength {
                identifier,
                time,
                length_received,
            } => self.on_content_length(identifier, time, length_received),
            Notification::Finished {
                identifier,
                finish_time,
            } => self.on_finished(identifier, finish_time),
            Notification::Failed {
                identifier,
                time,
                localized_description,
            } => self.on_failed(identifier, time, &localized_description),
            Notification::LoadedFromMemoryCache {
                time,
                cached_resource,
            } => self.on_loaded_from_memory_cache(time, &cached_resource),
            Notification::CommittedLoadForFrame {
                parent_frame_id,
                loader,
            } => self.on_committed_load_for_frame(parent_frame_id.as_ref(), &loader),
            Notification::FrameDetached { frame_id } => self.on_frame_detached(&frame_id),
            Notification::WebSocketCreated {
                identifier,
                request_url,
            } => self.on_web_socket_created(identifier, &request_url),
            Notification::WebSocketHandshakeRequest {
                identifier,
                time,
                request,
            } => self.on_web_socket_handshake_request(identifier, time, &request),
            Notification::WebSocketHandshakeResponse {
                identifier,
                time,
                response,
            } => self.on_web_socket_handshake_response(identifier, time, &response),
            Notification::WebSocketClosed { identifier, time } => {
                self.on_web_socket_closed(identifier, time)
            }
            Notification::CachedResources { main_frame } => self.on_cached_resources(&main_frame),
        }
    }

    pub fn on_initial_request(&mut self, identifier: Identifier, url: &str, loader: LoaderRef) {
        let is_main = loader.url == url;
        let id = self.store.create(Some(identifier), url, Some(loader));
        if is_main {
            self.main_resource = Some(id);
        }
        self.update(id, |r| r.is_main_resource = is_main);
        self.check_in_flight();
        self.publish_started(id);
    }

    pub fn on_will_send_request(
        &mut self,
        identifier: Identifier,
        time: Timestamp,
        request: &RequestPayload,
        redirect_response: Option<&ResponsePayload>,
    ) {
        let Some(mut id) = self.store.live(identifier) else {
            return;
        };

        // An empty target URL would key the new hop under "".
        let redirect = redirect_response.filter(|r| r.is_present() && !request.url.is_empty());
        if let Some(response) = redirect {
            self.update(id, |r| r.end_time = Some(time));
            self.on_response_received(identifier, time, ResourceType::Other, response);
            match self.store.splice_redirect(identifier, &request.url) {
                Some(next) => id = next,
                None => return,
            }
        }

        self.update(id, |r| {
            r.apply_request(request);
            r.start_time = Some(time);
        });

        if redirect.is_some() {
            self.publish_started(id);
        } else {
            self.publish_updated(id);
        }
    }

    pub fn on_mark_cached(&mut self, identifier: Identifier) {
        if let Some(id) = self.live_update(identifier, |r| r.cached = true) {
            self.publish_updated(id);
        }
    }

    pub fn on_response_received(
        &mut self,
        identifier: Identifier,
        time: Timestamp,
        resource_type: ResourceType,
        response: &ResponsePayload,
    ) {
        let updated = self.live_update(identifier, |r| {
            r.apply_response(response);
            r.resource_type = resource_type;
            r.response_received_time = Some(time);
        });
        if let Some(id) = updated {
            self.publish_updated(id);
            self.attach_to_loader_frame(id);
        }
    }

    pub fn on_content_length(&mut self, identifier: Identifier, time: Timestamp, bytes: u64) {
        let updated = self.live_update(identifier, |r| {
            r.resource_size += bytes;
            r.end_time = Some(time);
        });
        if let Some(id) = updated {
            self.publish_updated(id);
        }
    }

    pub fn on_finished(&mut self, identifier: Identifier, time: Timestamp) {
        self.complete(identifier, time, None);
    }

    pub fn on_failed(&mut self, identifier: Identifier, time: Timestamp, message: &str) {
        self.complete(identifier, time, Some(message.to_string()));
    }

    fn complete(&mut self, identifier: Identifier, time: Timestamp, failure: Option<String>) {
        let Some(id) = self.live_update(identifier, |r| r.mark_finished(time, failure)) else {
            return;
        };
        self.publish_finished(id);
        self.store.release_identifier(identifier);
    }

    pub fn on_loaded_from_memory_cache(&mut self, time: Timestamp, cached: &CachedResourcePayload) {
        let id = self.store.create(None, &cached.url, Some(cached.loader.clone()));
        self.update(id, |r| {
            r.apply_cached(cached);
            r.cached = true;
            r.start_time = Some(time);
            r.response_received_time = Some(time);
            r.end_time = Some(time);
            r.finished = true;
        });
        self.publish_started(id);
        self.publish_finished(id);
        self.attach_to_loader_frame(id);
    }

    pub fn on_committed_load_for_frame(
        &mut self,
        parent_frame_id: Option<&FrameId>,
        loader: &LoaderRef,
    ) {
        let display_name = display_name_for_url(&loader.url);
        let store = &self.store;
        let outcome = self.frames.commit(parent_frame_id, &loader.frame_id, &display_name, |id| {
            store
                .get(id)
                .and_then(Resource::loader_id)
                .is_some_and(|l| *l == loader.loader_id)
        });
        self.apply_clear(&outcome);
        self.sink
            .frame_registered(&loader.frame_id, parent_frame_id, &display_name);
        for id in &outcome.preserved {
            if let Some(resource) = self.store.get(*id) {
                self.sink.resource_attached(&loader.frame_id, resource);
            }
        }
    }

    pub fn on_frame_detached(&mut self, frame_id: &FrameId) {
        let outcome = self.frames.detach(frame_id);
        self.apply_clear(&outcome);
    }

    pub fn on_web_socket_created(&mut self, identifier: Identifier, url: &str) {
        let id = self.store.create(Some(identifier), url, None);
        self.update(id, |r| r.resource_type = ResourceType::WebSocket);
        self.check_in_flight();
        self.publish_started(id);
    }

    pub fn on_web_socket_handshake_request(
        &mut self,
        identifier: Identifier,
        time: Timestamp,
        request: &WebSocketHandshakeRequest,
    ) {
        let updated = self.live_update(identifier, |r| {
            r.request_method = Some("GET".to_string());
            r.request_headers = request.web_socket_header_fields.clone();
            r.web_socket_request_key3 = request.web_socket_request_key3.clone();
            r.start_time = Some(time);
        });
        if let Some(id) = updated {
            self.publish_updated(id);
        }
    }

    pub fn on_web_socket_handshake_response(
        &mut self,
        identifier: Identifier,
        time: Timestamp,
        response: &WebSocketHandshakeResponse,
    ) {
        let updated = self.live_update(identifier, |r| {
            r.status_code = response.status_code;
            r.status_text = response.status_text.clone();
            r.response_headers = response.web_socket_header_fields.clone();
            r.web_socket_challenge_response = response.web_socket_challenge_response.clone();
            r.response_received_time = Some(time);
        });
        if let Some(id) = updated {
            self.publish_updated(id);
        }
    }

    pub fn on_web_socket_closed(&mut self, identifier: Identifier, time: Timestamp) {
        if let Some(id) = self.live_update(identifier, |r| r.end_time = Some(time)) {
            self.publish_updated(id);
        }
    }

    /// Seed frames and resources from the backend's snapshot of the page.
    pub fn on_cached_resources(&mut self, main_frame: &FramePayload) {
        let main = self.add_frames_recursively(None, main_frame);
        self.update(main, |r| r.is_main_resource = true);
        self.main_resource = Some(main);
    }

    fn add_frames_recursively(
        &mut self,
        parent_frame_id: Option<&FrameId>,
        payload: &FramePayload,
    ) -> ResourceId {
        let frame_resource = &payload.resource;
        let id = self.store.create(
            None,
            &frame_resource.url,
            Some(frame_resource.loader.clone()),
        );
        self.update(id, |r| {
            r.apply_request(&frame_resource.request);
            r.apply_response(&frame_resource.response);
            r.resource_type = ResourceType::Document;
            r.finished = true;
        });

        let display_name = display_name_for_url(&frame_resource.url);
        self.frames
            .register_or_update(parent_frame_id, &payload.id, &display_name);
        self.sink
            .frame_registered(&payload.id, parent_frame_id, &display_name);
        self.attach(&payload.id, id);

        for child in &payload.children {
            self.add_frames_recursively(Some(&payload.id), child);
        }

        for cached in &payload.subresources {
            let sub = self.store.create(None, &cached.url, Some(cached.loader.clone()));
            self.update(sub, |r| {
                r.apply_cached(cached);
                r.finished = true;
            });
            self.attach(&payload.id, sub);
        }
        id
    }

    /// Count a console message against the resource loaded for `url`.
    pub fn add_console_message(&mut self, url: &str, level: ConsoleLevel, repeat_delta: u32) {
        let Some(id) = self.store.first_for_url(url).map(|r| r.id) else {
            return;
        };
        self.update(id, |r| match level {
            ConsoleLevel::Warning => r.warnings += repeat_delta,
            ConsoleLevel::Error => r.errors += repeat_delta,
            _ => {}
        });
    }

    pub fn clear_console_messages(&mut self) {
        let mut reachable = Vec::new();
        self.frames.for_all(|id| {
            reachable.push(id);
            false
        });
        for id in reachable {
            self.update(id, Resource::clear_console_counters);
        }
    }

    // Queries

    /// The first resource bound to `url`.
    pub fn resource_for_url(&self, url: &str) -> Option<&Resource> {
        self.store.first_for_url(url)
    }

    /// Every resource bound to `url`, in binding order.
    pub fn resources_for_url<'a>(&'a self, url: &str) -> impl Iterator<Item = &'a Resource> + 'a {
        self.store.all_for_url(url)
    }

    /// Depth-first walk of the frame tree; stops once `visit` returns true.
    /// Returns whether it stopped early.
    pub fn for_all_resources<'a>(&'a self, mut visit: impl FnMut(&'a Resource) -> bool) -> bool {
        self.frames
            .for_all(|id| self.store.get(id).is_some_and(|r| visit(r)))
    }

    pub fn resources_for_frame(&self, frame_id: &FrameId) -> Vec<&Resource> {
        self.frames
            .resources(frame_id)
            .iter()
            .filter_map(|id| self.store.get(*id))
            .collect()
    }

    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.store.get(id)
    }

    /// The live resource for an in-flight identifier.
    pub fn resource_by_identifier(&self, identifier: Identifier) -> Option<&Resource> {
        self.store.live(identifier).and_then(|id| self.store.get(id))
    }

    /// Prior hops of `resource`, oldest first.
    pub fn redirects_of<'a>(
        &'a self,
        resource: &'a Resource,
    ) -> impl Iterator<Item = &'a Resource> + 'a {
        resource
            .redirects
            .iter()
            .filter_map(move |id| self.store.get(*id))
    }

    pub fn main_resource(&self) -> Option<&Resource> {
        self.main_resource.and_then(|id| self.store.get(id))
    }

    pub fn frame(&self, frame_id: &FrameId) -> Option<&Frame> {
        self.frames.frame(frame_id)
    }

    pub fn root_frame_ids(&self) -> &[FrameId] {
        self.frames.roots()
    }

    pub fn frame_of(&self, resource: &Resource) -> Option<&FrameId> {
        self.frames.frame_of(resource.id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.store.in_flight_count()
    }

    /// Records currently held, including detached redirect history.
    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    // Internals

    fn update(&mut self, id: ResourceId, f: impl FnOnce(&mut Resource)) {
        if let Some(resource) = self.store.get_mut(id) {
            f(resource);
        }
    }

    fn live_update(
        &mut self,
        identifier: Identifier,
        f: impl FnOnce(&mut Resource),
    ) -> Option<ResourceId> {
        let resource = self.store.live_mut(identifier)?;
        f(&mut *resource);
        Some(resource.id)
    }

    fn attach_to_loader_frame(&mut self, id: ResourceId) {
        let Some(frame_id) = self.store.get(id).and_then(|r| r.frame_id()).cloned() else {
            return;
        };
        self.attach(&frame_id, id);
    }

    fn attach(&mut self, frame_id: &FrameId, id: ResourceId) {
        self.frames.attach(frame_id, id);
        if let Some(resource) = self.store.get(id) {
            self.sink.resource_attached(frame_id, resource);
        }
    }

    fn apply_clear(&mut self, outcome: &ClearOutcome) {
        for id in &outcome.detached {
            self.store.unbind(*id);
        }
        for frame_id in &outcome.removed_frames {
            self.sink.frame_removed(frame_id);
        }
        let frames = &self.frames;
        self.store.sweep(|id| frames.is_attached(id));
    }

    fn check_in_flight(&mut self) {
        let threshold = self.settings.in_flight_warn_threshold;
        if threshold == 0 || self.in_flight_warned {
            return;
        }
        let in_flight = self.store.in_flight_count();
        if in_flight >= threshold {
            self.in_flight_warned = true;
            warn!(
                in_flight,
                threshold, "In-flight loads reached threshold; completions may be missing"
            );
        }
    }

    fn publish_started(&mut self, id: ResourceId) {
        if let Some(resource) = self.store.get(id) {
            self.sink.resource_started(resource);
        }
    }

    fn publish_updated(&mut self, id: ResourceId) {
        if let Some(resource) = self.store.get(id) {
            self.sink.resource_updated(resource);
        }
    }

    fn publish_finished(&mut self, id: ResourceId) {
        if let Some(resource) = self.store.get(id) {
            self.sink.resource_finished(resource);
        }
    }
}
