//! Resource Records
//!
//! A `Resource` describes one network load attempt. Records are owned by the
//! store arena and mutated only by tracker handlers; consumers see them through
//! shared borrows or cloned snapshots.

use crate::protocol::{CachedResourcePayload, LoaderRef, RequestPayload, ResponsePayload};
use crate::types::{FrameId, Headers, Identifier, LoaderId, ResourceId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse content classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceType {
    Document,
    Stylesheet,
    Image,
    Font,
    Script,
    Xhr,
    Media,
    WebSocket,
    #[default]
    Other,
}

impl ResourceType {
    /// Map a backend type name. Unknown names classify as `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Document" => ResourceType::Document,
            "Stylesheet" => ResourceType::Stylesheet,
            "Image" => ResourceType::Image,
            "Font" => ResourceType::Font,
            "Script" => ResourceType::Script,
            "XHR" => ResourceType::Xhr,
            "Media" => ResourceType::Media,
            "WebSocket" => ResourceType::WebSocket,
            _ => ResourceType::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResourceType::Document => "Document",
            ResourceType::Stylesheet => "Stylesheet",
            ResourceType::Image => "Image",
            ResourceType::Font => "Font",
            ResourceType::Script => "Script",
            ResourceType::Xhr => "XHR",
            ResourceType::Media => "Media",
            ResourceType::WebSocket => "WebSocket",
            ResourceType::Other => "Other",
        }
    }
}

impl From<String> for ResourceType {
    fn from(name: String) -> Self {
        ResourceType::from_name(&name)
    }
}

impl From<ResourceType> for String {
    fn from(kind: ResourceType) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One network load attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Arena handle; stable for the life of the record.
    pub id: ResourceId,
    /// Present while the load is in flight.
    pub identifier: Option<Identifier>,
    pub url: String,
    pub document_url: Option<String>,
    /// Absent only for WebSocket resources.
    pub loader: Option<LoaderRef>,
    pub is_main_resource: bool,
    pub resource_type: ResourceType,

    pub start_time: Option<Timestamp>,
    pub response_received_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub timing: Option<serde_json::Value>,

    pub request_method: Option<String>,
    pub request_headers: Headers,
    pub request_form_data: Option<String>,

    pub response_headers: Headers,
    pub status_code: Option<u16>,
    pub status_text: Option<String>,
    pub mime_type: Option<String>,
    pub expected_content_length: Option<i64>,
    pub text_encoding_name: Option<String>,
    pub suggested_filename: Option<String>,
    pub connection_reused: bool,
    pub connection_id: Option<u64>,

    pub resource_size: u64,
    pub cached: bool,
    pub failed: bool,
    pub finished: bool,
    pub failure_message: Option<String>,

    pub web_socket_request_key3: Option<String>,
    pub web_socket_challenge_response: Option<String>,

    pub warnings: u32,
    pub errors: u32,

    /// Prior hops of the same logical request, oldest first.
    pub redirects: Vec<ResourceId>,
}

impl Resource {
    pub fn new(
        id: ResourceId,
        identifier: Option<Identifier>,
        url: impl Into<String>,
        loader: Option<LoaderRef>,
    ) -> Self {
        let url = url.into();
        let document_url = loader.as_ref().map(|l| l.url.clone());
        Resource {
            id,
            identifier,
            url,
            document_url,
            loader,
            is_main_resource: false,
            resource_type: ResourceType::Other,
            start_time: None,
            response_received_time: None,
            end_time: None,
            timing: None,
            request_method: None,
            request_headers: Headers::new(),
            request_form_data: None,
            response_headers: Headers::new(),
            status_code: None,
            status_text: None,
            mime_type: None,
            expected_content_length: None,
            text_encoding_name: None,
            suggested_filename: None,
            connection_reused: false,
            connection_id: None,
            resource_size: 0,
            cached: false,
            failed: false,
            finished: false,
            failure_message: None,
            web_socket_request_key3: None,
            web_socket_challenge_response: None,
            warnings: 0,
            errors: 0,
            redirects: Vec::new(),
        }
    }

    pub fn frame_id(&self) -> Option<&FrameId> {
        self.loader.as_ref().map(|l| &l.frame_id)
    }

    pub fn loader_id(&self) -> Option<&LoaderId> {
        self.loader.as_ref().map(|l| &l.loader_id)
    }

    pub fn apply_request(&mut self, request: &RequestPayload) {
        self.request_method = request.http_method.clone();
        self.request_headers = request.http_header_fields.clone();
        self.request_form_data = request.request_form_data.clone();
    }

    pub fn apply_response(&mut self, response: &ResponsePayload) {
        self.mime_type = response.mime_type.clone();
        self.expected_content_length = response.expected_content_length;
        self.text_encoding_name = response.text_encoding_name.clone();
        self.suggested_filename = response.suggested_filename.clone();
        self.status_code = response.http_status_code;
        self.status_text = response.http_status_text.clone();

        self.response_headers = response.http_header_fields.clone();
        self.connection_reused = response.connection_reused;
        self.connection_id = response.connection_id;

        if response.was_cached {
            self.cached = true;
        } else {
            self.timing = response.timing.clone();
        }

        if let Some(raw) = &response.raw_headers {
            self.request_headers = raw.request_headers.clone();
            self.response_headers = raw.response_headers.clone();
        }
    }

    pub fn apply_cached(&mut self, cached: &CachedResourcePayload) {
        self.resource_type = cached.resource_type;
        self.resource_size = cached.encoded_size;
        self.apply_response(&cached.response);
    }

    /// Mark the load complete. `finished` and `failed` only ever turn on.
    pub fn mark_finished(&mut self, time: Timestamp, failure: Option<String>) {
        self.finished = true;
        if failure.is_some() {
            self.failed = true;
            self.failure_message = failure;
        }
        self.end_time = Some(time);
    }

    pub fn clear_console_counters(&mut self) {
        self.warnings = 0;
        self.errors = 0;
    }

    /// Short label: last path segment, else host, else the raw URL.
    pub fn display_name(&self) -> String {
        display_name_for_url(&self.url)
    }
}

pub fn display_name_for_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => {
            if let Some(segment) = parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            {
                return segment.to_string();
            }
            match parsed.host_str() {
                Some(host) => host.to_string(),
                None => raw.to_string(),
            }
        }
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').find(|s| !s.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_string()),
    }
}
