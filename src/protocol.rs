//! Inbound Protocol
//!
//! Plain-data payloads delivered by the instrumentation backend, and the
//! `Notification` envelope that names which tracker handler receives them.
//! On the wire each notification is `{"method": "<name>", "params": {...}}`
//! with camelCase field names.

use crate::error::TrackerError;
use crate::resource::ResourceType;
use crate::types::{FrameId, Headers, Identifier, LoaderId, Timestamp};
use serde::{Deserialize, Serialize};

/// The navigation that produced a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderRef {
    pub frame_id: FrameId,
    pub loader_id: LoaderId,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestPayload {
    pub url: String,
    pub http_method: Option<String>,
    pub http_header_fields: Headers,
    pub request_form_data: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawHeaders {
    pub request_headers: Headers,
    pub response_headers: Headers,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponsePayload {
    /// Backends send a placeholder response object instead of omitting it.
    pub is_null: bool,
    pub mime_type: Option<String>,
    pub expected_content_length: Option<i64>,
    pub text_encoding_name: Option<String>,
    pub suggested_filename: Option<String>,
    pub http_status_code: Option<u16>,
    pub http_status_text: Option<String>,
    pub http_header_fields: Headers,
    pub connection_reused: bool,
    pub connection_id: Option<u64>,
    pub was_cached: bool,
    pub timing: Option<serde_json::Value>,
    pub raw_headers: Option<RawHeaders>,
}

impl ResponsePayload {
    /// True when the payload carries an actual response.
    pub fn is_present(&self) -> bool {
        !self.is_null
    }
}

/// A resource served from the memory cache, or listed in a frame snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedResourcePayload {
    pub url: String,
    pub loader: LoaderRef,
    #[serde(rename = "type", default)]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub encoded_size: u64,
    #[serde(default)]
    pub response: ResponsePayload,
}

/// The document resource of a frame in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResourcePayload {
    pub url: String,
    pub loader: LoaderRef,
    #[serde(default)]
    pub request: RequestPayload,
    #[serde(default)]
    pub response: ResponsePayload,
}

/// One frame of the backend's cached-resource snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FramePayload {
    pub id: FrameId,
    pub resource: FrameResourcePayload,
    #[serde(default)]
    pub children: Vec<FramePayload>,
    #[serde(default)]
    pub subresources: Vec<CachedResourcePayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebSocketHandshakeRequest {
    pub web_socket_header_fields: Headers,
    pub web_socket_request_key3: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebSocketHandshakeResponse {
    pub status_code: Option<u16>,
    pub status_text: Option<String>,
    pub web_socket_header_fields: Headers,
    pub web_socket_challenge_response: Option<String>,
}

/// One inbound notification, named after the backend method that sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
#[serde(rename_all_fields = "camelCase")]
pub enum Notification {
    #[serde(rename = "identifierForInitialRequest")]
    InitialRequest {
        identifier: Identifier,
        url: String,
        loader: LoaderRef,
    },
    #[serde(rename = "willSendRequest")]
    WillSendRequest {
        identifier: Identifier,
        time: Timestamp,
        request: RequestPayload,
        #[serde(default)]
        redirect_response: Option<ResponsePayload>,
    },
    #[serde(rename = "markResourceAsCached")]
    MarkCached { identifier: Identifier },
    #[serde(rename = "didReceiveResponse")]
    ResponseReceived {
        identifier: Identifier,
        time: Timestamp,
        resource_type: ResourceType,
        response: ResponsePayload,
    },
    #[serde(rename = "didReceiveContentLength")]
    ContentLength {
        identifier: Identifier,
        time: Timestamp,
        length_received: u64,
    },
    #[serde(rename = "didFinishLoading")]
    Finished {
        identifier: Identifier,
        finish_time: Timestamp,
    },
    #[serde(rename = "didFailLoading")]
    Failed {
        identifier: Identifier,
        time: Timestamp,
        #[serde(default)]
        localized_description: String,
    },
    #[serde(rename = "didLoadResourceFromMemoryCache")]
    LoadedFromMemoryCache {
        time: Timestamp,
        cached_resource: CachedResourcePayload,
    },
    #[serde(rename = "didCommitLoadForFrame")]
    CommittedLoadForFrame {
        #[serde(default)]
        parent_frame_id: Option<FrameId>,
        loader: LoaderRef,
    },
    #[serde(rename = "frameDetachedFromParent")]
    FrameDetached { frame_id: FrameId },
    #[serde(rename = "didCreateWebSocket")]
    WebSocketCreated {
        identifier: Identifier,
        request_url: String,
    },
    #[serde(rename = "willSendWebSocketHandshakeRequest")]
    WebSocketHandshakeRequest {
        identifier: Identifier,
        time: Timestamp,
        request: WebSocketHandshakeRequest,
    },
    #[serde(rename = "didReceiveWebSocketHandshakeResponse")]
    WebSocketHandshakeResponse {
        identifier: Identifier,
        time: Timestamp,
        response: WebSocketHandshakeResponse,
    },
    #[serde(rename = "didCloseWebSocket")]
    WebSocketClosed {
        identifier: Identifier,
        time: Timestamp,
    },
    #[serde(rename = "cachedResources")]
    CachedResources { main_frame: FramePayload },
}

impl Notification {
    /// Decode one `{"method", "params"}` object.
    pub fn from_json(line: &str) -> Result<Self, TrackerError> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn method(&self) -> &'static str {
        match self {
            Notification::InitialRequest { .. } => "identifierForInitialRequest",
            Notification::WillSendRequest { .. } => "willSendRequest",
            Notification::MarkCached { .. } => "markResourceAsCached",
            Notification::ResponseReceived { .. } => "didReceiveResponse",
            Notification::ContentLength { .. } => "didReceiveContentLength",
            Notification::Finished { .. } => "didFinishLoading",
            Notification::Failed { .. } => "didFailLoading",
            Notification::LoadedFromMemoryCache { .. } => "didLoadResourceFromMemoryCache",
            Notification::CommittedLoadForFrame { .. } => "didCommitLoadForFrame",
            Notification::FrameDetached { .. } => "frameDetachedFromParent",
            Notification::WebSocketCreated { .. } => "didCreateWebSocket",
            Notification::WebSocketHandshakeRequest { .. } => "willSendWebSocketHandshakeRequest",
            Notification::WebSocketHandshakeResponse { .. } => {
                "didReceiveWebSocketHandshakeResponse"
            }
            Notification::WebSocketClosed { .. } => "didCloseWebSocket",
            Notification::CachedResources { .. } => "cachedResources",
        }
    }
}
