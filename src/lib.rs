//! Loadtree: Resource Load Tracking
//!
//! Correlates the asynchronous load-lifecycle notifications of a browser
//! instrumentation backend into resource records, indexed by in-flight
//! identifier and by URL, and organized into the page's frame tree.

pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod logging;
pub mod protocol;
pub mod resource;
pub mod sink;
pub mod store;
pub mod tracker;
pub mod types;

pub use error::TrackerError;
pub use protocol::{LoaderRef, Notification};
pub use resource::{Resource, ResourceType};
pub use sink::{RecordingSink, TrackerEvent, TrackerSink};
pub use tracker::{ConsoleLevel, ResourceTracker};
pub use types::{FrameId, Identifier, LoaderId, ResourceId};
