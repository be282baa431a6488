use super::test_utils::{loader, recording_tracker, response};
use loadtree::protocol::CachedResourcePayload;
use loadtree::{FrameId, ResourceType};

fn cached(url: &str) -> CachedResourcePayload {
    CachedResourcePayload {
        url: url.to_string(),
        loader: loader("main", "L1", "http://site.test/"),
        resource_type: ResourceType::Image,
        encoded_size: 777,
        response: response(200, "image/png"),
    }
}

#[test]
fn test_memory_cache_hit_is_complete_immediately() {
    let mut tracker = recording_tracker();
    tracker.on_committed_load_for_frame(None, &loader("main", "L1", "http://site.test/"));
    tracker.sink_mut().take();

    tracker.on_loaded_from_memory_cache(4.0, &cached("http://site.test/logo.png"));

    let resource = tracker.resource_for_url("http://site.test/logo.png").unwrap();
    assert!(resource.cached);
    assert!(resource.finished);
    assert_eq!(resource.identifier, None);
    assert_eq!(resource.resource_type, ResourceType::Image);
    assert_eq!(resource.resource_size, 777);
    assert_eq!(resource.start_time, Some(4.0));
    assert_eq!(resource.response_received_time, Some(4.0));
    assert_eq!(resource.end_time, Some(4.0));
    assert_eq!(tracker.frame_of(resource), Some(&FrameId::new("main")));
    assert_eq!(tracker.in_flight_count(), 0);
    assert_eq!(
        tracker.sink().names(),
        vec!["resource-started", "resource-finished", "resource-attached"]
    );
}

#[test]
fn test_repeated_hits_bind_separately() {
    let mut tracker = recording_tracker();
    tracker.on_loaded_from_memory_cache(1.0, &cached("http://site.test/logo.png"));
    tracker.on_loaded_from_memory_cache(2.0, &cached("http://site.test/logo.png"));

    assert_eq!(
        tracker.resources_for_url("http://site.test/logo.png").count(),
        2
    );
    assert_eq!(
        tracker.resources_for_frame(&FrameId::new("main")).len(),
        2
    );
}
