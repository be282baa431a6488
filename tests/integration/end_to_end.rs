use super::test_utils::{loader, recording_tracker, request, response, visited_urls};
use loadtree::{Identifier, ResourceType};

const PAGE: &str = "http://site.test/index.html";
const STYLE: &str = "http://site.test/style.css";

#[test]
fn test_page_load_lifecycle() {
    let mut tracker = recording_tracker();
    let main = loader("main", "L1", PAGE);

    tracker.on_initial_request(Identifier(1), PAGE, main.clone());
    tracker.on_will_send_request(Identifier(1), 0.5, &request(PAGE), None);
    tracker.on_response_received(
        Identifier(1),
        0.8,
        ResourceType::Document,
        &response(200, "text/html"),
    );
    tracker.on_committed_load_for_frame(None, &main);

    tracker.on_initial_request(Identifier(2), STYLE, main.clone());
    tracker.on_will_send_request(Identifier(2), 0.9, &request(STYLE), None);
    tracker.on_response_received(
        Identifier(2),
        1.0,
        ResourceType::Stylesheet,
        &response(200, "text/css"),
    );
    tracker.on_content_length(Identifier(2), 1.1, 2048);
    tracker.on_finished(Identifier(2), 1.2);
    tracker.on_content_length(Identifier(1), 1.3, 4096);
    tracker.on_finished(Identifier(1), 1.4);

    assert_eq!(tracker.in_flight_count(), 0);
    assert_eq!(tracker.record_count(), 2);
    assert_eq!(visited_urls(&tracker), vec![PAGE, STYLE]);

    let page = tracker.main_resource().unwrap();
    assert_eq!(page.url, PAGE);
    assert!(page.is_main_resource);
    assert_eq!(page.resource_type, ResourceType::Document);
    assert_eq!(page.resource_size, 4096);
    assert_eq!(page.start_time, Some(0.5));
    assert_eq!(page.response_received_time, Some(0.8));
    assert_eq!(page.end_time, Some(1.4));
    assert_eq!(page.display_name(), "index.html");

    let style = tracker.resource_for_url(STYLE).unwrap();
    assert!(!style.is_main_resource);
    assert_eq!(style.mime_type.as_deref(), Some("text/css"));
    assert_eq!(style.document_url.as_deref(), Some(PAGE));
    assert_eq!(style.request_method.as_deref(), Some("GET"));

    let names = tracker.sink().names();
    assert_eq!(names.first(), Some(&"resource-started"));
    assert_eq!(names.last(), Some(&"resource-finished"));
    assert_eq!(names.iter().filter(|n| **n == "resource-finished").count(), 2);
    assert_eq!(names.iter().filter(|n| **n == "frame-registered").count(), 1);
}

#[test]
fn test_reload_replaces_page_resources() {
    let mut tracker = recording_tracker();
    let first = loader("main", "L1", PAGE);
    let second = loader("main", "L2", PAGE);

    for (ident, l) in [(1, &first), (2, &second)] {
        tracker.on_initial_request(Identifier(ident), PAGE, l.clone());
        tracker.on_response_received(
            Identifier(ident),
            1.0,
            ResourceType::Document,
            &response(200, "text/html"),
        );
        tracker.on_committed_load_for_frame(None, l);
        tracker.on_finished(Identifier(ident), 2.0);
    }

    let bound: Vec<_> = tracker.resources_for_url(PAGE).collect();
    assert_eq!(bound.len(), 1);
    assert_eq!(
        bound[0].loader_id().map(|l| l.to_string()),
        Some("L2".to_string())
    );
    assert_eq!(tracker.main_resource().unwrap().id, bound[0].id);
    assert_eq!(tracker.record_count(), 1);
}

#[test]
fn test_relative_url_load_in_named_frame() {
    let mut tracker = recording_tracker();
    let f = loader("f", "L", "/a");

    tracker.on_initial_request(Identifier(1), "/a", f.clone());
    tracker.on_will_send_request(Identifier(1), 0.0, &request("/a"), None);
    tracker.on_response_received(
        Identifier(1),
        1.0,
        ResourceType::Document,
        &response(200, "text/html"),
    );
    tracker.on_finished(Identifier(1), 2.0);

    let resource = tracker.resource_for_url("/a").unwrap();
    assert!(resource.finished);
    assert_eq!(resource.status_code, Some(200));
    assert_eq!(tracker.frame_of(resource), Some(&f.frame_id));
    assert_eq!(resource.display_name(), "a");
    assert_eq!(tracker.resources_for_frame(&f.frame_id).len(), 1);
}
