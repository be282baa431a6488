use super::test_utils::{complete_load, loader, recording_tracker, visited_urls};
use loadtree::{FrameId, ResourceType, TrackerEvent};

fn three_level_tree() -> loadtree::ResourceTracker<loadtree::RecordingSink> {
    let mut tracker = recording_tracker();
    let main = loader("main", "L1", "http://site.test/");
    let sub = loader("sub", "S1", "http://site.test/sub.html");
    let deep = loader("deep", "D1", "http://site.test/deep.html");
    tracker.on_committed_load_for_frame(None, &main);
    tracker.on_committed_load_for_frame(Some(&main.frame_id), &sub);
    tracker.on_committed_load_for_frame(Some(&sub.frame_id), &deep);
    complete_load(&mut tracker, 1, "http://site.test/main.js", &main, ResourceType::Script);
    complete_load(&mut tracker, 2, "http://site.test/sub.js", &sub, ResourceType::Script);
    complete_load(&mut tracker, 3, "http://site.test/deep.js", &deep, ResourceType::Script);
    tracker
}

#[test]
fn test_detach_removes_whole_subtree() {
    let mut tracker = three_level_tree();
    tracker.sink_mut().take();

    tracker.on_frame_detached(&FrameId::new("sub"));

    assert!(tracker.frame(&FrameId::new("sub")).is_none());
    assert!(tracker.frame(&FrameId::new("deep")).is_none());
    assert!(tracker
        .frame(&FrameId::new("main"))
        .unwrap()
        .child_frame_ids
        .is_empty());
    assert!(tracker.resource_for_url("http://site.test/sub.js").is_none());
    assert!(tracker.resource_for_url("http://site.test/deep.js").is_none());
    assert_eq!(visited_urls(&tracker), vec!["http://site.test/main.js"]);

    let removed: Vec<&str> = tracker
        .sink()
        .events
        .iter()
        .filter_map(|e| match e {
            TrackerEvent::FrameRemoved { frame_id } => Some(frame_id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(removed, vec!["deep", "sub"]);
}

#[test]
fn test_detach_of_root_empties_the_tree() {
    let mut tracker = three_level_tree();
    tracker.on_frame_detached(&FrameId::new("main"));

    assert!(tracker.root_frame_ids().is_empty());
    assert!(visited_urls(&tracker).is_empty());
    assert_eq!(tracker.record_count(), 0);
}

#[test]
fn test_detach_of_unknown_frame_is_silent() {
    let mut tracker = three_level_tree();
    tracker.sink_mut().take();

    tracker.on_frame_detached(&FrameId::new("ghost"));

    assert!(tracker.sink().events.is_empty());
    assert_eq!(visited_urls(&tracker).len(), 3);
}

#[test]
fn test_detach_keeps_in_flight_loads_indexed() {
    let mut tracker = three_level_tree();
    tracker.on_initial_request(
        loadtree::Identifier(10),
        "http://site.test/late.js",
        loader("sub", "S1", "http://site.test/sub.html"),
    );

    tracker.on_frame_detached(&FrameId::new("sub"));

    let late = tracker
        .resource_by_identifier(loadtree::Identifier(10))
        .unwrap();
    assert_eq!(late.url, "http://site.test/late.js");
}
