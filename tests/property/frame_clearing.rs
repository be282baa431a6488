//! Random navigation sequences never leave stale URL bindings behind.

use loadtree::protocol::{LoaderRef, RequestPayload, ResponsePayload};
use loadtree::{FrameId, Identifier, LoaderId, ResourceTracker, ResourceType};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Step {
    Load { frame: u8, generation: u8, url: u8 },
    Commit { frame: u8, generation: u8 },
    Detach { frame: u8 },
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0u8..3, 0u8..3, 0u8..6).prop_map(|(frame, generation, url)| Step::Load {
            frame,
            generation,
            url
        }),
        2 => (0u8..3, 0u8..3).prop_map(|(frame, generation)| Step::Commit { frame, generation }),
        1 => (1u8..3).prop_map(|frame| Step::Detach { frame }),
    ]
}

fn frame_id(frame: u8) -> FrameId {
    FrameId::new(format!("f{}", frame))
}

fn loader(frame: u8, generation: u8) -> LoaderRef {
    LoaderRef {
        frame_id: frame_id(frame),
        loader_id: LoaderId::new(format!("f{}-g{}", frame, generation)),
        url: format!("http://site.test/f{}/index.html", frame),
    }
}

fn parent_of(frame: u8) -> Option<FrameId> {
    match frame {
        0 => None,
        1 => Some(frame_id(0)),
        _ => Some(frame_id(1)),
    }
}

proptest! {
    #[test]
    fn url_bindings_follow_frame_membership(steps in prop::collection::vec(step(), 1..40)) {
        let mut tracker = ResourceTracker::default();
        let mut next_identifier = 0u64;
        let mut urls = HashSet::new();

        for step in steps {
            match step {
                Step::Load { frame, generation, url } => {
                    next_identifier += 1;
                    let id = Identifier(next_identifier);
                    let url = format!("http://site.test/asset/{}", url);
                    urls.insert(url.clone());
                    tracker.on_initial_request(id, &url, loader(frame, generation));
                    tracker.on_will_send_request(
                        id,
                        0.0,
                        &RequestPayload { url: url.clone(), ..RequestPayload::default() },
                        None,
                    );
                    tracker.on_response_received(
                        id,
                        0.0,
                        ResourceType::Other,
                        &ResponsePayload::default(),
                    );
                    tracker.on_finished(id, 0.0);
                }
                Step::Commit { frame, generation } => {
                    tracker.on_committed_load_for_frame(
                        parent_of(frame).as_ref(),
                        &loader(frame, generation),
                    );
                }
                Step::Detach { frame } => tracker.on_frame_detached(&frame_id(frame)),
            }
        }

        // Every finished load that is still URL-bound is attached to a frame.
        for url in &urls {
            for resource in tracker.resources_for_url(url) {
                prop_assert!(tracker.frame_of(resource).is_some());
            }
        }
        prop_assert_eq!(tracker.in_flight_count(), 0);

        // Every reachable resource is URL-bound.
        let mut reachable = Vec::new();
        tracker.for_all_resources(|r| {
            reachable.push((r.id, r.url.clone()));
            false
        });
        for (id, url) in reachable {
            prop_assert!(tracker.resources_for_url(&url).any(|r| r.id == id));
        }
    }
}
