use super::test_utils::{complete_load, loader, recording_tracker};
use loadtree::{ConsoleLevel, ResourceType};

const SCRIPT: &str = "http://site.test/app.js";

#[test]
fn test_console_messages_count_warnings_and_errors() {
    let mut tracker = recording_tracker();
    let main = loader("main", "L1", "http://site.test/");
    complete_load(&mut tracker, 1, SCRIPT, &main, ResourceType::Script);

    tracker.add_console_message(SCRIPT, ConsoleLevel::Warning, 2);
    tracker.add_console_message(SCRIPT, ConsoleLevel::Error, 1);
    tracker.add_console_message(SCRIPT, ConsoleLevel::Log, 5);
    tracker.add_console_message(SCRIPT, ConsoleLevel::Warning, 1);

    let script = tracker.resource_for_url(SCRIPT).unwrap();
    assert_eq!(script.warnings, 3);
    assert_eq!(script.errors, 1);
}

#[test]
fn test_clear_console_messages_resets_reachable_resources() {
    let mut tracker = recording_tracker();
    let main = loader("main", "L1", "http://site.test/");
    tracker.on_committed_load_for_frame(None, &main);
    complete_load(&mut tracker, 1, SCRIPT, &main, ResourceType::Script);
    tracker.add_console_message(SCRIPT, ConsoleLevel::Error, 4);
    tracker.add_console_message(SCRIPT, ConsoleLevel::Warning, 2);

    tracker.clear_console_messages();

    let script = tracker.resource_for_url(SCRIPT).unwrap();
    assert_eq!(script.errors, 0);
    assert_eq!(script.warnings, 0);
}

#[test]
fn test_clear_console_messages_skips_uncommitted_frames() {
    let mut tracker = recording_tracker();
    let pending = loader("pending", "P1", "http://site.test/pending.html");
    complete_load(&mut tracker, 1, SCRIPT, &pending, ResourceType::Script);
    tracker.add_console_message(SCRIPT, ConsoleLevel::Error, 4);

    tracker.clear_console_messages();

    let script = tracker.resource_for_url(SCRIPT).unwrap();
    assert!(tracker.frame_of(script).is_some());
    assert_eq!(script.errors, 4);
}

#[test]
fn test_console_message_for_unknown_url_is_ignored() {
    let mut tracker = recording_tracker();
    tracker.add_console_message("http://nowhere.test/", ConsoleLevel::Error, 1);
    assert_eq!(tracker.record_count(), 0);
    assert!(tracker.sink().events.is_empty());
}
