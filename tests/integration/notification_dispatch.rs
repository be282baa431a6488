use super::test_utils::recording_tracker;
use loadtree::{Identifier, Notification, ResourceType, TrackerError};

const SESSION: &[&str] = &[
    r#"{"method":"identifierForInitialRequest","params":{"identifier":1,"url":"http://site.test/","loader":{"frameId":"1","loaderId":"L1","url":"http://site.test/"}}}"#,
    r#"{"method":"willSendRequest","params":{"identifier":1,"time":0.1,"request":{"url":"http://site.test/","httpMethod":"GET"},"redirectResponse":{"isNull":true}}}"#,
    r#"{"method":"willSendRequest","params":{"identifier":1,"time":0.2,"request":{"url":"https://site.test/","httpMethod":"GET"},"redirectResponse":{"httpStatusCode":301,"mimeType":"text/html"}}}"#,
    r#"{"method":"didReceiveResponse","params":{"identifier":1,"time":0.3,"resourceType":"Document","response":{"httpStatusCode":200,"mimeType":"text/html","httpHeaderFields":{"Content-Type":"text/html"}}}}"#,
    r#"{"method":"didCommitLoadForFrame","params":{"loader":{"frameId":1,"loaderId":"L1","url":"http://site.test/"}}}"#,
    r#"{"method":"didReceiveContentLength","params":{"identifier":1,"time":0.4,"lengthReceived":1024}}"#,
    r#"{"method":"didFinishLoading","params":{"identifier":1,"finishTime":0.5}}"#,
];

#[test]
fn test_dispatch_replays_a_recorded_session() {
    let mut tracker = recording_tracker();
    for line in SESSION {
        tracker.dispatch(Notification::from_json(line).unwrap());
    }

    let page = tracker.resource_for_url("https://site.test/").unwrap();
    assert_eq!(page.resource_type, ResourceType::Document);
    assert_eq!(page.status_code, Some(200));
    assert_eq!(page.resource_size, 1024);
    assert!(page.finished);
    assert_eq!(
        page.response_headers.get("Content-Type").map(String::as_str),
        Some("text/html")
    );

    let hops: Vec<&str> = tracker.redirects_of(page).map(|r| r.url.as_str()).collect();
    assert_eq!(hops, vec!["http://site.test/"]);
    assert_eq!(tracker.in_flight_count(), 0);
    assert!(tracker.resource_by_identifier(Identifier(1)).is_none());
    assert_eq!(tracker.root_frame_ids().len(), 1);
    assert_eq!(tracker.root_frame_ids()[0].as_str(), "1");
}

#[test]
fn test_unknown_method_fails_to_decode() {
    let result = Notification::from_json(
        r#"{"method":"setOverrideContent","params":{"identifier":1,"content":"x"}}"#,
    );
    assert!(matches!(result, Err(TrackerError::Decode(_))));
}

#[test]
fn test_notifications_round_trip_through_serde() {
    let notification = Notification::from_json(SESSION[5]).unwrap();
    assert_eq!(notification.method(), "didReceiveContentLength");
    let encoded = serde_json::to_string(&notification).unwrap();
    assert_eq!(Notification::from_json(&encoded).unwrap(), notification);
}
