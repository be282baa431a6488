use super::test_utils::loader;
use loadtree::config::TrackerSettings;
use loadtree::{Identifier, ResourceTracker};
use std::io::Write;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn run_loads(threshold: usize, loads: u64) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut tracker = ResourceTracker::default().with_settings(TrackerSettings {
            in_flight_warn_threshold: threshold,
        });
        let l = loader("main", "L1", "http://site.test/");
        for n in 0..loads {
            let url = format!("http://site.test/{}.js", n);
            tracker.on_initial_request(Identifier(n), &url, l.clone());
        }
        assert_eq!(tracker.in_flight_count(), loads as usize);
    });
    logs.contents()
}

#[test]
fn test_warns_once_when_threshold_is_reached() {
    let output = run_loads(3, 6);
    assert_eq!(output.matches("In-flight loads reached threshold").count(), 1);
}

#[test]
fn test_no_warning_below_threshold() {
    assert!(run_loads(10, 4).is_empty());
}

#[test]
fn test_zero_threshold_disables_warning() {
    assert!(run_loads(0, 20).is_empty());
}
