//! CLI presentation: render a tracker's resources in frame-tree order.

use crate::cli::route::ReplayStats;
use crate::error::TrackerError;
use crate::resource::Resource;
use crate::sink::TrackerSink;
use crate::tracker::ResourceTracker;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde::Serialize;

#[derive(Serialize)]
struct ResourceRow<'a> {
    frame_id: Option<&'a str>,
    #[serde(flatten)]
    resource: &'a Resource,
}

fn flags(resource: &Resource) -> String {
    let mut flags = Vec::new();
    if resource.is_main_resource {
        flags.push("main".to_string());
    }
    if resource.cached {
        flags.push("cached".to_string());
    }
    if resource.failed {
        flags.push("failed".to_string());
    } else if !resource.finished {
        flags.push("pending".to_string());
    }
    if !resource.redirects.is_empty() {
        flags.push(format!("{} redirects", resource.redirects.len()));
    }
    flags.join(", ")
}

pub fn format_table<S: TrackerSink>(tracker: &ResourceTracker<S>, stats: &ReplayStats) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Frame", "Resource", "Type", "Status", "Size", "Flags"]);

    let mut count = 0;
    tracker.for_all_resources(|resource| {
        count += 1;
        let frame = tracker
            .frame_of(resource)
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = resource
            .status_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            frame,
            resource.url.clone(),
            resource.resource_type.to_string(),
            status,
            resource.resource_size.to_string(),
            flags(resource),
        ]);
        false
    });

    format!(
        "{}\n{} resources in {} root frames; {} loads in flight; {} notifications replayed, {} skipped",
        table,
        count,
        tracker.root_frame_ids().len(),
        tracker.in_flight_count(),
        stats.dispatched,
        stats.skipped
    )
}

pub fn format_json<S: TrackerSink>(tracker: &ResourceTracker<S>) -> Result<String, TrackerError> {
    let mut rows = Vec::new();
    tracker.for_all_resources(|resource| {
        rows.push(ResourceRow {
            frame_id: tracker.frame_of(resource).map(|f| f.as_str()),
            resource,
        });
        false
    });
    Ok(serde_json::to_string_pretty(&rows)?)
}
