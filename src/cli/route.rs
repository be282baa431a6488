//! CLI route: load configuration and run commands against a tracker.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_json, format_table};
use crate::config::{ConfigLoader, LoadtreeConfig};
use crate::error::TrackerError;
use crate::protocol::Notification;
use crate::sink::{TracingSink, TrackerSink};
use crate::tracker::ResourceTracker;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Counts from one replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub dispatched: usize,
    pub skipped: usize,
}

/// Feed every line of `reader` to `tracker`.
///
/// Blank lines are ignored. Lines that fail to decode are logged and skipped,
/// or abort the replay when `strict` is set.
pub fn replay<R: BufRead, S: TrackerSink>(
    reader: R,
    tracker: &mut ResourceTracker<S>,
    strict: bool,
) -> Result<ReplayStats, TrackerError> {
    let mut stats = ReplayStats::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        match Notification::from_json(&line) {
            Ok(notification) => {
                tracker.dispatch(notification);
                stats.dispatched += 1;
            }
            Err(e) if strict => {
                return Err(TrackerError::InvalidLine {
                    line: line_no,
                    message: e.to_string(),
                });
            }
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping undecodable notification");
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

pub struct RunContext {
    config: LoadtreeConfig,
}

impl RunContext {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, TrackerError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    pub fn with_config(config: LoadtreeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoadtreeConfig {
        &self.config
    }

    pub fn execute(&self, command: &Commands) -> Result<String, TrackerError> {
        match command {
            Commands::Replay {
                input,
                format,
                strict,
            } => self.handle_replay(input, format, *strict),
            Commands::Config => self.handle_config(),
        }
    }

    fn handle_config(&self) -> Result<String, TrackerError> {
        toml::to_string_pretty(&self.config)
            .map_err(|e| TrackerError::Config(format!("Failed to render configuration: {}", e)))
    }

    fn handle_replay(&self, input: &Path, format: &str, strict: bool) -> Result<String, TrackerError> {
        if format != "text" && format != "json" {
            return Err(TrackerError::Config(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                format
            )));
        }

        let mut tracker =
            ResourceTracker::new(TracingSink).with_settings(self.config.tracker.clone());
        let stats = if input.as_os_str() == "-" {
            replay(std::io::stdin().lock(), &mut tracker, strict)?
        } else {
            replay(BufReader::new(File::open(input)?), &mut tracker, strict)?
        };
        info!(
            dispatched = stats.dispatched,
            skipped = stats.skipped,
            "Replay complete"
        );

        match format {
            "json" => format_json(&tracker),
            _ => Ok(format_table(&tracker, &stats)),
        }
    }
}
