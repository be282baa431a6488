//! CLI domain: parse, route, and presentation for the replay tool.

mod parse;
mod presentation;
mod route;

pub use parse::{Cli, Commands};
pub use presentation::{format_json, format_table};
pub use route::{replay, ReplayStats, RunContext};
