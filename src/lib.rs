pub mod bug;
pub mod cache;
pub mod claude;
pub mod cli;
pub mod config;
pub mod error;
pub mod jira;
pub mod notify;
pub mod report;
pub mod summarize;
pub mod time;

#[cfg(test)]
mod test_utils;

pub use bug::{BugRecord, Comment, Priority};
pub use config::Config;
pub use report::{render, render_report, Report};
