mod client;
pub mod extract;
mod models;

pub use client::*;
pub use models::*;

#[cfg(test)]
pub use client::MockJira;

/// Fields requested for every issue; the Team field id is appended when known
pub const ISSUE_FIELDS: &[&str] = &[
    "summary",
    "status",
    "priority",
    "assignee",
    "reporter",
    "comment",
    "created",
    "updated",
    "components",
    "labels",
];

/// Field list for a search, including the Team custom field when discovered
pub fn issue_fields(team_field_id: Option<&str>) -> Vec<String> {
    ISSUE_FIELDS
        .iter()
        .copied()
        .chain(team_field_id)
        .map(str::to_string)
        .collect()
}

/// Browser URL of an issue
pub fn browse_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
}
