use jiff::Timestamp;
use tracing::warn;

use super::{Aging, BugRecord, CommentThread, Person, Priority, TeamInfo};
use crate::jira::{browse_url, JiraUser, NamedValue, RawIssue, TeamValue};
use crate::time::age_in_days;

/// Per-run inputs that are not part of an issue
pub struct NormalizeContext<'a> {
    /// Jira site URL used to build browse links
    pub base_url: &'a str,
    /// Id of the Atlassian Team custom field, when the site has one
    pub team_field_id: Option<&'a str>,
    /// Instant ages are measured against
    pub now: Timestamp,
}

/// Build a [`BugRecord`] from a raw issue, defaulting every missing field
///
/// Comments and their summary are attached afterwards with
/// [`BugRecord::with_comments`].
pub fn normalize(raw: &RawIssue, ctx: &NormalizeContext<'_>) -> BugRecord {
    let fields = &raw.fields;

    let days_open = match fields.created.as_deref() {
        Some(created) => age_in_days(created, ctx.now).unwrap_or_else(|e| {
            warn!("{}: could not compute bug age: {:#}", raw.key, e);
            0
        }),
        None => 0,
    };

    BugRecord {
        key: raw.key.clone(),
        summary: fields.summary.clone().unwrap_or_default(),
        status: named_or_unknown(fields.status.as_ref()),
        priority: fields
            .priority
            .as_ref()
            .map(|p| Priority::from(p.name.as_str()))
            .unwrap_or_else(Priority::unknown),
        url: browse_url(ctx.base_url, &raw.key),
        aging: Aging {
            created_date: fields.created.clone(),
            days_open,
        },
        last_updated: fields.updated.clone(),
        team: TeamInfo {
            team_name: resolve_team(raw, ctx.team_field_id),
            components: fields
                .components
                .iter()
                .flatten()
                .map(|c| c.name.clone())
                .filter(|name| !name.is_empty())
                .collect(),
            labels: fields.labels.clone().unwrap_or_default(),
        },
        reporter: person(fields.reporter.as_ref(), "Unknown"),
        assignee: person(fields.assignee.as_ref(), "Unassigned"),
        comments: CommentThread::default(),
    }
}

fn named_or_unknown(value: Option<&NamedValue>) -> String {
    value
        .map(|v| v.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn person(user: Option<&JiraUser>, default_name: &str) -> Person {
    match user {
        Some(user) => Person {
            name: user.label().unwrap_or_else(|| default_name.to_string()),
            email: user.email_address.clone(),
        },
        None => Person {
            name: default_name.to_string(),
            email: None,
        },
    }
}

/// Team name from the Atlassian Team custom field, if set and decodable
fn resolve_team(raw: &RawIssue, team_field_id: Option<&str>) -> Option<String> {
    let value = raw.fields.custom.get(team_field_id?)?;
    if value.is_null() {
        return None;
    }

    match serde_json::from_value::<TeamValue>(value.clone()) {
        Ok(team) => team.team_name(),
        Err(e) => {
            warn!("{}: unrecognised team field value: {}", raw.key, e);
            None
        }
    }
}
