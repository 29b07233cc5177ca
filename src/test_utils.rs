//! Test utilities for jira-bug-report
#![cfg(test)]

use crate::bug::{Aging, BugRecord, Comment, CommentThread, Person, Priority, TeamInfo};
use crate::jira::{CommentPage, JiraUser, NamedValue, RawComment, RawFields, RawIssue};

/// Create a test bug with the given priority and age
pub fn bug(key: &str, priority: &str, days_open: u32) -> BugRecord {
    BugRecord {
        key: key.to_string(),
        summary: format!("Summary of {}", key),
        status: "Open".to_string(),
        priority: Priority::from(priority),
        url: format!("https://example.atlassian.net/browse/{}", key),
        aging: Aging {
            created_date: Some("2024-01-15T10:30:00.000+0000".to_string()),
            days_open,
        },
        last_updated: Some("2024-04-18T08:00:00.000+0000".to_string()),
        team: TeamInfo::default(),
        reporter: Person {
            name: "Reporter".to_string(),
            email: None,
        },
        assignee: Person {
            name: "Unassigned".to_string(),
            email: None,
        },
        comments: CommentThread::default(),
    }
}

/// Create a test bug that already carries a comment summary
pub fn summarized_bug(key: &str, priority: &str, days_open: u32, summary: &str) -> BugRecord {
    let comment = Comment {
        author: "tester".to_string(),
        created: "2024-04-18T08:00:00.000+0000".to_string(),
        body: "Reproduced".to_string(),
    };
    bug(key, priority, days_open).with_comments(vec![comment], summary.to_string())
}

/// Create a raw Jira issue with plain-string comments
pub fn raw_issue(key: &str, priority: &str, comments: &[&str]) -> RawIssue {
    RawIssue {
        key: key.to_string(),
        fields: RawFields {
            summary: Some(format!("Summary of {}", key)),
            status: Some(NamedValue {
                name: "Open".to_string(),
            }),
            priority: Some(NamedValue {
                name: priority.to_string(),
            }),
            created: Some("2024-01-15T10:30:00.000+0000".to_string()),
            comment: Some(CommentPage {
                comments: comments
                    .iter()
                    .map(|body| RawComment {
                        author: Some(JiraUser {
                            display_name: Some("tester".to_string()),
                            ..Default::default()
                        }),
                        created: Some("2024-04-18T08:00:00.000+0000".to_string()),
                        body: Some(serde_json::Value::String(body.to_string())),
                        ..Default::default()
                    })
                    .collect(),
                total: Some(comments.len() as u32),
            }),
            ..Default::default()
        },
    }
}
