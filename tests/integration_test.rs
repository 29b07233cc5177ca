use anyhow::Result;
use jiff::Timestamp;
use jira_bug_report::bug::{normalize, NormalizeContext, Priority};
use jira_bug_report::jira::extract::extract_comments;
use jira_bug_report::jira::{issue_fields, JiraField, SearchResponse};
use jira_bug_report::summarize::NO_COMMENTS;
use jira_bug_report::{render_report, BugRecord, Config};
use std::fs;
use tempfile::TempDir;

// Note: the mock Jira and Claude clients only exist for library unit tests,
// so these tests drive the pipeline stage by stage from fixture JSON.

const SEARCH_FIXTURE: &str = include_str!("../fixtures/jira/search.json");
const FIELDS_FIXTURE: &str = include_str!("../fixtures/jira/fields.json");

fn now() -> Timestamp {
    // 2024-04-19 10:30:00 UTC
    Timestamp::from_second(1_713_522_600).unwrap()
}

fn team_field() -> Option<String> {
    let fields: Vec<JiraField> = serde_json::from_str(FIELDS_FIXTURE).unwrap();
    fields
        .into_iter()
        .find(JiraField::is_atlassian_team)
        .map(|f| f.id)
}

/// Normalize the fixture issues, summarizing with a canned answer per bug
fn fixture_records() -> Vec<BugRecord> {
    let response: SearchResponse = serde_json::from_str(SEARCH_FIXTURE).unwrap();
    let team_field = team_field();
    let ctx = NormalizeContext {
        base_url: "https://example.atlassian.net",
        team_field_id: team_field.as_deref(),
        now: now(),
    };

    response
        .issues
        .iter()
        .map(|issue| {
            let raw = issue
                .fields
                .comment
                .as_ref()
                .map(|page| page.comments.clone())
                .unwrap_or_default();
            let comments = extract_comments(&raw);
            let summary = if comments.is_empty() {
                NO_COMMENTS.to_string()
            } else {
                format!("- {} has {} comments", issue.key, comments.len())
            };
            normalize(issue, &ctx).with_comments(comments, summary)
        })
        .collect()
}

fn find<'a>(records: &'a [BugRecord], key: &str) -> &'a BugRecord {
    records.iter().find(|r| r.key == key).unwrap()
}

#[test]
fn test_team_field_discovery_from_fixture() {
    assert_eq!(team_field().as_deref(), Some("customfield_10001"));

    let fields = issue_fields(Some("customfield_10001"));
    assert_eq!(fields.last().map(String::as_str), Some("customfield_10001"));
    assert!(fields.contains(&"comment".to_string()));
}

#[test]
fn test_fixture_normalization() {
    let records = fixture_records();
    assert_eq!(records.len(), 4);

    let web101 = find(&records, "WEB-101");
    assert_eq!(web101.days_open(), 30);
    assert_eq!(web101.team.team_name.as_deref(), Some("CBP Checkout"));
    assert_eq!(web101.assignee.name, "Grace Hopper");
    assert_eq!(web101.reporter.email.as_deref(), Some("ada@example.com"));
    assert_eq!(web101.comments.count, 2);
    assert_eq!(
        web101.comments.details[0].body,
        "Repro on Safari 17 Root cause: stale session cookie"
    );
    assert_eq!(
        web101.comments.details[1].author,
        "557058:f58131cb-b67d-43c7-b30d-6b58d40bd077"
    );
    assert_eq!(
        web101.comments.details[1].body,
        "Fix deployed to staging, waiting on QA."
    );

    let web102 = find(&records, "WEB-102");
    assert_eq!(web102.days_open(), 1);
    assert_eq!(web102.assignee.name, "Unassigned");
    assert_eq!(web102.team.team_name, None);
    assert_eq!(web102.team.labels, ["ios", "crash", "p0"]);

    let web103 = find(&records, "WEB-103");
    assert_eq!(web103.days_open(), 0);
    assert_eq!(web103.priority, Priority::Other("Blocker".to_string()));
    assert_eq!(web103.reporter.name, "Unknown");
    assert_eq!(web103.last_updated, None);
    assert_eq!(web103.comments.summary, NO_COMMENTS);

    let web104 = find(&records, "WEB-104");
    assert_eq!(web104.days_open(), 140);
    assert_eq!(
        web104.team.team_name.as_deref(),
        Some("Search Relevance and Ranking Platform")
    );
}

#[test]
fn test_fixture_report() {
    let report = render_report(&fixture_records(), now());

    let rows: Vec<&str> = report
        .lines()
        .filter(|l| l.starts_with("│ ") && l.contains(" │ WEB-"))
        .collect();

    // Overview rows come first, in priority order
    assert!(rows[0].starts_with("│  1 │ WEB-102     │ 🟢   1     │ 2024-04-18  │ Open     │ Highest  │ Mobile, ios, crash │ Unassigned     │"));
    assert!(rows[1].starts_with("│  2 │ WEB-104     │ 🔴 140     │ 2024-02-10  │ To Do    │ High     │ Search Relevanc... │ Ken Thompson   │"));
    assert!(rows[2].starts_with("│  3 │ WEB-101     │ 🟡  30     │ 2024-04-17  │ In Progr │ Medium   │ CBP Checkout       │ Grace Hopper   │"));
    assert!(rows[3].starts_with("│  4 │ WEB-103     │ 🟢   0     │ Unknown     │ Waiting  │ Blocker  │ N/A                │ Margaret Hamil │"));

    assert!(report.contains("│  3 │ WEB-101     │ - WEB-101 has 2 comments "));
    assert!(report.contains("│  4 │ WEB-103     │ No comments available. "));

    assert!(report.contains(
        "  2. <https://example.atlassian.net/browse/WEB-104|WEB-104> - Search results are sorted incorrectly when the locale is set..."
    ));

    assert!(report.contains("  • Total Bugs: *4*"));
    assert!(report.contains("  • 🔴 Critical Age (90+ days): *1*"));
    assert!(report.contains("  • 🟠 Aging (31-90 days): *0*"));
    assert!(report.contains("  • 🟡 Active (8-30 days): *1*"));
    assert!(report.contains("  • 🟢 Recent (0-7 days): *2*"));
}

#[test]
fn test_malformed_issue_keeps_its_siblings() {
    let response: SearchResponse = serde_json::from_str(
        r#"{
            "issues": [
                { "key": "QA-1", "fields": { "summary": "fine", "priority": { "name": "High" } } },
                { "key": "QA-2", "fields": {
                    "summary": "broken status",
                    "status": { "name": null },
                    "priority": ["not", "an", "object"],
                    "created": 42
                } }
            ]
        }"#,
    )
    .unwrap();
    let ctx = NormalizeContext {
        base_url: "https://example.atlassian.net",
        team_field_id: None,
        now: now(),
    };

    let records: Vec<BugRecord> = response
        .issues
        .iter()
        .map(|issue| normalize(issue, &ctx))
        .collect();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].key, "QA-1");
    assert_eq!(records[0].priority, Priority::High);

    assert_eq!(records[1].key, "QA-2");
    assert_eq!(records[1].summary, "broken status");
    assert_eq!(records[1].status, "Unknown");
    assert_eq!(records[1].priority, Priority::unknown());
    assert_eq!(records[1].days_open(), 0);
}

#[test]
fn test_report_json_round_trip() -> Result<()> {
    let records = fixture_records();
    let json = serde_json::to_string_pretty(&records)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;

    assert_eq!(value[0]["bug_key"], "WEB-101");
    assert_eq!(value[0]["team"]["team_name"], "CBP Checkout");
    assert_eq!(value[2]["priority"], "Blocker");
    assert_eq!(value[2]["aging"]["created_date"], "not a timestamp");

    let back: Vec<BugRecord> = serde_json::from_str(&json)?;
    assert_eq!(back[3].priority, Priority::High);

    Ok(())
}

/// Test configuration loading and overrides
#[test]
fn test_config_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[jira]
url = "https://acme.atlassian.net"
email = "qa@acme.test"
api_token = "secret"
jql = "project = WEB AND type = Bug"
max_results = 50

[claude]
model = "haiku"
backend = "api"

[output]
dir = "/tmp/bug-reports"
"#,
    )?;

    let config = Config::load(Some(&path))?;
    config.validate()?;

    assert_eq!(config.jira.max_results, 50);
    assert_eq!(config.jira.jql, "project = WEB AND type = Bug");
    assert_eq!(config.claude.model, "haiku");
    assert_eq!(config.claude.max_tokens, 500);
    assert_eq!(
        config.report_path(),
        std::path::PathBuf::from("/tmp/bug-reports/bug_report.txt")
    );
    assert!(config.cache.enabled);

    Ok(())
}

#[test]
fn test_config_errors_are_user_friendly() {
    use jira_bug_report::error::user_friendly_error;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[jira\nurl = ").unwrap();

    let error = Config::load(Some(&path)).unwrap_err();
    assert_eq!(user_friendly_error(&error).message(), "Invalid configuration file");

    let error = Config::load(Some(&temp_dir.path().join("missing.toml"))).unwrap_err();
    assert_eq!(user_friendly_error(&error).message(), "Configuration file not found");

    let error = Config::default().validate().unwrap_err();
    assert_eq!(
        user_friendly_error(&error).message(),
        "Jira credentials are not configured"
    );
}

/// Test cache functionality
#[test]
fn test_summary_cache_integration() -> Result<()> {
    use jira_bug_report::cache::SummaryCache;

    let temp_dir = TempDir::new()?;
    let cache = SummaryCache::new(temp_dir.path().to_path_buf(), 24, true);
    cache.initialize()?;

    let key = SummaryCache::key_for("claude-sonnet-4-5", "prompt");
    cache.put(&key, "- cached")?;
    assert_eq!(cache.get(&key)?.as_deref(), Some("- cached"));

    cache.clear_all()?;
    assert_eq!(cache.get(&key)?, None);

    Ok(())
}
