use jiff::Timestamp;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::{render_report, Report};
use crate::bug::{normalize, sort_by_priority, BugRecord, NormalizeContext};
use crate::config::Config;
use crate::jira::extract::extract_comments;
use crate::jira::{issue_fields, JiraClient, RawIssue};
use crate::summarize::CommentSummarizer;

/// Drives one report run: fetch, extract, summarize, normalize, sort, render
pub struct ReportGenerator<'a> {
    jira: JiraClient,
    summarizer: CommentSummarizer,
    config: &'a Config,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(jira: JiraClient, summarizer: CommentSummarizer, config: &'a Config) -> Self {
        ReportGenerator {
            jira,
            summarizer,
            config,
        }
    }

    pub fn generate(&mut self) -> Report {
        self.generate_at(Timestamp::now())
    }

    /// Build the report with ages measured against `now`
    pub fn generate_at(&mut self, now: Timestamp) -> Report {
        let (team_field, issues) = self.fetch();
        let base_url = self.config.jira_base_url();
        let ctx = NormalizeContext {
            base_url: &base_url,
            team_field_id: team_field.as_deref(),
            now,
        };

        let mut records = Vec::with_capacity(issues.len());
        for issue in &issues {
            info!("Processing {}", issue.key);

            let comments = extract_comments(raw_comments(issue));
            debug!("{}: {} comments", issue.key, comments.len());

            let summary = self.summarizer.summarize(&issue.key, &comments);
            records.push(normalize(issue, &ctx).with_comments(comments, summary));
        }

        let records = sort_by_priority(records);
        let content = render_report(&records, now);
        let stats = self.summarizer.stats();

        info!(
            "Built report for {} bugs ({} summaries requested, {} from cache, {} failed)",
            records.len(),
            stats.requests,
            stats.cache_hits,
            stats.failures
        );

        Report {
            content,
            records,
            timestamp: now,
            estimated_cost: stats.estimated_cost,
        }
    }

    /// Fetch and normalize the matching bugs without summarizing them
    pub fn preview_at(&self, now: Timestamp) -> Vec<BugRecord> {
        let (team_field, issues) = self.fetch();
        let base_url = self.config.jira_base_url();
        let ctx = NormalizeContext {
            base_url: &base_url,
            team_field_id: team_field.as_deref(),
            now,
        };

        let records = issues
            .iter()
            .map(|issue| {
                let comments = extract_comments(raw_comments(issue));
                normalize(issue, &ctx).with_comments(comments, String::new())
            })
            .collect();

        sort_by_priority(records)
    }

    /// Discover the Team field, then run the search; failures degrade to
    /// "no team field" and "no issues" respectively
    fn fetch(&self) -> (Option<String>, Vec<RawIssue>) {
        let team_field = match self.jira.find_team_field() {
            Ok(Some(field)) => {
                info!("Found Team field: {} ({})", field.name, field.id);
                Some(field.id)
            }
            Ok(None) => {
                info!("No Atlassian Team field found, falling back to components and labels");
                None
            }
            Err(e) => {
                warn!("Error fetching Jira fields: {:#}", e);
                None
            }
        };

        let jql = &self.config.jira.jql;
        let fields = issue_fields(team_field.as_deref());
        info!("Searching Jira: {}", jql);

        let issues = match self
            .jira
            .search_issues(jql, self.config.jira.max_results, &fields)
        {
            Ok(issues) => {
                info!("Found {} bugs", issues.len());
                unique_by_key(issues)
            }
            Err(e) => {
                warn!("Error fetching bugs: {:#}", e);
                Vec::new()
            }
        };

        (team_field, issues)
    }
}

/// Keep the first hit for each issue key; a report lists every bug once
fn unique_by_key(issues: Vec<RawIssue>) -> Vec<RawIssue> {
    let mut seen = HashSet::new();
    issues
        .into_iter()
        .filter(|issue| {
            let first = seen.insert(issue.key.clone());
            if !first {
                warn!("Skipping duplicate search hit for {}", issue.key);
            }
            first
        })
        .collect()
}

fn raw_comments(issue: &RawIssue) -> &[crate::jira::RawComment] {
    issue
        .fields
        .comment
        .as_ref()
        .map(|page| page.comments.as_slice())
        .unwrap_or_default()
}
