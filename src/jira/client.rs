use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::jira::models::*;

/// Largest page the search endpoint hands out in one call
const MAX_PAGE_SIZE: u32 = 100;

/// Jira client abstraction
pub enum JiraClient {
    Real(RealJira),
    #[cfg(test)]
    Mock(MockJira),
}

impl JiraClient {
    /// Create a new real Jira client
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Result<Self> {
        Ok(JiraClient::Real(RealJira::new(base_url, email, api_token)?))
    }

    /// Create a mock client for testing
    #[cfg(test)]
    pub fn mock() -> Self {
        JiraClient::Mock(MockJira::new())
    }

    /// Fetch metadata for every field on the site
    pub fn fetch_fields(&self) -> Result<Vec<JiraField>> {
        match self {
            JiraClient::Real(client) => client.fetch_fields(),
            #[cfg(test)]
            JiraClient::Mock(client) => client.fetch_fields(),
        }
    }

    /// Run a JQL search, returning at most `max_results` issues
    pub fn search_issues(
        &self,
        jql: &str,
        max_results: u32,
        fields: &[String],
    ) -> Result<Vec<RawIssue>> {
        match self {
            JiraClient::Real(client) => client.search_issues(jql, max_results, fields),
            #[cfg(test)]
            JiraClient::Mock(client) => client.search_issues(jql, max_results, fields),
        }
    }

    /// Locate the Atlassian Team custom field, if the site has one
    pub fn find_team_field(&self) -> Result<Option<JiraField>> {
        let fields = self.fetch_fields()?;
        Ok(fields.into_iter().find(JiraField::is_atlassian_team))
    }
}

/// Real Jira Cloud client using the REST API v3
pub struct RealJira {
    client: HttpClient,
    base_url: String,
    email: String,
    api_token: String,
}

impl RealJira {
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Result<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(anyhow!("JIRA_URL must start with http:// or https://"));
        }

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(RealJira {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .basic_auth(&self.email, Some(&self.api_token))
            .header(ACCEPT, "application/json")
    }

    fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self
            .request(builder)
            .send()
            .context("Failed to send request to Jira")?;

        let status = response.status();
        let body = response.text().context("Failed to read Jira response body")?;
        debug!("Jira responded {} with {} bytes", status, body.len());

        if status.is_success() {
            return serde_json::from_str(&body).context("Failed to parse Jira JSON response");
        }

        let details = serde_json::from_str::<JiraErrorResponse>(&body)
            .map(|e| e.describe())
            .ok()
            .filter(|d| !d.is_empty())
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => Err(anyhow!(
                "Jira authentication failed ({}). Check JIRA_EMAIL and JIRA_API_TOKEN",
                status
            )),
            400 => Err(anyhow!("Jira rejected the query: {}", details)),
            404 => Err(anyhow!("Jira resource not found: {}", details)),
            _ => Err(anyhow!("Jira API error ({}): {}", status, details)),
        }
    }

    pub fn fetch_fields(&self) -> Result<Vec<JiraField>> {
        let url = format!("{}/rest/api/3/field", self.base_url);
        self.send(self.client.get(url))
    }

    pub fn search_issues(
        &self,
        jql: &str,
        max_results: u32,
        fields: &[String],
    ) -> Result<Vec<RawIssue>> {
        let url = format!("{}/rest/api/3/search/jql", self.base_url);
        let mut issues: Vec<RawIssue> = Vec::new();
        let mut next_page_token = None;

        while (issues.len() as u32) < max_results {
            let remaining = max_results - issues.len() as u32;
            let request = SearchRequest {
                jql,
                max_results: remaining.min(MAX_PAGE_SIZE),
                fields,
                next_page_token: next_page_token.take(),
            };

            let page: SearchResponse = self.send(
                self.client
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(&request),
            )?;

            let fetched = page.issues.len();
            issues.extend(page.issues);

            match page.next_page_token {
                Some(token) if !page.is_last && fetched > 0 => next_page_token = Some(token),
                _ => break,
            }
        }

        issues.truncate(max_results as usize);
        Ok(issues)
    }
}

/// Mock Jira client for testing
#[cfg(test)]
#[derive(Default)]
pub struct MockJira {
    pub fields: Vec<JiraField>,
    pub issues: Vec<RawIssue>,
    pub fail_search: bool,
    pub fail_fields: bool,
    pub last_fields: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl MockJira {
    pub fn new() -> Self {
        MockJira::default()
    }

    pub fn with_issue(mut self, issue: RawIssue) -> Self {
        self.issues.push(issue);
        self
    }

    pub fn with_team_field(mut self, id: &str) -> Self {
        self.fields.push(JiraField {
            id: id.to_string(),
            name: "Team".to_string(),
            schema: Some(FieldSchema {
                field_type: Some("team".to_string()),
                custom: Some(
                    "com.atlassian.jira.plugin.system.customfieldtypes:atlassian-team".to_string(),
                ),
            }),
        });
        self
    }

    pub fn fetch_fields(&self) -> Result<Vec<JiraField>> {
        if self.fail_fields {
            return Err(anyhow!("Jira API error (500): field listing unavailable"));
        }
        Ok(self.fields.clone())
    }

    pub fn search_issues(
        &self,
        _jql: &str,
        max_results: u32,
        fields: &[String],
    ) -> Result<Vec<RawIssue>> {
        *self.last_fields.borrow_mut() = fields.to_vec();
        if self.fail_search {
            return Err(anyhow!("Jira rejected the query: Error in the JQL Query"));
        }
        Ok(self
            .issues
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(key: &str) -> RawIssue {
        RawIssue {
            key: key.to_string(),
            fields: RawFields::default(),
        }
    }

    #[test]
    fn test_mock_search_respects_limit() {
        let mock = MockJira::new()
            .with_issue(issue("QA-1"))
            .with_issue(issue("QA-2"))
            .with_issue(issue("QA-3"));
        let client = JiraClient::Mock(mock);

        let found = client.search_issues("type = Bug", 2, &[]).unwrap();
        let keys: Vec<&str> = found.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["QA-1", "QA-2"]);
    }

    #[test]
    fn test_find_team_field() {
        let client = JiraClient::Mock(MockJira::new().with_team_field("customfield_12000"));
        let field = client.find_team_field().unwrap().unwrap();
        assert_eq!(field.id, "customfield_12000");

        let client = JiraClient::mock();
        assert!(client.find_team_field().unwrap().is_none());
    }

    #[test]
    fn test_real_client_rejects_bad_url() {
        assert!(RealJira::new("example.atlassian.net", "a@b.c", "t").is_err());
        assert!(RealJira::new("https://example.atlassian.net/", "a@b.c", "t").is_ok());
    }
}
