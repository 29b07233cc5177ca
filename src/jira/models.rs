use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

/// Represents a Jira issue as returned by the search endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawIssue {
    pub key: String,
    #[serde(default)]
    pub fields: RawFields,
}

impl RawIssue {
    /// Decode one search hit, dropping any field that fails to decode
    ///
    /// Returns `None` only when the hit has no usable key.
    pub fn from_value(value: Value) -> Option<RawIssue> {
        let Value::Object(mut object) = value else {
            warn!("Skipping search hit that is not a JSON object");
            return None;
        };

        let key = match object.remove("key") {
            Some(Value::String(key)) if !key.is_empty() => key,
            _ => {
                warn!("Skipping search hit without an issue key");
                return None;
            }
        };

        let fields = match object.remove("fields") {
            Some(Value::Object(map)) => RawFields::from_map(&key, map),
            None | Some(Value::Null) => RawFields::default(),
            Some(other) => {
                warn!("{}: ignoring fields of unexpected type: {}", key, other);
                RawFields::default()
            }
        };

        Some(RawIssue { key, fields })
    }
}

/// Issue fields; everything is optional because the field list is caller-chosen
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawFields {
    pub summary: Option<String>,
    pub status: Option<NamedValue>,
    pub priority: Option<NamedValue>,
    pub reporter: Option<JiraUser>,
    pub assignee: Option<JiraUser>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub components: Option<Vec<NamedValue>>,
    pub labels: Option<Vec<String>>,
    pub comment: Option<CommentPage>,
    /// Custom fields keyed by field id (`customfield_10001`, ...)
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

impl RawFields {
    /// Decode issue fields, keeping every field that decodes on its own
    fn from_map(key: &str, map: Map<String, Value>) -> RawFields {
        match serde_json::from_value::<RawFields>(Value::Object(map.clone())) {
            Ok(fields) => return fields,
            Err(e) => warn!("{}: some fields could not be decoded: {}", key, e),
        }

        let kept: Map<String, Value> = map
            .into_iter()
            .filter(|(name, field)| {
                let single = Value::Object(Map::from_iter([(name.clone(), field.clone())]));
                match serde_json::from_value::<RawFields>(single) {
                    Ok(_) => true,
                    Err(e) => {
                        warn!("{}: dropping field {}: {}", key, name, e);
                        false
                    }
                }
            })
            .collect();

        serde_json::from_value(Value::Object(kept)).unwrap_or_default()
    }
}

/// Any Jira object identified by a `name` (status, priority, component)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NamedValue {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// User reference (reporter, assignee, comment author)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct JiraUser {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "emailAddress")]
    pub email_address: Option<String>,
    #[serde(rename = "accountId")]
    pub account_id: Option<String>,
    pub name: Option<String>,
}

impl JiraUser {
    /// Best human-readable label: display name, then user name, then account id
    pub fn label(&self) -> Option<String> {
        [&self.display_name, &self.name, &self.account_id]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
            .cloned()
    }
}

/// Comment page embedded in an issue's `comment` field
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<RawComment>,
    pub total: Option<u32>,
}

/// A single comment; the body is a plain string or an ADF document
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawComment {
    pub id: Option<String>,
    pub author: Option<JiraUser>,
    pub created: Option<String>,
    pub body: Option<Value>,
}

/// Value of the Atlassian Team custom field
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TeamValue {
    Plain(String),
    Object {
        name: Option<String>,
        title: Option<String>,
    },
}

impl TeamValue {
    /// Team name, falling back to the title
    pub fn team_name(&self) -> Option<String> {
        let name = match self {
            TeamValue::Plain(s) => Some(s),
            TeamValue::Object { name, title } => name
                .as_ref()
                .filter(|n| !n.is_empty())
                .or(title.as_ref()),
        };
        name.filter(|n| !n.trim().is_empty()).cloned()
    }
}

/// Field metadata from `GET /rest/api/3/field`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraField {
    pub id: String,
    pub name: String,
    pub schema: Option<FieldSchema>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub custom: Option<String>,
}

impl JiraField {
    /// Whether this is the Atlassian Team custom field
    pub fn is_atlassian_team(&self) -> bool {
        match &self.schema {
            Some(schema) => {
                schema.field_type.as_deref() == Some("team")
                    && schema
                        .custom
                        .as_deref()
                        .is_some_and(|c| c.contains("atlassian-team"))
            }
            None => false,
        }
    }
}

/// Body of `POST /rest/api/3/search/jql`
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub jql: &'a str,
    #[serde(rename = "maxResults")]
    pub max_results: u32,
    pub fields: &'a [String],
    #[serde(rename = "nextPageToken", skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "decode_issues")]
    pub issues: Vec<RawIssue>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(rename = "isLast", default)]
    pub is_last: bool,
}

/// Decode each issue on its own so one malformed hit cannot sink the page
fn decode_issues<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawIssue>, D::Error> {
    let hits = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(hits
        .unwrap_or_default()
        .into_iter()
        .filter_map(RawIssue::from_value)
        .collect())
}

/// Error payload returned by Jira for 4xx responses
#[derive(Debug, Default, Deserialize)]
pub struct JiraErrorResponse {
    #[serde(rename = "errorMessages", default)]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: HashMap<String, String>,
}

impl JiraErrorResponse {
    pub fn describe(&self) -> String {
        let mut parts = self.error_messages.clone();
        let mut field_errors: Vec<String> = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        field_errors.sort();
        parts.extend(field_errors);
        parts.join("; ")
    }
}
