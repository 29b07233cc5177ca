//! Plain-text extraction from Jira comments.
//!
//! Jira REST v3 returns comment bodies in Atlassian Document Format (ADF),
//! a JSON tree whose leaves are `{"type": "text", "text": ...}` nodes. Older
//! endpoints and some integrations still send plain strings.

use serde_json::Value;

use crate::bug::Comment;
use crate::jira::models::RawComment;

/// A node of a rich-text document, reduced to what extraction needs
#[derive(Debug, Clone, PartialEq)]
pub enum AdfNode {
    Text(String),
    Container(Vec<AdfNode>),
}

impl AdfNode {
    /// Build the tree from raw ADF JSON
    ///
    /// Nodes that are neither text leaves nor carry a `content` array
    /// (hard breaks, mentions, media) become empty containers.
    pub fn from_value(value: &Value) -> AdfNode {
        match value {
            Value::Object(map) => {
                if map.get("type").and_then(Value::as_str) == Some("text") {
                    let text = map.get("text").and_then(Value::as_str).unwrap_or_default();
                    return AdfNode::Text(text.to_string());
                }
                match map.get("content") {
                    Some(Value::Array(children)) => {
                        AdfNode::Container(children.iter().map(AdfNode::from_value).collect())
                    }
                    _ => AdfNode::Container(Vec::new()),
                }
            }
            Value::Array(items) => {
                AdfNode::Container(items.iter().map(AdfNode::from_value).collect())
            }
            _ => AdfNode::Container(Vec::new()),
        }
    }

    /// Leaf texts in document (pre-order) order
    pub fn leaf_texts(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            match node {
                AdfNode::Text(text) => texts.push(text.as_str()),
                AdfNode::Container(children) => stack.extend(children.iter().rev()),
            }
        }

        texts
    }

    pub fn plain_text(&self) -> String {
        self.leaf_texts().join(" ")
    }
}

/// Comment body in either of the shapes Jira uses
#[derive(Debug, Clone, PartialEq)]
pub enum CommentBody {
    Plain(String),
    Document(AdfNode),
    Missing,
}

impl CommentBody {
    pub fn from_raw(body: Option<&Value>) -> Self {
        match body {
            Some(Value::String(s)) => CommentBody::Plain(s.clone()),
            Some(doc @ Value::Object(_)) => CommentBody::Document(AdfNode::from_value(doc)),
            _ => CommentBody::Missing,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            CommentBody::Plain(text) => text,
            CommentBody::Document(doc) => doc.plain_text(),
            CommentBody::Missing => String::new(),
        }
    }
}

/// Turn a raw comment into a plain-text [`Comment`]
pub fn extract_comment(raw: &RawComment) -> Comment {
    let author = raw
        .author
        .as_ref()
        .and_then(|a| a.label())
        .unwrap_or_else(|| "Unknown".to_string());

    Comment {
        author,
        created: raw.created.clone().unwrap_or_default(),
        body: CommentBody::from_raw(raw.body.as_ref()).into_text(),
    }
}

/// Extract every comment of an issue, in thread order
pub fn extract_comments(raw: &[RawComment]) -> Vec<Comment> {
    raw.iter().map(extract_comment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jira::models::JiraUser;
    use serde_json::json;

    fn text(t: &str) -> Value {
        json!({ "type": "text", "text": t })
    }

    #[test]
    fn test_plain_string_body_is_unchanged() {
        for body in ["", "simple", "  spaced  out\nlines  ", "emoji 🐛 and ünïcode"] {
            let raw = RawComment {
                body: Some(json!(body)),
                ..Default::default()
            };
            assert_eq!(extract_comment(&raw).body, body);
        }
    }

    #[test]
    fn test_adf_document_order() {
        let doc = json!({
            "type": "doc",
            "version": 1,
            "content": [
                { "type": "paragraph", "content": [text("Root"), text("cause:")] },
                { "type": "bulletList", "content": [
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [text("null"), text("pointer")] }
                    ] },
                    { "type": "listItem", "content": [
                        { "type": "paragraph", "content": [
                            { "type": "hardBreak" },
                            text("in"),
                            { "type": "mention", "attrs": { "text": "@bob" } },
                            text("parser")
                        ] }
                    ] }
                ] },
                { "type": "paragraph", "content": [text("Fixed.")] }
            ]
        });

        let body = CommentBody::from_raw(Some(&doc)).into_text();
        assert_eq!(body, "Root cause: null pointer in parser Fixed.");
    }

    #[test]
    fn test_deep_nesting_is_preorder() {
        let mut node = text("leaf");
        for depth in 0..200 {
            node = json!({ "type": "panel", "content": [text(&depth.to_string()), node] });
        }

        let tree = AdfNode::from_value(&node);
        let texts = tree.leaf_texts();
        assert_eq!(texts.len(), 201);
        assert_eq!(texts[0], "199");
        assert_eq!(texts[199], "0");
        assert_eq!(texts[200], "leaf");
    }

    #[test]
    fn test_bare_array_is_a_container() {
        let tree = AdfNode::from_value(&json!([text("a"), [text("b"), text("c")]]));
        assert_eq!(tree.plain_text(), "a b c");
    }

    #[test]
    fn test_missing_or_odd_bodies_are_empty() {
        assert_eq!(CommentBody::from_raw(None).into_text(), "");
        assert_eq!(CommentBody::from_raw(Some(&json!(42))).into_text(), "");
        assert_eq!(CommentBody::from_raw(Some(&json!([text("x")]))).into_text(), "");
        assert_eq!(
            CommentBody::from_raw(Some(&json!({ "type": "doc", "content": "oops" }))).into_text(),
            ""
        );
    }

    #[test]
    fn test_author_resolution() {
        let raw = RawComment {
            author: Some(JiraUser {
                display_name: Some("Grace Hopper".to_string()),
                ..Default::default()
            }),
            created: Some("2024-01-15T10:30:00.000+0000".to_string()),
            body: Some(json!("Reproduced on staging")),
            ..Default::default()
        };
        let comment = extract_comment(&raw);
        assert_eq!(comment.author, "Grace Hopper");
        assert_eq!(comment.created, "2024-01-15T10:30:00.000+0000");

        let anonymous = extract_comment(&RawComment::default());
        assert_eq!(anonymous.author, "Unknown");
        assert_eq!(anonymous.created, "");
        assert_eq!(anonymous.body, "");
    }
}
