use serde::{Deserialize, Serialize};

/// Request to Claude Messages API
#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

impl MessagesRequest {
    /// Single-turn request carrying one user prompt
    pub fn user_prompt(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        MessagesRequest {
            model: model.into(),
            max_tokens,
            messages: vec![Message {
                role: MessageRole::User,
                content: prompt.into(),
            }],
        }
    }

    /// All message text, joined the way the CLI backend receives it
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
}

/// Response from Claude Messages API
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    pub id: String,
    pub content: Vec<Content>,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: Usage,
}

impl MessagesResponse {
    /// Concatenated text blocks of the response
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                Content::Text { text } => Some(text.as_str()),
                Content::Other => None,
            })
            .collect()
    }
}

/// Content block in response
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Error response from API
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
}

/// Text returned by any backend, with token accounting
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl From<MessagesResponse> for Completion {
    fn from(response: MessagesResponse) -> Self {
        Completion {
            text: response.text(),
            input_tokens: response.usage.input_tokens,
            output_tokens: response.usage.output_tokens,
        }
    }
}
