use super::{estimate_tokens, ClaudeCLI, ClaudeClient, Completion, MessagesRequest};
use crate::config::{ClaudeBackend, ClaudeConfig};
use anyhow::Result;
use tracing::{info, warn};

#[cfg(test)]
pub use mock::MockClaude;

/// Unified interface for Claude (API or CLI)
pub enum ClaudeInterface {
    Api(ClaudeClient),
    Cli(ClaudeCLI),
    #[cfg(test)]
    Mock(MockClaude),
}

impl ClaudeInterface {
    /// Pick a backend according to config; `None` when nothing is usable
    pub fn new(config: &ClaudeConfig) -> Option<Self> {
        match config.backend {
            ClaudeBackend::Api => Self::api(),
            ClaudeBackend::Cli => Self::cli(&config.model),
            ClaudeBackend::Auto => Self::cli(&config.model).or_else(|| {
                info!("Claude CLI unavailable, trying the API");
                Self::api()
            }),
        }
    }

    fn api() -> Option<Self> {
        if std::env::var("ANTHROPIC_API_KEY").is_err() {
            info!("ANTHROPIC_API_KEY not set, Claude API unavailable");
            return None;
        }
        match ClaudeClient::new() {
            Ok(client) => Some(ClaudeInterface::Api(client)),
            Err(e) => {
                warn!("Failed to initialize Claude API client: {}", e);
                None
            }
        }
    }

    fn cli(model: &str) -> Option<Self> {
        if !ClaudeCLI::is_available() {
            info!("Claude CLI not available");
            return None;
        }
        match ClaudeCLI::new(model.to_string()) {
            Ok(client) => Some(ClaudeInterface::Cli(client)),
            Err(e) => {
                warn!("Failed to initialize Claude CLI: {}", e);
                None
            }
        }
    }

    /// Short backend name for logs
    pub fn backend_name(&self) -> &'static str {
        match self {
            ClaudeInterface::Api(_) => "api",
            ClaudeInterface::Cli(_) => "cli",
            #[cfg(test)]
            ClaudeInterface::Mock(_) => "mock",
        }
    }

    /// Send a request and return the reply text
    pub fn complete(&self, request: MessagesRequest) -> Result<Completion> {
        match self {
            ClaudeInterface::Api(client) => client.messages(request).map(Completion::from),
            ClaudeInterface::Cli(client) => {
                let prompt = request.prompt_text();
                let text = client.send_message(&prompt)?;
                // The CLI does not report usage
                Ok(Completion {
                    input_tokens: estimate_tokens(&prompt),
                    output_tokens: estimate_tokens(&text),
                    text,
                })
            }
            #[cfg(test)]
            ClaudeInterface::Mock(mock) => mock.complete(request),
        }
    }
}

#[cfg(test)]
mod mock {
    use super::*;
    use anyhow::anyhow;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Scripted Claude backend; replies are consumed in call order
    #[derive(Default)]
    pub struct MockClaude {
        replies: RefCell<VecDeque<std::result::Result<String, String>>>,
        pub prompts: RefCell<Vec<String>>,
    }

    impl MockClaude {
        pub fn new() -> Self {
            MockClaude::default()
        }

        pub fn with_reply(self, text: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(text.to_string()));
            self
        }

        pub fn with_failure(self, message: &str) -> Self {
            self.replies.borrow_mut().push_back(Err(message.to_string()));
            self
        }

        pub fn call_count(&self) -> usize {
            self.prompts.borrow().len()
        }

        pub fn complete(&self, request: MessagesRequest) -> Result<Completion> {
            let prompt = request.prompt_text();
            self.prompts.borrow_mut().push(prompt.clone());

            match self.replies.borrow_mut().pop_front() {
                Some(Ok(text)) => Ok(Completion {
                    input_tokens: estimate_tokens(&prompt),
                    output_tokens: estimate_tokens(&text),
                    text,
                }),
                Some(Err(message)) => Err(anyhow!(message)),
                None => Err(anyhow!("No mock response configured for call {}", self.call_count())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_replies_in_order() {
        let claude = ClaudeInterface::Mock(
            MockClaude::new()
                .with_reply("- first")
                .with_failure("Claude API error (overloaded_error): Overloaded"),
        );

        let first = claude
            .complete(MessagesRequest::user_prompt("sonnet", "one", 500))
            .unwrap();
        assert_eq!(first.text, "- first");

        let second = claude.complete(MessagesRequest::user_prompt("sonnet", "two", 500));
        assert!(second.unwrap_err().to_string().contains("overloaded"));

        let third = claude.complete(MessagesRequest::user_prompt("sonnet", "three", 500));
        assert!(third.is_err());

        assert_eq!(claude.backend_name(), "mock");
    }
}
