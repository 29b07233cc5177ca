use anyhow::{Context, Result};
use std::env;

mod claude_interface;
mod cli_client;
mod client;
mod models;
pub mod prompts;

pub use claude_interface::ClaudeInterface;
pub use cli_client::ClaudeCLI;
pub use client::ClaudeClient;
pub use models::*;

#[cfg(test)]
pub use claude_interface::MockClaude;

const MODEL_ALIASES: &[(&str, &str)] = &[
    ("sonnet", "claude-sonnet-4-5"),
    ("haiku", "claude-haiku-4-5"),
    ("opus", "claude-opus-4-1"),
];

/// Full model id for a short alias; unknown names pass through unchanged
pub fn resolve_model_alias(alias: &str) -> String {
    MODEL_ALIASES
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(alias))
        .map(|(_, full)| full.to_string())
        .unwrap_or_else(|| alias.to_string())
}

pub fn get_api_key() -> Result<String> {
    env::var("ANTHROPIC_API_KEY").context("ANTHROPIC_API_KEY environment variable not set")
}

/// Dollar price per million tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input: f32,
    pub output: f32,
}

impl Pricing {
    /// Price list by model family; unknown models are billed as Sonnet
    pub fn for_model(model: &str) -> Pricing {
        let model = model.to_ascii_lowercase();
        if model.contains("haiku") {
            Pricing { input: 1.0, output: 5.0 }
        } else if model.contains("opus") {
            Pricing { input: 15.0, output: 75.0 }
        } else {
            Pricing { input: 3.0, output: 15.0 }
        }
    }

    pub fn cost(&self, input_tokens: u32, output_tokens: u32) -> f32 {
        (input_tokens as f32 * self.input + output_tokens as f32 * self.output) / 1_000_000.0
    }
}

/// Estimated dollar cost of one request
pub fn estimate_cost(model: &str, input_tokens: u32, output_tokens: u32) -> f32 {
    Pricing::for_model(model).cost(input_tokens, output_tokens)
}

/// Rough token count, about four bytes of English per token
pub fn estimate_tokens(text: &str) -> u32 {
    text.len().div_ceil(4) as u32
}
