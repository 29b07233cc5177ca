use tracing::{debug, info, warn};

use crate::bug::Comment;
use crate::cache::SummaryCache;
use crate::claude::prompts::bug_comments_prompt;
use crate::claude::{estimate_cost, resolve_model_alias, ClaudeInterface, MessagesRequest};
use crate::config::Config;

/// Summary used when a bug has no comments at all
pub const NO_COMMENTS: &str = "No comments available.";
/// Summary used when the model could not be reached or failed
pub const SUMMARY_FAILED: &str = "Failed to generate summary.";
/// Summary used when summarization was switched off for the run
pub const SUMMARY_DISABLED: &str = "Summarization disabled.";

/// Running totals for one report run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SummaryStats {
    pub requests: usize,
    pub cache_hits: usize,
    pub failures: usize,
    pub estimated_cost: f32,
}

/// Turns a bug's comment thread into a short bullet-point summary
pub struct CommentSummarizer {
    claude: Option<ClaudeInterface>,
    cache: Option<SummaryCache>,
    model: String,
    max_tokens: u32,
    enabled: bool,
    stats: SummaryStats,
}

impl CommentSummarizer {
    /// Build a summarizer from config, picking a backend and opening the cache
    pub fn from_config(config: &Config, enabled: bool) -> Self {
        let claude = if enabled {
            let claude = ClaudeInterface::new(&config.claude);
            match &claude {
                Some(backend) => {
                    info!("Summarizing with the Claude {} backend", backend.backend_name())
                }
                None => warn!("No Claude backend available, summaries will be placeholders"),
            }
            claude
        } else {
            info!("Summarization disabled");
            None
        };

        let mut summarizer =
            CommentSummarizer::new(claude, &config.claude.model, config.claude.max_tokens);
        summarizer.enabled = enabled;

        if config.cache.enabled {
            let cache = SummaryCache::new(
                config.cache_dir(),
                config.cache.ttl_hours,
                config.cache.compression_enabled,
            );
            match cache.initialize() {
                Ok(()) => {
                    if let Err(e) = cache.clear_expired() {
                        debug!("Failed to prune summary cache: {}", e);
                    }
                    summarizer.cache = Some(cache);
                }
                Err(e) => warn!("Summary cache unavailable: {}", e),
            }
        }

        summarizer
    }

    pub fn new(claude: Option<ClaudeInterface>, model: &str, max_tokens: u32) -> Self {
        CommentSummarizer {
            claude,
            cache: None,
            model: resolve_model_alias(model),
            max_tokens,
            enabled: true,
            stats: SummaryStats::default(),
        }
    }

    /// A summarizer that never calls the model
    pub fn disabled() -> Self {
        let mut summarizer = CommentSummarizer::new(None, "sonnet", 0);
        summarizer.enabled = false;
        summarizer
    }

    pub fn with_cache(mut self, cache: SummaryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn stats(&self) -> &SummaryStats {
        &self.stats
    }

    /// Summarize the comments of one bug
    ///
    /// Never fails: an empty thread, a missing backend or a failed call each
    /// map to a fixed placeholder so one bad bug cannot sink the report.
    pub fn summarize(&mut self, bug_key: &str, comments: &[Comment]) -> String {
        if comments.is_empty() {
            return NO_COMMENTS.to_string();
        }
        if !self.enabled {
            return SUMMARY_DISABLED.to_string();
        }

        let prompt = bug_comments_prompt(bug_key, comments);
        let cache_key = SummaryCache::key_for(&self.model, &prompt);

        if let Some(cache) = &self.cache {
            match cache.get(&cache_key) {
                Ok(Some(summary)) => {
                    debug!("Cache hit for {} summary", bug_key);
                    self.stats.cache_hits += 1;
                    return summary;
                }
                Ok(None) => {}
                Err(e) => debug!("Ignoring unreadable cache entry for {}: {}", bug_key, e),
            }
        }

        let Some(claude) = &self.claude else {
            warn!("Error summarizing comments for {}: no Claude backend configured", bug_key);
            self.stats.failures += 1;
            return SUMMARY_FAILED.to_string();
        };

        debug!(
            "Summarizing {} comments for {} ({} prompt bytes)",
            comments.len(),
            bug_key,
            prompt.len()
        );
        self.stats.requests += 1;

        let request = MessagesRequest::user_prompt(self.model.as_str(), prompt, self.max_tokens);
        let completion = match claude.complete(request) {
            Ok(completion) => completion,
            Err(e) => {
                warn!("Error summarizing comments for {}: {:#}", bug_key, e);
                self.stats.failures += 1;
                return SUMMARY_FAILED.to_string();
            }
        };

        self.stats.estimated_cost += estimate_cost(
            &self.model,
            completion.input_tokens,
            completion.output_tokens,
        );

        let summary = completion.text.trim().to_string();
        if summary.is_empty() {
            warn!("Claude returned an empty summary for {}", bug_key);
            self.stats.failures += 1;
            return SUMMARY_FAILED.to_string();
        }

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&cache_key, &summary) {
                warn!("Failed to cache summary for {}: {}", bug_key, e);
            }
        }

        summary
    }
}
