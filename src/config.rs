use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub claude: ClaudeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct JiraConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_jql")]
    pub jql: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ClaudeConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_claude_backend")]
    pub backend: ClaudeBackend,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_json_file")]
    pub json_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_hours: u32,
    #[serde(default = "default_compression_enabled")]
    pub compression_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ClaudeBackend {
    Api,
    Cli,
    Auto, // Try CLI first, fall back to API
}

impl std::str::FromStr for ClaudeBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "api" => Ok(ClaudeBackend::Api),
            "cli" => Ok(ClaudeBackend::Cli),
            "auto" => Ok(ClaudeBackend::Auto),
            other => Err(anyhow!(
                "Invalid Claude backend '{}'. Use 'api', 'cli' or 'auto'",
                other
            )),
        }
    }
}

impl Config {
    /// Load configuration from the default location or a specified path
    ///
    /// A missing file at the default location is not an error; the defaults
    /// are used and environment/CLI overrides fill in the credentials.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Self::default_config_path()?;
                if !default.exists() {
                    return Ok(Config::default());
                }
                default
            }
        };

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", config_path))?;

        config.output.dir = expand_tilde(&config.output.dir)?;
        if let Some(dir) = config.cache.cache_dir.take() {
            config.cache.cache_dir = Some(expand_tilde(&dir)?);
        }

        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("bug-report").join("config.toml"))
    }

    /// Layer command-line flags (and the environment variables clap reads for them) on top
    pub fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(url) = &cli.jira_url {
            self.jira.url = Some(url.clone());
        }
        if let Some(email) = &cli.jira_email {
            self.jira.email = Some(email.clone());
        }
        if let Some(token) = &cli.jira_token {
            self.jira.api_token = Some(token.clone());
        }
        if let Some(jql) = &cli.jql {
            self.jira.jql = jql.clone();
        }
        if let Some(max) = cli.max_results {
            self.jira.max_results = max;
        }
        if let Some(dir) = &cli.output_dir {
            self.output.dir = expand_tilde(dir)?;
        }
        if let Some(backend) = &cli.claude_backend {
            self.claude.backend = backend.parse()?;
        }
        if cli.no_cache {
            self.cache.enabled = false;
        }
        if let Some(url) = &cli.webhook_url {
            self.notify.webhook_url = Some(url.clone());
        }
        if cli.notify {
            self.notify.enabled = true;
        }
        Ok(())
    }

    /// Check that the Jira credentials are present, naming every missing one
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("JIRA_URL", &self.jira.url),
            ("JIRA_EMAIL", &self.jira.email),
            ("JIRA_API_TOKEN", &self.jira.api_token),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(anyhow!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        if self.notify.enabled && self.notify.webhook_url.is_none() {
            return Err(anyhow!(
                "Notification enabled but SLACK_WEBHOOK_URL is not set"
            ));
        }

        Ok(())
    }

    /// Jira base URL without a trailing slash
    pub fn jira_base_url(&self) -> String {
        self.jira
            .url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string()
    }

    pub fn json_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.json_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.report_file)
    }

    /// Directory for cached summaries
    pub fn cache_dir(&self) -> PathBuf {
        self.cache.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("bug-report")
        })
    }
}

/// Expand tilde in paths to home directory
fn expand_tilde(path: &Path) -> Result<PathBuf> {
    if let Some(s) = path.to_str() {
        if let Some(rest) = s.strip_prefix("~/") {
            let home = dirs::home_dir().context("Could not determine home directory")?;
            return Ok(home.join(rest));
        }
    }
    Ok(path.to_path_buf())
}

// Default value functions
fn default_jql() -> String {
    "type = Bug AND status != Done AND status != Rejected".to_string()
}

fn default_max_results() -> u32 {
    20
}

fn default_model() -> String {
    "sonnet".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_claude_backend() -> ClaudeBackend {
    ClaudeBackend::Auto
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_json_file() -> String {
    "bug_report.json".to_string()
}

fn default_report_file() -> String {
    "bug_report.txt".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u32 {
    24
}

fn default_compression_enabled() -> bool {
    true
}

impl Default for JiraConfig {
    fn default() -> Self {
        JiraConfig {
            url: None,
            email: None,
            api_token: None,
            jql: default_jql(),
            max_results: default_max_results(),
        }
    }
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        ClaudeConfig {
            model: default_model(),
            max_tokens: default_max_tokens(),
            backend: default_claude_backend(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: default_output_dir(),
            json_file: default_json_file(),
            report_file: default_report_file(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: default_cache_enabled(),
            ttl_hours: default_cache_ttl(),
            compression_enabled: default_compression_enabled(),
            cache_dir: None,
        }
    }
}
