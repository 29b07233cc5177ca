use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bug-report",
    about = "Summarize open Jira bugs with Claude and render a status report",
    version,
    author
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "BUG_REPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Jira site URL, e.g. https://example.atlassian.net
    #[arg(long, env = "JIRA_URL")]
    pub jira_url: Option<String>,

    /// Jira account email used for basic auth
    #[arg(long, env = "JIRA_EMAIL")]
    pub jira_email: Option<String>,

    /// Jira API token
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    pub jira_token: Option<String>,

    /// JQL query selecting the bugs to report on
    #[arg(long, env = "JIRA_JQL")]
    pub jql: Option<String>,

    /// Maximum number of issues to fetch
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Directory where bug_report.json and bug_report.txt are written
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override Claude backend (api, cli, auto)
    #[arg(long, value_name = "BACKEND")]
    pub claude_backend: Option<String>,

    /// Skip comment summarization entirely
    #[arg(long)]
    pub no_summary: bool,

    /// List the matching issues without summarizing or writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Bypass the summary cache
    #[arg(long)]
    pub no_cache: bool,

    /// Clear all cached summaries before running
    #[arg(long)]
    pub clear_cache: bool,

    /// Post the rendered report to the webhook
    #[arg(long)]
    pub notify: bool,

    /// Webhook receiving the report
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
