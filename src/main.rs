use anyhow::{Context, Result};
use clap::Parser;
use jira_bug_report::{
    cache::SummaryCache, cli::Cli, error::user_friendly_error, jira::JiraClient,
    notify::Notifier, report::ReportGenerator, summarize::CommentSummarizer, Config,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        user_friendly_error(&e).display();
        std::process::exit(1);
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    info!("Loading configuration");
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.apply_cli(cli)?;
    config.validate()?;
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    println!("✓ Loading configuration");

    if cli.clear_cache {
        info!("Clearing cache");
        clear_cache(&config)?;
        println!("✓ Cache cleared");
    }

    let jira = JiraClient::new(
        &config.jira_base_url(),
        config.jira.email.as_deref().unwrap_or_default(),
        config.jira.api_token.as_deref().unwrap_or_default(),
    )
    .context("Failed to create Jira client")?;

    println!("🔍 Searching Jira: {}", config.jira.jql);

    if cli.dry_run {
        info!("DRY RUN: listing matching bugs without summarizing or writing files");
        let generator = ReportGenerator::new(jira, CommentSummarizer::disabled(), &config);
        return dry_run(&generator);
    }

    let summarizer = CommentSummarizer::from_config(&config, !cli.no_summary);
    let mut generator = ReportGenerator::new(jira, summarizer, &config);
    let report = generator.generate();

    if report.is_empty() {
        println!("No bugs found. Exiting.");
        return Ok(());
    }
    println!("📊 Summarized {} bugs", report.records.len());

    let saved = report.save(&config).context("Failed to save report")?;
    println!("✓ Bug data saved to: {}", saved.json_path.display());
    println!("✅ Report saved to: {}", saved.report_path.display());

    if config.notify.enabled {
        if let Some(url) = config.notify.webhook_url.as_deref() {
            println!("📨 Sending report to webhook...");
            let posted = match Notifier::new(url) {
                Ok(notifier) => notifier.post_report(&report.content),
                Err(e) => {
                    error!("Failed to set up webhook client: {:#}", e);
                    false
                }
            };
            if posted {
                println!("✅ Report successfully posted");
            } else {
                println!("❌ Failed to post report");
            }
        }
    }

    if report.estimated_cost > 0.0 {
        println!("💰 Estimated Claude cost: ${:.4}", report.estimated_cost);
    }
    println!("{}", report.completion_line());

    Ok(())
}

fn dry_run(generator: &ReportGenerator<'_>) -> Result<()> {
    let records = generator.preview_at(jiff::Timestamp::now());
    if records.is_empty() {
        println!("No bugs found.");
        return Ok(());
    }

    println!("Would summarize {} bugs:", records.len());
    for record in &records {
        println!(
            "  - {} [{}] {} days open, {} comments: {}",
            record.key,
            record.priority,
            record.days_open(),
            record.comments.count,
            record.summary
        );
    }

    Ok(())
}

fn clear_cache(config: &Config) -> Result<()> {
    let cache = SummaryCache::new(
        config.cache_dir(),
        config.cache.ttl_hours,
        config.cache.compression_enabled,
    );
    cache.clear_all().context("Failed to clear cache")
}
