use std::fmt;

/// User-friendly error wrapper
#[derive(Debug)]
pub struct UserError {
    message: String,
    details: Option<String>,
    suggestion: Option<String>,
}

impl UserError {
    pub fn new(message: impl Into<String>) -> Self {
        UserError {
            message: message.into(),
            details: None,
            suggestion: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Add a suggestion for how to fix the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Print the error to stderr
    pub fn display(&self) {
        eprintln!("\n❌ Error: {}", self.message);

        if let Some(ref details) = self.details {
            eprintln!("\n   {}", details);
        }

        if let Some(ref suggestion) = self.suggestion {
            eprintln!("\n💡 {}", suggestion);
        }
    }
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref details) = self.details {
            write!(f, ": {}", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for UserError {}

/// Convert common errors to user-friendly messages
pub fn user_friendly_error(error: &anyhow::Error) -> UserError {
    // Alternate formatting includes the whole context chain
    let error_str = format!("{:#}", error);

    if let Some(missing) = error_str
        .split("Missing required environment variables: ")
        .nth(1)
    {
        return UserError::new("Jira credentials are not configured")
            .with_details(format!("Missing: {}", missing))
            .with_suggestion(
                "Export JIRA_URL, JIRA_EMAIL and JIRA_API_TOKEN, or set them under [jira] in ~/.config/bug-report/config.toml",
            );
    }

    if error_str.contains("SLACK_WEBHOOK_URL") {
        return UserError::new("Webhook not configured")
            .with_details("--notify needs a webhook to post the report to")
            .with_suggestion("Set SLACK_WEBHOOK_URL or pass --webhook-url");
    }

    if error_str.contains("JIRA_URL must start with") {
        return UserError::new("Invalid Jira URL")
            .with_details("JIRA_URL must be a full URL such as https://example.atlassian.net")
            .with_suggestion("Include the https:// scheme in JIRA_URL");
    }

    // Configuration errors
    if error_str.contains("Failed to read config") {
        return UserError::new("Configuration file not found")
            .with_details(error_str)
            .with_suggestion("Check the --config path or BUG_REPORT_CONFIG");
    }

    if error_str.contains("Failed to parse config") {
        return UserError::new("Invalid configuration file")
            .with_details("The configuration file contains syntax errors")
            .with_suggestion("Check the TOML syntax of your bug-report config file");
    }

    if error_str.contains("Invalid Claude backend") {
        return UserError::new("Unknown Claude backend")
            .with_details(error_str)
            .with_suggestion("Use one of: api, cli, auto");
    }

    if error_str.contains("Permission denied") {
        return UserError::new("Permission denied")
            .with_details("Cannot write to the specified location")
            .with_suggestion("Check that you have write permissions to the output directory");
    }

    UserError::new("An unexpected error occurred").with_details(error_str)
}
