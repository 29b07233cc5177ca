use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Common install locations checked when `claude` is not on PATH
const CLAUDE_PATHS: &[&str] = &[
    "/opt/homebrew/bin/claude",
    "/usr/local/bin/claude",
    "/usr/bin/claude",
];

/// Claude CLI client - uses the `claude` command-line tool
pub struct ClaudeCLI {
    claude_path: String,
    model: String,
}

impl ClaudeCLI {
    pub fn new(model: String) -> Result<Self> {
        let claude_path = Self::find_claude()?;

        let version_output = Command::new(&claude_path)
            .arg("--version")
            .output()
            .context("Failed to get claude version")?;

        if version_output.status.success() {
            let version = String::from_utf8_lossy(&version_output.stdout);
            info!("Using claude CLI version: {}", version.trim());
        }

        Ok(ClaudeCLI { claude_path, model })
    }

    /// Send a prompt in print mode and return the reply text
    pub fn send_message(&self, prompt: &str) -> Result<String> {
        debug!("Sending message to Claude CLI with {} chars", prompt.len());

        let mut cmd = Command::new(&self.claude_path);
        cmd.arg("--print");
        if !self.model.is_empty() && self.model != "default" {
            cmd.arg("--model").arg(&self.model);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().context("Failed to spawn claude CLI")?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .context("Failed to write prompt to claude CLI")?;
        }

        let output = child
            .wait_with_output()
            .context("Failed to wait for claude CLI")?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() { "(empty)".to_string() } else { stderr };

        debug!("Claude CLI stdout: {} chars, stderr: {}", stdout.len(), stderr);

        if !output.status.success() {
            return Err(anyhow!(
                "claude CLI failed with exit code {:?}: stderr={}",
                output.status.code(),
                stderr
            ));
        }

        if stdout.is_empty() {
            return Err(anyhow!("claude CLI returned empty output. stderr={}", stderr));
        }

        Ok(stdout)
    }

    /// Check if Claude CLI is available
    pub fn is_available() -> bool {
        Self::find_claude().is_ok()
    }

    fn find_claude() -> Result<String> {
        if let Ok(output) = Command::new("which").arg("claude").output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    return Ok(path);
                }
            }
        }

        CLAUDE_PATHS
            .iter()
            .find(|p| Path::new(p).exists())
            .map(|p| p.to_string())
            .ok_or_else(|| anyhow!("claude CLI not found in PATH or common locations"))
    }
}
