use anyhow::{anyhow, Context, Result};
use jiff::Timestamp;

const SECONDS_PER_DAY: i64 = 86_400;

/// Jira's own timestamp layout: `2024-01-15T10:30:00.000+0000`
const JIRA_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse an ISO-8601 timestamp as emitted by Jira
///
/// Examples:
/// - "2024-01-15T10:30:00Z" → RFC 3339 with a literal UTC suffix
/// - "2024-01-15T10:30:00+05:30" → RFC 3339 with an offset
/// - "2024-01-15T10:30:00.000+0000" → Jira REST format
pub fn parse_timestamp(s: &str) -> Result<Timestamp> {
    let s = s.trim();

    if s.is_empty() {
        return Err(anyhow!("Timestamp cannot be empty"));
    }

    if let Ok(ts) = s.parse::<Timestamp>() {
        return Ok(ts);
    }

    Timestamp::strptime(JIRA_FORMAT, s).with_context(|| format!("Invalid timestamp: '{}'", s))
}

/// Whole days elapsed between `start` and `end`, never negative
pub fn days_between(start: Timestamp, end: Timestamp) -> u32 {
    let elapsed = end.duration_since(start).as_secs();
    if elapsed <= 0 {
        return 0;
    }
    u32::try_from(elapsed / SECONDS_PER_DAY).unwrap_or(u32::MAX)
}

/// Age in whole days of an issue created at `created`, measured at `now`
pub fn age_in_days(created: &str, now: Timestamp) -> Result<u32> {
    let created = parse_timestamp(created)?;
    Ok(days_between(created, now))
}

/// Calendar date (`YYYY-MM-DD`) of a timestamp string, in the offset it was written in
///
/// Returns `None` when the string is not a valid timestamp.
pub fn calendar_date(s: &str) -> Option<String> {
    let s = s.trim();
    parse_timestamp(s).ok()?;
    s.get(..10).map(str::to_string)
}

/// Report header stamp, always rendered in UTC
pub fn utc_stamp(ts: Timestamp) -> String {
    ts.strftime("%Y-%m-%d %H:%M UTC").to_string()
}
