//! Fixed-width text rendering of a bug report
//!
//! The output is meant for chat tools that honour ``` code fences, so every
//! table is drawn with box characters and padded to fixed column widths.
//! Widths count characters, not terminal cells.

use jiff::Timestamp;

use crate::bug::{sort_by_priority, AgeBucket, BugRecord, TeamInfo};
use crate::time::{calendar_date, utc_stamp};

/// Rendered for an empty report
pub const EMPTY_REPORT: &str = "No bugs found.";

const TEAM_WIDTH: usize = 18;
const TEAM_KEEP: usize = 15;
const TEAM_LABEL_LIMIT: usize = 2;
pub const SUMMARY_WIDTH: usize = 100;
const LINK_SUMMARY_WIDTH: usize = 60;
const STATS_RULE_WIDTH: usize = 60;

struct Column {
    header: &'static str,
    width: usize,
}

const fn col(header: &'static str, width: usize) -> Column {
    Column { header, width }
}

const OVERVIEW_COLUMNS: [Column; 8] = [
    col("#", 2),
    col("Ticket ID", 11),
    col("Days Open", 9),
    col("Last Update", 11),
    col("Status", 8),
    col("Priority", 8),
    col("Teams", TEAM_WIDTH),
    col("Assignee", 14),
];

const SUMMARY_COLUMNS: [Column; 3] = [
    col("#", 2),
    col("Ticket ID", 11),
    col("AI-Generated Comment Summary", SUMMARY_WIDTH),
];

/// Render the report as of the current instant
pub fn render(records: &[BugRecord]) -> String {
    render_report(records, Timestamp::now())
}

/// Render the full report; `now` only feeds the header stamp
pub fn render_report(records: &[BugRecord], now: Timestamp) -> String {
    if records.is_empty() {
        return EMPTY_REPORT.to_string();
    }

    let bugs = sort_by_priority(records.to_vec());
    let mut out = String::new();

    out.push_str("*🐛 JIRA BUG SUMMARY REPORT*\n");
    out.push_str(&format!("_Report generated on {}_\n\n", utc_stamp(now)));

    write_overview(&mut out, &bugs);
    out.push_str("\n*💬 COMMENT SUMMARIES*\n");
    write_summaries(&mut out, &bugs);
    out.push_str("\n*🔗 Links to Tickets:*\n");
    write_links(&mut out, &bugs);
    write_statistics(&mut out, &bugs);

    out.trim_end().to_string()
}

fn write_overview(out: &mut String, bugs: &[BugRecord]) {
    out.push_str("```\n");
    out.push_str(&border(&OVERVIEW_COLUMNS, '┌', '┬', '┐'));
    out.push_str(&header_row(&OVERVIEW_COLUMNS));
    out.push_str(&border(&OVERVIEW_COLUMNS, '├', '┼', '┤'));

    for (idx, bug) in bugs.iter().enumerate() {
        let days = bug.days_open();
        let age = format!("{} {:>3}", AgeBucket::for_days(days).emoji(), days);
        let last_update = bug
            .last_updated
            .as_deref()
            .and_then(calendar_date)
            .unwrap_or_else(|| "Unknown".to_string());

        let cells = [
            format!("{:>2}", idx + 1),
            bug.key.clone(),
            age,
            last_update,
            bug.status.clone(),
            bug.priority.to_string(),
            team_display(&bug.team),
            bug.assignee.name.clone(),
        ];
        out.push_str(&row(&OVERVIEW_COLUMNS, &cells));
    }

    out.push_str(&border(&OVERVIEW_COLUMNS, '└', '┴', '┘'));
    out.push_str("```\n");
}

fn write_summaries(out: &mut String, bugs: &[BugRecord]) {
    out.push_str("```\n");
    out.push_str(&border(&SUMMARY_COLUMNS, '┌', '┬', '┐'));
    out.push_str(&header_row(&SUMMARY_COLUMNS));
    out.push_str(&border(&SUMMARY_COLUMNS, '├', '┼', '┤'));

    for (idx, bug) in bugs.iter().enumerate() {
        let mut lines = wrap_summary(&bug.comments.summary, SUMMARY_WIDTH);
        if lines.is_empty() {
            lines.push("No summary available".to_string());
        }

        for (line_no, line) in lines.into_iter().enumerate() {
            let (number, key) = if line_no == 0 {
                (format!("{:>2}", idx + 1), bug.key.clone())
            } else {
                (String::new(), String::new())
            };
            out.push_str(&row(&SUMMARY_COLUMNS, &[number, key, line]));
        }

        if idx + 1 < bugs.len() {
            out.push_str(&border(&SUMMARY_COLUMNS, '├', '┼', '┤'));
        }
    }

    out.push_str(&border(&SUMMARY_COLUMNS, '└', '┴', '┘'));
    out.push_str("```\n");
}

fn write_links(out: &mut String, bugs: &[BugRecord]) {
    for (idx, bug) in bugs.iter().enumerate() {
        let summary = truncate(&bug.summary, LINK_SUMMARY_WIDTH);
        let ellipsis = if bug.summary.chars().count() > LINK_SUMMARY_WIDTH {
            "..."
        } else {
            ""
        };
        out.push_str(&format!(
            "  {}. <{}|{}> - {}{}\n",
            idx + 1,
            bug.url,
            bug.key,
            summary,
            ellipsis
        ));
    }
}

fn write_statistics(out: &mut String, bugs: &[BugRecord]) {
    let count = |bucket: AgeBucket| {
        bugs.iter()
            .filter(|b| AgeBucket::for_days(b.days_open()) == bucket)
            .count()
    };
    let rule = "━".repeat(STATS_RULE_WIDTH);

    out.push_str("\n*📊 STATISTICS*\n");
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("  • Total Bugs: *{}*\n", bugs.len()));
    out.push_str(&format!(
        "  • 🔴 Critical Age (90+ days): *{}*\n",
        count(AgeBucket::Critical)
    ));
    out.push_str(&format!(
        "  • 🟠 Aging (31-90 days): *{}*\n",
        count(AgeBucket::Aging)
    ));
    out.push_str(&format!(
        "  • 🟡 Active (8-30 days): *{}*\n",
        count(AgeBucket::Active)
    ));
    out.push_str(&format!(
        "  • 🟢 Recent (0-7 days): *{}*\n",
        count(AgeBucket::Recent)
    ));
    out.push_str(&rule);
    out.push('\n');
}

/// Short team label for the overview table
///
/// Prefers the Atlassian team name; otherwise the components followed by the
/// first two labels. Anything longer than the column is cut with `...`.
pub fn team_display(team: &TeamInfo) -> String {
    if let Some(name) = team.team_name.as_deref().filter(|n| !n.is_empty()) {
        return shorten_team(name);
    }

    let parts: Vec<&str> = team
        .components
        .iter()
        .chain(team.labels.iter().take(TEAM_LABEL_LIMIT))
        .map(String::as_str)
        .collect();

    if parts.is_empty() {
        return "N/A".to_string();
    }

    shorten_team(&parts.join(", "))
}

fn shorten_team(text: &str) -> String {
    if text.chars().count() > TEAM_WIDTH {
        format!("{}...", truncate(text, TEAM_KEEP))
    } else {
        text.to_string()
    }
}

/// Greedy word wrap; returned lines are unpadded and never empty
///
/// A word joins the current line while the line plus the word and one
/// separator fits in `width`. Words too long for any line are split.
pub fn wrap_summary(text: &str, width: usize) -> Vec<String> {
    let chunk = width.saturating_sub(1).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace().flat_map(|w| split_long_word(w, chunk)) {
        let word_len = word.chars().count();
        if current_len + word_len + 1 > width && current_len > 0 {
            lines.push(current.trim_end().to_string());
            current.clear();
            current_len = 0;
        }
        current.push_str(&word);
        current.push(' ');
        current_len += word_len + 1;
    }

    if current_len > 0 {
        lines.push(current.trim_end().to_string());
    }

    lines
}

fn split_long_word(word: &str, chunk: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars.chunks(chunk).map(|c| c.iter().collect()).collect()
}

/// First `width` characters of `text`
fn truncate(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Cut to `width` characters, then left-justify to exactly `width`
pub fn truncate_pad(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width), width = width)
}

fn border(columns: &[Column], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = columns.iter().map(|c| "─".repeat(c.width + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
}

fn header_row(columns: &[Column]) -> String {
    let headers: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
    row(columns, &headers)
}

fn row(columns: &[Column], cells: &[String]) -> String {
    let cells: Vec<String> = columns
        .iter()
        .zip(cells)
        .map(|(column, cell)| {
            // Row numbers may outgrow their column rather than lose digits
            if column.header == "#" {
                format!("{:>width$}", cell, width = column.width)
            } else {
                truncate_pad(cell, column.width)
            }
        })
        .collect();
    format!("│ {} │\n", cells.join(" │ "))
}
