use serde::{Deserialize, Serialize};

mod normalize;
mod priority;

pub use normalize::{normalize, NormalizeContext};
pub use priority::{sort_by_priority, Priority};

/// Plain-text comment on a bug
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Comment {
    pub author: String,
    pub created: String,
    pub body: String,
}

/// Normalized bug, ready for rendering and the JSON dump
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BugRecord {
    #[serde(rename = "bug_key")]
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: Priority,
    #[serde(rename = "bug_url")]
    pub url: String,
    pub aging: Aging,
    pub last_updated: Option<String>,
    pub team: TeamInfo,
    pub reporter: Person,
    pub assignee: Person,
    pub comments: CommentThread,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Aging {
    pub created_date: Option<String>,
    pub days_open: u32,
}

/// Team attribution; the renderer decides what to show
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TeamInfo {
    pub team_name: Option<String>,
    pub components: Vec<String>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Person {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommentThread {
    pub count: usize,
    pub summary: String,
    pub details: Vec<Comment>,
}

impl BugRecord {
    /// Attach the extracted comments and their summary
    pub fn with_comments(mut self, comments: Vec<Comment>, summary: String) -> Self {
        self.comments = CommentThread {
            count: comments.len(),
            summary,
            details: comments,
        };
        self
    }

    pub fn days_open(&self) -> u32 {
        self.aging.days_open
    }
}

/// Age bucket used for the row indicator and the statistics footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBucket {
    /// 0-7 days
    Recent,
    /// 8-30 days
    Active,
    /// 31-90 days
    Aging,
    /// more than 90 days
    Critical,
}

impl AgeBucket {
    pub fn for_days(days: u32) -> Self {
        match days {
            0..=7 => AgeBucket::Recent,
            8..=30 => AgeBucket::Active,
            31..=90 => AgeBucket::Aging,
            _ => AgeBucket::Critical,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            AgeBucket::Recent => "🟢",
            AgeBucket::Active => "🟡",
            AgeBucket::Aging => "🟠",
            AgeBucket::Critical => "🔴",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_bucket_boundaries() {
        assert_eq!(AgeBucket::for_days(0), AgeBucket::Recent);
        assert_eq!(AgeBucket::for_days(7), AgeBucket::Recent);
        assert_eq!(AgeBucket::for_days(8), AgeBucket::Active);
        assert_eq!(AgeBucket::for_days(30), AgeBucket::Active);
        assert_eq!(AgeBucket::for_days(31), AgeBucket::Aging);
        assert_eq!(AgeBucket::for_days(90), AgeBucket::Aging);
        assert_eq!(AgeBucket::for_days(91), AgeBucket::Critical);
        assert_eq!(AgeBucket::for_days(95).emoji(), "🔴");
        assert_eq!(AgeBucket::for_days(7).emoji(), "🟢");
    }

    #[test]
    fn test_buckets_are_exhaustive_and_ordered() {
        let mut last = AgeBucket::Recent;
        for days in 0..400 {
            let bucket = AgeBucket::for_days(days);
            assert!(bucket >= last);
            last = bucket;
        }
        assert_eq!(AgeBucket::for_days(u32::MAX), AgeBucket::Critical);
    }
}
