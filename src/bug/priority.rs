use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::BugRecord;

/// Jira priority, with anything outside the standard scheme kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
    /// Missing or non-standard priority; holds the name shown in the report
    Other(String),
}

impl Priority {
    /// Sort rank: 1 for Highest through 5 for Lowest, 6 for everything else
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Highest => 1,
            Priority::High => 2,
            Priority::Medium => 3,
            Priority::Low => 4,
            Priority::Lowest => 5,
            Priority::Other(_) => 6,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Highest => "Highest",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Lowest => "Lowest",
            Priority::Other(name) => name,
        }
    }

    pub fn unknown() -> Self {
        Priority::Other("Unknown".to_string())
    }
}

impl From<&str> for Priority {
    fn from(name: &str) -> Self {
        match name {
            "Highest" => Priority::Highest,
            "High" => Priority::High,
            "Medium" => Priority::Medium,
            "Low" => Priority::Low,
            "Lowest" => Priority::Lowest,
            "" => Priority::unknown(),
            other => Priority::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Priority::from(name.as_str()))
    }
}

/// Order bugs from Highest to Lowest priority, keeping input order among equals
pub fn sort_by_priority(mut records: Vec<BugRecord>) -> Vec<BugRecord> {
    records.sort_by_key(|record| record.priority.rank());
    records
}
