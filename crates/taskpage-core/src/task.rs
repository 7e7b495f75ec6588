use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Finished,
}

impl Status {
    /// Display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Finished => "Finished",
        }
    }

    /// ANSI color code for the status column: red, yellow, green.
    pub fn color_code(&self) -> &'static str {
        match self {
            Status::NotStarted => "31",
            Status::InProgress => "33",
            Status::Finished => "32",
        }
    }

    /// Accepts the label or a compact form, case-insensitively:
    /// "Not Started", "not-started" and "notstarted" all parse.
    pub fn parse(text: &str) -> Option<Self> {
        let compact: String = text
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "notstarted" => Some(Status::NotStarted),
            "inprogress" => Some(Status::InProgress),
            "finished" | "done" => Some(Status::Finished),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub status: Status,
    pub entry: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Task {
    pub fn new(id: u64, description: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            description,
            status: Status::NotStarted,
            entry: now,
            modified: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Status;

    #[test]
    fn status_parse_accepts_labels_and_compact_forms() {
        assert_eq!(Status::parse("Not Started"), Some(Status::NotStarted));
        assert_eq!(Status::parse("not-started"), Some(Status::NotStarted));
        assert_eq!(Status::parse("IN_PROGRESS"), Some(Status::InProgress));
        assert_eq!(Status::parse("finished"), Some(Status::Finished));
        assert_eq!(Status::parse("done"), Some(Status::Finished));
        assert_eq!(Status::parse("started"), None);
    }

    #[test]
    fn status_serializes_as_display_label() {
        let json = serde_json::to_string(&Status::InProgress).expect("serialize");
        assert_eq!(json, "\"In Progress\"");
    }
}
