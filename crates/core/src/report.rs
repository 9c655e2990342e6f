//! Report status and severity vocabularies.
//!
//! Both are persisted as their display strings (`"IN PROGRESS"`, `"MAJOR"`),
//! which is also what the event log and notification texts interpolate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    #[default]
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "TO BE TESTED")]
    ToBeTested,
    #[serde(rename = "CLOSED")]
    Closed,
    #[serde(rename = "REOPEN")]
    Reopen,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 5] = [
        ReportStatus::Open,
        ReportStatus::InProgress,
        ReportStatus::ToBeTested,
        ReportStatus::Closed,
        ReportStatus::Reopen,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Open => "OPEN",
            ReportStatus::InProgress => "IN PROGRESS",
            ReportStatus::ToBeTested => "TO BE TESTED",
            ReportStatus::Closed => "CLOSED",
            ReportStatus::Reopen => "REOPEN",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown report status '{s}'")))
    }
}

/// How badly a reported issue hurts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Minor,
    Moderate,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Minor,
        Severity::Moderate,
        Severity::Major,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Minor => "MINOR",
            Severity::Moderate => "MODERATE",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown severity '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn status_strings_round_trip_through_from_str() {
        for status in ReportStatus::ALL {
            assert_eq!(status.as_str().parse::<ReportStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_serializes_with_spaces() {
        let json = serde_json::to_string(&ReportStatus::ToBeTested).unwrap();
        assert_eq!(json, "\"TO BE TESTED\"");
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert_matches!(
            "DONE".parse::<ReportStatus>(),
            Err(CoreError::Validation(msg)) if msg.contains("DONE")
        );
    }

    #[test]
    fn severity_defaults_to_minor() {
        assert_eq!(Severity::default(), Severity::Minor);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
    }
}
