use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::StoreError;

/// Estado de un job. En el store es texto libre; aquí se parsea estricto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Texto exacto tal como se persiste en la columna `status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::InProgress => "In Progress",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(JobStatus::Pending),
            "In Progress" => Ok(JobStatus::InProgress),
            "Completed" => Ok(JobStatus::Completed),
            "Failed" => Ok(JobStatus::Failed),
            other => Err(StoreError::InvalidRecord(format!("unknown job status '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_progress_uses_the_spaced_spelling() {
        assert_eq!(JobStatus::InProgress.as_str(), "In Progress");
        assert_eq!("In Progress".parse::<JobStatus>(), Ok(JobStatus::InProgress));
        assert_eq!(serde_json::to_string(&JobStatus::InProgress).unwrap(), "\"In Progress\"");
    }

    #[test]
    fn parsing_is_strict() {
        assert!("completed".parse::<JobStatus>().is_err());
        assert!("InProgress".parse::<JobStatus>().is_err());
        assert!(matches!("Done".parse::<JobStatus>(), Err(StoreError::InvalidRecord(_))));
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
    }
}
