use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for applications submitted to a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for job openings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier wrapper for the agency owning a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgencyId(pub String);

/// Identifier wrapper for shortlists shared with a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortlistId(pub String);

/// The five pipeline stages an application can occupy.
///
/// The board is a free transition graph: any status may move to any other
/// status, including backwards. Declaration order is the canonical column
/// order, which also drives the `Ord` derive used by the board's column map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    New,
    Contacted,
    Qualified,
    Placed,
    Rejected,
}

impl ApplicationStatus {
    /// Canonical column order for the pipeline board.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::New,
            Self::Contacted,
            Self::Qualified,
            Self::Placed,
            Self::Rejected,
        ]
    }

    /// Column heading shown on the board.
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::Placed => "Placed",
            Self::Rejected => "Rejected",
        }
    }

    /// Wire value used in JSON payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Placed => "placed",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Placed | Self::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a payload names a status outside the five defined values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct StatusParseError(pub String);

impl FromStr for ApplicationStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "qualified" => Ok(Self::Qualified),
            "placed" => Ok(Self::Placed),
            "rejected" => Ok(Self::Rejected),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// Intake channel recorded when a candidate applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "channel")]
pub enum ApplicationSource {
    CareerSite,
    JobBoard { board: String },
    Referral { referred_by: String },
    Sourced,
}

impl ApplicationSource {
    pub fn label(&self) -> String {
        match self {
            Self::CareerSite => "Career site".to_string(),
            Self::JobBoard { board } => format!("Job board ({board})"),
            Self::Referral { referred_by } => format!("Referral ({referred_by})"),
            Self::Sourced => "Sourced".to_string(),
        }
    }
}

/// Persisted shape of one candidate's submission to one job.
///
/// Invariant: the status is always one of the five defined values and the
/// record belongs to exactly one job at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub source: ApplicationSource,
}

impl ApplicationRecord {
    /// Board-facing summary of the record.
    pub fn card(&self) -> ApplicationCard {
        ApplicationCard {
            id: self.id.clone(),
            candidate_name: self.candidate_name.clone(),
            status: self.status,
            applied_at: self.applied_at,
            source_label: self.source.label(),
        }
    }
}

/// What a pipeline column renders for one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCard {
    pub id: ApplicationId,
    pub candidate_name: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub source_label: String,
}

/// Job opening owned by one agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub agency_id: AgencyId,
    pub title: String,
    pub open: bool,
}
