use chrono::{DateTime, Utc};
use serde::Serialize;

/// Severity of a transient board notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient message surfaced to the recruiter, cleared after its expiry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

/// Trait describing the toast/notification collaborator. Dispatch is
/// fire-and-forget; no acknowledgment is expected.
pub trait NoticePublisher: Send + Sync {
    fn publish(&self, notice: Notice) -> Result<(), NoticeError>;
}

/// Notice dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    #[error("notice transport unavailable: {0}")]
    Transport(String),
}
