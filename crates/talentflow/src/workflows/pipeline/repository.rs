use super::domain::{ApplicationId, ApplicationRecord, ApplicationStatus, JobId, JobRecord};
use super::shortlist::ShortlistRecord;

/// Storage abstraction so the pipeline service can be exercised in isolation.
///
/// `update_status` is a single-row, single-field write with no
/// optimistic-concurrency token: two near-simultaneous moves of the same
/// application race with the last write winning.
pub trait PipelineRepository: Send + Sync {
    fn insert_job(&self, job: JobRecord) -> Result<JobRecord, RepositoryError>;
    fn job(&self, id: &JobId) -> Result<Option<JobRecord>, RepositoryError>;
    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    fn applications_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError>;
    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn create_shortlist(&self, record: ShortlistRecord)
        -> Result<ShortlistRecord, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
