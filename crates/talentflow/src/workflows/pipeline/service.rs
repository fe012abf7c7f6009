use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::access::{AccessGuard, Actor};
use super::domain::{
    ApplicationCard, ApplicationId, ApplicationRecord, ApplicationSource, ApplicationStatus,
    CandidateId, JobId, JobRecord, ShortlistId,
};
use super::repository::{PipelineRepository, RepositoryError};
use super::shortlist::ShortlistRecord;

/// One board column as returned to clients: status, heading, ordered cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineColumn {
    pub status: ApplicationStatus,
    pub label: &'static str,
    pub applications: Vec<ApplicationCard>,
}

/// Server response the board is rebuilt from on load. Always carries a column
/// entry for each of the five statuses, possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineView {
    pub job: JobRecord,
    pub columns: Vec<PipelineColumn>,
    pub total_applications: usize,
}

/// Intake payload from the public application form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationIntake {
    pub candidate_name: String,
    pub source: ApplicationSource,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
}

/// Per-id outcome of a manual bulk status update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkMoveOutcome {
    pub status: ApplicationStatus,
    pub moved: Vec<ApplicationId>,
    pub failed: Vec<BulkMoveFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkMoveFailure {
    pub application_id: ApplicationId,
    pub reason: String,
}

/// Whole-board load failure: the caller renders an error state and nothing
/// else.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("job not found")]
    JobNotFound,
    #[error("member may not view this pipeline")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Server-side rejection of a status update.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("application not found")]
    ApplicationNotFound,
    #[error("unknown application status '{0}'")]
    UnknownStatus(String),
    #[error("member may not move applications on this pipeline")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Rejection of a public application submission.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("job not found")]
    JobNotFound,
    #[error("job is no longer accepting applications")]
    JobClosed,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Rejection of a shortlist creation request.
#[derive(Debug, thiserror::Error)]
pub enum ShortlistError {
    #[error("shortlist requires at least one selected application")]
    EmptySelection,
    #[error("job not found")]
    JobNotFound,
    #[error("member may not share shortlists for this pipeline")]
    Forbidden,
    #[error("application '{0}' is not part of this job's pipeline")]
    UnknownApplication(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SHORTLIST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

fn next_shortlist_id() -> ShortlistId {
    let id = SHORTLIST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ShortlistId(format!("short-{id:06}"))
}

/// Service composing the access guard and repository behind the pipeline
/// endpoints.
pub struct PipelineService<R> {
    guard: AccessGuard,
    repository: Arc<R>,
}

impl<R> PipelineService<R>
where
    R: PipelineRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            guard: AccessGuard,
            repository,
        }
    }

    /// Fetch all applications for a job grouped by status, newest first
    /// within each column. Every status yields a column, empty or not.
    pub fn load_pipeline(&self, actor: &Actor, job_id: &JobId) -> Result<PipelineView, LoadError> {
        let job = self.repository.job(job_id)?.ok_or(LoadError::JobNotFound)?;
        if !self.guard.can_view(actor, &job) {
            return Err(LoadError::Forbidden);
        }

        let mut applications = self.repository.applications_for_job(job_id)?;
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        let total_applications = applications.len();

        let mut columns: Vec<PipelineColumn> = ApplicationStatus::ordered()
            .into_iter()
            .map(|status| PipelineColumn {
                status,
                label: status.label(),
                applications: Vec::new(),
            })
            .collect();
        for record in &applications {
            if let Some(column) = columns
                .iter_mut()
                .find(|column| column.status == record.status)
            {
                column.applications.push(record.card());
            }
        }

        Ok(PipelineView {
            job,
            columns,
            total_applications,
        })
    }

    /// Single-field status update behind the PATCH endpoint. The raw status
    /// string is validated here; any column-to-column move is accepted.
    pub fn move_status(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        status: &str,
    ) -> Result<ApplicationRecord, MoveError> {
        let to = status
            .parse::<ApplicationStatus>()
            .map_err(|err| MoveError::UnknownStatus(err.0))?;
        self.move_one(actor, id, to)
    }

    fn move_one(
        &self,
        actor: &Actor,
        id: &ApplicationId,
        to: ApplicationStatus,
    ) -> Result<ApplicationRecord, MoveError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(MoveError::ApplicationNotFound)?;
        let job = self
            .repository
            .job(&record.job_id)?
            .ok_or(MoveError::ApplicationNotFound)?;
        if !self.guard.can_edit(actor, &job) {
            return Err(MoveError::Forbidden);
        }

        let updated = self.repository.update_status(id, to)?;
        info!(
            application = %id.0,
            from = record.status.as_str(),
            to = to.as_str(),
            "application status updated"
        );
        Ok(updated)
    }

    /// Manual bulk update: the same single-field write per id, with per-id
    /// outcomes instead of all-or-nothing semantics.
    pub fn bulk_move(
        &self,
        actor: &Actor,
        ids: &[ApplicationId],
        status: &str,
    ) -> Result<BulkMoveOutcome, MoveError> {
        let to = status
            .parse::<ApplicationStatus>()
            .map_err(|err| MoveError::UnknownStatus(err.0))?;

        let mut moved = Vec::new();
        let mut failed = Vec::new();
        for id in ids {
            match self.move_one(actor, id, to) {
                Ok(record) => moved.push(record.id),
                Err(error) => failed.push(BulkMoveFailure {
                    application_id: id.clone(),
                    reason: error.to_string(),
                }),
            }
        }

        Ok(BulkMoveOutcome { status: to, moved, failed })
    }

    /// Public application form submission: every application starts in `New`.
    pub fn submit_application(
        &self,
        job_id: &JobId,
        intake: ApplicationIntake,
    ) -> Result<ApplicationRecord, IntakeError> {
        let job = self
            .repository
            .job(job_id)?
            .ok_or(IntakeError::JobNotFound)?;
        if !job.open {
            return Err(IntakeError::JobClosed);
        }

        let record = ApplicationRecord {
            id: next_application_id(),
            job_id: job.id,
            candidate_id: next_candidate_id(),
            candidate_name: intake.candidate_name,
            status: ApplicationStatus::New,
            applied_at: intake.applied_at.unwrap_or_else(Utc::now),
            source: intake.source,
        };
        let stored = self.repository.insert(record)?;
        info!(application = %stored.id.0, job = %stored.job_id.0, "application received");
        Ok(stored)
    }

    /// Batch the selected applications into a shortlist for the client.
    /// Selection is orthogonal to status and statuses are left untouched.
    pub fn create_shortlist(
        &self,
        actor: &Actor,
        job_id: &JobId,
        application_ids: Vec<ApplicationId>,
    ) -> Result<ShortlistRecord, ShortlistError> {
        if application_ids.is_empty() {
            return Err(ShortlistError::EmptySelection);
        }
        let job = self
            .repository
            .job(job_id)?
            .ok_or(ShortlistError::JobNotFound)?;
        if !self.guard.can_edit(actor, &job) {
            return Err(ShortlistError::Forbidden);
        }
        for id in &application_ids {
            let record = self
                .repository
                .fetch(id)?
                .ok_or_else(|| ShortlistError::UnknownApplication(id.0.clone()))?;
            if record.job_id != job.id {
                return Err(ShortlistError::UnknownApplication(id.0.clone()));
            }
        }

        let record = ShortlistRecord {
            id: next_shortlist_id(),
            job_id: job.id,
            application_ids,
            created_by: actor.member_id.clone(),
            created_at: Utc::now(),
        };
        let stored = self.repository.create_shortlist(record)?;
        info!(
            shortlist = %stored.id.0,
            job = %stored.job_id.0,
            applications = stored.application_ids.len(),
            "shortlist shared"
        );
        Ok(stored)
    }
}
