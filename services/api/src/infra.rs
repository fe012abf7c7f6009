use chrono::{Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use talentflow::workflows::pipeline::{
    AgencyId, ApplicationId, ApplicationRecord, ApplicationSource, ApplicationStatus, CandidateId,
    JobId, JobRecord, PipelineRepository, RepositoryError, ShortlistRecord,
};

pub(crate) const DEMO_AGENCY: &str = "agency-meridian";
pub(crate) const DEMO_JOB: &str = "job-0001";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPipelineRepository {
    jobs: Arc<Mutex<HashMap<JobId, JobRecord>>>,
    records: Arc<Mutex<HashMap<ApplicationId, ApplicationRecord>>>,
    shortlists: Arc<Mutex<Vec<ShortlistRecord>>>,
}

impl PipelineRepository for InMemoryPipelineRepository {
    fn insert_job(&self, job: JobRecord) -> Result<JobRecord, RepositoryError> {
        let mut guard = self.jobs.lock().expect("repository mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn job(&self, id: &JobId) -> Result<Option<JobRecord>, RepositoryError> {
        let guard = self.jobs.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn applications_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.job_id == job_id)
            .cloned()
            .collect())
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.status = status;
        Ok(record.clone())
    }

    fn create_shortlist(&self, record: ShortlistRecord) -> Result<ShortlistRecord, RepositoryError> {
        let mut guard = self.shortlists.lock().expect("shortlist mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }
}

/// Seed one open job with a spread of applications so the board has content
/// before any intake traffic arrives.
pub(crate) fn seed_demo_pipeline(
    repository: &InMemoryPipelineRepository,
) -> Result<JobRecord, RepositoryError> {
    let job = repository.insert_job(JobRecord {
        id: JobId(DEMO_JOB.to_string()),
        agency_id: AgencyId(DEMO_AGENCY.to_string()),
        title: "Senior Data Engineer".to_string(),
        open: true,
    })?;

    let seeds = [
        ("app-0001", "Alice Chen", ApplicationStatus::New, 30),
        ("app-0002", "Bruno Costa", ApplicationStatus::New, 90),
        ("app-0003", "Carla Osei", ApplicationStatus::Contacted, 240),
        ("app-0004", "Deepak Rao", ApplicationStatus::Qualified, 480),
        ("app-0005", "Elena Park", ApplicationStatus::Rejected, 600),
    ];
    for (id, name, status, minutes_ago) in seeds {
        repository.insert(ApplicationRecord {
            id: ApplicationId(id.to_string()),
            job_id: job.id.clone(),
            candidate_id: CandidateId(format!("cand-{id}")),
            candidate_name: name.to_string(),
            status,
            applied_at: Utc::now() - Duration::minutes(minutes_ago),
            source: ApplicationSource::CareerSite,
        })?;
    }

    Ok(job)
}
