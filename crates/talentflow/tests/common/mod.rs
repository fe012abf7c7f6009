use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};

use talentflow::workflows::pipeline::{
    Actor, AgencyId, ApplicationId, ApplicationRecord, ApplicationSource, ApplicationStatus,
    CandidateId, JobId, JobRecord, MemberRole, PipelineRepository, RepositoryError,
    ShortlistRecord,
};

pub const AGENCY: &str = "agency-northwind";

pub fn job() -> JobRecord {
    JobRecord {
        id: JobId("job-0001".to_string()),
        agency_id: AgencyId(AGENCY.to_string()),
        title: "Senior Data Engineer".to_string(),
        open: true,
    }
}

pub fn recruiter() -> Actor {
    Actor {
        member_id: "mem-recruiter".to_string(),
        agency_id: AgencyId(AGENCY.to_string()),
        role: MemberRole::Recruiter,
    }
}

pub fn record(id: &str, name: &str, status: ApplicationStatus, minutes_ago: i64) -> ApplicationRecord {
    let applied_at = Utc
        .with_ymd_and_hms(2026, 8, 20, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        - Duration::minutes(minutes_ago);
    ApplicationRecord {
        id: ApplicationId(id.to_string()),
        job_id: job().id,
        candidate_id: CandidateId(format!("cand-{id}")),
        candidate_name: name.to_string(),
        status,
        applied_at,
        source: ApplicationSource::CareerSite,
    }
}

#[derive(Default)]
pub struct InMemoryRepository {
    jobs: Mutex<HashMap<JobId, JobRecord>>,
    records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
    shortlists: Mutex<Vec<ShortlistRecord>>,
}

impl PipelineRepository for InMemoryRepository {
    fn insert_job(&self, job: JobRecord) -> Result<JobRecord, RepositoryError> {
        let mut guard = self.jobs.lock().expect("lock");
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn job(&self, id: &JobId) -> Result<Option<JobRecord>, RepositoryError> {
        Ok(self.jobs.lock().expect("lock").get(id).cloned())
    }

    fn insert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(self.records.lock().expect("lock").get(id).cloned())
    }

    fn applications_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("lock")
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
        let mut guard = self.records.lock().expect("lock");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.status = status;
        Ok(record.clone())
    }

    fn create_shortlist(
        &self,
        record: ShortlistRecord,
    ) -> Result<ShortlistRecord, RepositoryError> {
        self.shortlists.lock().expect("lock").push(record.clone());
        Ok(record)
    }
}

/// Repository seeded with the demo job and a small spread of applications.
pub fn seeded_repository() -> Arc<InMemoryRepository> {
    let repository = Arc::new(InMemoryRepository::default());
    repository.insert_job(job()).expect("job inserted");
    for (index, (id, name, status)) in [
        ("a1", "Alice Chen", ApplicationStatus::New),
        ("b1", "Bruno Costa", ApplicationStatus::Contacted),
        ("c1", "Carla Osei", ApplicationStatus::Qualified),
        ("e1", "Elena Park", ApplicationStatus::Rejected),
    ]
    .into_iter()
    .enumerate()
    {
        repository
            .insert(record(id, name, status, index as i64 * 10))
            .expect("record inserted");
    }
    repository
}
