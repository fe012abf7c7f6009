use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use crate::workflows::pipeline::access::{Actor, MemberRole};
use crate::workflows::pipeline::board::{GatewayError, StatusGateway};
use crate::workflows::pipeline::domain::{
    AgencyId, ApplicationCard, ApplicationId, ApplicationRecord, ApplicationSource,
    ApplicationStatus, CandidateId, JobId, JobRecord,
};
use crate::workflows::pipeline::notices::{Notice, NoticeError, NoticePublisher};
use crate::workflows::pipeline::repository::{PipelineRepository, RepositoryError};
use crate::workflows::pipeline::service::{PipelineColumn, PipelineView};
use crate::workflows::pipeline::shortlist::ShortlistRecord;

pub(super) const AGENCY: &str = "agency-northwind";

pub(super) fn notice_duration() -> Duration {
    Duration::seconds(4)
}

pub(super) fn job() -> JobRecord {
    JobRecord {
        id: JobId("job-0001".to_string()),
        agency_id: AgencyId(AGENCY.to_string()),
        title: "Senior Data Engineer".to_string(),
        open: true,
    }
}

pub(super) fn recruiter() -> Actor {
    Actor {
        member_id: "mem-recruiter".to_string(),
        agency_id: AgencyId(AGENCY.to_string()),
        role: MemberRole::Recruiter,
    }
}

pub(super) fn client() -> Actor {
    Actor {
        member_id: "mem-client".to_string(),
        agency_id: AgencyId(AGENCY.to_string()),
        role: MemberRole::Client,
    }
}

pub(super) fn outsider() -> Actor {
    Actor {
        member_id: "mem-outsider".to_string(),
        agency_id: AgencyId("agency-other".to_string()),
        role: MemberRole::Recruiter,
    }
}

pub(super) fn record(
    id: &str,
    name: &str,
    status: ApplicationStatus,
    minutes_ago: i64,
) -> ApplicationRecord {
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

pub(super) fn card(id: &str, name: &str, status: ApplicationStatus) -> ApplicationCard {
    record(id, name, status, 0).card()
}

/// A view with the given cards per column; every status always gets an entry.
pub(super) fn view(cards: Vec<ApplicationCard>) -> PipelineView {
    let total_applications = cards.len();
    let mut columns: Vec<PipelineColumn> = ApplicationStatus::ordered()
        .into_iter()
        .map(|status| PipelineColumn {
            status,
            label: status.label(),
            applications: Vec::new(),
        })
        .collect();
    for card in cards {
        if let Some(column) = columns
            .iter_mut()
            .find(|column| column.status == card.status)
        {
            column.applications.push(card);
        }
    }
    PipelineView {
        job: job(),
        columns,
        total_applications,
    }
}

/// One card in every column, so any ordered status pair has a move to try.
pub(super) fn full_view() -> PipelineView {
    view(vec![
        card("a1", "Alice Chen", ApplicationStatus::New),
        card("b1", "Bruno Costa", ApplicationStatus::Contacted),
        card("c1", "Carla Osei", ApplicationStatus::Qualified),
        card("d1", "Dmitri Volkov", ApplicationStatus::Placed),
        card("e1", "Elena Park", ApplicationStatus::Rejected),
    ])
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    jobs: Mutex<HashMap<JobId, JobRecord>>,
    records: Mutex<HashMap<ApplicationId, ApplicationRecord>>,
    shortlists: Mutex<Vec<ShortlistRecord>>,
}

impl MemoryRepository {
    pub(super) fn shortlists(&self) -> Vec<ShortlistRecord> {
        self.shortlists.lock().expect("lock").clone()
    }
}

impl PipelineRepository for MemoryRepository {
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

/// Repository fixture with the demo job and one application per status.
pub(super) fn seeded_repository() -> Arc<MemoryRepository> {
    let repository = Arc::new(MemoryRepository::default());
    repository.insert_job(job()).expect("job inserted");
    for (index, seed) in [
        ("a1", "Alice Chen", ApplicationStatus::New),
        ("a2", "Ana Souza", ApplicationStatus::New),
        ("b1", "Bruno Costa", ApplicationStatus::Contacted),
        ("c1", "Carla Osei", ApplicationStatus::Qualified),
        ("e1", "Elena Park", ApplicationStatus::Rejected),
    ]
    .into_iter()
    .enumerate()
    {
        let (id, name, status) = seed;
        repository
            .insert(record(id, name, status, index as i64 * 10))
            .expect("record inserted");
    }
    repository
}

pub(super) struct UnavailableRepository;

impl PipelineRepository for UnavailableRepository {
    fn insert_job(&self, _job: JobRecord) -> Result<JobRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn job(&self, _id: &JobId) -> Result<Option<JobRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applications_for_job(
        &self,
        _job_id: &JobId,
    ) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &ApplicationId,
        _status: ApplicationStatus,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create_shortlist(
        &self,
        _record: ShortlistRecord,
    ) -> Result<ShortlistRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Gateway stub that records call counts and replays a fixed outcome.
pub(super) struct StubGateway {
    calls: AtomicUsize,
    outcome: Mutex<Result<(), GatewayError>>,
}

impl StubGateway {
    pub(super) fn succeeding() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            outcome: Mutex::new(Ok(())),
        }
    }

    pub(super) fn failing(error: GatewayError) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            outcome: Mutex::new(Err(error)),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl StatusGateway for StubGateway {
    async fn update_status(
        &self,
        _application_id: &ApplicationId,
        _to: ApplicationStatus,
    ) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.outcome.lock().expect("lock").clone()
    }
}

#[derive(Default)]
pub(super) struct RecordingNotices {
    events: Mutex<Vec<Notice>>,
}

impl RecordingNotices {
    pub(super) fn events(&self) -> Vec<Notice> {
        self.events.lock().expect("lock").clone()
    }
}

impl NoticePublisher for RecordingNotices {
    fn publish(&self, notice: Notice) -> Result<(), NoticeError> {
        self.events.lock().expect("lock").push(notice);
        Ok(())
    }
}
