use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use super::domain::{AgencyId, JobRecord};

/// Member role within an agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    Recruiter,
    Client,
}

impl MemberRole {
    /// Unknown or absent role strings fall back to the least capable role.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "recruiter" => Self::Recruiter,
            _ => Self::Client,
        }
    }
}

/// Authenticated member acting on a pipeline. The auth service itself is out
/// of scope; this is the capability snapshot it hands us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub member_id: String,
    pub agency_id: AgencyId,
    pub role: MemberRole,
}

/// Capability checks consumed by the board and the pipeline service.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGuard;

impl AccessGuard {
    /// Anyone inside the owning agency may look at the board.
    pub fn can_view(&self, actor: &Actor, job: &JobRecord) -> bool {
        actor.agency_id == job.agency_id
    }

    /// Clients review shortlists but never drag cards.
    pub fn can_edit(&self, actor: &Actor, job: &JobRecord) -> bool {
        self.can_view(actor, job)
            && matches!(actor.role, MemberRole::Admin | MemberRole::Recruiter)
    }
}

/// Build an [`Actor`] from the identity headers forwarded by the gateway.
pub fn actor_from_headers(headers: &HeaderMap) -> Actor {
    let member_id = headers
        .get("x-member-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("anonymous")
        .to_string();
    let agency_id = headers
        .get("x-agency-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("agency-unknown")
        .to_string();
    let role = headers
        .get("x-member-role")
        .and_then(|value| value.to_str().ok())
        .map(MemberRole::parse)
        .unwrap_or(MemberRole::Client);

    Actor {
        member_id,
        agency_id: AgencyId(agency_id),
        role,
    }
}
