//! Kanban pipeline for one job: applications grouped into status columns,
//! moved between columns through an optimistic update that rolls back when
//! the server rejects it.
//!
//! The module is split along the client/server seam of the workflow: `board`
//! holds the reducer and controller a UI drives, `service` and `router` hold
//! the REST surface the board talks to, and `repository` keeps storage
//! behind a trait so both halves stay testable in isolation.

pub mod access;
pub mod board;
pub mod domain;
pub mod notices;
pub mod repository;
pub mod router;
pub mod service;
pub mod shortlist;

#[cfg(test)]
mod tests;

pub use access::{actor_from_headers, AccessGuard, Actor, MemberRole};
pub use board::{
    BoardAction, BoardController, BoardState, ColumnMap, GatewayError, MoveCommand, MoveRejected,
    MoveResolution, StatusGateway,
};
pub use domain::{
    AgencyId, ApplicationCard, ApplicationId, ApplicationRecord, ApplicationSource,
    ApplicationStatus, CandidateId, JobId, JobRecord, ShortlistId, StatusParseError,
};
pub use notices::{Notice, NoticeError, NoticeLevel, NoticePublisher};
pub use repository::{PipelineRepository, RepositoryError};
pub use router::pipeline_router;
pub use service::{
    ApplicationIntake, BulkMoveFailure, BulkMoveOutcome, IntakeError, LoadError, MoveError,
    PipelineColumn, PipelineService, PipelineView, ShortlistError,
};
pub use shortlist::{SelectionError, SelectionState, ShortlistRecord};
