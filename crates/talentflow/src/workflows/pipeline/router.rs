use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::access::actor_from_headers;
use super::domain::{ApplicationId, JobId};
use super::repository::{PipelineRepository, RepositoryError};
use super::service::{
    ApplicationIntake, IntakeError, LoadError, MoveError, PipelineService, ShortlistError,
};

/// Router builder exposing the pipeline HTTP surface.
pub fn pipeline_router<R>(service: Arc<PipelineService<R>>) -> Router
where
    R: PipelineRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs/:job_id/applications",
            get(board_handler::<R>).post(intake_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(move_handler::<R>),
        )
        .route("/api/v1/applications/status", post(bulk_move_handler::<R>))
        .route(
            "/api/v1/jobs/:job_id/shortlists",
            post(shortlist_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveStatusRequest {
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkMoveRequest {
    pub(crate) application_ids: Vec<String>,
    pub(crate) status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShortlistRequest {
    pub(crate) application_ids: Vec<String>,
}

pub(crate) async fn board_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let actor = actor_from_headers(&headers);
    match service.load_pipeline(&actor, &JobId(job_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(LoadError::JobNotFound) => {
            error_response(StatusCode::NOT_FOUND, "job not found")
        }
        Err(LoadError::Forbidden) => {
            error_response(StatusCode::FORBIDDEN, "pipeline is not visible to this member")
        }
        Err(LoadError::Repository(error)) => repository_error_response(error),
    }
}

pub(crate) async fn move_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<MoveStatusRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let actor = actor_from_headers(&headers);
    let id = ApplicationId(application_id);
    match service.move_status(&actor, &id, &payload.status) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => move_error_response(error),
    }
}

pub(crate) async fn bulk_move_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<BulkMoveRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let actor = actor_from_headers(&headers);
    let ids: Vec<ApplicationId> = payload
        .application_ids
        .into_iter()
        .map(ApplicationId)
        .collect();
    match service.bulk_move(&actor, &ids, &payload.status) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => move_error_response(error),
    }
}

pub(crate) async fn intake_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(job_id): Path<String>,
    axum::Json(intake): axum::Json<ApplicationIntake>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    match service.submit_application(&JobId(job_id), intake) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record)).into_response(),
        Err(IntakeError::JobNotFound) => error_response(StatusCode::NOT_FOUND, "job not found"),
        Err(IntakeError::JobClosed) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "job is no longer accepting applications",
        ),
        Err(IntakeError::Repository(error)) => repository_error_response(error),
    }
}

pub(crate) async fn shortlist_handler<R>(
    State(service): State<Arc<PipelineService<R>>>,
    Path(job_id): Path<String>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<ShortlistRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
{
    let actor = actor_from_headers(&headers);
    let ids: Vec<ApplicationId> = payload
        .application_ids
        .into_iter()
        .map(ApplicationId)
        .collect();
    match service.create_shortlist(&actor, &JobId(job_id), ids) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error @ ShortlistError::EmptySelection)
        | Err(error @ ShortlistError::UnknownApplication(_)) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, &error.to_string())
        }
        Err(ShortlistError::JobNotFound) => error_response(StatusCode::NOT_FOUND, "job not found"),
        Err(ShortlistError::Forbidden) => error_response(
            StatusCode::FORBIDDEN,
            "member may not share shortlists for this pipeline",
        ),
        Err(ShortlistError::Repository(error)) => repository_error_response(error),
    }
}

fn move_error_response(error: MoveError) -> Response {
    match error {
        MoveError::ApplicationNotFound => {
            error_response(StatusCode::NOT_FOUND, "application not found")
        }
        MoveError::UnknownStatus(value) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("unknown application status '{value}'"),
        ),
        MoveError::Forbidden => error_response(
            StatusCode::FORBIDDEN,
            "member may not move applications on this pipeline",
        ),
        MoveError::Repository(error) => repository_error_response(error),
    }
}

fn repository_error_response(error: RepositoryError) -> Response {
    match error {
        RepositoryError::NotFound => error_response(StatusCode::NOT_FOUND, "record not found"),
        RepositoryError::Conflict => {
            error_response(StatusCode::CONFLICT, "record already exists")
        }
        RepositoryError::Unavailable(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
