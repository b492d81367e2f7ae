use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    DriveChanges, DriveId, DriveSubmission, EligibilityCriteria, ResponseDecision, ResponseStatus,
    StudentId,
};
use super::repository::{DriveStore, EligibilityRecordStore, RepositoryError, StudentDirectory};
use super::service::{DrivePlacementService, DriveServiceError};

/// Router builder exposing the drive lifecycle and response endpoints.
pub fn drive_router<D, E, S>(service: Arc<DrivePlacementService<D, E, S>>) -> Router
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/drives",
            post(create_drive_handler::<D, E, S>).get(list_drives_handler::<D, E, S>),
        )
        .route(
            "/api/v1/drives/eligible",
            post(preview_eligible_handler::<D, E, S>),
        )
        .route("/api/v1/drives/:drive_id", post(update_drive_handler::<D, E, S>))
        .route(
            "/api/v1/drives/:drive_id/seen",
            post(mark_seen_handler::<D, E, S>),
        )
        .route(
            "/api/v1/drives/:drive_id/respond",
            post(respond_handler::<D, E, S>),
        )
        .route(
            "/api/v1/students/:student_id/drives",
            get(list_eligible_handler::<D, E, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeenRequest {
    pub(crate) student_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RespondRequest {
    pub(crate) student_id: String,
    pub(crate) decision: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListEligibleQuery {
    pub(crate) status: Option<String>,
}

pub(crate) async fn create_drive_handler<D, E, S>(
    State(service): State<Arc<DrivePlacementService<D, E, S>>>,
    axum::Json(submission): axum::Json<DriveSubmission>,
) -> Response
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    match service.create_drive(submission) {
        Ok(created) => {
            let payload = json!({
                "drive_id": created.drive.drive_id,
                "seeded": created.seeded,
                "failed": created.failed,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_drive_handler<D, E, S>(
    State(service): State<Arc<DrivePlacementService<D, E, S>>>,
    Path(drive_id): Path<String>,
    axum::Json(changes): axum::Json<DriveChanges>,
) -> Response
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    match service.update_drive(&DriveId(drive_id), &changes) {
        Ok(outcome) => {
            let payload = json!({
                "updated": outcome.updated,
                "criteria_changed": outcome.criteria_changed,
                "removed": outcome.removed,
                "reset": outcome.reset,
                "added": outcome.added,
                "failed": outcome.failed,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_drives_handler<D, E, S>(
    State(service): State<Arc<DrivePlacementService<D, E, S>>>,
) -> Response
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    match service.list_drives() {
        Ok(summaries) => (StatusCode::OK, axum::Json(summaries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_eligible_handler<D, E, S>(
    State(service): State<Arc<DrivePlacementService<D, E, S>>>,
    axum::Json(criteria): axum::Json<EligibilityCriteria>,
) -> Response
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    match service.preview_eligible(&criteria) {
        Ok(students) => (StatusCode::OK, axum::Json(students)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn mark_seen_handler<D, E, S>(
    State(service): State<Arc<DrivePlacementService<D, E, S>>>,
    Path(drive_id): Path<String>,
    axum::Json(request): axum::Json<SeenRequest>,
) -> Response
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    match service.mark_seen(&StudentId(request.student_id), &DriveId(drive_id)) {
        Ok(outcome) => {
            let payload = json!({
                "changed": outcome.changed,
                "record": outcome.record,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn respond_handler<D, E, S>(
    State(service): State<Arc<DrivePlacementService<D, E, S>>>,
    Path(drive_id): Path<String>,
    axum::Json(request): axum::Json<RespondRequest>,
) -> Response
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    let Some(decision) = ResponseDecision::parse(&request.decision) else {
        let payload = json!({
            "error": format!("invalid decision '{}'", request.decision),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };

    match service.respond(&StudentId(request.student_id), &DriveId(drive_id), decision) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_eligible_handler<D, E, S>(
    State(service): State<Arc<DrivePlacementService<D, E, S>>>,
    Path(student_id): Path<String>,
    Query(query): Query<ListEligibleQuery>,
) -> Response
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match ResponseStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                let payload = json!({ "error": format!("invalid status filter '{raw}'") });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };

    match service.list_eligible(&StudentId(student_id), status) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: DriveServiceError) -> Response {
    let status = match &error {
        DriveServiceError::Criteria(_)
        | DriveServiceError::InvalidSubmission(_)
        | DriveServiceError::NoEligibleCandidates => StatusCode::UNPROCESSABLE_ENTITY,
        DriveServiceError::DriveNotFound
        | DriveServiceError::StudentNotFound
        | DriveServiceError::RecordNotFound => StatusCode::NOT_FOUND,
        DriveServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DriveServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
