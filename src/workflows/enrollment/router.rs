use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::audit::{Actor, AuditSink};
use super::domain::{
    Applicant, ApplicantId, ApprovalStatus, EnrollmentSubmission, Gender, Lrn, SectionId, Track,
};
use super::repository::{EnrollmentRegistry, StoreError};
use super::service::{EnrollmentError, EnrollmentService};

/// Router builder exposing the enrollment endpoints consumed by the portal UI.
pub fn enrollment_router<R, A>(service: Arc<EnrollmentService<R, A>>) -> Router
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/enrollment/applicants",
            post(register_handler::<R, A>),
        )
        .route(
            "/api/v1/enrollment/applicants/:lrn",
            get(status_handler::<R, A>),
        )
        .route(
            "/api/v1/enrollment/applicants/:id/status",
            post(set_status_handler::<R, A>),
        )
        .route(
            "/api/v1/enrollment/sections",
            post(add_section_handler::<R, A>),
        )
        .route(
            "/api/v1/enrollment/sections/:id",
            axum::routing::delete(delete_section_handler::<R, A>),
        )
        .route(
            "/api/v1/enrollment/capacity",
            put(capacity_handler::<R, A>),
        )
        .route(
            "/api/v1/enrollment/synchronize",
            post(synchronize_handler::<R, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    lrn: String,
    last_name: String,
    first_name: String,
    track: String,
    gender: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetStatusRequest {
    status: String,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    actor_id: Option<String>,
    #[serde(default)]
    actor_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddSectionRequest {
    track: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteSectionRequest {
    track: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CapacityRequest {
    capacity: u32,
}

/// Sanitized representation of an applicant's exposed status.
#[derive(Debug, Serialize)]
pub struct ApplicantStatusView {
    pub lrn: String,
    pub last_name: String,
    pub first_name: String,
    pub track: &'static str,
    pub status: &'static str,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar_feedback: Option<String>,
}

impl From<&Applicant> for ApplicantStatusView {
    fn from(applicant: &Applicant) -> Self {
        Self {
            lrn: applicant.lrn.as_str().to_string(),
            last_name: applicant.last_name.clone(),
            first_name: applicant.first_name.clone(),
            track: applicant.track.strand(),
            status: applicant.status.label(),
            section: applicant.section_label().to_string(),
            registrar_feedback: applicant.registrar_feedback.clone(),
        }
    }
}

pub(crate) async fn register_handler<R, A>(
    State(service): State<Arc<EnrollmentService<R, A>>>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    let lrn = match Lrn::new(&request.lrn) {
        Ok(lrn) => lrn,
        Err(err) => return unprocessable(err.to_string()),
    };
    let Some(track) = Track::from_strand(&request.track) else {
        return unprocessable(format!("unknown track '{}'", request.track));
    };
    let Some(gender) = Gender::from_label(&request.gender) else {
        return unprocessable(format!("unknown gender '{}'", request.gender));
    };

    let submission = EnrollmentSubmission {
        lrn,
        last_name: request.last_name,
        first_name: request.first_name,
        track,
        gender,
    };
    match service.register(submission) {
        Ok(applicant) => {
            let view = ApplicantStatusView::from(&applicant);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(EnrollmentError::Store(StoreError::Conflict)) => {
            let payload = json!({ "error": "an application with this LRN already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<EnrollmentService<R, A>>>,
    Path(lrn): Path<String>,
) -> Response
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    let lrn = match Lrn::new(&lrn) {
        Ok(lrn) => lrn,
        Err(err) => return unprocessable(err.to_string()),
    };
    match service.status_by_lrn(&lrn) {
        Ok(applicant) => {
            let view = ApplicantStatusView::from(&applicant);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn set_status_handler<R, A>(
    State(service): State<Arc<EnrollmentService<R, A>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<SetStatusRequest>,
) -> Response
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    let Some(status) = ApprovalStatus::from_label(&request.status) else {
        return unprocessable(format!("unknown status '{}'", request.status));
    };
    let actor = actor_from(request.actor_id, request.actor_name);

    match service.set_status(&actor, ApplicantId(id), status, request.feedback) {
        Ok(applicant) => {
            let view = ApplicantStatusView::from(&applicant);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn add_section_handler<R, A>(
    State(service): State<Arc<EnrollmentService<R, A>>>,
    axum::Json(request): axum::Json<AddSectionRequest>,
) -> Response
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    let Some(track) = Track::from_strand(&request.track) else {
        return unprocessable(format!("unknown track '{}'", request.track));
    };
    match service.add_section(&Actor::system(), track) {
        Ok(label) => {
            let payload = json!({ "section": label });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn delete_section_handler<R, A>(
    State(service): State<Arc<EnrollmentService<R, A>>>,
    Path(id): Path<u64>,
    axum::Json(request): axum::Json<DeleteSectionRequest>,
) -> Response
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    let Some(track) = Track::from_strand(&request.track) else {
        return unprocessable(format!("unknown track '{}'", request.track));
    };
    match service.delete_section(&Actor::system(), SectionId(id), track) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn capacity_handler<R, A>(
    State(service): State<Arc<EnrollmentService<R, A>>>,
    axum::Json(request): axum::Json<CapacityRequest>,
) -> Response
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    match service.set_global_capacity(&Actor::system(), request.capacity) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn synchronize_handler<R, A>(
    State(service): State<Arc<EnrollmentService<R, A>>>,
) -> Response
where
    R: EnrollmentRegistry + 'static,
    A: AuditSink + 'static,
{
    match service.synchronize() {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(other) => error_response(other),
    }
}

fn actor_from(id: Option<String>, name: Option<String>) -> Actor {
    match (id, name) {
        (Some(id), Some(name)) => Actor { id, name },
        (Some(id), None) => Actor {
            name: id.clone(),
            id,
        },
        _ => Actor::system(),
    }
}

fn unprocessable(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

fn error_response(err: EnrollmentError) -> Response {
    let status = match &err {
        EnrollmentError::CapacityBelowMinimum { .. }
        | EnrollmentError::SectionLettersExhausted(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EnrollmentError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        EnrollmentError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        EnrollmentError::Store(StoreError::Unavailable(_)) | EnrollmentError::Audit(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
