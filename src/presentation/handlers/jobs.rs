use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Actor, ActorRole, CustomerId, Job, JobId, JobStatus, TimelineEvent};
use crate::presentation::handlers::error::{error_body, lifecycle_error_response};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub customer_id: String,
    pub description: String,
    pub base_price: Decimal,
}

#[derive(Deserialize)]
pub struct TransitionRequest {
    pub status: String,
    pub actor_role: ActorRole,
    pub actor_id: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub actor_role: ActorRole,
    pub actor_id: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct AddOnRequest {
    pub name: String,
    pub price: Decimal,
    pub actor_role: ActorRole,
    pub actor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListJobsParams {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct JobResponse {
    pub id: String,
    pub customer_id: String,
    pub electrician_id: Option<String>,
    pub electrician_name: Option<String>,
    pub description: String,
    pub base_price: Decimal,
    pub add_ons: Vec<AddOnView>,
    pub total_price: Decimal,
    pub status: String,
    pub created_at: String,
    pub accepted_at: Option<String>,
    pub completed_at: Option<String>,
    pub cancelled_at: Option<String>,
}

#[derive(Serialize)]
pub struct AddOnView {
    pub name: String,
    pub price: Decimal,
}

impl JobResponse {
    pub fn from_domain(job: &Job) -> Self {
        Self {
            id: job.id.to_string(),
            customer_id: job.customer_id.to_string(),
            electrician_id: job.electrician_id.as_ref().map(|id| id.to_string()),
            electrician_name: job.electrician_name.clone(),
            description: job.description.clone(),
            base_price: job.base_price,
            add_ons: job
                .add_ons
                .iter()
                .map(|add_on| AddOnView {
                    name: add_on.name.clone(),
                    price: add_on.price,
                })
                .collect(),
            total_price: job.total_price(),
            status: job.status.as_str().to_string(),
            created_at: job.created_at.to_rfc3339(),
            accepted_at: job.accepted_at.map(|at| at.to_rfc3339()),
            completed_at: job.completed_at.map(|at| at.to_rfc3339()),
            cancelled_at: job.cancelled_at.map(|at| at.to_rfc3339()),
        }
    }
}

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobResponse>,
}

#[derive(Serialize)]
pub struct TimelineResponse {
    pub job_id: String,
    pub events: Vec<TimelineEventView>,
}

#[derive(Serialize)]
pub struct TimelineEventView {
    pub status: String,
    pub at: String,
    pub actor_role: String,
    pub actor_id: String,
    pub note: Option<String>,
}

impl TimelineEventView {
    fn from_domain(event: &TimelineEvent) -> Self {
        Self {
            status: event.status.as_str().to_string(),
            at: event.at.to_rfc3339(),
            actor_role: event.actor_role.as_str().to_string(),
            actor_id: event.actor_id.clone(),
            note: event.note.clone(),
        }
    }
}

fn parse_job_id(raw: &str) -> Result<JobId, Response> {
    Uuid::parse_str(raw)
        .map(JobId::from_uuid)
        .map_err(|_| error_body(StatusCode::BAD_REQUEST, format!("Invalid job ID: {}", raw)))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_job_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Response {
    if request.customer_id.trim().is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "customer_id must not be empty");
    }
    if request.description.trim().is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "description must not be empty");
    }
    if request.base_price < Decimal::ZERO {
        return error_body(StatusCode::BAD_REQUEST, "base_price must not be negative");
    }

    match state
        .lifecycle
        .create_job(
            CustomerId::new(request.customer_id),
            request.description,
            request.base_price,
        )
        .await
    {
        Ok(job) => (StatusCode::CREATED, Json(JobResponse::from_domain(&job))).into_response(),
        Err(e) => lifecycle_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.lifecycle.get_job(id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from_domain(&job))).into_response(),
        Err(e) => lifecycle_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn job_timeline_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.lifecycle.get_job(id).await {
        Ok(job) => {
            let events = job
                .timeline
                .iter()
                .map(TimelineEventView::from_domain)
                .collect();
            (
                StatusCode::OK,
                Json(TimelineResponse {
                    job_id: job.id.to_string(),
                    events,
                }),
            )
                .into_response()
        }
        Err(e) => lifecycle_error_response(e),
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn transition_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Response {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let requested = match request.status.parse::<JobStatus>() {
        Ok(status) => status,
        Err(message) => return error_body(StatusCode::BAD_REQUEST, message),
    };
    let actor = Actor::new(request.actor_role, request.actor_id);

    match state
        .lifecycle
        .apply_transition(id, requested, actor, request.note)
        .await
    {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from_domain(&job))).into_response(),
        Err(e) => lifecycle_error_response(e),
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn cancel_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<CancelRequest>,
) -> Response {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let actor = Actor::new(request.actor_role, request.actor_id);

    match state.lifecycle.cancel(id, actor, request.note).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from_domain(&job))).into_response(),
        Err(e) => lifecycle_error_response(e),
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn add_on_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<AddOnRequest>,
) -> Response {
    let id = match parse_job_id(&job_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if request.name.trim().is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "name must not be empty");
    }
    if request.price < Decimal::ZERO {
        return error_body(StatusCode::BAD_REQUEST, "price must not be negative");
    }
    let actor = Actor::new(request.actor_role, request.actor_id);

    match state
        .lifecycle
        .approve_add_on(id, request.name, request.price, actor)
        .await
    {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from_domain(&job))).into_response(),
        Err(e) => lifecycle_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_jobs_handler(
    State(state): State<AppState>,
    Query(params): Query<ListJobsParams>,
) -> Response {
    let Some(raw) = params.status else {
        return error_body(StatusCode::BAD_REQUEST, "status query parameter is required");
    };
    let status = match raw.parse::<JobStatus>() {
        Ok(status) => status,
        Err(message) => return error_body(StatusCode::BAD_REQUEST, message),
    };

    match state.lifecycle.list_jobs(status).await {
        Ok(jobs) => {
            let jobs = jobs.iter().map(JobResponse::from_domain).collect();
            (StatusCode::OK, Json(JobListResponse { jobs })).into_response()
        }
        Err(e) => lifecycle_error_response(e),
    }
}
