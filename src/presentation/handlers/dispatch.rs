use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::services::OfferView;
use crate::domain::ElectricianId;
use crate::presentation::handlers::error::{dispatch_error_response, error_body};
use crate::presentation::handlers::jobs::JobResponse;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub electrician_id: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub electrician_id: String,
    pub offer: Option<OfferResponse>,
}

#[derive(Serialize)]
pub struct OfferResponse {
    pub job_id: String,
    pub description: String,
    pub total_price: Decimal,
    pub offered_at: String,
    pub expires_at: String,
    pub seconds_remaining: i64,
}

impl OfferResponse {
    fn from_view(view: &OfferView) -> Self {
        Self {
            job_id: view.job_id.to_string(),
            description: view.description.clone(),
            total_price: view.total_price,
            offered_at: view.offered_at.to_rfc3339(),
            expires_at: view.expires_at.to_rfc3339(),
            seconds_remaining: view.seconds_remaining,
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn availability_handler(
    State(state): State<AppState>,
    Json(request): Json<AvailabilityRequest>,
) -> Response {
    if request.electrician_id.trim().is_empty() {
        return error_body(StatusCode::BAD_REQUEST, "electrician_id must not be empty");
    }

    let electrician_id = ElectricianId::new(request.electrician_id);

    match state
        .dispatch
        .go_available(electrician_id.clone(), request.name)
        .await
    {
        Ok(offer) => (
            StatusCode::OK,
            Json(AvailabilityResponse {
                electrician_id: electrician_id.to_string(),
                offer: offer.as_ref().map(OfferResponse::from_view),
            }),
        )
            .into_response(),
        Err(e) => dispatch_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn current_offer_handler(
    State(state): State<AppState>,
    Path(electrician_id): Path<String>,
) -> Response {
    let electrician_id = ElectricianId::new(electrician_id);

    match state.dispatch.current_offer(&electrician_id).await {
        Ok(Some(view)) => {
            (StatusCode::OK, Json(OfferResponse::from_view(&view))).into_response()
        }
        Ok(None) => error_body(StatusCode::NOT_FOUND, "no active offer"),
        Err(e) => dispatch_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn accept_offer_handler(
    State(state): State<AppState>,
    Path(electrician_id): Path<String>,
) -> Response {
    let electrician_id = ElectricianId::new(electrician_id);

    match state.dispatch.accept_offer(&electrician_id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from_domain(&job))).into_response(),
        Err(e) => dispatch_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn decline_offer_handler(
    State(state): State<AppState>,
    Path(electrician_id): Path<String>,
) -> Response {
    let electrician_id = ElectricianId::new(electrician_id);

    match state.dispatch.decline_offer(&electrician_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => dispatch_error_response(e),
    }
}

#[tracing::instrument(skip(state))]
pub async fn go_offline_handler(
    State(state): State<AppState>,
    Path(electrician_id): Path<String>,
) -> Response {
    let electrician_id = ElectricianId::new(electrician_id);

    state.dispatch.go_offline(&electrician_id).await;
    StatusCode::NO_CONTENT.into_response()
}
