use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{ElectricianId, WalletTransaction, balance_of};
use crate::presentation::handlers::error::error_body;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct WalletResponse {
    pub electrician_id: String,
    pub balance: Decimal,
    pub transactions: Vec<TransactionView>,
}

#[derive(Serialize)]
pub struct TransactionView {
    pub id: String,
    pub job_id: Option<String>,
    pub kind: String,
    pub amount: Decimal,
    pub description: String,
    pub created_at: String,
}

impl TransactionView {
    fn from_domain(entry: &WalletTransaction) -> Self {
        Self {
            id: entry.id.to_string(),
            job_id: entry.job_id.map(|id| id.to_string()),
            kind: entry.kind.as_str().to_string(),
            amount: entry.amount,
            description: entry.description.clone(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn wallet_handler(
    State(state): State<AppState>,
    Path(electrician_id): Path<String>,
) -> Response {
    let electrician_id = ElectricianId::new(electrician_id);

    match state.ledger.list_for_electrician(&electrician_id).await {
        Ok(entries) => {
            let balance = balance_of(&entries);
            let transactions = entries.iter().map(TransactionView::from_domain).collect();
            (
                StatusCode::OK,
                Json(WalletResponse {
                    electrician_id: electrician_id.to_string(),
                    balance,
                    transactions,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load wallet");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load wallet: {}", e),
            )
        }
    }
}
