use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use debtfolio_core::payments::{PaymentStatusEntry, PaymentStatusUpdate, PaymentTotals};

use crate::{error::ApiResult, main_lib::AppState, models::ApiResponse};

async fn get_status(
    Path(plan_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<PaymentStatusEntry>>>> {
    let entries = state.payment_service.get_status(&plan_id).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

async fn update_status(
    Path(plan_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(entries): Json<Vec<PaymentStatusUpdate>>,
) -> ApiResult<Json<ApiResponse<Vec<PaymentStatusEntry>>>> {
    let entries = state.payment_service.update_status(&plan_id, entries).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

async fn get_totals(
    Path(plan_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<PaymentTotals>>> {
    let totals = state.payment_service.get_totals(&plan_id).await?;
    Ok(Json(ApiResponse::ok(totals)))
}

async fn update_totals(
    Path(plan_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(totals): Json<PaymentTotals>,
) -> ApiResult<Json<ApiResponse<PaymentTotals>>> {
    let totals = state.payment_service.check_totals(&plan_id, totals).await?;
    Ok(Json(ApiResponse::ok(totals)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans/{id}/payments", get(get_status).put(update_status))
        .route(
            "/plans/{id}/payments/totals",
            get(get_totals).put(update_totals),
        )
}
