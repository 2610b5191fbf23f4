use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use debtfolio_core::plans::{NewPlan, Plan, PlanUpdate};

use crate::{error::ApiResult, main_lib::AppState, models::ApiResponse};

async fn get_plans(State(state): State<Arc<AppState>>) -> ApiResult<Json<ApiResponse<Vec<Plan>>>> {
    let plans = state.plan_service.get_plans().await?;
    Ok(Json(ApiResponse::ok(plans)))
}

async fn get_plan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Plan>>> {
    let plan = state.plan_service.get_plan(&id).await?;
    Ok(Json(ApiResponse::ok(plan)))
}

async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(new_plan): Json<NewPlan>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Plan>>)> {
    let plan = state.plan_service.create_plan(new_plan).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(plan))))
}

async fn update_plan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<PlanUpdate>,
) -> ApiResult<Json<ApiResponse<Plan>>> {
    let plan = state.plan_service.update_plan(&id, update).await?;
    Ok(Json(ApiResponse::ok(plan)))
}

async fn delete_plan(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.plan_service.delete_plan(&id).await?;
    Ok(Json(ApiResponse::message_only("plan deleted")))
}

async fn bulk_import(
    State(state): State<Arc<AppState>>,
    Json(plans): Json<Vec<NewPlan>>,
) -> ApiResult<Json<ApiResponse<Vec<Plan>>>> {
    let plans = state.plan_service.bulk_import(plans).await?;
    Ok(Json(ApiResponse::ok(plans)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans", get(get_plans).post(create_plan))
        .route("/plans/bulk", post(bulk_import))
        .route(
            "/plans/{id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}
