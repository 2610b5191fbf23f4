use axum::Json;
use serde_json::{json, Value};

use crate::models::ApiResponse;

pub async fn health() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(json!({ "status": "ok" })))
}
